use serde::Deserialize;

use crate::quantity::{
    Quantity,
    rate::{KilowattHourRate, KilowattRate},
};

/// Rate table of both modalities.
///
/// Every rate may be overridden separately, the omitted ones keep their defaults.
#[derive(Copy, Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Tariffs {
    pub green: GreenTariffs,
    pub blue: BlueTariffs,
}

/// Single demand rate, expensive peak consumption.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GreenTariffs {
    pub peak_consumption: KilowattHourRate,
    pub off_peak_consumption: KilowattHourRate,
    pub demand: KilowattRate,
}

impl Default for GreenTariffs {
    fn default() -> Self {
        Self {
            peak_consumption: Quantity(1.58306),
            off_peak_consumption: Quantity(0.34664),
            demand: Quantity(14.86),
        }
    }
}

/// Separate peak and off-peak demand rates.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BlueTariffs {
    pub peak_consumption: KilowattHourRate,
    pub off_peak_consumption: KilowattHourRate,
    pub peak_demand: KilowattRate,
    pub off_peak_demand: KilowattRate,
}

impl Default for BlueTariffs {
    fn default() -> Self {
        Self {
            peak_consumption: Quantity(0.49566),
            off_peak_consumption: Quantity(0.34664),
            peak_demand: Quantity(45.90),
            off_peak_demand: Quantity(14.86),
        }
    }
}
