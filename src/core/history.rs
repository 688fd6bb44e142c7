use itertools::izip;

use crate::{
    core::series::Series,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// The four input series do not describe the same billing periods.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(
    "demand and consumption samples must have the same length \
     (off-peak demand: {off_peak_demand}, peak demand: {peak_demand}, \
     peak consumption: {peak_consumption}, off-peak consumption: {off_peak_consumption})"
)]
pub struct LengthMismatch {
    pub off_peak_demand: usize,
    pub peak_demand: usize,
    pub peak_consumption: usize,
    pub off_peak_consumption: usize,
}

/// Measurements of a single billing period.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BillingPeriod {
    /// Maximum demand outside of the peak hours.
    pub off_peak_demand: Kilowatts,

    /// Maximum demand during the peak hours.
    pub peak_demand: Kilowatts,

    pub peak_consumption: KilowattHours,
    pub off_peak_consumption: KilowattHours,
}

impl BillingPeriod {
    /// Demand seen by a single-rate contract: the larger of both periods.
    pub fn combined_demand(&self) -> Kilowatts {
        self.off_peak_demand.max(self.peak_demand)
    }
}

/// Validated billing history.
#[derive(Clone, Debug, PartialEq, derive_more::Deref)]
pub struct History(Vec<BillingPeriod>);

impl History {
    pub fn try_new(
        off_peak_demand: Series<Kilowatts>,
        peak_demand: Series<Kilowatts>,
        peak_consumption: Series<KilowattHours>,
        off_peak_consumption: Series<KilowattHours>,
    ) -> Result<Self, LengthMismatch> {
        let n_periods = off_peak_demand.len();
        if peak_demand.len() != n_periods
            || peak_consumption.len() != n_periods
            || off_peak_consumption.len() != n_periods
        {
            return Err(LengthMismatch {
                off_peak_demand: n_periods,
                peak_demand: peak_demand.len(),
                peak_consumption: peak_consumption.len(),
                off_peak_consumption: off_peak_consumption.len(),
            });
        }
        let periods = izip!(off_peak_demand, peak_demand, peak_consumption, off_peak_consumption)
            .map(|(off_peak_demand, peak_demand, peak_consumption, off_peak_consumption)| {
                BillingPeriod {
                    off_peak_demand,
                    peak_demand,
                    peak_consumption,
                    off_peak_consumption,
                }
            })
            .collect();
        Ok(Self(periods))
    }
}

#[cfg(test)]
impl History {
    /// Build from `(off-peak demand, peak demand, peak consumption, off-peak consumption)` tuples.
    pub fn from_tuples(periods: &[(f64, f64, f64, f64)]) -> Self {
        Self(
            periods
                .iter()
                .map(|&(off_peak_demand, peak_demand, peak_consumption, off_peak_consumption)| {
                    BillingPeriod {
                        off_peak_demand: Kilowatts::from(off_peak_demand),
                        peak_demand: Kilowatts::from(peak_demand),
                        peak_consumption: KilowattHours::from(peak_consumption),
                        off_peak_consumption: KilowattHours::from(off_peak_consumption),
                    }
                })
                .collect(),
        )
    }
}
