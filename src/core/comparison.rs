use std::sync::atomic::AtomicBool;

use serde::Serialize;

use crate::{
    core::{blue::BlueQuote, green::GreenQuote, history::History, tariffs::Tariffs},
    prelude::*,
    quantity::cost::Cost,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Green,
    Blue,
}

/// Both modalities side by side, and the cheaper one.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub green: GreenQuote,
    pub blue: BlueQuote,
    pub recommended_modality: Modality,
    pub minimum_cost: Cost,
}

impl Comparison {
    pub fn try_optimize(
        history: &History,
        tariffs: &Tariffs,
        should_terminate: &AtomicBool,
    ) -> Result<Self> {
        let green = GreenQuote::try_optimize(history, &tariffs.green, should_terminate)?;
        let blue = BlueQuote::try_optimize(history, &tariffs.blue, should_terminate)?;
        Ok(Self::new(green, blue))
    }

    /// Green wins a tie.
    pub fn new(green: GreenQuote, blue: BlueQuote) -> Self {
        let (recommended_modality, minimum_cost) = if blue.total_cost < green.total_cost {
            (Modality::Blue, blue.total_cost)
        } else {
            (Modality::Green, green.total_cost)
        };
        Self { green, blue, recommended_modality, minimum_cost }
    }
}
