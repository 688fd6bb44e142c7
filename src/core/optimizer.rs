use std::sync::atomic::AtomicBool;

use bon::Builder;
use serde::Serialize;

use crate::{
    core::{
        comparison::Comparison,
        history::{History, LengthMismatch},
        series::Series,
        tariffs::Tariffs,
    },
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Result of a single optimization.
///
/// An inconsistent input is reported as [`Outcome::Rejected`], whereas any other failure comes out
/// as an error.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Optimized(Comparison),
    Rejected(Rejection),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub error: String,
}

impl From<LengthMismatch> for Rejection {
    fn from(mismatch: LengthMismatch) -> Self {
        Self { error: mismatch.to_string() }
    }
}

#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct Optimizer<'a> {
    tariffs: &'a Tariffs,
    off_peak_demand: Series<Kilowatts>,
    peak_demand: Series<Kilowatts>,
    peak_consumption: Series<KilowattHours>,
    off_peak_consumption: Series<KilowattHours>,

    /// Abandons the calculation once raised.
    should_terminate: Option<&'a AtomicBool>,
}

impl<S: optimizer_builder::IsComplete> OptimizerBuilder<'_, S> {
    pub fn optimize(self) -> Result<Outcome> {
        self.build().optimize()
    }
}

impl Optimizer<'_> {
    fn optimize(self) -> Result<Outcome> {
        let never = AtomicBool::new(false);
        let should_terminate = self.should_terminate.unwrap_or(&never);
        let history = match History::try_new(
            self.off_peak_demand,
            self.peak_demand,
            self.peak_consumption,
            self.off_peak_consumption,
        ) {
            Ok(history) => history,
            Err(mismatch) => return Ok(Outcome::Rejected(mismatch.into())),
        };
        Ok(Outcome::Optimized(Comparison::try_optimize(&history, self.tariffs, should_terminate)?))
    }
}
