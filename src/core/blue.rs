use std::sync::atomic::AtomicBool;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{
        history::History,
        search::{DemandChoice, DemandSearch, blue_levels},
        tariffs::BlueTariffs,
    },
    prelude::*,
    quantity::{cost::Cost, power::Kilowatts, rate::KilowattRate},
};

/// Cheapest Blue contract for the history.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct BlueQuote {
    pub total_cost: Cost,

    /// Contracted peak demand in whole kilowatts.
    pub peak_demand: u32,

    /// Contracted off-peak demand in whole kilowatts.
    pub off_peak_demand: u32,

    pub consumption_cost: Cost,
    pub peak_demand_cost: Cost,
    pub off_peak_demand_cost: Cost,
}

impl BlueQuote {
    pub fn try_optimize(
        history: &History,
        tariffs: &BlueTariffs,
        should_terminate: &AtomicBool,
    ) -> Result<Self> {
        let consumption_cost: Cost = history
            .iter()
            .map(|period| {
                period.peak_consumption * tariffs.peak_consumption
                    + period.off_peak_consumption * tariffs.off_peak_consumption
            })
            .sum();

        let off_peak = Self::search(
            &history.iter().map(|period| period.off_peak_demand).collect_vec(),
            tariffs.off_peak_demand,
            should_terminate,
        )
        .context("failed to optimize the Blue off-peak contracted demand")?;
        let peak = Self::search(
            &history.iter().map(|period| period.peak_demand).collect_vec(),
            tariffs.peak_demand,
            should_terminate,
        )
        .context("failed to optimize the Blue peak contracted demand")?;

        Ok(Self {
            total_cost: consumption_cost + off_peak.cost + peak.cost,
            peak_demand: peak.contracted_demand,
            off_peak_demand: off_peak.contracted_demand,
            consumption_cost,
            peak_demand_cost: peak.cost,
            off_peak_demand_cost: off_peak.cost,
        })
    }

    fn search(
        samples: &[Kilowatts],
        rate: KilowattRate,
        should_terminate: &AtomicBool,
    ) -> Result<DemandChoice> {
        DemandSearch::builder()
            .samples(samples)
            .rate(rate)
            .levels(blue_levels(samples)?)
            .should_terminate(should_terminate)
            .run()
    }
}
