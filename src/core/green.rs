use std::sync::atomic::AtomicBool;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    core::{
        history::{BillingPeriod, History},
        search::{DemandSearch, green_levels},
        tariffs::GreenTariffs,
    },
    prelude::*,
    quantity::cost::Cost,
};

/// Cheapest Green contract for the history.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct GreenQuote {
    pub total_cost: Cost,

    /// Single contracted demand in whole kilowatts.
    pub contracted_demand: u32,

    pub consumption_cost: Cost,
    pub demand_cost: Cost,
}

impl GreenQuote {
    pub fn try_optimize(
        history: &History,
        tariffs: &GreenTariffs,
        should_terminate: &AtomicBool,
    ) -> Result<Self> {
        let consumption_cost: Cost = history
            .iter()
            .map(|period| {
                period.peak_consumption * tariffs.peak_consumption
                    + period.off_peak_consumption * tariffs.off_peak_consumption
            })
            .sum();

        let combined_demand = history.iter().map(BillingPeriod::combined_demand).collect_vec();
        let demand = DemandSearch::builder()
            .samples(&combined_demand)
            .rate(tariffs.demand)
            .levels(green_levels(&combined_demand)?)
            .should_terminate(should_terminate)
            .run()
            .context("failed to optimize the Green contracted demand")?;

        Ok(Self {
            total_cost: consumption_cost + demand.cost,
            contracted_demand: demand.contracted_demand,
            consumption_cost,
            demand_cost: demand.cost,
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_consumption_cost() {
        let quote = GreenQuote::try_optimize(
            &History::from_tuples(&[(10.0, 10.0, 100.0, 1000.0), (10.0, 10.0, 50.0, 500.0)]),
            &GreenTariffs::default(),
            &AtomicBool::new(false),
        )
        .unwrap();
        assert_abs_diff_eq!(
            quote.consumption_cost.0,
            150.0 * 1.58306 + 1500.0 * 0.34664,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            quote.total_cost.0,
            quote.consumption_cost.0 + quote.demand_cost.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_uses_combined_demand() {
        // Off-peak dominates in the first period, peak in the second:
        let quote = GreenQuote::try_optimize(
            &History::from_tuples(&[(50.0, 20.0, 0.0, 0.0), (20.0, 50.0, 0.0, 0.0)]),
            &GreenTariffs::default(),
            &AtomicBool::new(false),
        )
        .unwrap();
        assert_eq!(quote.contracted_demand, 48);
        assert_abs_diff_eq!(quote.demand_cost.0, 2.0 * 48.0 * 14.86, epsilon = 1e-9);
        assert_eq!(quote.consumption_cost, Cost::ZERO);
    }

    #[test]
    fn test_repeated_sample_converges_like_single() {
        let single = GreenQuote::try_optimize(
            &History::from_tuples(&[(73.0, 61.0, 0.0, 0.0)]),
            &GreenTariffs::default(),
            &AtomicBool::new(false),
        )
        .unwrap();
        let double = GreenQuote::try_optimize(
            &History::from_tuples(&[(73.0, 61.0, 0.0, 0.0), (73.0, 61.0, 0.0, 0.0)]),
            &GreenTariffs::default(),
            &AtomicBool::new(false),
        )
        .unwrap();
        assert_eq!(single.contracted_demand, double.contracted_demand);
    }

    #[test]
    fn test_demand_cost_is_monotonic() {
        let mut previous = Cost::ZERO;
        for peak in (0..=40).map(|step| 30.0 + f64::from(step) * 2.5) {
            let history = History::from_tuples(&[
                (40.0, 35.0, 0.0, 0.0),
                (52.0, peak, 0.0, 0.0),
                (44.0, 38.0, 0.0, 0.0),
            ]);
            let quote = GreenQuote::try_optimize(
                &history,
                &GreenTariffs::default(),
                &AtomicBool::new(false),
            )
            .unwrap();
            assert!(quote.demand_cost >= previous, "{peak}: {quote:?}");
            previous = quote.demand_cost;
        }
    }

    #[test]
    fn test_zero_demand_fails() {
        let history = History::from_tuples(&[(0.0, 0.0, 10.0, 10.0)]);
        let result =
            GreenQuote::try_optimize(&history, &GreenTariffs::default(), &AtomicBool::new(false));
        assert!(result.is_err());
    }
}
