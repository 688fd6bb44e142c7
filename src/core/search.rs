use std::{
    ops::RangeInclusive,
    sync::atomic::{AtomicBool, Ordering},
};

use bon::Builder;
use itertools::{Itertools, MinMaxResult};
use ordered_float::OrderedFloat;

use crate::{
    core::overrun,
    prelude::*,
    quantity::{cost::Cost, power::Kilowatts, rate::KilowattRate},
};

/// Blue searches start this many times below the smallest measured demand.
pub const BLUE_LOWER_BOUND_DIVISOR: f64 = 1.1;

/// Cheapest contracted demand found by the scan.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DemandChoice {
    /// Whole kilowatts.
    pub contracted_demand: u32,

    /// Demand charge summed over all the billing periods.
    pub cost: Cost,
}

/// Exhaustive scan over the integer contracted demand levels.
#[derive(Builder)]
#[builder(finish_fn(vis = ""))]
pub struct DemandSearch<'a> {
    samples: &'a [Kilowatts],
    rate: KilowattRate,
    levels: RangeInclusive<u32>,

    /// Raised by the caller to abandon the scan.
    should_terminate: &'a AtomicBool,
}

impl<S: demand_search_builder::IsComplete> DemandSearchBuilder<'_, S> {
    pub fn run(self) -> Result<DemandChoice> {
        self.build().run()
    }
}

impl DemandSearch<'_> {
    /// Pick the cheapest level, the lowest one on a tie.
    fn run(self) -> Result<DemandChoice> {
        self.levels
            .clone()
            .map(|contracted_demand| -> Result<DemandChoice> {
                ensure!(
                    !self.should_terminate.load(Ordering::Relaxed),
                    "interrupted at {contracted_demand} kW"
                );
                Ok(DemandChoice { contracted_demand, cost: self.total_cost(contracted_demand) })
            })
            .process_results(|choices| choices.min_by_key(|choice| OrderedFloat(choice.cost.0)))?
            .with_context(|| format!("empty contracted demand range: {:?}", self.levels))
    }

    fn total_cost(&self, contracted_demand: u32) -> Cost {
        let contracted_demand = Kilowatts::from(f64::from(contracted_demand));
        self.samples
            .iter()
            .map(|measured| overrun::billed_cost(*measured, contracted_demand, self.rate))
            .sum()
    }
}

/// Green levels: from 1 kW up to the largest sample rounded up.
pub fn green_levels(samples: &[Kilowatts]) -> Result<RangeInclusive<u32>> {
    let (_, max) = bounds(samples)?;
    Ok(1..=to_level(max.0.ceil())?)
}

/// Blue levels: from the smallest sample over [`BLUE_LOWER_BOUND_DIVISOR`] rounded down,
/// up to the largest sample rounded up.
pub fn blue_levels(samples: &[Kilowatts]) -> Result<RangeInclusive<u32>> {
    let (min, max) = bounds(samples)?;
    Ok(to_level((min / BLUE_LOWER_BOUND_DIVISOR).0.floor())?..=to_level(max.0.ceil())?)
}

/// Smallest and largest sample, `NaN` counts as the largest.
fn bounds(samples: &[Kilowatts]) -> Result<(Kilowatts, Kilowatts)> {
    match samples.iter().minmax_by_key(|sample| OrderedFloat(sample.0)) {
        MinMaxResult::NoElements => bail!("no demand samples"),
        MinMaxResult::OneElement(sample) => Ok((*sample, *sample)),
        MinMaxResult::MinMax(min, max) => Ok((*min, *max)),
    }
}

#[expect(clippy::cast_possible_truncation)]
#[expect(clippy::cast_sign_loss)]
fn to_level(kilowatts: f64) -> Result<u32> {
    ensure!(
        kilowatts.is_finite() && kilowatts >= 0.0,
        "demand must be a finite non-negative number, got {kilowatts}"
    );
    ensure!(kilowatts <= f64::from(u32::MAX), "demand of {kilowatts} kW is out of range");
    Ok(kilowatts as u32)
}

#[cfg(test)]
mod tests {
    use std::{
        thread,
        time::{Duration, Instant},
    };

    use approx::assert_abs_diff_eq;

    use super::*;

    fn kilowatts(values: &[f64]) -> Vec<Kilowatts> {
        values.iter().copied().map(Kilowatts::from).collect()
    }

    /// Straightforward evaluation of every level, independent from [`DemandSearch`].
    fn reference(samples: &[f64], rate: f64, levels: RangeInclusive<u32>) -> (u32, f64) {
        let mut best: Option<(u32, f64)> = None;
        for level in levels {
            let level_kw = f64::from(level);
            let mut total = 0.0;
            for &sample in samples {
                total += if sample <= 1.05 * level_kw {
                    level_kw * rate
                } else {
                    level_kw * rate + 2.0 * (sample - level_kw) * rate
                };
            }
            if best.is_none_or(|(_, best_total)| total < best_total) {
                best = Some((level, total));
            }
        }
        best.unwrap()
    }

    #[test]
    fn test_single_sample() {
        let samples = kilowatts(&[50.0]);
        let choice = DemandSearch::builder()
            .samples(&samples)
            .rate(KilowattRate::from(14.86))
            .levels(green_levels(&samples).unwrap())
            .should_terminate(&AtomicBool::new(false))
            .run()
            .unwrap();
        // 48 kW is the lowest level that covers 50 kW within the tolerance:
        assert_eq!(choice.contracted_demand, 48);
        assert_abs_diff_eq!(choice.cost.0, 48.0 * 14.86, epsilon = 1e-9);

        let (level, total) = reference(&[50.0], 14.86, 1..=50);
        assert_eq!(choice.contracted_demand, level);
        assert_abs_diff_eq!(choice.cost.0, total, epsilon = 1e-9);
    }

    #[test]
    fn test_matches_reference() {
        let values = [312.0, 298.4, 355.1, 401.7, 280.0, 333.3, 389.9, 342.0, 260.5, 377.7];
        let samples = kilowatts(&values);
        for rate in [14.86, 45.90] {
            let levels = blue_levels(&samples).unwrap();
            let choice = DemandSearch::builder()
                .samples(&samples)
                .rate(KilowattRate::from(rate))
                .levels(levels.clone())
                .should_terminate(&AtomicBool::new(false))
                .run()
                .unwrap();
            let (level, total) = reference(&values, rate, levels);
            assert_eq!(choice.contracted_demand, level);
            assert_abs_diff_eq!(choice.cost.0, total, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_tie_picks_lowest_level() {
        let samples = kilowatts(&[7.0, 3.0]);
        let choice = DemandSearch::builder()
            .samples(&samples)
            .rate(KilowattRate::ZERO)
            .levels(3..=10)
            .should_terminate(&AtomicBool::new(false))
            .run()
            .unwrap();
        assert_eq!(choice.contracted_demand, 3);
        assert_eq!(choice.cost, Cost::ZERO);
    }

    #[test]
    fn test_empty_range() {
        let samples = kilowatts(&[0.0]);
        let result = DemandSearch::builder()
            .samples(&samples)
            .rate(KilowattRate::from(14.86))
            .levels(green_levels(&samples).unwrap())
            .should_terminate(&AtomicBool::new(false))
            .run();
        assert!(result.is_err());
    }

    #[test]
    fn test_raised_flag_stops_the_scan() {
        let samples = kilowatts(&[50.0]);
        let result = DemandSearch::builder()
            .samples(&samples)
            .rate(KilowattRate::from(14.86))
            .levels(1..=50)
            .should_terminate(&AtomicBool::new(true))
            .run();
        assert!(result.unwrap_err().to_string().starts_with("interrupted"));
    }

    #[test]
    fn test_flag_raised_mid_scan() {
        let samples = kilowatts(&[4e9]);
        let should_terminate = AtomicBool::new(false);
        let started_at = Instant::now();
        let result = thread::scope(|scope| {
            scope.spawn(|| {
                thread::sleep(Duration::from_millis(50));
                should_terminate.store(true, Ordering::Relaxed);
            });
            DemandSearch::builder()
                .samples(&samples)
                .rate(KilowattRate::from(14.86))
                .levels(green_levels(&samples).unwrap())
                .should_terminate(&should_terminate)
                .run()
        });
        assert!(result.is_err());
        assert!(started_at.elapsed() < Duration::from_secs(5), "{:?}", started_at.elapsed());
    }

    #[test]
    fn test_green_levels() {
        assert_eq!(green_levels(&kilowatts(&[12.0, 50.2, 3.0])).unwrap(), 1..=51);
        assert_eq!(green_levels(&kilowatts(&[50.0])).unwrap(), 1..=50);
    }

    #[test]
    fn test_blue_levels() {
        // 45.0 / 1.1 = 40.9…
        assert_eq!(blue_levels(&kilowatts(&[45.0, 60.3])).unwrap(), 40..=61);
        assert_eq!(blue_levels(&kilowatts(&[0.0, 0.0])).unwrap(), 0..=0);
    }

    #[test]
    fn test_levels_reject_bad_samples() {
        assert!(green_levels(&[]).is_err());
        assert!(blue_levels(&kilowatts(&[-5.0, 10.0])).is_err());
        assert!(green_levels(&kilowatts(&[10.0, f64::NAN])).is_err());
        assert!(green_levels(&kilowatts(&[f64::INFINITY])).is_err());
        assert!(green_levels(&kilowatts(&[1e12])).is_err());
    }
}
