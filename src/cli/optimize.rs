use clap::Parser;

use crate::{
    cli::TariffArgs,
    core::{Optimizer, Outcome, Series},
    prelude::*,
    quantity::{energy::KilowattHours, power::Kilowatts},
    tables::build_comparison_table,
};

#[derive(Parser)]
pub struct OptimizeArgs {
    #[clap(flatten)]
    pub history: HistoryArgs,

    #[clap(flatten)]
    pub tariffs: TariffArgs,

    /// Print the result as JSON instead of a table.
    #[clap(long)]
    pub json: bool,
}

/// Billing history, one whitespace-separated value per period.
#[derive(Parser)]
pub struct HistoryArgs {
    /// Off-peak maximum demand in kilowatts.
    #[clap(long, env = "OFF_PEAK_DEMAND", allow_hyphen_values = true)]
    pub off_peak_demand: Series<Kilowatts>,

    /// Peak maximum demand in kilowatts.
    #[clap(long, env = "PEAK_DEMAND", allow_hyphen_values = true)]
    pub peak_demand: Series<Kilowatts>,

    /// Peak consumption in kilowatt-hours.
    #[clap(long, env = "PEAK_CONSUMPTION", allow_hyphen_values = true)]
    pub peak_consumption: Series<KilowattHours>,

    /// Off-peak consumption in kilowatt-hours.
    #[clap(long, env = "OFF_PEAK_CONSUMPTION", allow_hyphen_values = true)]
    pub off_peak_consumption: Series<KilowattHours>,
}

#[instrument(skip_all)]
pub fn optimize(args: OptimizeArgs) -> Result {
    let tariffs = args.tariffs.load()?;
    info!(n_periods = args.history.off_peak_demand.len(), "optimizing…");

    let outcome = Optimizer::builder()
        .tariffs(&tariffs)
        .off_peak_demand(args.history.off_peak_demand)
        .peak_demand(args.history.peak_demand)
        .peak_consumption(args.history.peak_consumption)
        .off_peak_consumption(args.history.off_peak_consumption)
        .optimize()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    }

    match outcome {
        Outcome::Optimized(comparison) => {
            if !args.json {
                println!("{}", build_comparison_table(&comparison));
            }
            info!(
                recommended_modality = %comparison.recommended_modality,
                minimum_cost = %comparison.minimum_cost,
                "optimized"
            );
            Ok(())
        }
        Outcome::Rejected(rejection) => bail!(rejection.error),
    }
}
