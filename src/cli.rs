mod optimize;
mod serve;

use std::{fs, path::PathBuf};

use clap::{Parser, Subcommand};

pub use self::{
    optimize::{OptimizeArgs, optimize},
    serve::{ServeArgs, serve},
};
use crate::{core::Tariffs, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find the cheapest modality and contracted demand for the billing history.
    #[clap(name = "optimize")]
    Optimize(Box<OptimizeArgs>),

    /// Serve the optimizer and its entry page over HTTP.
    #[clap(name = "serve")]
    Serve(Box<ServeArgs>),
}

#[derive(Parser)]
pub struct TariffArgs {
    /// TOML file overriding the default rates, for example:
    ///
    /// [blue]
    /// peak_demand = 45.90
    #[clap(long = "tariffs", env = "TARIFFS_PATH")]
    pub path: Option<PathBuf>,
}

impl TariffArgs {
    #[instrument(skip_all, fields(path = ?self.path))]
    pub fn load(&self) -> Result<Tariffs> {
        let Some(path) = &self.path else {
            return Ok(Tariffs::default());
        };
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        let tariffs: Tariffs = toml::from_str(&contents).context("failed to parse the tariffs")?;
        debug!(?tariffs, "loaded");
        Ok(tariffs)
    }
}
