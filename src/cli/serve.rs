use clap::Parser;
use tokio::net::TcpListener;

use crate::{
    cli::TariffArgs,
    prelude::*,
    server::{AppState, router, shutdown_signal},
};

#[derive(Parser)]
pub struct ServeArgs {
    #[clap(long, default_value = "0.0.0.0:5000", env = "BIND_ADDRESS")]
    pub bind_address: String,

    /// Abandon a calculation that takes longer than this.
    #[clap(long, default_value = "10s", env = "REQUEST_TIMEOUT")]
    pub request_timeout: humantime::Duration,

    #[clap(flatten)]
    pub tariffs: TariffArgs,
}

#[instrument(skip_all, fields(bind_address = %args.bind_address))]
pub async fn serve(args: ServeArgs) -> Result {
    let state = AppState {
        tariffs: args.tariffs.load()?,
        request_timeout: args.request_timeout.into(),
    };
    let listener =
        TcpListener::bind(&args.bind_address).await.context("failed to bind to the address")?;

    info!("serving…");
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
