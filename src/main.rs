#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod cli;
mod core;
mod prelude;
mod quantity;
mod server;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command, optimize, serve},
    prelude::*,
};

#[tokio::main]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Optimize(args) => optimize(*args)?,
        Command::Serve(args) => serve(*args).await?,
    }

    info!("done!");
    Ok(())
}
