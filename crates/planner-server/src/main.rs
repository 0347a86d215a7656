//! Planner service binary
//!
//! Hosts the planning pipeline from `planner-core` behind an HTTP API, and
//! exposes the same pipeline as one-shot command-line commands.

mod args;
mod cli;
mod server;

use anyhow::Result;
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use planner_core::PlannerBuilder;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Args {
        fixture_path,
        context_backend,
        engine_backend,
        validator_backend,
        command,
    } = Args::parse();

    let planner = PlannerBuilder::new()
        .with_fixture_path(fixture_path)
        .with_context_backend(context_backend)
        .with_engine_backend(engine_backend)
        .with_validator_backend(validator_backend)
        .build();

    match command {
        Serve(args) => {
            info!(bind:% = args.bind; "Starting planner HTTP server");
            server::serve(planner, args.bind, &args.debug_token).await
        }
        Plan(args) => Cli::new(planner).plan(&args.input).await,
        Context(args) => Cli::new(planner).show_context(&args.into()).await,
        Schema => Cli::print_schema(),
    }
}
