use std::{net::SocketAddr, path::PathBuf};

use clap::{Args as ClapArgs, Parser, Subcommand};
use planner_core::{auth::DEFAULT_DEBUG_TOKEN, RepositoryPointer};

/// Planning request front door
///
/// Accepts "plan this repository" requests, gathers repository context,
/// runs a generation engine over it and validates the result. Runs either
/// as an HTTP service (`serve`) or one request at a time from the command
/// line (`plan`).
///
/// Every capability falls back to a deterministic stub when no production
/// backend with the configured name is linked in.
#[derive(Parser)]
#[command(version, about, name = "planner")]
pub struct Args {
    /// Fixture file for the fallback context provider. Defaults to the
    /// fixture set bundled with the binary
    #[arg(long, global = true, env = "PLANNER_FIXTURE_PATH")]
    pub fixture_path: Option<PathBuf>,

    /// Production context provider to use instead of the fixture stub
    #[arg(long, global = true, env = "PLANNER_CONTEXT_BACKEND")]
    pub context_backend: Option<String>,

    /// Production generation engine to use instead of the stub
    #[arg(long, global = true, env = "PLANNER_ENGINE_BACKEND")]
    pub engine_backend: Option<String>,

    /// Production output validator to use instead of the stub
    #[arg(long, global = true, env = "PLANNER_VALIDATOR_BACKEND")]
    pub validator_backend: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the planner
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Run one plan request and print the response envelope
    #[command(alias = "p")]
    Plan(PlanArgs),
    /// Print the project context for a repository
    #[command(alias = "ctx")]
    Context(ContextArgs),
    /// Print the JSON Schema of a plan request
    Schema,
}

#[derive(ClapArgs)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, env = "PLANNER_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// Bearer token accepted by the debug routes
    #[arg(
        long,
        env = "PLANNER_DEBUG_TOKEN",
        default_value = DEFAULT_DEBUG_TOKEN,
        hide_env_values = true
    )]
    pub debug_token: String,
}

#[derive(ClapArgs)]
pub struct PlanArgs {
    /// JSON request body file, or `-` to read standard input
    #[arg(default_value = "-")]
    pub input: PathBuf,
}

#[derive(ClapArgs)]
pub struct ContextArgs {
    /// Repository owner
    #[arg(long)]
    pub owner: String,

    /// Repository name
    #[arg(long)]
    pub name: String,

    /// Git ref. Defaults to refs/heads/main
    #[arg(long = "ref")]
    pub git_ref: Option<String>,
}

impl From<ContextArgs> for RepositoryPointer {
    fn from(val: ContextArgs) -> Self {
        RepositoryPointer::new(val.owner, val.name, val.git_ref)
    }
}
