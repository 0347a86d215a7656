//! Command-line handlers.
//!
//! Each handler drives the same [`Planner`] the HTTP server uses and prints
//! JSON to standard output, so the commands compose with `jq` and friends.
//! Logs go to standard error.

use std::{io::Read, path::Path};

use anyhow::{bail, Context, Result};
use planner_core::{PlanRequest, Planner, RepositoryPointer};
use tokio::task;

/// Runs single commands against a planner.
pub struct Cli {
    planner: Planner,
}

impl Cli {
    pub fn new(planner: Planner) -> Self {
        Self { planner }
    }

    /// Runs one request body through the pipeline and prints the envelope.
    ///
    /// Fails after printing when the envelope is an error.
    pub async fn plan(&self, input: &Path) -> Result<()> {
        let body = read_input(input).await?;
        let response = self.planner.handle(&body).await;

        println!("{response}");

        match response.error_detail() {
            Some(detail) => bail!(
                "Plan request {} failed with {} (HTTP {})",
                response.request_id(),
                detail.code,
                response.status_code
            ),
            None => Ok(()),
        }
    }

    /// Prints the project context for a repository.
    pub async fn show_context(&self, pointer: &RepositoryPointer) -> Result<()> {
        let context = self
            .planner
            .fetch_context(pointer)
            .await
            .with_context(|| format!("Failed to fetch context for {pointer}"))?;

        println!("{}", serde_json::to_string_pretty(&context)?);
        Ok(())
    }

    /// Prints the JSON Schema of a plan request body.
    pub fn print_schema() -> Result<()> {
        let schema = schemars::schema_for!(PlanRequest);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}

async fn read_input(input: &Path) -> Result<Vec<u8>> {
    if input == Path::new("-") {
        return task::spawn_blocking(|| {
            let mut body = Vec::new();
            std::io::stdin().read_to_end(&mut body).map(|_| body)
        })
        .await
        .context("Task join error")?
        .context("Failed to read request body from stdin");
    }

    tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read request body from {}", input.display()))
}
