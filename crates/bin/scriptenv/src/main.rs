//! # scriptenv — script environment command line
//!
//! Composition root that wires the fixture adapter into the script
//! environment and runs one query against it.
//!
//! ## Responsibilities
//! - Parse the command line and configuration (config file, env vars)
//! - Install the tracing subscriber
//! - Construct the fixture repository and identity adapters
//! - Construct the shared taxonomy cache and one task's `ScriptEnv`
//! - Dispatch the subcommand and print its JSON result
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod commands;
mod config;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use scriptenv_adapter_fixture::{FixtureRepository, StaticIdentity};
use scriptenv_app::script_env::ScriptEnvBuilder;
use scriptenv_app::taxonomy_cache::TaxonomyCache;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Adapters
    let repository = FixtureRepository::load(&config.fixture.path)
        .with_context(|| format!("loading fixture {}", config.fixture.path.display()))?;
    let identity = StaticIdentity::new(config.identity.token_ttl_secs);

    // Services
    let cache = Arc::new(TaxonomyCache::new(repository));
    let variables = commands::initial_variables(&cli.command)?;
    let env = ScriptEnvBuilder::new(cache, identity)
        .user_id(config.identity.user_id.as_str())
        .build(variables);

    let output = commands::dispatch(cli.command, &env).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
