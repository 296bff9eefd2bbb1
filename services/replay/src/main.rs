mod config;
mod replay;

use crate::config::Config;
use anyhow::{Context, Result};
use clap::Parser;
use purifier_core::Skill;
use purifier_core::gadget_directory::{GadgetDirectory, HttpGadgetDirectory, StaticGadgetDirectory};
use purifier_skill_types::Endpoint;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Runs a single request envelope through the air purifier skill and prints
/// the response envelope.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Envelope file, or `-` to read stdin
    input: PathBuf,

    /// Answer the gadget lookup with these endpoint ids instead of calling the
    /// endpoint API
    #[arg(long = "endpoint-id")]
    endpoint_ids: Vec<String>,

    /// Print the response on a single line
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load replay configuration")?;

    // stdout carries the response, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let directory: Arc<dyn GadgetDirectory> = if args.endpoint_ids.is_empty() {
        Arc::new(
            HttpGadgetDirectory::new(config.directory_timeout)
                .context("Failed to build endpoint API client")?,
        )
    } else {
        tracing::info!("Using {} offline endpoint(s)", args.endpoint_ids.len());
        let endpoints = args
            .endpoint_ids
            .iter()
            .map(|id| Endpoint::new(id))
            .collect();
        Arc::new(StaticGadgetDirectory::new(endpoints))
    };
    let skill = Skill::new(directory);

    let envelope = replay::load_envelope(&args.input)?;
    let response = replay::run(&skill, &envelope).await;
    println!("{}", replay::render(&response, args.compact)?);

    Ok(())
}
