//! Kinesis Broker
//!
//! Deployment-pipeline step that reconciles the Kinesis streams declared in a
//! deployment definition.
//!
//! The broker:
//! 1. Reads its settings from environment variables
//! 2. Loads the deployment definition named on the command line
//! 3. Creates, tags and encrypts missing streams and adopts existing ones
//! 4. Deletes owned streams that are no longer declared

use anyhow::Result;
use clap::Parser;
use kinesis_broker::cli::{self, Cli};
use kinesis_broker::config::BrokerConfig;
use kinesis_broker::observability::{logging, LogFormat};
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = BrokerConfig::from_env();

    logging::init(&config.log_level, LogFormat::parse(&config.log_format))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("BUILD_GIT_HASH"),
        built = env!("BUILD_DATETIME"),
        "Starting Kinesis broker"
    );

    if cli::run(cli, config).await? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
