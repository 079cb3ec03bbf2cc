//! # Kinesis Broker CLI
//!
//! Command-line front end used as one step of the deployment pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Reconcile every declared stream, then sweep owned streams no longer declared
//! kinesis-broker apply --definition deploy.yml
//!
//! # Only reconcile declared streams
//! kinesis-broker reconcile --definition deploy.yml --cluster-id ecs-prod-1
//!
//! # Show what a sweep would delete
//! kinesis-broker sweep --definition deploy.yml --dry-run
//! ```

use crate::config::{BrokerConfig, DeploymentDefinition};
use crate::controller::reconciler::{
    BrokerError, ReconcileOutcome, StreamBroker, SweepMode, SweepReport,
};
use crate::model::StreamSpec;
use crate::observability::TracingBuildLog;
use crate::provider::aws::{AwsConfig, AwsKinesis};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_GIT_HASH"),
    ", built ",
    env!("BUILD_DATETIME"),
    ")"
);

/// Kinesis stream broker
#[derive(Debug, Parser)]
#[command(name = "kinesis-broker", version, long_version = LONG_VERSION)]
#[command(
    about = "Reconcile declared Kinesis streams: create, tag, encrypt and sweep",
    long_about = None,
    after_help = "\
Environment:
  SBU_TAG_KEY, ORG_TAG_KEY, APP_TAG_KEY, CLUSTER_TAG_KEY  tag keys
  STREAM_POLL_INTERVAL_SECS, STREAM_WAIT_TIMEOUT_SECS     wait cadence
  STREAM_KMS_KEY_ID                                       encryption key
  LOG_LEVEL, LOG_FORMAT                                   logging
"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// AWS region (defaults to the SDK's region chain)
    #[arg(long, env = "AWS_REGION", global = true)]
    pub region: Option<String>,

    /// AWS shared-config profile
    #[arg(long, env = "AWS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Kinesis endpoint override, e.g. a local emulator
    #[arg(long, env = "KINESIS_ENDPOINT_URL", global = true)]
    pub endpoint_url: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Reconcile declared streams, then sweep owned streams no longer declared
    Apply {
        #[command(flatten)]
        deployment: DeploymentArgs,

        /// Report sweep candidates without deleting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Reconcile declared streams only
    Reconcile {
        #[command(flatten)]
        deployment: DeploymentArgs,
    },
    /// Delete owned streams no longer declared
    Sweep {
        #[command(flatten)]
        deployment: DeploymentArgs,

        /// Report sweep candidates without deleting them
        #[arg(long)]
        dry_run: bool,
    },
}

/// Deployment inputs shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct DeploymentArgs {
    /// Deployment definition file (YAML or JSON)
    #[arg(short, long, value_name = "FILE")]
    pub definition: PathBuf,

    /// Business-unit tag value (overrides the definition)
    #[arg(long)]
    pub sbu: Option<String>,

    /// Organisation tag value (overrides the definition)
    #[arg(long)]
    pub org: Option<String>,

    /// Cluster id tag value (overrides the definition)
    #[arg(long)]
    pub cluster_id: Option<String>,

    /// Exit non-zero when any stream could not be reconciled or swept
    #[arg(long)]
    pub strict: bool,
}

impl DeploymentArgs {
    /// Load the definition and apply command-line overrides
    pub fn load_definition(&self) -> Result<DeploymentDefinition> {
        let mut definition = DeploymentDefinition::from_file(&self.definition)?;
        if let Some(sbu) = &self.sbu {
            definition.cluster.sbu_tag.clone_from(sbu);
        }
        if let Some(org) = &self.org {
            definition.cluster.org_tag.clone_from(org);
        }
        if let Some(cluster_id) = &self.cluster_id {
            definition.cluster.cluster_id.clone_from(cluster_id);
        }
        Ok(definition)
    }
}

/// What to do with the declared streams
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Apply(SweepMode),
    Reconcile,
    Sweep(SweepMode),
}

impl Command {
    #[must_use]
    pub fn deployment(&self) -> &DeploymentArgs {
        match self {
            Command::Apply { deployment, .. }
            | Command::Reconcile { deployment }
            | Command::Sweep { deployment, .. } => deployment,
        }
    }

    #[must_use]
    pub fn action(&self) -> Action {
        let mode = |dry_run: bool| {
            if dry_run {
                SweepMode::DryRun
            } else {
                SweepMode::Delete
            }
        };
        match self {
            Command::Apply { dry_run, .. } => Action::Apply(mode(*dry_run)),
            Command::Reconcile { .. } => Action::Reconcile,
            Command::Sweep { dry_run, .. } => Action::Sweep(mode(*dry_run)),
        }
    }
}

/// Everything one run did
#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(StreamSpec, ReconcileOutcome)>,
    pub sweep: Option<Result<SweepReport, BrokerError>>,
    /// The run was cancelled; remaining streams and the sweep were skipped
    pub interrupted: bool,
}

impl RunSummary {
    /// Number of streams that did not end ACTIVE and fully handled
    #[must_use]
    pub fn failed_streams(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_success())
            .count()
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        let sweep_failed = match &self.sweep {
            Some(Ok(report)) => !report.failed.is_empty() || !report.skipped.is_empty(),
            Some(Err(_)) => true,
            None => false,
        };
        self.interrupted || self.failed_streams() > 0 || sweep_failed
    }
}

/// Run an action against a broker
pub async fn execute(broker: &StreamBroker, streams: &[StreamSpec], action: Action) -> RunSummary {
    let mut summary = RunSummary::default();

    if matches!(action, Action::Apply(_) | Action::Reconcile) {
        summary.outcomes = broker.reconcile_all(streams).await;
    }

    if broker.is_cancelled() {
        warn!("Run cancelled, sweep skipped");
        summary.interrupted = true;
        return summary;
    }

    if let Action::Apply(mode) | Action::Sweep(mode) = action {
        let result = broker.sweep(streams, mode).await;
        if let Err(e) = &result {
            error!(error = %e, "Sweep aborted");
        }
        summary.sweep = Some(result);
    }

    summary
}

/// Parse-free entry point used by `main`
pub async fn run(cli: Cli, config: BrokerConfig) -> Result<bool> {
    let deployment = cli.command.deployment().clone();
    let definition = deployment.load_definition()?;

    info!(
        app = %definition.app_name,
        streams = definition.streams().len(),
        "Loaded deployment definition"
    );

    let aws = AwsKinesis::new(&AwsConfig {
        region: cli.region.clone(),
        profile: cli.profile.clone(),
        endpoint_url: cli.endpoint_url.clone(),
    })
    .await
    .context("Failed to create Kinesis client")?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current stream");
            on_signal.cancel();
        }
    });

    let broker = StreamBroker::new(
        Arc::new(aws),
        Arc::new(TracingBuildLog),
        definition.ownership_tags(&config),
        &config,
    )
    .with_cancellation(cancel);

    let summary = execute(&broker, definition.streams(), cli.command.action()).await;

    if summary.has_failures() {
        warn!(
            failed_streams = summary.failed_streams(),
            "Run finished with failures; the next pipeline run will retry"
        );
    }

    Ok(!(deployment.strict && summary.has_failures()))
}
