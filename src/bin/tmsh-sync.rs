use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tmsh_sync::client::{TmshClient, TmshConfig};
use tmsh_sync::reconcile::{plan_create, plan_delete, BulkReport, Outcome};
use tmsh_sync::types::DesiredNode;
use tracing::info;

#[derive(Parser)]
#[command(name = "tmsh-sync")]
#[command(about = "Reconcile discovered service nodes against a BIG-IP appliance")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct TmshSyncCli {
    /// JSON file with the desired node set, e.g. [{"id": "/Common/web1", "ip": "10.0.0.1"}]
    desired: Option<PathBuf>,

    /// Remove the listed nodes instead of creating them
    #[arg(long)]
    delete: bool,

    /// Print the reconciliation plan without changing the appliance
    #[arg(long)]
    dry_run: bool,

    /// (Re)install the appliance-side cli script before reconciling
    #[arg(long)]
    install_script: bool,

    /// Where the generated cli script file is staged
    #[arg(long, default_value = "/var/tmp/service-discovery.cli")]
    script_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = TmshSyncCli::parse();
    init_logging(&cli);

    let client = TmshClient::new(TmshConfig {
        script_path: cli.script_path.clone(),
    });

    if cli.install_script {
        client
            .install_discovery_script()
            .await
            .context("Failed to install the appliance cli script")?;
        println!("Appliance cli script installed");
    }

    let path = match &cli.desired {
        Some(path) => path,
        None => {
            if !cli.install_script {
                show_usage();
            }
            return Ok(());
        }
    };

    let data = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let desired: Vec<DesiredNode> =
        serde_json::from_str(&data).context("Failed to parse desired node set")?;
    info!("loaded {} desired node(s)", desired.len());

    if cli.dry_run {
        return dry_run(&client, &desired, cli.delete).await;
    }

    let report = if cli.delete {
        client.delete_bulk_nodes(&desired).await?
    } else {
        client.add_bulk_nodes(&desired).await?
    };
    summarize(&report);

    if let Some(detail) = report.first_failure() {
        bail!("Reconciliation failed: {detail}");
    }
    Ok(())
}

async fn dry_run(client: &TmshClient, desired: &[DesiredNode], delete: bool) -> Result<()> {
    let inventory = client.fetch_inventory().await?;
    let rendered = if delete {
        serde_json::to_string_pretty(&plan_delete(&inventory, desired)?)?
    } else {
        serde_json::to_string_pretty(&plan_create(&inventory, desired)?)?
    };
    println!("{rendered}");
    Ok(())
}

fn summarize(report: &BulkReport) {
    println!(
        "{} node operation(s), {} metadata operation(s), {} failed",
        report.node_outcomes.len(),
        report.metadata_outcomes.len(),
        report.failed_count()
    );
    for entry in report.node_outcomes.iter().chain(&report.metadata_outcomes) {
        if let Outcome::Failed { detail } = &entry.outcome {
            println!("  failed {}: {}", entry.node.id, detail.trim_end());
        }
    }
}

fn init_logging(cli: &TmshSyncCli) {
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();
}

fn show_usage() {
    println!("tmsh-sync v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage:");
    println!("  tmsh-sync <desired.json>                 Create/tag the listed nodes");
    println!("  tmsh-sync <desired.json> --delete        Delete/untag the listed nodes");
    println!("  tmsh-sync <desired.json> --dry-run       Show the plan, change nothing");
    println!("  tmsh-sync --install-script               Install the appliance cli script");
    println!();
    println!("Use --help for all options.");
}
