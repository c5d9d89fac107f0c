//! Devwatch CLI - one-shot controller inventory poller
//!
//! This binary authenticates against a network controller's REST API,
//! fetches the switch and wireless access-point inventories, diffs them
//! against the previous run's snapshots, and reports devices that newly
//! appeared or disappeared.

use anyhow::Result;
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand, ValueEnum};
use devwatch_core::controller::DeviceFamily;
use devwatch_core::inventory::diff::{diff_hostnames, render_report};
use devwatch_core::{auth, config, inventory, snapshot};
use std::time::SystemTime;

#[derive(Parser)]
#[command(name = "devwatch")]
#[command(author = "Devwatch Team")]
#[command(version)]
#[command(about = "Controller inventory poller and snapshot differ")]
#[command(long_about = "
Devwatch polls a network controller's device inventory and reports
devices that appeared or disappeared since the previous run.

Quick start:
  1. Place credentials:  ~/.config/devwatch/cred_list.csv
  2. Run a poll:         devwatch poll
  3. Check cache state:  devwatch status

The credential file is delimited with a header row of
hostname,host,username,password,https_port and one row keyed DNAC.
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for scripting
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the controller and diff against the previous snapshots
    Poll {
        /// Compare only, do not overwrite the stored snapshots
        #[arg(long)]
        dry_run: bool,
    },

    /// Show token cache and snapshot state
    Status,

    /// Show configuration paths and settings
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("devwatch={},devwatch_core={}", log_level, log_level).into()),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Poll { dry_run } => cmd_poll(&cli, dry_run).await,
        Commands::Status => cmd_status(&cli),
        Commands::Config => cmd_config(&cli),
    }
}

async fn cmd_poll(cli: &Cli, dry_run: bool) -> Result<()> {
    let settings = config::load_settings();
    config::ensure_data_dirs(&settings.paths)?;

    let cred = auth::load_credential(&settings.paths.credential_file, auth::CONTROLLER_KEY)?;
    tracing::info!("Polling controller at {}:{}", cred.host, cred.port);

    let client = devwatch_core::ControllerClient::new(&cred.host, cred.port)?;
    let token = auth::get_valid_token(&client, &cred, &settings.paths.token_cache_file).await?;

    let store = snapshot::SnapshotStore::new(settings.paths.snapshot_dir.clone());
    let strip_suffix = settings.strip_suffix.as_deref();

    let mut family_results = Vec::new();
    for family in DeviceFamily::ALL {
        let response = client.fetch_devices(&token, family).await?;
        let fresh = inventory::normalize(&response);

        let previous = store.load(family)?.unwrap_or_default();
        let diff = diff_hostnames(&fresh, &previous);
        tracing::debug!(
            "{} inventory: {} devices, {} new, {} missing",
            family.label(),
            inventory::device_count(&fresh),
            diff.added.len(),
            diff.removed.len()
        );

        if !dry_run {
            store.save(family, &fresh)?;
        }
        family_results.push((family, fresh, diff));
    }

    match cli.format {
        OutputFormat::Text => {
            for (family, fresh, _) in &family_results {
                println!("{} Device : {}", family.label(), inventory::device_count(fresh));
            }
            for (family, _, diff) in &family_results {
                println!();
                println!("{}", render_report(family.label(), diff, strip_suffix));
            }
            if dry_run {
                println!();
                println!("Dry run: snapshots were not updated.");
            }
        }
        OutputFormat::Json => {
            let families: Vec<serde_json::Value> = family_results
                .iter()
                .map(|(family, fresh, diff)| {
                    serde_json::json!({
                        "family": family.label(),
                        "device_count": inventory::device_count(fresh),
                        "new": diff.added,
                        "not_found": diff.removed,
                        "unchanged": diff.is_unchanged(),
                    })
                })
                .collect();
            println!("{}", serde_json::json!({
                "families": families,
                "snapshots_updated": !dry_run,
            }));
        }
    }

    Ok(())
}

fn cmd_status(cli: &Cli) -> Result<()> {
    let settings = config::load_settings();
    let store = snapshot::SnapshotStore::new(settings.paths.snapshot_dir.clone());

    let cached = auth::token_cache::load(&settings.paths.token_cache_file)?;
    let now = chrono::Utc::now().naive_utc();

    match cli.format {
        OutputFormat::Text => {
            match &cached {
                Some(token) if token.is_fresh(now) => {
                    println!("Token:  cached, fresh (issued {})", token.issued_at);
                }
                Some(token) => {
                    println!("Token:  cached, expired (issued {})", token.issued_at);
                }
                None => println!("Token:  no cache (next poll will authenticate)"),
            }
            for family in DeviceFamily::ALL {
                match store.last_written(family) {
                    Some(modified) => {
                        println!("{} snapshot: written {}", family.label(), format_time(modified));
                    }
                    None => println!("{} snapshot: none yet", family.label()),
                }
            }
        }
        OutputFormat::Json => {
            let snapshots: Vec<serde_json::Value> = DeviceFamily::ALL
                .iter()
                .map(|family| {
                    serde_json::json!({
                        "family": family.label(),
                        "path": store.path_for(*family).display().to_string(),
                        "written": store.last_written(*family).map(format_time),
                    })
                })
                .collect();
            println!("{}", serde_json::json!({
                "token_cached": cached.is_some(),
                "token_fresh": cached.as_ref().map(|t| t.is_fresh(now)).unwrap_or(false),
                "token_issued_at": cached.as_ref().map(|t| t.issued_at.to_string()),
                "snapshots": snapshots,
            }));
        }
    }

    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let settings = config::load_settings();
    let config_path = config::get_config_file_path_string();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration");
            println!("=============");
            println!();
            println!("Config file:      {}", config_path);
            println!("Credential file:  {}", settings.paths.credential_file.display());
            println!("Token cache:      {}", settings.paths.token_cache_file.display());
            println!("Snapshot dir:     {} (from {})", settings.paths.snapshot_dir.display(), settings.source);
            match &settings.strip_suffix {
                Some(suffix) => println!("Display suffix:   strips '{}'", suffix),
                None => println!("Display suffix:   none"),
            }
            println!();
            println!("Environment variables:");
            println!("  DEVWATCH_DATA_DIR - Override the data directory");
            println!();
            println!("Example config.toml:");
            println!();
            println!("{}", config::generate_example_config());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::json!({
                "config_file": config_path,
                "credential_file": settings.paths.credential_file.display().to_string(),
                "token_cache": settings.paths.token_cache_file.display().to_string(),
                "snapshot_dir": settings.paths.snapshot_dir.display().to_string(),
                "source": format!("{}", settings.source),
                "strip_suffix": settings.strip_suffix,
            }));
        }
    }

    Ok(())
}

fn format_time(time: SystemTime) -> String {
    DateTime::<Local>::from(time).format("%Y-%m-%d %H:%M:%S").to_string()
}
