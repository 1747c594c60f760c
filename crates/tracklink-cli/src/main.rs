//! Tracklink CLI
//!
//! Command line access to projects, issues and custom fields on the issue
//! tracker.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracklink_client::Jira;
use tracklink_core::models::ClientConfig;
use tracklink_core::storage::{init_config_dir, ConfigStorage};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "tracklink")]
#[command(about = "Issue tracker client", long_about = None)]
struct Args {
    /// Server URL, overrides the config file and TRACKLINK_URL
    #[arg(long)]
    url: Option<String>,

    /// Username, overrides the config file and TRACKLINK_USER
    #[arg(short, long)]
    user: Option<String>,

    /// Log level
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log request and response bodies
    #[arg(long)]
    trace_requests: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects
    Projects,

    /// List issue types, optionally for one project
    IssueTypes {
        #[arg(short, long)]
        project: Option<String>,
    },

    /// List statuses
    Statuses,

    /// List priorities
    Priorities,

    /// List resolutions
    Resolutions,

    /// List issue link types
    LinkTypes,

    /// List custom fields
    Fields {
        #[arg(short, long)]
        project: Option<String>,

        /// Issue type name, repeatable
        #[arg(short = 't', long = "issue-type")]
        issue_types: Vec<String>,
    },

    /// Show one issue
    Show { key: String },

    /// Edit an issue, sending only the fields that changed
    Edit {
        key: String,

        #[command(flatten)]
        fields: commands::FieldArgs,

        /// Print the update payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Create an issue
    Create {
        #[arg(short, long)]
        project: String,

        /// Issue type id
        #[arg(short = 't', long = "type")]
        issue_type: String,

        #[command(flatten)]
        fields: commands::FieldArgs,
    },

    /// Link two issues
    Link {
        outward: String,
        inward: String,

        /// Link type name, e.g. "Blocks"
        #[arg(short = 't', long = "type")]
        link_type: String,

        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Show the links of an issue
    Links {
        key: String,

        /// Only links of this type, repeatable
        #[arg(short = 't', long = "type")]
        types: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args)?;
    init_logging(&config.log_level);

    tracing::debug!(url = %config.url, "Configuration loaded");

    let jira = Jira::from_config(&config).context("Failed to create client")?;
    commands::run(&jira, args.command).await
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let config_dir = init_config_dir()?;
    let mut config = ConfigStorage::new(config_dir)
        .load()
        .context("Failed to load configuration")?;

    config.apply_env();

    if let Some(ref url) = args.url {
        config.url = url.clone();
    }
    if let Some(ref user) = args.user {
        config.username = Some(user.clone());
    }
    if let Some(ref level) = args.log_level {
        config.log_level = level.clone();
    }
    if args.trace_requests {
        config.enable_request_trace = true;
        config.log_level = "trace".to_string();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(level)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}
