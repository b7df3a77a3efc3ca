//! label-setter CLI
//!
//! Command line tool that applies a fixed set of labels to a GitHub repository

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use label_setter::{
    config::{default_labels, resolve_labels},
    resolve::resolve_session,
    sync::{SyncOperation, SyncResult},
    terminal::{exit_code, TerminalState},
    Error, GitHubClient, Result, SessionConfig, TerminalPrompter,
};

/// label-setter CLI
///
/// Applies a fixed set of issue labels to a GitHub repository
#[derive(Parser)]
#[command(
    name = "label-setter",
    version,
    about = "Apply a fixed set of issue labels to a GitHub repository",
    long_about = "Interactively pick an organization and repository, optionally clear its \
    existing labels, then create every configured label, asking before overwriting one \
    that already exists."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// GitHub personal access token (default: LABEL_AUTH_TOKEN)
    #[arg(short = 't', long)]
    access_token: Option<String>,

    /// Organization owning the repository (default: LABEL_AUTH_ORG)
    #[arg(long = "org")]
    account: Option<String>,

    /// API base URL (default: LABEL_API_URL or https://api.github.com)
    #[arg(long)]
    api_url: Option<String>,

    /// Label file path (JSON/YAML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Output the default label set
    Init {
        /// Output format
        #[arg(long, default_value = "json", value_parser = ["json", "yaml"])]
        format: String,

        /// Output file path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let mut cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = install_interrupt_handler(TerminalState::capture()) {
        tracing::warn!("failed to install Ctrl-C handler: {}", e);
    }

    let outcome = match cli.command.take() {
        Some(Commands::Init { format, output }) => run_init(&format, output),
        None => run_labels(cli).await,
    };

    match &outcome {
        Ok(()) => {}
        Err(Error::Cancelled) => tracing::debug!("cancelled by user"),
        Err(e) => eprintln!("{} {}", "Error:".red(), e),
    }
    std::process::exit(exit_code(&outcome));
}

/// Treat Ctrl-C like a dismissed prompt
///
/// Prompts block the main thread, so the listener is registered up front and
/// runs on a runtime worker. It restores `state` and exits with code 0.
fn install_interrupt_handler(state: TerminalState) -> std::io::Result<()> {
    #[cfg(unix)]
    let mut interrupt =
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::spawn(async move {
        #[cfg(unix)]
        let received = interrupt.recv().await.is_some();
        #[cfg(not(unix))]
        let received = tokio::signal::ctrl_c().await.is_ok();

        if received {
            state.restore();
            eprintln!();
            tracing::debug!("interrupted by user");
            std::process::exit(exit_code(&Err(Error::Cancelled)));
        }
    });

    Ok(())
}

/// Install the stderr log subscriber
///
/// `RUST_LOG` wins over the `-v` flag.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("label_setter={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Execute the labeling session
async fn run_labels(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let labels = resolve_labels(cli.config.as_deref(), &cwd)?;
    tracing::debug!(count = labels.len(), "loaded label definitions");

    let prompter = TerminalPrompter::new();
    let session = SessionConfig::from_sources(cli.access_token, cli.account, cli.api_url);
    let session = resolve_session(session, &prompter)?;

    let client = GitHubClient::new(&session)?;
    let result = label_setter::run_session(&client, &prompter, &session, &labels).await?;

    display_sync_result(&result, cli.verbose);
    Ok(())
}

/// Execute init command
fn run_init(format: &str, output: Option<PathBuf>) -> Result<()> {
    let content = render_labels(format)?;

    if let Some(output_path) = output {
        std::fs::write(&output_path, content)?;
        println!(
            "{} Default labels written to: {}",
            "✓".green(),
            output_path.display().to_string().cyan()
        );
    } else {
        println!("{}", content);
    }

    Ok(())
}

/// Serialize the default labels in the requested format
fn render_labels(format: &str) -> Result<String> {
    let labels = default_labels();

    match format {
        "json" => Ok(serde_json::to_string_pretty(&labels)?),
        "yaml" => Ok(serde_yaml::to_string(&labels)?),
        _ => Err(Error::config_validation("Unsupported format")),
    }
}

/// Display synchronization results
fn display_sync_result(result: &SyncResult, verbose: bool) {
    println!("\n{} Finished", "✓".green());
    if !result.has_changes() {
        println!("  No changes were made to the repository");
    }

    println!("  Created: {}", result.created.to_string().green());
    println!("  Updated: {}", result.updated.to_string().yellow());
    println!("  Deleted: {}", result.deleted.to_string().red());
    println!("  Skipped: {}", result.skipped.to_string().white());

    if verbose {
        println!("\nDetailed operations ({}):", result.total_operations());
        for (i, operation) in result.operations.iter().enumerate() {
            let prefix = format!("  {}.", i + 1);
            match operation {
                SyncOperation::Delete { name } => {
                    println!("{} Deleted: {}", prefix, name.red());
                }
                SyncOperation::Create { label } => {
                    println!(
                        "{} Created: {} (#{})",
                        prefix,
                        label.name.cyan(),
                        label.api_color()
                    );
                }
                SyncOperation::Update { label } => {
                    println!(
                        "{} Overwritten: {} (#{})",
                        prefix,
                        label.name.yellow(),
                        label.api_color()
                    );
                }
                SyncOperation::Skip { name } => {
                    println!("{} Kept existing: {}", prefix, name.dimmed());
                }
            }
        }
    }
}
