//! Passpad - multi-tap passphrase entry in the terminal
//!
//! Shows the passphrase keyboard of a small touchscreen device, simulated in
//! the terminal, and prints the result when the user confirms or cancels.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passpad::config::{Config, LoggingConfig};
use passpad::constants::{APP_BINARY_NAME, APP_NAME};
use passpad::keyboard::SessionOptions;
use passpad::models::Outcome;
use passpad::tui::{self, Theme};

/// Passpad - multi-tap passphrase entry screen
#[derive(Parser, Debug)]
#[command(name = APP_BINARY_NAME, author, version, about, long_about = None)]
struct Cli {
    /// Prompt shown while nothing has been typed
    #[arg(long)]
    prompt: Option<String>,

    /// Keyboard page shown first (0-based)
    #[arg(long, value_name = "INDEX")]
    page: Option<usize>,

    /// Milliseconds a multi-tap character stays open for cycling
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Custom keyboard layout file (TOML)
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Configuration file instead of the platform default
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the outcome as JSON, including the passphrase
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    fn apply(&self, config: &mut Config) {
        if let Some(prompt) = &self.prompt {
            config.keyboard.prompt.clone_from(prompt);
        }
        if let Some(page) = self.page {
            config.keyboard.initial_page = page;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.keyboard.pending_timeout_ms = timeout_ms;
        }
        if let Some(layout) = &self.layout {
            config.keyboard.layout_file = Some(layout.clone());
        }
    }
}

/// Sends tracing output to the configured log file.
fn init_logging(logging: &LoggingConfig, verbose: bool) -> Result<()> {
    if !logging.enabled {
        return Ok(());
    }

    let path = logging.file_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .context(format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .context(format!("Failed to open log file: {}", path.display()))?;

    let filter = if verbose { "debug" } else { logging.level.as_str() };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();

    Ok(())
}

fn print_outcome(outcome: &Outcome, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(outcome).context("Failed to serialize outcome")?;
        println!("{line}");
    } else {
        println!("{}", outcome.kind());
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);
    config.validate()?;

    init_logging(&config.logging, cli.verbose)?;
    info!("{} v{} starting", APP_NAME, env!("CARGO_PKG_VERSION"));

    let layout = config.keyboard.load_layout()?;
    let options = SessionOptions::from(&config.keyboard);
    let theme = Theme::from_mode(config.ui.theme_mode);

    let outcome = tui::run_passphrase_screen(&layout, options, theme)?;
    print_outcome(&outcome, cli.json)?;

    Ok(match outcome {
        Outcome::Confirmed { .. } => ExitCode::SUCCESS,
        Outcome::Cancelled => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
        assert_eq!(Cli::command().get_name(), APP_BINARY_NAME);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            APP_BINARY_NAME,
            "--prompt",
            "Wallet passphrase",
            "--page",
            "0",
            "--timeout-ms",
            "500",
            "--json",
        ]);
        let mut config = Config::new();
        cli.apply(&mut config);

        assert_eq!(config.keyboard.prompt, "Wallet passphrase");
        assert_eq!(config.keyboard.initial_page, 0);
        assert_eq!(config.keyboard.pending_timeout_ms, 500);
        assert_eq!(config.keyboard.layout_file, None);
        assert!(cli.json);
    }
}
