mod app;
mod config;
mod differ;
mod executor;
mod i18n;
mod keys;
mod mode;
mod render;
mod scrollview;
mod session;
mod storage;
mod theme;
mod tui;
mod viewport;

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use app::{App, Options};
use config::{parse_interval, Config};
use executor::CommandExecutor;
use i18n::I18n;
use theme::Theme;

#[derive(Parser)]
#[command(name = "dtw")]
#[command(version, about = "Run a command periodically and highlight what changed between runs")]
struct Cli {
    /// Time between runs, e.g. 500ms, 2s, 1m [default: 1s]
    #[arg(short, long, value_parser = parse_interval)]
    interval: Option<Duration>,
    /// Disable diff highlighting
    #[arg(short = 'd', long)]
    no_diff: bool,
    /// Hide the status bar
    #[arg(short = 't', long)]
    no_status: bool,
    /// Do not send a terminal notification when the output changes
    #[arg(short = 'b', long)]
    no_notify: bool,
    /// Number of distinct outputs to keep, 0 for no limit
    #[arg(long)]
    max_history: Option<usize>,
    /// Command to watch (run through the shell)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

/// `DTW_LOG` sets the filter, `DTW_LOG_FILE` the destination. Without a
/// file, logs are discarded since the terminal belongs to the UI.
fn init_logging() {
    let filter = EnvFilter::try_from_env("DTW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let file = std::env::var("DTW_LOG_FILE")
        .ok()
        .and_then(|path| OpenOptions::new().create(true).append(true).open(path).ok());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);
    let _ = match file {
        Some(file) => builder.with_writer(Mutex::new(file)).try_init(),
        None => builder.with_writer(io::sink).try_init(),
    };
}

fn build_options(cli: &Cli, config: &Config) -> Result<Options> {
    Ok(Options {
        command: cli.command.join(" "),
        interval: match cli.interval {
            Some(interval) => interval,
            None => config.interval()?,
        },
        max_history: cli.max_history.unwrap_or(config.watch.max_history),
        diff: config.watch.diff && !cli.no_diff,
        status_bar: config.display.status_bar && !cli.no_status,
        notify: config.watch.notify && !cli.no_notify,
        scrollbars: config.display.scrollbars,
        timestamp_format: config.display.timestamp_format.clone(),
    })
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let options = build_options(&cli, &config)?;
    info!(
        command = %options.command,
        interval_ms = options.interval.as_millis() as u64,
        "starting"
    );

    let executor = CommandExecutor::new(&options.command, &config.watch.shell);
    let i18n = I18n::new(&config.get_effective_language());
    let app = App::new(options, Theme::default(), i18n);

    tui::run(app, executor).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = match Config::new() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}: {err:#}", "Error".red().bold());
            std::process::exit(1);
        }
    };
    let i18n = I18n::new(&config.get_effective_language());

    if cli.command.is_empty() {
        eprintln!("{}", i18n.t("error_command_required").red().bold());
        eprintln!("{}", i18n.t("usage"));
        eprintln!("{}", i18n.t("usage_hint").dimmed());
        std::process::exit(1);
    }

    if let Err(err) = run(cli, config).await {
        error!(error = %format!("{err:#}"), "fatal");
        eprintln!("{}: {err:#}", i18n.t("error_prefix").red().bold());
        std::process::exit(1);
    }
}
