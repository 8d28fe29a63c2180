//! AB First - A/B test variant filtering for page content
//!
//! Main entry point for the AB First CLI.

mod cli;
mod cmd_apply;
mod cmd_extract;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde_json::Value;
use tracing::debug;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use abfirst_config::{Config, ConfigError, ConfigLoader};

use crate::cli::{Cli, Commands, PageArgs};

/// Default config file location.
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("abfirst").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("abfirst.toml"))
}

/// Initialize tracing on stderr, plus a rotating file when `log_dir` is set.
fn init_tracing(log_dir: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("abfirst")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer alive for the whole run.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

/// Load the config file. A missing default file yields the default config.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let explicit = path.is_some();
    let path = path
        .map(|p| PathBuf::from(ConfigLoader::expand_path(&p.to_string_lossy())))
        .unwrap_or_else(default_config_path);

    match ConfigLoader::load(&path) {
        Ok(config) => {
            debug!(path = %path.display(), "Loaded config");
            Ok(config)
        }
        Err(ConfigError::NotFound(_)) if !explicit => {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load config {}", path.display())),
    }
}

/// Read the page document from a file or stdin.
fn read_page(args: &PageArgs) -> anyhow::Result<Value> {
    let raw = if args.page.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read page from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.page)
            .with_context(|| format!("Failed to read page {}", args.page.display()))?
    };
    serde_json::from_str(&raw).context("Page is not valid JSON")
}

fn print_json(value: &Value, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_dir.as_deref())?;

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Extract { page, blocks } => cmd_extract::run(&config, &page, blocks),
        Commands::Apply {
            page,
            cookie,
            query,
            headers,
            host,
            token,
        } => {
            let mut config = config;
            if let Some(host) = host {
                config.ab_tests.host = host;
            }
            if let Some(token) = token {
                config.ab_tests.api_token = token;
            }
            cmd_apply::run(&config, &page, cookie, query, &headers).await
        }
    }
}
