//! CLI definitions for AB First.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// AB First CLI.
#[derive(Parser)]
#[command(name = "abfirst")]
#[command(about = "Filter page content down to a visitor's A/B test variants")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (defaults to <config dir>/abfirst/config.toml)
    #[arg(short, long, global = true, env = "ABFIRST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to daily-rotated files in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the tests declared on a page as JSON
    Extract {
        #[command(flatten)]
        page: PageArgs,

        /// Additional node type names to search
        #[arg(long = "block")]
        blocks: Vec<String>,
    },

    /// Resolve assignments, filter the page and print the decorated result
    Apply {
        #[command(flatten)]
        page: PageArgs,

        /// Assignment cookie sent by the visitor
        #[arg(long)]
        cookie: Option<String>,

        /// Raw query string of the page request
        #[arg(long, default_value = "")]
        query: String,

        /// Extra header forwarded to the assignment service (NAME=VALUE)
        #[arg(long = "header", value_name = "NAME=VALUE")]
        headers: Vec<String>,

        /// Assignment service host, overriding the config file
        #[arg(long, env = "AB_TESTS_HOST")]
        host: Option<String>,

        /// Assignment service API token, overriding the config file
        #[arg(long, env = "AB_TESTS_API_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

#[derive(Args)]
pub(crate) struct PageArgs {
    /// Page JSON document, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub page: PathBuf,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}
