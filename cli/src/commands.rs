pub mod publish;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";

#[derive(Parser)]
#[command(name = "informes")]
#[command(about = "Webhook that publishes HTML reports to a static dashboard.")]
pub struct CommandLine {
    /// Site root holding index.html, reports/ and the git working tree
    #[arg(long, global = true, env = "REPORTS_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Address the HTTP server listens on
    #[arg(
        long,
        global = true,
        env = "REPORTS_BIND",
        default_value = DEFAULT_BIND
    )]
    pub bind: String,

    /// git executable used for publishing
    #[arg(long, global = true, default_value = "git")]
    pub git: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server (default)
    #[command(alias = "s")]
    Serve,
    /// Publish a local HTML file without going through HTTP
    #[command(alias = "p")]
    Publish { file: PathBuf },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
