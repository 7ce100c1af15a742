mod commands;
mod terminal;

use anyhow::Context;
use commands::{CommandLine, Commands, publish, serve};
use informes_common::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let commands = CommandLine::parse_args();

    terminal::logging::init_logging();

    let root = std::path::absolute(&commands.root)
        .with_context(|| format!("invalid root {}", commands.root.display()))?;
    let mut cfg = Config::from_env(root)?;
    cfg.git_binary = commands.git.clone();

    match commands.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::serve(cfg, &commands.bind).await,
        Commands::Publish { file } => publish::publish(cfg, file).await,
    }
}
