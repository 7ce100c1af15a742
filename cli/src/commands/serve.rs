use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use informes_common::clock::SystemClock;
use informes_common::config::{API_SECRET_KEY, Config};
use informes_core::git::GitCliPublisher;
use informes_core::http::{AppState, build_router};
use informes_core::service::ReportService;

pub async fn serve(cfg: Config, bind: &str) -> anyhow::Result<()> {
    if cfg.uses_default_secret() {
        warn!("{API_SECRET_KEY} is not set, using the built-in default secret");
    }
    if cfg.github_token.is_none() {
        warn!("GITHUB_TOKEN is not set, every publish will fail");
    }
    if !cfg.index_file().exists() {
        warn!("{} does not exist yet", cfg.index_file().display());
    }

    let publisher = GitCliPublisher::from_config(&cfg);
    let service = ReportService::new(&cfg, Box::new(publisher), Box::new(SystemClock));
    let app = build_router(AppState::new(service), cfg.max_body_bytes);

    let listener = TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(
        "Serving {} on {}",
        cfg.root.display(),
        listener.local_addr().context("listener has no local address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutting down");
}
