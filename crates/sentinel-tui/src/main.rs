// Sentinel entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Build the two gateway clients
// 4. Create mpsc channels and spawn the app logic task
// 5. Run the TUI until the user quits
// 6. Wait briefly for the app task to wind down

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sentinel_app::app::{self, AppState};
use sentinel_core::config::{self, Config};
use sentinel_gateway::GatewayClient;
use sentinel_tui::tui;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config first: the log filter comes from it.
    let config = config::load_config().context("failed to load configuration")?;
    let log_path = init_tracing(&config)?;
    info!("Sentinel starting up, logging to {}", log_path.display());
    info!(
        "Gateways: courtroom={} arena={}",
        config.gateway.courtroom_url, config.gateway.arena_url
    );

    let courtroom = Arc::new(
        GatewayClient::courtroom(&config.gateway).context("failed to build courtroom client")?,
    );
    let arena = Arc::new(
        GatewayClient::arena(&config.gateway).context("failed to build debate room client")?,
    );

    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);

    let (app_state, receivers) = AppState::new(&config, courtroom, arena.clone(), arena);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, receivers, ui_tx, app_state).await {
            error!("Application loop error: {:#}", e);
        }
    });

    // Blocks until the user confirms quit or the app loop goes away.
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {:#}", e);
    }

    let _ = tokio::time::timeout(Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Sentinel shut down cleanly");
    Ok(())
}

/// Log to a file in the platform data directory; the terminal belongs to
/// the TUI. `RUST_LOG` overrides the configured filter.
fn init_tracing(config: &Config) -> anyhow::Result<PathBuf> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = match directories::ProjectDirs::from("", "", "sentinel") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => std::env::current_dir()?.join("logs"),
    };
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let log_path = log_dir.join("sentinel.log");
    let log_file = std::fs::File::create(&log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(log_path)
}
