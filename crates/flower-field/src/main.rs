//! Flower Field: flowers spread across a terminal grid, one tick per interval.

mod commands;
mod driver;
mod render;
mod telemetry;
mod timer;

use anyhow::Result;
use driver::FieldEvent;
use flower_core::{ConfigStore, FileStorage, RunnerConfig};
use flower_world::Viewport;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::io::BufRead;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize telemetry
    telemetry::init_telemetry()?;

    // Load configuration
    let runner = RunnerConfig::from_env()?;
    info!("Starting Flower Field with storage in {:?}", runner.storage_dir);

    let store = ConfigStore::open(FileStorage::new(&runner.storage_dir));

    let rng = match runner.seed {
        Some(seed) => {
            info!("Using seed {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    };

    let app = driver::FieldDriver::new(
        store,
        rng,
        Viewport::new(runner.viewport_width, runner.viewport_height),
        runner.render,
        runner.max_ticks,
    );

    let (tx, rx) = mpsc::channel(64);
    let shutdown = CancellationToken::new();

    let command_tx = tx.clone();
    std::thread::spawn(move || read_commands(command_tx));

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let app = driver::run(app, rx, tx, shutdown.clone()).await?;
    shutdown.cancel();

    let stats = app.field().stats();
    info!(
        ticks = app.ticks(),
        extinct_ticks = app.extinct_ticks(),
        occupied = stats.occupied,
        distinct_colors = stats.distinct_colors,
        oldest_age = ?stats.oldest_age,
        spread_interval_ms = app.store().get().spread_interval_ms,
        "Flower Field stopped"
    );

    Ok(())
}

/// Forward stdin commands to the event loop until EOF or the loop exits.
///
/// Runs on a plain thread: a blocking stdin read must not hold up runtime shutdown.
fn read_commands(events: mpsc::Sender<FieldEvent>) {
    for line in std::io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!("Failed to read command: {}", e);
                return;
            }
        };

        match commands::parse_command(&line) {
            Ok(Some(event)) => {
                if events.blocking_send(event).is_err() {
                    return;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("{}", e),
        }
    }

    info!("Command input closed");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
