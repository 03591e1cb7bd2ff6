use std::io;
use tracing::info;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
#[cfg(windows)]
use tokio::signal::windows::{ctrl_break, ctrl_c};

/// Wait for a termination signal
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<()> {
    // Handle SIGTERM
    let mut sigterm = signal(SignalKind::terminate())?;
    // Handle SIGINT (Ctrl+C)
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM signal, closing editor");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT signal, closing editor");
        }
    }

    Ok(())
}

/// Wait for a termination signal
#[cfg(windows)]
pub async fn wait_for_signal() -> io::Result<()> {
    // Handle Ctrl+C
    let mut ctrlc = ctrl_c()?;
    // Handle Ctrl+Break
    let mut ctrlbreak = ctrl_break()?;

    tokio::select! {
        _ = ctrlc.recv() => {
            info!("Received Ctrl+C signal, closing editor");
        }
        _ = ctrlbreak.recv() => {
            info!("Received Ctrl+Break signal, closing editor");
        }
    }

    Ok(())
}
