//! Ctrl-C handling.
//!
//! A single listener thread runs a small current-thread tokio runtime that
//! waits on `ctrl_c`. The first Ctrl-C interrupts the running system; a
//! second one, or one that arrives while no system is running, ends the
//! process with the conventional SIGINT status.

use std::sync::OnceLock;
use std::thread;

use tracing::{error, info, warn};

use crate::thread::error::SystemError;
use crate::thread::system::running_system;

pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static LISTENER: OnceLock<Result<(), String>> = OnceLock::new();

/// Install the process-wide Ctrl-C listener. Later calls are no-ops.
pub fn install() -> Result<(), SystemError> {
    LISTENER
        .get_or_init(spawn_listener)
        .clone()
        .map_err(SystemError::ThreadSetupError)
}

fn spawn_listener() -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .map_err(|err| format!("failed to build signal runtime: {}", err))?;

    thread::Builder::new()
        .name("cacti-signal".to_string())
        .spawn(move || runtime.block_on(listen()))
        .map_err(|err| format!("failed to spawn signal thread: {}", err))?;
    Ok(())
}

async fn listen() {
    loop {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to listen for Ctrl-C");
            return;
        }

        match running_system() {
            Some(system) if system.interrupt() => {
                info!("Ctrl-C received, interrupting actor system");
            }
            Some(_) => {
                warn!("second Ctrl-C received, exiting");
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
            None => std::process::exit(INTERRUPTED_EXIT_CODE),
        }
    }
}
