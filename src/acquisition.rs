//! Report Acquisition — runs the OS battery report utility under a timeout

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::{BatteryError, CommandError};
use crate::system;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Produce a fresh battery report and return its path.
pub fn generate_report(config: &Config) -> Result<PathBuf, BatteryError> {
    if config.require_elevation && !system::is_elevated() {
        return Err(BatteryError::Permission(
            "battery report generation requires an elevated process".into(),
        ));
    }

    if config.check_battery_presence && cfg!(windows) && !system::battery_present() {
        return Err(BatteryError::NoBattery);
    }

    let path = &config.report_path;
    remove_stale_report(path);

    info!("Generating battery report at {}", path.display());
    run_command(&config.command, &config.command_args(), config.timeout())?;
    wait_for_file(path, config.settle_timeout())?;

    Ok(path.clone())
}

/// Run `program` to completion, killing it once `timeout` elapses.
pub fn run_command(program: &str, args: &[String], timeout: Duration) -> Result<(), CommandError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|source| CommandError::Spawn {
            program: program.to_string(),
            source,
        })?;

    runtime.block_on(run_with_timeout(program, args, timeout))
}

async fn run_with_timeout(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<(), CommandError> {
    let spawn_err = |source| CommandError::Spawn {
        program: program.to_string(),
        source,
    };

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(windows)]
    cmd.creation_flags(CREATE_NO_WINDOW);

    debug!("Spawning {} {:?}", program, args);
    let child = cmd.spawn().map_err(spawn_err)?;

    // dropping the wait future on timeout kills the child
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(result) => result.map_err(spawn_err)?,
        Err(_) => {
            warn!("{} timed out after {:?}", program, timeout);
            return Err(CommandError::TimedOut {
                program: program.to_string(),
                after: timeout,
            });
        }
    };

    if output.status.success() {
        debug!("{} finished: {}", program, output.status);
        Ok(())
    } else {
        Err(CommandError::Failed {
            program: program.to_string(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// The OS may still be flushing the report when the command returns.
pub fn wait_for_file(path: &Path, settle: Duration) -> Result<(), CommandError> {
    let deadline = Instant::now() + settle;
    loop {
        if path.is_file() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(CommandError::MissingOutput(path.to_path_buf()));
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}

fn remove_stale_report(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Could not remove old report {}: {}", path.display(), e);
        }
    }
}
