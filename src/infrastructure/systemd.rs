//! Systemd user service integration for the sync daemon.

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use crate::domain::{AppConfig, AppError, Result};

/// Service unit file name.
const SERVICE_NAME: &str = "quote-keeper-sync.service";

/// Systemd service manager for the sync daemon.
pub struct SyncDaemonService {
    config: AppConfig,
}

impl SyncDaemonService {
    /// Create a new service manager.
    #[must_use]
    pub const fn new(config: AppConfig) -> Self {
        Self { config }
    }

    fn service_file_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| AppError::Config {
            message: "Could not determine home directory".into(),
        })?;

        Ok(home.join(".config/systemd/user").join(SERVICE_NAME))
    }

    fn generate_unit_file(&self) -> Result<String> {
        let binary_path = std::env::current_exe()
            .map_err(|e| AppError::io("Failed to get executable path", e))?;

        Ok(format!(
            r"[Unit]
Description=Quote Keeper Sync Daemon
After=network.target

[Service]
Type=simple
ExecStart={binary} daemon --interval {interval}
Restart=on-failure
RestartSec=30
Environment=RUST_LOG=info
ReadWritePaths={data_dir}

[Install]
WantedBy=default.target
",
            binary = binary_path.display(),
            interval = self.config.sync.interval_secs,
            data_dir = self.config.data_dir().display(),
        ))
    }

    /// Write the unit file, reload systemd, then enable and start the
    /// service.
    ///
    /// # Errors
    /// Returns error if the unit cannot be written or systemctl fails.
    pub fn install(&self) -> Result<PathBuf> {
        let service_path = Self::service_file_path()?;

        if let Some(parent) = service_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create systemd user directory", e))?;
        }

        fs::write(&service_path, self.generate_unit_file()?)
            .map_err(|e| AppError::io("Failed to write service file", e))?;

        tracing::info!(path = %service_path.display(), "Service file written");

        run_systemctl(&["daemon-reload"])?;
        run_systemctl(&["enable", SERVICE_NAME])?;
        run_systemctl(&["start", SERVICE_NAME])?;

        Ok(service_path)
    }

    /// Stop, disable, and remove the service.
    ///
    /// # Errors
    /// Returns error if the unit file cannot be removed.
    pub fn uninstall(&self) -> Result<()> {
        // Stop/disable may fail if the unit was never started
        let _ = run_systemctl(&["stop", SERVICE_NAME]);
        let _ = run_systemctl(&["disable", SERVICE_NAME]);

        let service_path = Self::service_file_path()?;
        if service_path.exists() {
            fs::remove_file(&service_path)
                .map_err(|e| AppError::io("Failed to remove service file", e))?;
        }

        let _ = run_systemctl(&["daemon-reload"]);

        tracing::info!("Service uninstalled");

        Ok(())
    }

    /// Get a short status string for the service.
    ///
    /// # Errors
    /// Returns error if systemctl cannot be invoked.
    pub fn status(&self) -> Result<&'static str> {
        if !Self::service_file_path()?.exists() {
            return Ok("not installed");
        }

        let is_active = Command::new("systemctl")
            .args(["--user", "is-active", SERVICE_NAME])
            .output()
            .map_err(|e| AppError::io("Failed to check service status", e))?
            .status
            .success();

        Ok(if is_active { "running" } else { "installed, stopped" })
    }

    /// View recent service logs.
    ///
    /// # Errors
    /// Returns error if journalctl cannot be invoked.
    pub fn logs(&self, lines: usize) -> Result<String> {
        let output = Command::new("journalctl")
            .args([
                "--user",
                "-u",
                SERVICE_NAME,
                "-n",
                &lines.to_string(),
                "--no-pager",
            ])
            .output()
            .map_err(|e| AppError::io("Failed to get service logs", e))?;

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

fn run_systemctl(args: &[&str]) -> Result<()> {
    let status = Command::new("systemctl")
        .arg("--user")
        .args(args)
        .status()
        .map_err(|e| AppError::io("Failed to run systemctl", e))?;

    if status.success() {
        Ok(())
    } else {
        Err(AppError::Config {
            message: format!("systemctl --user {} failed", args.join(" ")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_file_references_daemon() {
        let service = SyncDaemonService::new(AppConfig::default());
        let unit = service.generate_unit_file().unwrap();

        assert!(unit.contains("daemon --interval 10"));
        assert!(unit.contains("WantedBy=default.target"));
    }
}
