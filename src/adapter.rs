//! Platform service adapter
//!
//! Install/remove the descriptor file, drive the init system's control
//! program, and run the service lifecycle. One adapter serves exactly one
//! platform; the descriptor path is derived from the platform and service
//! name and optionally re-rooted under a prefix directory.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;

use crate::config::ServiceConfig;
use crate::control::{self, ControlCommand};
use crate::descriptor;
use crate::error::ServiceError;
use crate::lifecycle::Lifecycle;
use crate::platform::Platform;
use crate::signals::SignalListener;

pub struct ServiceAdapter {
    platform: Platform,
    config: Arc<ServiceConfig>,
    root: Option<PathBuf>,
    control_dir: Option<PathBuf>,
}

impl ServiceAdapter {
    pub fn new(platform: Platform, config: Arc<ServiceConfig>) -> Self {
        Self {
            platform,
            config,
            root: None,
            control_dir: None,
        }
    }

    /// Adapter for the platform this process runs on
    pub fn native(config: Arc<ServiceConfig>) -> Result<Self, ServiceError> {
        Ok(Self::new(Platform::detect()?, config))
    }

    /// Place descriptors under `root` instead of `/`.
    ///
    /// Install and remove on such an adapter leave the init system alone
    /// (no pre-removal stop, no enable/disable, no reload) unless a control
    /// directory is also set.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Resolve control programs (`start`, `launchctl`, `systemctl`, ...)
    /// inside `dir` instead of through `PATH`
    pub fn with_control_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.control_dir = Some(dir.into());
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn config(&self) -> &Arc<ServiceConfig> {
        &self.config
    }

    /// Where the descriptor for this service lives
    pub fn descriptor_path(&self) -> PathBuf {
        let path = self.platform.descriptor_path(self.config.name());
        match &self.root {
            Some(root) => root.join(path.strip_prefix("/").unwrap_or(&path)),
            None => path,
        }
    }

    /// Rendered descriptor content
    pub fn render(&self) -> String {
        descriptor::render(self.platform, &self.config.metadata)
    }

    pub fn is_installed(&self) -> bool {
        self.descriptor_path().exists()
    }

    /// Write the descriptor. Fails if one already exists.
    pub async fn install(&self) -> Result<PathBuf, ServiceError> {
        let path = self.descriptor_path();
        check_privileges(&path);

        // create_new makes the existence check and the creation one step
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::AlreadyExists => ServiceError::AlreadyInstalled(path.clone()),
                _ => ServiceError::Io {
                    path: path.clone(),
                    source,
                },
            })?;

        let content = self.render();
        let mut written = file.write_all(content.as_bytes()).await;
        if written.is_ok() {
            written = file.flush().await;
        }

        if let Err(source) = written {
            discard_partial(&path).await;
            return Err(ServiceError::Io { path, source });
        }

        log::info!(
            "Installed {} descriptor for {} at {}",
            self.platform,
            self.config.name(),
            path.display()
        );
        self.reload().await;
        if let Some(cmd) = self.platform.enable_command(self.config.name()) {
            self.best_effort(cmd).await;
        }

        Ok(path)
    }

    /// Delete the descriptor, stopping the service first where the
    /// platform requires it. Stop and disable failures are ignored.
    pub async fn remove(&self) -> Result<PathBuf, ServiceError> {
        let path = self.descriptor_path();
        check_privileges(&path);

        if self.platform.stops_before_remove() && self.is_live() {
            if let Err(e) = self.stop().await {
                log::warn!("Ignoring stop failure before removal: {}", e);
            }
        }
        if let Some(cmd) = self.platform.disable_command(self.config.name()) {
            self.best_effort(cmd).await;
        }

        tokio::fs::remove_file(&path)
            .await
            .map_err(|source| match source.kind() {
                ErrorKind::NotFound => ServiceError::NotInstalled(path.clone()),
                _ => ServiceError::Io {
                    path: path.clone(),
                    source,
                },
            })?;

        log::info!("Removed {}", path.display());
        self.reload().await;

        Ok(path)
    }

    /// Ask the init system to start the installed service
    pub async fn start(&self) -> Result<(), ServiceError> {
        control::run(&self.start_command()).await?;
        Ok(())
    }

    /// Ask the init system to stop the running service
    pub async fn stop(&self) -> Result<(), ServiceError> {
        control::run(&self.stop_command()).await?;
        Ok(())
    }

    pub fn start_command(&self) -> ControlCommand {
        self.resolve(
            self.platform
                .start_command(self.config.name(), &self.descriptor_path()),
        )
    }

    pub fn stop_command(&self) -> ControlCommand {
        self.resolve(
            self.platform
                .stop_command(self.config.name(), &self.descriptor_path()),
        )
    }

    /// Run as the service: blocks until the OS asks the process to stop
    pub async fn run(&self) -> Result<(), ServiceError> {
        let listener = SignalListener::new().map_err(ServiceError::Signal)?;

        let lifecycle = Lifecycle::new(Arc::clone(&self.config));
        lifecycle.run(listener.spawn_forwarder()).await?;
        Ok(())
    }

    /// A re-rooted adapter is not talking to the live init system, unless
    /// it was pointed at its own control programs
    fn is_live(&self) -> bool {
        self.root.is_none() || self.control_dir.is_some()
    }

    fn resolve(&self, mut cmd: ControlCommand) -> ControlCommand {
        if let Some(dir) = &self.control_dir {
            cmd.program = dir.join(&cmd.program).display().to_string();
        }
        cmd
    }

    async fn reload(&self) {
        if let Some(cmd) = self.platform.reload_command() {
            self.best_effort(cmd).await;
        }
    }

    /// Run a control command whose failure must not abort install/remove
    async fn best_effort(&self, cmd: ControlCommand) {
        if !self.is_live() {
            return;
        }
        let cmd = self.resolve(cmd);
        if let Err(e) = control::run(&cmd).await {
            log::warn!("{} failed: {}", cmd, e);
        }
    }
}

/// Delete a descriptor whose write failed. Returns whether it is gone.
async fn discard_partial(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) => {
            log::warn!(
                "Failed to remove partially written {}: {} (remove it before reinstalling)",
                path.display(),
                e
            );
            false
        }
    }
}

fn check_privileges(path: &Path) {
    if !nix::unistd::geteuid().is_root() {
        log::debug!(
            "Not running as root; writing {} may be refused",
            path.display()
        );
    }
}
