//! Supported init systems and their conventions
//!
//! Everything here is a pure function of the service name and the
//! platform, except [`Platform::detect`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::control::ControlCommand;
use crate::error::ServiceError;

/// Environment variable forcing a platform instead of detecting one
pub const PLATFORM_ENV: &str = "NATIVESVC_PLATFORM";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Ubuntu-style upstart (`/etc/init`)
    Upstart,
    /// macOS launchd daemons
    Launchd,
    /// systemd system units
    Systemd,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upstart => "upstart",
            Self::Launchd => "launchd",
            Self::Systemd => "systemd",
        }
    }

    /// Pick the platform for this process: `NATIVESVC_PLATFORM` if set,
    /// otherwise the compile target (and, on Linux, whether systemd is booted).
    pub fn detect() -> Result<Self, ServiceError> {
        if let Ok(forced) = std::env::var(PLATFORM_ENV) {
            return forced.parse();
        }
        Self::detect_native()
    }

    #[cfg(target_os = "macos")]
    fn detect_native() -> Result<Self, ServiceError> {
        Ok(Self::Launchd)
    }

    #[cfg(target_os = "linux")]
    fn detect_native() -> Result<Self, ServiceError> {
        // Same check as sd_booted(3)
        if Path::new("/run/systemd/system").is_dir() {
            Ok(Self::Systemd)
        } else {
            Ok(Self::Upstart)
        }
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    fn detect_native() -> Result<Self, ServiceError> {
        Err(ServiceError::UnsupportedPlatform(
            std::env::consts::OS.to_string(),
        ))
    }

    /// Directory holding descriptors for this init system
    pub fn descriptor_dir(&self) -> &'static Path {
        match self {
            Self::Upstart => Path::new("/etc/init"),
            Self::Launchd => Path::new("/Library/LaunchDaemons"),
            Self::Systemd => Path::new("/etc/systemd/system"),
        }
    }

    pub fn descriptor_extension(&self) -> &'static str {
        match self {
            Self::Upstart => "conf",
            Self::Launchd => "plist",
            Self::Systemd => "service",
        }
    }

    /// Canonical descriptor location for `name`
    pub fn descriptor_path(&self, name: &str) -> PathBuf {
        self.descriptor_dir()
            .join(format!("{}.{}", name, self.descriptor_extension()))
    }

    /// Command that starts the installed service. `descriptor` is the path
    /// the descriptor was written to (launchd addresses jobs by file).
    pub fn start_command(&self, name: &str, descriptor: &Path) -> ControlCommand {
        match self {
            Self::Upstart => ControlCommand::new("start", [name]),
            Self::Launchd => ControlCommand::new(
                "launchctl",
                ["load".to_string(), descriptor.display().to_string()],
            ),
            Self::Systemd => ControlCommand::new("systemctl", ["start", name]),
        }
    }

    pub fn stop_command(&self, name: &str, descriptor: &Path) -> ControlCommand {
        match self {
            Self::Upstart => ControlCommand::new("stop", [name]),
            Self::Launchd => ControlCommand::new(
                "launchctl",
                ["unload".to_string(), descriptor.display().to_string()],
            ),
            Self::Systemd => ControlCommand::new("systemctl", ["stop", name]),
        }
    }

    /// Whether removal first stops the service (best effort)
    pub fn stops_before_remove(&self) -> bool {
        matches!(self, Self::Launchd | Self::Systemd)
    }

    /// Command making the init system notice descriptor changes, if it needs one
    pub fn reload_command(&self) -> Option<ControlCommand> {
        match self {
            Self::Systemd => Some(ControlCommand::new("systemctl", ["daemon-reload"])),
            Self::Upstart | Self::Launchd => None,
        }
    }
}

impl Platform {
    /// Command linking the installed service into the boot sequence, for
    /// init systems where writing the descriptor is not enough
    pub fn enable_command(&self, name: &str) -> Option<ControlCommand> {
        match self {
            Self::Systemd => Some(ControlCommand::new("systemctl", ["enable", name])),
            Self::Upstart | Self::Launchd => None,
        }
    }

    /// Inverse of [`Platform::enable_command`], run before the descriptor is deleted
    pub fn disable_command(&self, name: &str) -> Option<ControlCommand> {
        match self {
            Self::Systemd => Some(ControlCommand::new("systemctl", ["disable", name])),
            Self::Upstart | Self::Launchd => None,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upstart" => Ok(Self::Upstart),
            "launchd" => Ok(Self::Launchd),
            "systemd" => Ok(Self::Systemd),
            other => Err(ServiceError::UnsupportedPlatform(other.to_string())),
        }
    }
}
