//! Service metadata and lifecycle callbacks
//!
//! A `ServiceConfig` is built once by the embedding application and is
//! shared read-only with the platform adapter and the lifecycle runner.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ServiceError;

/// Error type returned by lifecycle callbacks
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A zero-argument lifecycle callback
pub type Callback = Arc<dyn Fn() -> Result<(), CallbackError> + Send + Sync>;

/// Free-text fields substituted into service descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceMetadata {
    /// File name of the executable inside `working_directory`
    pub executable_name: String,
    pub working_directory: PathBuf,
    /// Internal service name, used for file names and control commands
    pub name: String,
    pub display_name: String,
    pub long_description: String,
    /// Directory for stdout capture (launchd only)
    pub log_location: Option<PathBuf>,
}

impl ServiceMetadata {
    /// Full path of the service executable
    pub fn executable_path(&self) -> PathBuf {
        self.working_directory.join(&self.executable_name)
    }

    /// Directory receiving `{name}.log`, falling back to the working directory
    pub fn log_directory(&self) -> &Path {
        self.log_location
            .as_deref()
            .unwrap_or(&self.working_directory)
    }
}

/// Metadata plus the optional Init/Start/Stop callbacks.
///
/// Start and Stop must return promptly; long-running work has to be spawned
/// by the callback itself. Init may block.
#[derive(Clone)]
pub struct ServiceConfig {
    pub metadata: ServiceMetadata,
    pub init: Option<Callback>,
    pub start: Option<Callback>,
    pub stop: Option<Callback>,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("metadata", &self.metadata)
            .field("init", &self.init.is_some())
            .field("start", &self.start.is_some())
            .field("stop", &self.stop.is_some())
            .finish()
    }
}

impl ServiceConfig {
    pub fn builder(name: impl Into<String>) -> ServiceConfigBuilder {
        ServiceConfigBuilder::new(name)
    }

    /// Builder pre-filled from the running binary's location
    pub fn from_current_exe(name: impl Into<String>) -> Result<ServiceConfigBuilder, ServiceError> {
        let exe = std::env::current_exe().map_err(|source| ServiceError::Io {
            path: PathBuf::from("/proc/self/exe"),
            source,
        })?;

        let mut builder = ServiceConfigBuilder::new(name);
        if let Some(file_name) = exe.file_name().and_then(|s| s.to_str()) {
            builder = builder.executable_name(file_name);
        }
        if let Some(dir) = exe.parent() {
            builder = builder.working_directory(dir);
        }
        Ok(builder)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn display_name(&self) -> &str {
        &self.metadata.display_name
    }
}

/// Builder for [`ServiceConfig`]
pub struct ServiceConfigBuilder {
    metadata: ServiceMetadata,
    init: Option<Callback>,
    start: Option<Callback>,
    stop: Option<Callback>,
}

impl ServiceConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            metadata: ServiceMetadata {
                executable_name: name.clone(),
                working_directory: PathBuf::from("/"),
                display_name: name.clone(),
                long_description: String::new(),
                log_location: None,
                name,
            },
            init: None,
            start: None,
            stop: None,
        }
    }

    pub fn executable_name(mut self, executable_name: impl Into<String>) -> Self {
        self.metadata.executable_name = executable_name.into();
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.metadata.working_directory = dir.into();
        self
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.metadata.display_name = display_name.into();
        self
    }

    pub fn long_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.long_description = description.into();
        self
    }

    pub fn log_location(mut self, dir: impl Into<PathBuf>) -> Self {
        self.metadata.log_location = Some(dir.into());
        self
    }

    pub fn on_init<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(f));
        self
    }

    pub fn on_start<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.start = Some(Arc::new(f));
        self
    }

    pub fn on_stop<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.stop = Some(Arc::new(f));
        self
    }

    pub fn build(self) -> Result<ServiceConfig, ServiceError> {
        validate_name(&self.metadata.name)?;
        if self.metadata.executable_name.is_empty() {
            return Err(ServiceError::MissingExecutable);
        }

        Ok(ServiceConfig {
            metadata: self.metadata,
            init: self.init,
            start: self.start,
            stop: self.stop,
        })
    }
}

/// Check that a service name can be embedded in a descriptor file name
pub fn validate_name(name: &str) -> Result<(), ServiceError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "name is a relative path component"
    } else if name.contains('/') || name.contains('\\') {
        "name contains a path separator"
    } else if name.chars().any(char::is_whitespace) {
        "name contains whitespace"
    } else {
        return Ok(());
    };

    Err(ServiceError::InvalidName(name.to_string(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = ServiceConfig::builder("svc1").build().unwrap();

        assert_eq!(config.name(), "svc1");
        assert_eq!(config.display_name(), "svc1");
        assert_eq!(config.metadata.executable_name, "svc1");
        assert!(config.init.is_none());
        assert!(config.start.is_none());
        assert!(config.stop.is_none());
    }

    #[test]
    fn test_executable_path() {
        let config = ServiceConfig::builder("svc1")
            .working_directory("/opt/svc1")
            .build()
            .unwrap();

        assert_eq!(
            config.metadata.executable_path(),
            PathBuf::from("/opt/svc1/svc1")
        );
    }

    #[test]
    fn test_log_directory_fallback() {
        let config = ServiceConfig::builder("svc1")
            .working_directory("/opt/svc1")
            .build()
            .unwrap();
        assert_eq!(config.metadata.log_directory(), Path::new("/opt/svc1"));

        let config = ServiceConfig::builder("svc1")
            .working_directory("/opt/svc1")
            .log_location("/var/log")
            .build()
            .unwrap();
        assert_eq!(config.metadata.log_directory(), Path::new("/var/log"));
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", ".", "..", "a/b", "my service", "a\\b"] {
            let result = ServiceConfig::builder(name).executable_name("x").build();
            assert!(
                matches!(result, Err(ServiceError::InvalidName(..))),
                "{:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_empty_executable() {
        let result = ServiceConfig::builder("svc1").executable_name("").build();
        assert!(matches!(result, Err(ServiceError::MissingExecutable)));
    }

    #[test]
    fn test_debug_hides_callbacks() {
        let config = ServiceConfig::builder("svc1")
            .on_start(|| Ok(()))
            .build()
            .unwrap();
        let debug = format!("{:?}", config);
        assert!(debug.contains("start: true"));
        assert!(debug.contains("stop: false"));
    }
}
