//! systemd unit file (`/etc/systemd/system/{name}.service`)
//!
//! Mirrors the upstart job: SIGINT to stop, always restart with a 10-in-5s
//! start limit, and a condition that skips startup when the executable is
//! missing.

use crate::config::ServiceMetadata;

pub const TEMPLATE: &str = r#"# {long_description}
[Unit]
Description={display_name}
ConditionFileIsExecutable={executable}
StartLimitIntervalSec=5
StartLimitBurst=10

[Service]
Type=simple
WorkingDirectory={working_directory}
ExecStart={executable}
KillSignal=SIGINT
Restart=always
UMask=0022

[Install]
WantedBy=multi-user.target
"#;

pub fn render(metadata: &ServiceMetadata) -> String {
    let executable = metadata.executable_path().display().to_string();
    let working_directory = metadata.working_directory.display().to_string();

    super::fill(
        TEMPLATE,
        &[
            ("long_description", metadata.long_description.as_str()),
            ("display_name", metadata.display_name.as_str()),
            ("executable", executable.as_str()),
            ("working_directory", working_directory.as_str()),
        ],
    )
}
