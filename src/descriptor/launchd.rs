//! launchd property list (`/Library/LaunchDaemons/{name}.plist`)
//!
//! See launchd.plist(5). `Label` carries the display name.

use crate::config::ServiceMetadata;

pub const TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple Computer//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>Label</key><string>{display_name}</string>
	<key>ProgramArguments</key>
	<array>
		<string>{executable}</string>
	</array>
	<key>WorkingDirectory</key><string>{working_directory}</string>
	<key>StandardOutPath</key><string>{log_path}</string>
	<key>KeepAlive</key><true/>
	<key>Disabled</key><false/>
</dict>
</plist>
"#;

pub fn render(metadata: &ServiceMetadata) -> String {
    let executable = metadata.executable_path().display().to_string();
    let working_directory = metadata.working_directory.display().to_string();
    let log_path = metadata
        .log_directory()
        .join(format!("{}.log", metadata.name))
        .display()
        .to_string();

    super::fill(
        TEMPLATE,
        &[
            ("display_name", metadata.display_name.as_str()),
            ("executable", executable.as_str()),
            ("working_directory", working_directory.as_str()),
            ("log_path", log_path.as_str()),
        ],
    )
}
