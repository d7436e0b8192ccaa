//! Upstart job file (`/etc/init/{name}.conf`)

use crate::config::ServiceMetadata;

/// Job template.
///
/// Placeholders:
/// - `{long_description}` - comment on the first line
/// - `{display_name}` - `description` stanza
/// - `{executable}` - `{working_directory}/{executable_name}`
pub const TEMPLATE: &str = r#"#	{long_description}
description	{display_name}

start on filesystem or runlevel [2345]
stop on runlevel [!2345]

kill signal INT

respawn
respawn limit 10 5
umask 022

console none

pre-start script
	test -x {executable} || { stop; exit 0; }
end script

# Start
exec {executable}
"#;

pub fn render(metadata: &ServiceMetadata) -> String {
    let executable = metadata.executable_path().display().to_string();

    super::fill(
        TEMPLATE,
        &[
            ("long_description", metadata.long_description.as_str()),
            ("display_name", metadata.display_name.as_str()),
            ("executable", executable.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn svc1() -> ServiceMetadata {
        ServiceMetadata {
            executable_name: "svc1".into(),
            working_directory: PathBuf::from("/opt/svc1"),
            name: "svc1".into(),
            display_name: "Service One".into(),
            long_description: "Serves things".into(),
            log_location: None,
        }
    }

    #[test]
    fn test_render_golden() {
        let expected = "#\tServes things
description\tService One

start on filesystem or runlevel [2345]
stop on runlevel [!2345]

kill signal INT

respawn
respawn limit 10 5
umask 022

console none

pre-start script
\ttest -x /opt/svc1/svc1 || { stop; exit 0; }
end script

# Start
exec /opt/svc1/svc1
";
        assert_eq!(render(&svc1()), expected);
    }

    #[test]
    fn test_exec_and_pre_start_share_path() {
        let rendered = render(&svc1());
        let lines: Vec<&str> = rendered.lines().collect();

        assert!(lines.contains(&"exec /opt/svc1/svc1"));
        assert!(lines
            .iter()
            .any(|l| l.trim_start().starts_with("test -x /opt/svc1/svc1 ")));
    }

    #[test]
    fn test_fields_are_not_escaped() {
        let mut metadata = svc1();
        metadata.display_name = "Svc \"One\" & <Two>".into();
        let rendered = render(&metadata);
        assert!(rendered.contains("description\tSvc \"One\" & <Two>\n"));
    }
}
