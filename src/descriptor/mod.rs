//! Service descriptor rendering
//!
//! Each init system gets a template under this module. Rendering is a pure
//! function of [`ServiceMetadata`]: values are substituted verbatim, with no
//! escaping, into `{placeholder}` markers. Braces that do not name a known
//! placeholder (shell blocks in upstart scripts, for instance) are left as-is.

pub mod launchd;
pub mod systemd;
pub mod upstart;

use crate::config::ServiceMetadata;
use crate::platform::Platform;

/// Render the descriptor file content for `platform`
pub fn render(platform: Platform, metadata: &ServiceMetadata) -> String {
    match platform {
        Platform::Upstart => upstart::render(metadata),
        Platform::Launchd => launchd::render(metadata),
        Platform::Systemd => systemd::render(metadata),
    }
}

/// Substitute `{key}` markers in a single left-to-right pass.
///
/// Substituted values are never rescanned, so a description containing
/// `{name}` stays literal.
pub(crate) fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];

        let replacement = tail[1..].find('}').and_then(|close| {
            let key = &tail[1..1 + close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, value)| (*value, close + 2))
        });

        match replacement {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &tail[consumed..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
