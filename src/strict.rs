//! Strict mode: reject config files carrying keys the config type doesn't know.
//!
//! The file is deserialized into `C::Layer` through `serde_ignored`, which
//! reports every key the layer skipped. Keys are the renamed ones, so a file
//! must say `exampleString`, not the Rust field name.

use std::path::Path;

use confique::Config;
use serde::Deserialize;
use tracing::debug;

use crate::error::ClapflagsError;

/// Fail with every key in `content` that `C` doesn't consume.
pub fn check_unknown_keys<C: Config>(content: &str, path: &Path) -> Result<(), ClapflagsError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut unknown: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: C::Layer = serde_ignored::deserialize(deserializer, |ignored| {
        unknown.push(ignored.to_string());
    })
    .map_err(|e| ClapflagsError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    if unknown.is_empty() {
        return Ok(());
    }
    debug!(path = %path.display(), count = unknown.len(), "unknown keys in config file");

    let errors = unknown
        .into_iter()
        .map(|key| ClapflagsError::UnknownKey {
            line: key_line(content, &key),
            key,
            path: path.to_path_buf(),
        })
        .collect();
    Err(ClapflagsError::UnknownKeys(errors))
}

/// 1-indexed line of `dotted_key` in TOML `content`, or 0 when not found.
///
/// Follows `[section]` headers so a leaf is only matched inside its own table.
/// Quoted keys and inline tables are not understood.
fn key_line(content: &str, dotted_key: &str) -> usize {
    let segments: Vec<&str> = dotted_key.split('.').collect();
    let Some((leaf, section)) = segments.split_last() else {
        return 0;
    };

    let mut current: Vec<&str> = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.starts_with('[') && !trimmed.starts_with("[[") {
            let header = trimmed.trim_start_matches('[').trim_end_matches(']');
            current = header.split('.').map(str::trim).collect();
            continue;
        }

        if current == section
            && let Some(rest) = trimmed.strip_prefix(leaf)
            && rest.trim_start().starts_with('=')
        {
            return i + 1;
        }
    }
    0
}
