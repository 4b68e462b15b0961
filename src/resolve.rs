//! Layer resolution: merge every source and produce a typed config.
//!
//! Operates on pre-loaded data ([`ResolveInput`]) with no I/O, so the whole
//! pipeline runs in tests with synthetic inputs. Layers, lowest first:
//!
//! 1. flag defaults, keyed by binding
//! 2. config files, in priority order (strict mode rejects unknown keys)
//! 3. environment variables
//! 4. flags given explicitly on the command line
//!
//! The merged table is deserialized into `C::Layer` and confique fills the
//! defaults of fields that have no flag.

use confique::Config;
use serde::Deserialize;
use toml::{Table, Value};
use tracing::debug;

use crate::env;
use crate::error::ClapflagsError;
use crate::file::SourceFile;
use crate::layer::{deep_merge, defaults_table};
use crate::strict;
use crate::walker::Generated;

/// All pre-loaded data needed to resolve a config.
#[derive(Debug, Default)]
pub struct ResolveInput {
    /// Files in precedence order, lowest first.
    pub files: Vec<SourceFile>,
    /// Raw environment pairs (`std::env::vars()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Variable prefix. `None` disables the environment layer.
    pub env_prefix: Option<String>,
    /// Values given on the command line, as built by [`cli_table`](crate::cli::cli_table).
    pub cli: Table,
    /// Reject unknown keys in config files.
    pub strict: bool,
}

/// Merge all layers and deserialize. Does not run validation rules.
pub fn resolve<C: Config>(generated: &Generated, input: ResolveInput) -> Result<C, ClapflagsError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut merged = defaults_table(generated)?;

    for file in &input.files {
        if input.strict {
            strict::check_unknown_keys::<C>(&file.content, &file.path)?;
        }
        let table: Table =
            toml::from_str(&file.content).map_err(|e| ClapflagsError::ParseError {
                path: file.path.clone(),
                source: e,
            })?;
        debug!(path = %file.path.display(), keys = table.len(), "merged file layer");
        merged = deep_merge(merged, table);
    }

    if let Some(prefix) = &input.env_prefix {
        let table = env::env_to_table(prefix, generated, input.env_vars)?;
        debug!(prefix = %prefix, keys = table.len(), "merged environment layer");
        merged = deep_merge(merged, table);
    }

    if !input.cli.is_empty() {
        debug!(keys = input.cli.len(), "merged command line layer");
        merged = deep_merge(merged, input.cli);
    }

    let layer: C::Layer = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| ClapflagsError::InvalidValue {
            key: "<merged>".into(),
            reason: e.to_string(),
        })?;

    C::builder()
        .preloaded(layer)
        .load()
        .map_err(ClapflagsError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{EXAMPLE_SCHEMA, ExampleConfig, SERVER_SCHEMA, ServerConfig};
    use crate::walker::generate;

    fn file(name: &str, content: &str) -> SourceFile {
        SourceFile {
            path: name.into(),
            content: content.into(),
        }
    }

    fn input() -> ResolveInput {
        ResolveInput {
            strict: true,
            ..ResolveInput::default()
        }
    }

    fn example(input: ResolveInput) -> Result<ExampleConfig, ClapflagsError> {
        resolve(&generate(&EXAMPLE_SCHEMA).unwrap(), input)
    }

    fn cli(s: &str) -> Table {
        s.parse().unwrap()
    }

    #[test]
    fn flag_defaults_only() {
        let config = example(input()).unwrap();
        assert_eq!(config.foo, "gopher");
        assert_eq!(config.bar.example, "");
        assert!(!config.bar.enabled);
        assert_eq!(config.baz, "another");
    }

    #[test]
    fn file_overrides_flag_default() {
        let config = example(ResolveInput {
            files: vec![file("a.toml", "[bar]\nexampleString = \"from file\"\n")],
            ..input()
        })
        .unwrap();
        assert_eq!(config.bar.example, "from file");
        assert_eq!(config.foo, "gopher");
    }

    #[test]
    fn later_file_wins() {
        let config = example(ResolveInput {
            files: vec![
                file("a.toml", "foo = \"first\"\nbaz = \"kept\"\n"),
                file("b.toml", "foo = \"second\"\n"),
            ],
            ..input()
        })
        .unwrap();
        assert_eq!(config.foo, "second");
        assert_eq!(config.baz, "kept");
    }

    #[test]
    fn env_overrides_file() {
        let config = example(ResolveInput {
            files: vec![file("a.toml", "foo = \"file\"\n")],
            env_vars: vec![("APP_FOO".into(), "env".into())],
            env_prefix: Some("APP".into()),
            ..input()
        })
        .unwrap();
        assert_eq!(config.foo, "env");
    }

    #[test]
    fn disabled_env_is_ignored() {
        let config = example(ResolveInput {
            env_vars: vec![("APP_FOO".into(), "env".into())],
            env_prefix: None,
            ..input()
        })
        .unwrap();
        assert_eq!(config.foo, "gopher");
    }

    #[test]
    fn command_line_overrides_everything() {
        let config = example(ResolveInput {
            files: vec![file("a.toml", "foo = \"file\"\n")],
            env_vars: vec![("APP_FOO".into(), "env".into())],
            env_prefix: Some("APP".into()),
            cli: cli("foo = \"cli\"\n[bar]\nenabled = true\n"),
            strict: true,
        })
        .unwrap();
        assert_eq!(config.foo, "cli");
        assert!(config.bar.enabled);
    }

    #[test]
    fn strict_rejects_unknown_key() {
        let err = example(ResolveInput {
            files: vec![file("bad.toml", "typo = 1\n")],
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, ClapflagsError::UnknownKeys(_)));
    }

    #[test]
    fn lenient_allows_unknown_key() {
        let config = example(ResolveInput {
            files: vec![file("ok.toml", "typo = 1\nfoo = \"x\"\n")],
            strict: false,
            ..input()
        })
        .unwrap();
        assert_eq!(config.foo, "x");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let err = example(ResolveInput {
            files: vec![file("bad.toml", "foo = \n")],
            strict: false,
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, ClapflagsError::ParseError { .. }));
    }

    #[test]
    fn wrong_type_in_file_is_invalid_value() {
        let err = example(ResolveInput {
            files: vec![file("bad.toml", "[bar]\nenabled = \"yes\"\n")],
            strict: false,
            ..input()
        })
        .unwrap_err();
        assert!(matches!(err, ClapflagsError::InvalidValue { .. }));
    }

    #[test]
    fn resolve_does_not_run_rules() {
        let config = example(ResolveInput {
            cli: cli("foo = \"\""),
            ..input()
        })
        .unwrap();
        assert_eq!(config.foo, "");
    }

    #[test]
    fn server_config_from_all_layers() {
        let generated = generate(&SERVER_SCHEMA).unwrap();
        let config: ServerConfig = resolve(
            &generated,
            ResolveInput {
                files: vec![file(
                    "server.toml",
                    "workers = 16\n[tls]\ncertPath = \"/etc/cert.pem\"\n[labels]\nteam = \"core\"\n",
                )],
                env_vars: vec![("SRV_TLS_ENABLED".into(), "1".into())],
                env_prefix: Some("SRV".into()),
                cli: cli("tags = [\"x\"]"),
                strict: true,
            },
        )
        .unwrap();
        assert_eq!(config.listen, "localhost:8080");
        assert_eq!(config.workers, 16);
        assert_eq!(config.ratio, 0.5);
        assert_eq!(config.tags, ["x"]);
        assert!(config.tls.enabled);
        assert_eq!(config.tls.cert_path, "/etc/cert.pem");
        assert_eq!(config.labels.unwrap()["team"], "core");
    }
}
