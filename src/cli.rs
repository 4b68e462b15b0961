//! Clap adapter.
//!
//! Renders a [`FlagSet`] as clap arguments on an existing [`Command`] and reads
//! back the values the user typed. Only values whose source is the command
//! line become a layer; clap's own defaults are for help output and never
//! shadow files or the environment.
//!
//! Booleans take an optional `=value` (`--bar-enabled`, `--bar-enabled=false`).
//! String lists accept repeated flags and comma-separated values.

use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use toml::Table;
use tracing::trace;

use crate::error::ClapflagsError;
use crate::flags::{FlagSet, FlagSpec, FlagValue};
use crate::layer::insert_flag_value;
use crate::walker::Generated;

/// Id of the argument naming an explicit config file.
pub const CONFIG_ARG: &str = "config";

/// Build the clap argument for one flag.
pub fn to_arg(spec: &FlagSpec) -> Arg {
    let mut arg = Arg::new(spec.name.clone())
        .long(spec.name.clone())
        .help(spec.usage.clone())
        .value_name(spec.default.kind_name());

    if let Some(short) = spec.shorthand {
        arg = arg.short(short);
    }

    arg = match &spec.default {
        FlagValue::StringList(_) => arg
            .action(ArgAction::Append)
            .value_delimiter(',')
            .value_parser(value_parser!(String)),
        FlagValue::Bool(_) => {
            let parser = spec.clone();
            arg.action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .value_parser(move |s: &str| parser.parse(s))
        }
        _ => {
            let parser = spec.clone();
            arg.action(ArgAction::Set)
                .value_parser(move |s: &str| parser.parse(s))
        }
    };

    if !spec.default.is_zero() {
        arg = arg.default_value(default_literal(&spec.default));
    }
    arg
}

fn default_literal(value: &FlagValue) -> String {
    match value {
        FlagValue::StringList(items) => items.join(","),
        other => other.to_string(),
    }
}

/// The `--<name> <FILE>` argument that replaces config file discovery.
pub fn config_arg(long: &str) -> Arg {
    Arg::new(CONFIG_ARG)
        .long(long.to_string())
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Read configuration from this file instead of searching for one")
}

/// Add every flag in `flags` to `cmd`.
///
/// Fails if a flag's name or shorthand is already used by `cmd`, including
/// clap's generated `--help/-h` and, on versioned commands, `--version/-V`.
pub fn augment(mut cmd: Command, flags: &FlagSet) -> Result<Command, ClapflagsError> {
    for spec in flags.iter() {
        check_clash(&cmd, spec)?;
        cmd = cmd.arg(to_arg(spec));
    }
    Ok(cmd)
}

/// Whether `long` is already an argument id or long flag of `cmd`.
pub(crate) fn long_taken(cmd: &Command, long: &str) -> bool {
    cmd.get_arguments()
        .any(|a| a.get_id() == long || a.get_long() == Some(long))
        || generated_flags(cmd).iter().any(|(l, _)| *l == long)
}

fn check_clash(cmd: &Command, spec: &FlagSpec) -> Result<(), ClapflagsError> {
    if long_taken(cmd, &spec.name) {
        return Err(ClapflagsError::DuplicateFlag(spec.name.clone()));
    }

    let Some(short) = spec.shorthand else {
        return Ok(());
    };
    let taken = cmd
        .get_arguments()
        .find(|a| a.get_short() == Some(short))
        .map(|a| a.get_id().to_string())
        .or_else(|| {
            generated_flags(cmd)
                .iter()
                .find(|(_, s)| *s == short)
                .map(|(long, _)| long.to_string())
        });

    match taken {
        Some(first) => Err(ClapflagsError::DuplicateShorthand {
            shorthand: short,
            first,
            second: spec.name.clone(),
        }),
        None => Ok(()),
    }
}

/// Flags clap adds on its own when the command is built.
fn generated_flags(cmd: &Command) -> Vec<(&'static str, char)> {
    let mut flags = Vec::new();
    if !cmd.is_disable_help_flag_set() {
        flags.push(("help", 'h'));
    }
    let versioned = cmd.get_version().is_some() || cmd.get_long_version().is_some();
    if versioned && !cmd.is_disable_version_flag_set() {
        flags.push(("version", 'V'));
    }
    flags
}

/// The layer of flags given explicitly on the command line.
///
/// Flags missing from `matches` (a command that was never augmented) are
/// skipped.
pub fn cli_table(matches: &ArgMatches, generated: &Generated) -> Result<Table, ClapflagsError> {
    let mut table = Table::new();

    for binding in generated.bindings.iter() {
        let Some(spec) = generated.flags.lookup(&binding.flag) else {
            continue;
        };
        let present = matches.ids().any(|id| id.as_str() == binding.flag);
        if !present || matches.value_source(&binding.flag) != Some(ValueSource::CommandLine) {
            continue;
        }

        let invalid = |e: clap::parser::MatchesError| ClapflagsError::InvalidValue {
            key: binding.key.clone(),
            reason: e.to_string(),
        };
        let value = match spec.default {
            FlagValue::StringList(_) => FlagValue::StringList(
                matches
                    .try_get_many::<String>(&binding.flag)
                    .map_err(invalid)?
                    .map(|values| values.cloned().collect())
                    .unwrap_or_default(),
            ),
            _ => match matches
                .try_get_one::<FlagValue>(&binding.flag)
                .map_err(invalid)?
            {
                Some(value) => value.clone(),
                None => continue,
            },
        };

        trace!(flag = %binding.flag, value = %value, "flag given on command line");
        insert_flag_value(&mut table, &binding.key, &value)?;
    }

    Ok(table)
}

/// The explicit config file, if `--config` was given.
pub fn config_path(matches: &ArgMatches) -> Option<PathBuf> {
    matches
        .try_get_one::<PathBuf>(CONFIG_ARG)
        .ok()
        .flatten()
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{EXAMPLE_SCHEMA, SERVER_SCHEMA};
    use crate::schema::{Field, Kind, Schema};
    use crate::walker::generate;

    fn command(generated: &Generated) -> Command {
        augment(Command::new("app"), &generated.flags).unwrap()
    }

    fn parse(generated: &Generated, args: &[&str]) -> Table {
        let matches = command(generated).try_get_matches_from(args).unwrap();
        cli_table(&matches, generated).unwrap()
    }

    #[test]
    fn explicit_flags_become_a_layer() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        let table = parse(&generated, &["app", "--foo", "x", "--bar-enabled"]);
        assert_eq!(table["foo"].as_str(), Some("x"));
        assert_eq!(table["bar"]["enabled"].as_bool(), Some(true));
        assert!(table["bar"].get("exampleString").is_none());
    }

    #[test]
    fn defaults_are_not_a_layer() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        assert!(parse(&generated, &["app"]).is_empty());
    }

    #[test]
    fn shorthands_work() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        let table = parse(&generated, &["app", "-f", "y", "-e"]);
        assert_eq!(table["foo"].as_str(), Some("y"));
        assert_eq!(table["bar"]["enabled"].as_bool(), Some(true));
    }

    #[test]
    fn bool_takes_explicit_value() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        let table = parse(&generated, &["app", "--bar-enabled=F"]);
        assert_eq!(table["bar"]["enabled"].as_bool(), Some(false));
    }

    #[test]
    fn typed_values_and_lists() {
        let generated = generate(&SERVER_SCHEMA).unwrap();
        let table = parse(
            &generated,
            &[
                "app",
                "-w",
                "8",
                "--ratio",
                "0.1",
                "--tags",
                "a,b",
                "--tags",
                "c",
                "--offset=-3",
                "--tls-cert-path",
                "cert.pem",
            ],
        );
        assert_eq!(table["workers"].as_integer(), Some(8));
        assert_eq!(table["ratio"].as_float(), Some(0.1));
        assert_eq!(table["offset"].as_integer(), Some(-3));
        assert_eq!(table["tls"]["certPath"].as_str(), Some("cert.pem"));
        let tags: Vec<_> = table["tags"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(toml::Value::as_str)
            .collect();
        assert_eq!(tags, ["a", "b", "c"]);
    }

    #[test]
    fn out_of_range_value_is_rejected_by_clap() {
        let generated = generate(&SERVER_SCHEMA).unwrap();
        let result = command(&generated).try_get_matches_from(["app", "--workers", "300"]);
        assert!(result.is_err());
    }

    #[test]
    fn help_shows_usage_and_defaults() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        let help = command(&generated).render_help().to_string();
        assert!(help.contains("--bar-example-string"));
        assert!(help.contains("interesting value"));
        assert!(help.contains("[default: gopher]"));
        assert!(!help.contains("--baz"));
    }

    #[test]
    fn zero_defaults_are_not_shown() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        let arg = to_arg(generated.flags.lookup("bar-example-string").unwrap());
        assert!(arg.get_default_values().is_empty());
        let arg = to_arg(generated.flags.lookup("foo").unwrap());
        assert_eq!(arg.get_default_values()[0].to_str(), Some("gopher"));
    }

    #[test]
    fn clash_with_existing_long_is_rejected() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        let cmd = Command::new("app").arg(Arg::new("foo").long("foo"));
        let err = augment(cmd, &generated.flags).unwrap_err();
        assert!(matches!(err, ClapflagsError::DuplicateFlag(ref n) if n == "foo"));
    }

    #[test]
    fn clash_with_existing_short_is_rejected() {
        let generated = generate(&EXAMPLE_SCHEMA).unwrap();
        let cmd = Command::new("app").arg(Arg::new("verbose").short('e'));
        let err = augment(cmd, &generated.flags).unwrap_err();
        assert!(matches!(
            err,
            ClapflagsError::DuplicateShorthand { shorthand: 'e', ref first, .. } if first == "verbose"
        ));
    }

    #[test]
    fn clash_with_generated_help_short_is_rejected() {
        let generated = generate(&SHORT_H).unwrap();
        let err = augment(Command::new("app"), &generated.flags).unwrap_err();
        assert!(matches!(
            err,
            ClapflagsError::DuplicateShorthand { shorthand: 'h', ref first, .. } if first == "help"
        ));

        let cmd = Command::new("app").disable_help_flag(true);
        assert!(augment(cmd, &generated.flags).is_ok());
    }

    static SHORT_H: Schema = Schema::new(
        "ShortH",
        &[Field::tagged("host", Kind::String, "host;h;;")],
    );

    static BUILTIN_NAMES: Schema = Schema::new(
        "Builtins",
        &[
            Field::tagged("help", Kind::Bool, "help;;;"),
            Field::tagged("version", Kind::String, "version;V;;"),
        ],
    );

    #[test]
    fn clash_with_generated_help_is_rejected() {
        let generated = generate(&BUILTIN_NAMES).unwrap();
        let err = augment(Command::new("app"), &generated.flags).unwrap_err();
        assert!(matches!(err, ClapflagsError::DuplicateFlag(ref n) if n == "help"));

        let cmd = Command::new("app").disable_help_flag(true);
        let cmd = augment(cmd, &generated.flags).unwrap();
        let matches = cmd.try_get_matches_from(["app", "--help"]).unwrap();
        let table = cli_table(&matches, &generated).unwrap();
        assert_eq!(table["help"].as_bool(), Some(true));
    }

    #[test]
    fn clash_with_generated_version_needs_a_version() {
        let generated = generate(&VERSION_ONLY).unwrap();
        let cmd = augment(Command::new("app"), &generated.flags).unwrap();
        assert!(cmd.try_get_matches_from(["app", "--version", "1"]).is_ok());

        let err = augment(Command::new("app").version("1.0"), &generated.flags).unwrap_err();
        assert!(matches!(err, ClapflagsError::DuplicateFlag(ref n) if n == "version"));

        let cmd = Command::new("app").version("1.0").disable_version_flag(true);
        assert!(augment(cmd, &generated.flags).is_ok());
    }

    static VERSION_ONLY: Schema = Schema::new(
        "VersionOnly",
        &[Field::tagged("release", Kind::String, "version;;;")],
    );

    static SHORT_V: Schema = Schema::new(
        "ShortV",
        &[Field::tagged("verbose", Kind::Bool, "verbose;V;;")],
    );

    #[test]
    fn clash_with_generated_version_short_is_rejected() {
        let generated = generate(&SHORT_V).unwrap();
        assert!(augment(Command::new("app"), &generated.flags).is_ok());

        let err = augment(Command::new("app").version("1.0"), &generated.flags).unwrap_err();
        assert!(matches!(
            err,
            ClapflagsError::DuplicateShorthand { shorthand: 'V', ref first, .. } if first == "version"
        ));
    }

    #[test]
    fn config_arg_is_read() {
        let cmd = Command::new("app").arg(config_arg("config"));
        let matches = cmd
            .clone()
            .try_get_matches_from(["app", "--config", "x.toml"])
            .unwrap();
        assert_eq!(config_path(&matches), Some(PathBuf::from("x.toml")));
        let matches = cmd.try_get_matches_from(["app"]).unwrap();
        assert_eq!(config_path(&matches), None);
    }
}
