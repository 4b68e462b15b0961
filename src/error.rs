use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClapflagsError {
    #[error("Invalid default '{literal}' for flag '--{flag}' ({kind}): {reason}")]
    InvalidDefault {
        flag: String,
        kind: &'static str,
        literal: String,
        reason: String,
    },

    #[error("Flag '--{flag}' has kind '{kind}', which cannot be used as a flag")]
    UnsupportedKind { flag: String, kind: &'static str },

    #[error("Invalid shorthand '{shorthand}' for field '{field}': expected a single character other than '-'")]
    InvalidShorthand { field: String, shorthand: String },

    #[error("Invalid name '{name}' for field '{field}': names cannot contain '.'")]
    InvalidName { field: String, name: String },

    #[error("Flag '--{0}' is defined more than once")]
    DuplicateFlag(String),

    #[error("Shorthand '-{shorthand}' is used by both '--{first}' and '--{second}'")]
    DuplicateShorthand {
        shorthand: char,
        first: String,
        second: String,
    },

    #[error("Field path '{path}' does not match schema '{schema}'")]
    PathMismatch { path: String, schema: &'static str },

    #[error("Field path '{0}' refers to a field excluded from flag generation")]
    ExcludedField(String),

    #[error("Invalid configuration:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in config file")]
    UnknownKeys(Vec<ClapflagsError>),

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid value in environment variable {var}: {reason}")]
    InvalidEnv { var: String, reason: String },

    #[error("App name is required: call .app_name() on the builder")]
    AppNameRequired,
}

/// Failure to turn a string into a typed flag value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("{0}")]
    Malformed(String),

    #[error("kind '{0}' cannot be parsed from a string")]
    Unsupported(&'static str),
}
