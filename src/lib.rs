//! Command-line flags derived from a configuration schema.
//!
//! Declare the shape of your configuration once, as a static [`Schema`], and
//! clapflags turns every leaf into a typed `--flag` with a shorthand, a
//! default, and help text. The same schema binds each flag to a hierarchical
//! config key, so flags, config files and environment variables all feed one
//! typed struct. When validation rules fail, messages name the flag the user
//! would type (`--bar-enabled is required`), not the Rust field.
//!
//! ```ignore
//! static BAR: Schema = Schema::new("Bar", &[
//!     Field::tagged("example", Kind::String, "exampleString;;;interesting value"),
//!     Field::leaf("enabled", "enabled", Kind::Bool).short('e').default("false"),
//! ]);
//! static CONFIG: Schema = Schema::new("Config", &[
//!     Field::tagged("foo", Kind::String, "foo;f;gopher;something"),
//!     Field::tagged("bar", Kind::Nested(&BAR), "bar"),
//!     Field::skip("baz", Kind::String),
//! ]);
//!
//! impl Settings for Config {
//!     const SCHEMA: &'static Schema = &CONFIG;
//! }
//!
//! fn main() -> ExitCode {
//!     Clapflags::builder::<Config>()
//!         .app_name("myapp")
//!         .execute(Command::new("myapp"), |config, _| run(config))
//! }
//! ```
//!
//! That yields `--foo/-f` (default `gopher`), `--bar-example-string` and
//! `--bar-enabled/-e`, bound to the keys `foo`, `bar.exampleString` and
//! `bar.enabled`. `baz` is excluded.
//!
//! # Naming
//!
//! A key is the dot-joined chain of declared names. A flag name is the key
//! with dots replaced by hyphens and each segment kebab-cased:
//! `bar.exampleString` becomes `bar-example-string`.
//!
//! # Metadata
//!
//! Fields carry metadata in one of two dialects. A compact tag,
//! `name;shorthand;default;usage`, with trailing parts optional; or keyed
//! builder calls on [`Field::leaf`]. A name of `-` (or an empty name)
//! excludes the field.
//!
//! # Layer precedence
//!
//! ```text
//! Flag defaults         from the schema
//!        ↑ overridden by
//! Config files          search paths in order, later paths win
//!        ↑ overridden by
//! Environment vars      MYAPP_BAR_EXAMPLESTRING
//!        ↑ overridden by
//! Command line          only flags the user actually typed
//! ```
//!
//! Fields without a flag take their `#[config(default)]` from confique.
//! `--config <FILE>` replaces file discovery with a single file, which must
//! exist.
//!
//! # Environment variables
//!
//! With prefix `MYAPP`, a binding is read from the variable named by its key,
//! uppercased with `.` turned into `_` (`MYAPP_BAR_EXAMPLESTRING`). Fields
//! declared with keyed metadata also accept the name derived from the flag
//! (`MYAPP_BAR_ENABLED`, `MYAPP_TLS_CERT_PATH`), checked first. Values parse
//! with the flag's kind; empty values count as unset.
//!
//! # Validation
//!
//! The config struct derives `validator::Validate`. Violations are resolved
//! against the schema and reported as one [`ClapflagsError::Validation`]
//! listing every distinct message. Templates are keyed by rule code; override
//! or add them in [`Settings::pre_validate`].

pub mod error;
pub mod types;

mod builder;
pub mod cli;
mod cmd;
mod env;
mod file;
pub mod flags;
mod layer;
pub mod naming;
pub mod path;
mod resolve;
pub mod schema;
mod strict;
pub mod validate;
pub mod walker;

#[cfg(test)]
mod fixtures;

pub use builder::{Clapflags, ClapflagsBuilder, ConfigFlags};
pub use error::{ClapflagsError, ValueError};
pub use flags::{FlagSet, FlagSpec, FlagValue, register_flag};
pub use naming::{join_key, kebab};
pub use path::{flag_token, resolve_flag_name};
pub use schema::{EXCLUDED, Field, Kind, Schema, Settings};
pub use types::{Boundary, SearchMode, SearchPath};
pub use validate::{Messages, hostname_port};
pub use walker::{Binding, Bindings, Generated, generate, generate_flags};
