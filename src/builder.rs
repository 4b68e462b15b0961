use std::marker::PhantomData;
use std::path::PathBuf;

use clap::{ArgMatches, Command};
use serde::Deserialize;
use tracing::debug;

use crate::cli;
use crate::error::ClapflagsError;
use crate::file::{self, SourceFile};
use crate::flags::FlagSet;
use crate::path;
use crate::resolve::{self, ResolveInput};
use crate::schema::Settings;
use crate::types::{SearchMode, SearchPath};
use crate::validate;
use crate::walker::{self, Bindings, Generated};

/// Entry point for deriving flags from a config type.
pub struct Clapflags;

impl Clapflags {
    pub fn builder<C: Settings>() -> ClapflagsBuilder<C> {
        ClapflagsBuilder::new()
    }
}

/// Builder for the flag set and the layers behind it.
///
/// Only [`app_name`](Self::app_name) is required; it names the config file,
/// the platform directory and the environment prefix.
pub struct ClapflagsBuilder<C: Settings> {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    search_mode: SearchMode,
    env_prefix: Option<String>,
    env_enabled: bool,
    strict: bool,
    config_flag: Option<String>,
    _phantom: PhantomData<C>,
}

impl<C: Settings> ClapflagsBuilder<C> {
    fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            search_mode: SearchMode::default(),
            env_prefix: None,
            env_enabled: true,
            strict: true,
            config_flag: Some(cli::CONFIG_ARG.to_string()),
            _phantom: PhantomData,
        }
    }

    /// Set the application name. Derives:
    /// - `file_name` → `"{app_name}.toml"`
    /// - `search_paths` → `[SearchPath::Platform]`
    /// - `env_prefix` → `"{APP_NAME}"` (uppercased)
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"{app_name}.toml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths. The last entry has the highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Append a search path, starting from `[Platform]` if none were set.
    pub fn add_search_path(mut self, path: SearchPath) -> Self {
        self.search_paths
            .get_or_insert_with(|| vec![SearchPath::Platform])
            .push(path);
        self
    }

    pub fn search_mode(mut self, mode: SearchMode) -> Self {
        self.search_mode = mode;
        self
    }

    /// Override the environment variable prefix (default: uppercased `app_name`).
    /// An empty prefix means variables are named by key alone.
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable the environment layer entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Reject unknown keys in config files (default: `true`).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Rename the explicit config file flag (default: `--config`).
    pub fn config_flag(mut self, long: &str) -> Self {
        self.config_flag = Some(long.to_string());
        self
    }

    /// Don't add an explicit config file flag.
    pub fn no_config_flag(mut self) -> Self {
        self.config_flag = None;
        self
    }

    fn effective_app_name(&self) -> Result<&str, ClapflagsError> {
        self.app_name
            .as_deref()
            .ok_or(ClapflagsError::AppNameRequired)
    }

    fn effective_file_name(&self) -> Result<String, ClapflagsError> {
        if let Some(name) = &self.file_name {
            return Ok(name.clone());
        }
        Ok(format!("{}.toml", self.effective_app_name()?))
    }

    fn effective_search_paths(&self) -> Vec<SearchPath> {
        self.search_paths
            .clone()
            .unwrap_or_else(|| vec![SearchPath::Platform])
    }

    fn effective_env_prefix(&self) -> Result<Option<String>, ClapflagsError> {
        if !self.env_enabled {
            return Ok(None);
        }
        if let Some(prefix) = &self.env_prefix {
            return Ok(Some(prefix.clone()));
        }
        Ok(Some(self.effective_app_name()?.to_uppercase()))
    }

    /// Walk the schema and freeze the settings.
    ///
    /// Fails on a missing app name or on any schema error (malformed default,
    /// unsupported kind, duplicate flag).
    pub fn build(self) -> Result<ConfigFlags<C>, ClapflagsError> {
        let app_name = self.effective_app_name()?.to_string();
        let file_name = self.effective_file_name()?;
        let env_prefix = self.effective_env_prefix()?;
        let generated = walker::generate(C::SCHEMA)?;
        debug!(
            schema = C::SCHEMA.name,
            flags = generated.flags.len(),
            "generated flags"
        );

        Ok(ConfigFlags {
            generated,
            app_name,
            file_name,
            search_paths: self.effective_search_paths(),
            search_mode: self.search_mode,
            env_prefix,
            strict: self.strict,
            config_flag: self.config_flag,
            _phantom: PhantomData,
        })
    }
}

/// A config type's flags, bound to the layers that resolve it.
pub struct ConfigFlags<C: Settings> {
    generated: Generated,
    app_name: String,
    file_name: String,
    search_paths: Vec<SearchPath>,
    search_mode: SearchMode,
    env_prefix: Option<String>,
    strict: bool,
    config_flag: Option<String>,
    _phantom: PhantomData<C>,
}

impl<C: Settings> ConfigFlags<C> {
    pub fn flags(&self) -> &FlagSet {
        &self.generated.flags
    }

    pub fn bindings(&self) -> &Bindings {
        &self.generated.bindings
    }

    /// Add the config file flag and every generated flag to `cmd`.
    pub fn command(&self, cmd: Command) -> Result<Command, ClapflagsError> {
        let cmd = match &self.config_flag {
            Some(long) => {
                let taken = cmd.get_arguments().any(|a| a.get_id() == cli::CONFIG_ARG)
                    || cli::long_taken(&cmd, long);
                if taken {
                    return Err(ClapflagsError::DuplicateFlag(long.clone()));
                }
                cmd.arg(cli::config_arg(long))
            }
            None => cmd,
        };
        cli::augment(cmd, &self.generated.flags)
    }

    /// The file named by the config file flag, if given.
    pub fn config_file(&self, matches: &ArgMatches) -> Option<PathBuf> {
        self.config_flag.as_ref().and_then(|_| cli::config_path(matches))
    }

    fn files(&self, matches: &ArgMatches) -> Result<Vec<SourceFile>, ClapflagsError> {
        match self.config_file(matches) {
            Some(path) => Ok(vec![file::load_explicit(&path)?]),
            None => file::load_config_files(
                &self.search_paths,
                &self.file_name,
                &self.app_name,
                self.search_mode,
            ),
        }
    }

    /// Merge every layer into `C` without running validation rules.
    pub fn resolve(&self, matches: &ArgMatches) -> Result<C, ClapflagsError>
    where
        C::Layer: for<'de> Deserialize<'de>,
    {
        let input = ResolveInput {
            files: self.files(matches)?,
            env_vars: std::env::vars().collect(),
            env_prefix: self.env_prefix.clone(),
            cli: cli::cli_table(matches, &self.generated)?,
            strict: self.strict,
        };
        resolve::resolve(&self.generated, input)
    }

    /// Resolve and validate, reporting rule violations by flag name.
    pub fn load(&self, matches: &ArgMatches) -> Result<C, ClapflagsError>
    where
        C::Layer: for<'de> Deserialize<'de>,
    {
        let config = self.resolve(matches)?;
        validate::validate(&config)?;
        Ok(config)
    }

    /// The `--flag` token for a structural field path.
    pub fn flag_token(&self, path: &[&str]) -> Result<String, ClapflagsError> {
        path::flag_token(C::SCHEMA, path)
    }
}
