//! Run an application with its configuration resolved.
//!
//! `execute` parses the command line, loads and validates the config, and hands
//! it to the caller's closure. Any failure along the way (schema, parse, layer,
//! rule violation, or the closure's own error) is printed to stderr and turned
//! into a non-zero [`ExitCode`]; nothing panics or exits the process.

use std::ffi::OsString;
use std::fmt::Display;
use std::process::ExitCode;

use clap::{ArgMatches, Command};
use serde::Deserialize;
use tracing::debug;

use crate::builder::{ClapflagsBuilder, ConfigFlags};
use crate::schema::Settings;

impl<C: Settings> ClapflagsBuilder<C>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    /// Build, then [`ConfigFlags::execute`]. Schema errors exit non-zero.
    pub fn execute<F, E>(self, cmd: Command, run: F) -> ExitCode
    where
        F: FnOnce(C, &ArgMatches) -> Result<(), E>,
        E: Display,
    {
        self.execute_from(cmd, std::env::args_os(), run)
    }

    /// Like [`execute`](Self::execute) with explicit arguments.
    pub fn execute_from<I, T, F, E>(self, cmd: Command, args: I, run: F) -> ExitCode
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: FnOnce(C, &ArgMatches) -> Result<(), E>,
        E: Display,
    {
        match self.build() {
            Ok(flags) => flags.execute_from(cmd, args, run),
            Err(e) => fail(&e),
        }
    }
}

impl<C: Settings> ConfigFlags<C>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    /// Parse `std::env::args_os()`, load the config and call `run` with it.
    pub fn execute<F, E>(&self, cmd: Command, run: F) -> ExitCode
    where
        F: FnOnce(C, &ArgMatches) -> Result<(), E>,
        E: Display,
    {
        self.execute_from(cmd, std::env::args_os(), run)
    }

    /// Like [`execute`](Self::execute) with explicit arguments.
    pub fn execute_from<I, T, F, E>(&self, cmd: Command, args: I, run: F) -> ExitCode
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: FnOnce(C, &ArgMatches) -> Result<(), E>,
        E: Display,
    {
        let cmd = match self.command(cmd) {
            Ok(cmd) => cmd,
            Err(e) => return fail(&e),
        };

        // Help and version requests land here too, with exit status 0.
        let matches = match cmd.try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) => {
                let _ = e.print();
                return exit_code(e.exit_code());
            }
        };

        let config = match self.load(&matches) {
            Ok(config) => config,
            Err(e) => return fail(&e),
        };

        debug!("configuration loaded, running command");
        match run(config, &matches) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => fail(&e),
        }
    }
}

fn fail(e: &dyn Display) -> ExitCode {
    eprintln!("Error: {e}");
    ExitCode::FAILURE
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code)
        .map(ExitCode::from)
        .unwrap_or(ExitCode::FAILURE)
}
