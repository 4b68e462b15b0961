//! Config file lookup options.
//!
//! Lookup has two axes. *Discovery* turns each [`SearchPath`] into one or more
//! directories, in ascending priority. *Resolution* ([`SearchMode`]) decides
//! whether every file found is layered or only the highest-priority one is used.

use std::path::PathBuf;

/// Where to look for the config file.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory of the home directory, e.g. `Home(".myapp")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
    /// The working directory and its parents, nearest last.
    Ancestors(Boundary),
}

/// Where an [`Ancestors`](SearchPath::Ancestors) walk stops.
#[derive(Debug, Clone, PartialEq)]
pub enum Boundary {
    /// The filesystem root.
    Root,
    /// The first directory containing an entry with this name, inclusive.
    Marker(&'static str),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Layer every file found; later directories win.
    #[default]
    Merge,
    /// Use only the highest-priority file found.
    FirstMatch,
}
