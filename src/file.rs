//! Config file discovery and loading.
//!
//! Search paths are expanded into a priority-ascending directory list, each
//! directory is probed for the config file name, and the result is filtered
//! by [`SearchMode`]. A file missing from a search directory is skipped; an
//! explicit `--config` file that is missing is an error.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, trace};

use crate::error::ClapflagsError;
use crate::types::{Boundary, SearchMode, SearchPath};

/// A config file read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub content: String,
}

/// Directories for one search path, ascending priority.
///
/// Paths that can't be resolved on this machine (no home directory, say)
/// expand to nothing.
pub fn search_dirs(sp: &SearchPath, app_name: &str, cwd: Option<&Path>) -> Vec<PathBuf> {
    match sp {
        SearchPath::Platform => directories::ProjectDirs::from("", "", app_name)
            .map(|proj| proj.config_dir().to_path_buf())
            .into_iter()
            .collect(),
        SearchPath::Home(subdir) => directories::UserDirs::new()
            .map(|user| user.home_dir().join(subdir))
            .into_iter()
            .collect(),
        SearchPath::Cwd => cwd.map(Path::to_path_buf).into_iter().collect(),
        SearchPath::Path(p) => vec![p.clone()],
        SearchPath::Ancestors(boundary) => match cwd {
            Some(start) => ancestors(start, boundary),
            None => Vec::new(),
        },
    }
}

/// `start` and its parents up to `boundary`, shallowest first.
pub fn ancestors(start: &Path, boundary: &Boundary) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    for dir in start.ancestors() {
        dirs.push(dir.to_path_buf());
        if let Boundary::Marker(name) = boundary
            && dir.join(name).exists()
        {
            break;
        }
    }
    dirs.reverse();
    dirs
}

/// Expand every search path against `cwd`, keeping list order.
pub fn expand(search_paths: &[SearchPath], app_name: &str, cwd: Option<&Path>) -> Vec<PathBuf> {
    search_paths
        .iter()
        .flat_map(|sp| search_dirs(sp, app_name, cwd))
        .collect()
}

/// Find and read config files, lowest priority first.
pub fn load_config_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
    mode: SearchMode,
) -> Result<Vec<SourceFile>, ClapflagsError> {
    let cwd = std::env::current_dir().ok();
    let dirs = expand(search_paths, app_name, cwd.as_deref());
    trace!(?dirs, file_name, "searching for config files");
    load_from(&dirs, file_name, mode)
}

/// Read `file_name` from each of `dirs` according to `mode`.
pub fn load_from(
    dirs: &[PathBuf],
    file_name: &str,
    mode: SearchMode,
) -> Result<Vec<SourceFile>, ClapflagsError> {
    let mut found = Vec::new();
    match mode {
        SearchMode::Merge => {
            for dir in dirs {
                found.extend(read_optional(&dir.join(file_name))?);
            }
        }
        SearchMode::FirstMatch => {
            for dir in dirs.iter().rev() {
                if let Some(file) = read_optional(&dir.join(file_name))? {
                    found.push(file);
                    break;
                }
            }
        }
    }
    Ok(found)
}

/// Read a config file named on the command line.
pub fn load_explicit(path: &Path) -> Result<SourceFile, ClapflagsError> {
    read_optional(path)?.ok_or_else(|| ClapflagsError::ConfigFileNotFound(path.to_path_buf()))
}

fn read_optional(path: &Path) -> Result<Option<SourceFile>, ClapflagsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            info!(path = %path.display(), "using config file");
            Ok(Some(SourceFile {
                path: path.to_path_buf(),
                content,
            }))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ClapflagsError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
