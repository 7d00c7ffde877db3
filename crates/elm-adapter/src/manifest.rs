//! Project and compiler manifest types.
//!
//! Two optional JSON manifests feed configuration resolution: the project
//! manifest (`elm-package.json`) supplying repository, version, and module
//! layout metadata, and the compiler manifest (`node_modules/elm/package.json`)
//! supplying the installed compiler's version.
//!
//! Loading never raises. [`load`] returns a three-way [`ManifestLoad`] so a
//! missing file is distinguishable from malformed content; callers substitute
//! named defaults for both.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

/// Repository assumed when no project manifest supplies one.
pub(crate) const DEFAULT_REPOSITORY: &str = "https://github.com/user/project.git";

/// Project version assumed when no project manifest supplies one.
pub(crate) const DEFAULT_PROJECT_VERSION: &str = "2.0.0";

/// Compiler version assumed when no compiler manifest supplies one.
pub(crate) const DEFAULT_COMPILER_VERSION: &str = "0.18.0";

/// The project manifest (`elm-package.json`).
///
/// Unrecognized keys are ignored; recognized keys that are absent fall back
/// field-by-field to the same defaults used when the whole file is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectManifest {
    /// Repository URL, e.g. `https://github.com/user/project.git`.
    #[serde(default = "default_repository")]
    pub repository: String,
    /// Project version string.
    #[serde(default = "default_project_version")]
    pub version: String,
    /// Modules whose compiled output is produced standalone.
    #[serde(rename = "exposed-modules", default)]
    pub exposed_modules: Vec<String>,
    /// Ordered directories searched for module sources.
    #[serde(rename = "source-directories", default)]
    pub source_directories: Vec<String>,
}

impl Default for ProjectManifest {
    fn default() -> Self {
        Self {
            repository: default_repository(),
            version: default_project_version(),
            exposed_modules: Vec::new(),
            source_directories: Vec::new(),
        }
    }
}

/// The compiler manifest (`node_modules/elm/package.json`).
///
/// Only the version is of interest; it feeds the build-artifact path.
#[derive(Debug, Clone, Deserialize)]
pub struct CompilerManifest {
    /// Installed compiler version.
    #[serde(default = "default_compiler_version")]
    pub version: String,
}

impl Default for CompilerManifest {
    fn default() -> Self {
        Self {
            version: default_compiler_version(),
        }
    }
}

fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_owned()
}

fn default_project_version() -> String {
    DEFAULT_PROJECT_VERSION.to_owned()
}

fn default_compiler_version() -> String {
    DEFAULT_COMPILER_VERSION.to_owned()
}

/// Outcome of loading an optional manifest file.
#[derive(Debug)]
pub enum ManifestLoad<T> {
    /// The file existed and parsed.
    Loaded(T),
    /// The file does not exist.
    Missing,
    /// The file exists but could not be read or parsed.
    Malformed(String),
}

impl<T> ManifestLoad<T> {
    /// The loaded value, if any.
    pub fn into_loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Missing | Self::Malformed(_) => None,
        }
    }
}

/// Load an optional JSON manifest.
///
/// Never raises: a missing file yields [`ManifestLoad::Missing`] (logged at
/// debug), anything unreadable or unparseable yields
/// [`ManifestLoad::Malformed`] (logged as a warning).
pub fn load<T: serde::de::DeserializeOwned>(path: &Path) -> ManifestLoad<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "manifest not found, using defaults");
            return ManifestLoad::Missing;
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "manifest unreadable, using defaults");
            return ManifestLoad::Malformed(e.to_string());
        },
    };

    match serde_json::from_str(&content) {
        Ok(value) => {
            debug!(path = %path.display(), "loaded manifest");
            ManifestLoad::Loaded(value)
        },
        Err(e) => {
            warn!(path = %path.display(), error = %e, "manifest malformed, using defaults");
            ManifestLoad::Malformed(e.to_string())
        },
    }
}
