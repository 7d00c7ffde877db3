//! Module identity resolution.
//!
//! A module name is derived, never stored: the first configured source
//! directory that is a string-prefix of the file path is stripped, the
//! file extension is dropped, and the remaining directory components and
//! file stem are re-joined with `/`. The result is only ever used as a
//! lookup key against the configured exposed modules.

use std::fmt;
use std::path::{Path, PathBuf};

/// A slash-separated Elm module identity, e.g. `"Main"` or `"Page/Login"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleName(String);

impl ModuleName {
    /// Wrap an already-derived module name.
    ///
    /// Normally names come out of [`module_name`]; this exists for callers
    /// that compile sources outside any configured directory (e.g. the
    /// built-in error-display unit).
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative path of the JavaScript artifact produced for this module,
    /// e.g. `Page/Login.js` for `Page/Login`.
    #[must_use]
    pub fn artifact_file(&self) -> PathBuf {
        PathBuf::from(format!("{}.js", self.0))
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the module identity for `path` against the configured source
/// directories.
///
/// The first directory (in configured order) that is a string-prefix of
/// the path wins; order is significant and caller-controlled. Returns
/// `None` when no configured directory matches.
#[must_use]
pub fn module_name(path: &Path, source_directories: &[PathBuf]) -> Option<ModuleName> {
    let path_str = path.to_string_lossy();

    let remainder = source_directories.iter().find_map(|dir| {
        let dir_str = dir.to_string_lossy();
        path_str.strip_prefix(dir_str.as_ref()).map(str::to_owned)
    })?;

    let remainder = Path::new(&remainder);
    let stem = remainder.file_stem()?.to_string_lossy();

    let joined = match remainder.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            format!("{}/{stem}", parent.display())
        },
        _ => stem.into_owned(),
    };

    let module = joined.trim_start_matches('/');
    if module.is_empty() {
        return None;
    }
    Some(ModuleName(module.to_owned()))
}
