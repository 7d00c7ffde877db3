//! Configuration resolution.
//!
//! Defaults come from two optional manifests (project and compiler), each
//! falling back to named constants when missing or malformed. A
//! caller-supplied [`ConfigOverlay`] is then applied on top: caller values
//! win unconditionally, full replacement per key, no deep merge.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use url::Url;

use crate::compiler::{CompileStrategy, ElmMake};
use crate::fallback::{ErrorPage, FallbackStrategy};
use crate::manifest::{self, CompilerManifest, ProjectManifest};

/// Root directory for build artifacts, relative to the project.
const BUILD_ARTIFACTS_ROOT: &str = "elm-stuff/build-artifacts";

/// Subprocess arguments used when no override is supplied.
const DEFAULT_PARAMETERS: &[&str] = &["--warn", "--yes"];

/// Project manifest file name.
const PROJECT_MANIFEST: &str = "elm-package.json";

/// Compiler manifest path, relative to the project root.
const COMPILER_MANIFEST: &str = "node_modules/elm/package.json";

/// Resolved adapter configuration.
///
/// Immutable once constructed; `compile` calls share it without locking.
#[derive(Clone)]
pub struct AdapterConfig {
    /// Strategy invoked for designated entry points.
    pub compile: Arc<dyn CompileStrategy>,
    /// Strategy invoked when the main one fails and `render_errors` is set.
    pub fallback_compile: Arc<dyn FallbackStrategy>,
    /// Ordered arguments passed to the subprocess ahead of computed ones.
    pub parameters: Vec<String>,
    /// Build-artifact directory. Derived deterministically from compiler
    /// version, repository location, and project version unless overridden.
    pub output: PathBuf,
    /// Substitute a rendered error artifact instead of failing the build.
    pub render_errors: bool,
    /// Module names whose compiled output is produced standalone.
    pub exposed_modules: Vec<String>,
    /// Ordered directory prefixes searched for module sources.
    pub source_directories: Vec<PathBuf>,
}

impl Default for AdapterConfig {
    /// Hard-coded defaults: the configuration resolved when neither
    /// manifest is present.
    fn default() -> Self {
        Self::from_manifests(&ProjectManifest::default(), &CompilerManifest::default())
    }
}

impl fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("parameters", &self.parameters)
            .field("output", &self.output)
            .field("render_errors", &self.render_errors)
            .field("exposed_modules", &self.exposed_modules)
            .field("source_directories", &self.source_directories)
            .finish_non_exhaustive()
    }
}

impl AdapterConfig {
    /// Resolve the configuration for a project.
    ///
    /// Loads the two optional manifests under `project_root`, computes
    /// defaults, then applies `overlay`. Never fails: manifest problems
    /// fall back to named defaults (see [`crate::manifest::load`]).
    #[must_use]
    pub fn resolve(project_root: &Path, overlay: ConfigOverlay) -> Self {
        let project = manifest::load::<ProjectManifest>(&project_root.join(PROJECT_MANIFEST))
            .into_loaded()
            .unwrap_or_default();
        let compiler = manifest::load::<CompilerManifest>(&project_root.join(COMPILER_MANIFEST))
            .into_loaded()
            .unwrap_or_default();

        let mut config = Self::from_manifests(&project, &compiler);
        config.apply(overlay);
        config
    }

    /// Build the default configuration from loaded (or defaulted) manifests.
    fn from_manifests(project: &ProjectManifest, compiler: &CompilerManifest) -> Self {
        Self {
            compile: Arc::new(ElmMake::new()),
            fallback_compile: Arc::new(ErrorPage::new()),
            parameters: DEFAULT_PARAMETERS.iter().map(|s| (*s).to_owned()).collect(),
            output: derive_output(&compiler.version, &project.repository, &project.version),
            render_errors: false,
            exposed_modules: project.exposed_modules.clone(),
            source_directories: project
                .source_directories
                .iter()
                .map(PathBuf::from)
                .collect(),
        }
    }

    /// Apply a caller overlay: each supplied key replaces the computed value
    /// wholesale.
    fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(compile) = overlay.compile {
            self.compile = compile;
        }
        if let Some(fallback_compile) = overlay.fallback_compile {
            self.fallback_compile = fallback_compile;
        }
        if let Some(parameters) = overlay.parameters {
            self.parameters = parameters;
        }
        if let Some(output) = overlay.output {
            self.output = output;
        }
        if let Some(render_errors) = overlay.render_errors {
            self.render_errors = render_errors;
        }
        if let Some(exposed_modules) = overlay.exposed_modules {
            self.exposed_modules = exposed_modules;
        }
        if let Some(source_directories) = overlay.source_directories {
            self.source_directories = source_directories;
        }
    }

    /// Whether `module` is a designated entry point.
    #[must_use]
    pub fn is_exposed(&self, module: &str) -> bool {
        self.exposed_modules.iter().any(|m| m == module)
    }
}

/// Caller-supplied configuration fragment: an arbitrary subset of the
/// recognized keys.
#[derive(Default)]
pub struct ConfigOverlay {
    /// Replacement compile strategy.
    pub compile: Option<Arc<dyn CompileStrategy>>,
    /// Replacement fallback strategy.
    pub fallback_compile: Option<Arc<dyn FallbackStrategy>>,
    /// Replacement subprocess arguments.
    pub parameters: Option<Vec<String>>,
    /// Replacement build-artifact directory.
    pub output: Option<PathBuf>,
    /// Replacement error-rendering flag.
    pub render_errors: Option<bool>,
    /// Replacement entry-point set.
    pub exposed_modules: Option<Vec<String>>,
    /// Replacement source-directory list.
    pub source_directories: Option<Vec<PathBuf>>,
}

impl fmt::Debug for ConfigOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverlay")
            .field("parameters", &self.parameters)
            .field("output", &self.output)
            .field("render_errors", &self.render_errors)
            .field("exposed_modules", &self.exposed_modules)
            .field("source_directories", &self.source_directories)
            .finish_non_exhaustive()
    }
}

/// Derive the default build-artifact directory:
/// `elm-stuff/build-artifacts/<compiler>/<owner...>/<name>/<version>`,
/// where owner and name come from the repository URL path (leading slash
/// dropped, `.git` suffix stripped from the name).
fn derive_output(compiler_version: &str, repository: &str, project_version: &str) -> PathBuf {
    let mut output = PathBuf::from(BUILD_ARTIFACTS_ROOT).join(compiler_version);
    for segment in repository_segments(repository) {
        output.push(segment);
    }
    output.join(project_version)
}

/// Owner path and repository name from a repository URL. Falls back to the
/// default repository's segments when the URL does not parse; manifest
/// values must never fail resolution.
fn repository_segments(repository: &str) -> Vec<String> {
    parse_repository(repository).unwrap_or_else(|| {
        tracing::warn!(repository, "repository URL not parseable, using default");
        parse_repository(manifest::DEFAULT_REPOSITORY)
            .unwrap_or_default()
    })
}

fn parse_repository(repository: &str) -> Option<Vec<String>> {
    let url = Url::parse(repository).ok()?;
    let segments: Vec<&str> = url.path_segments()?.filter(|s| !s.is_empty()).collect();
    let (name, owners) = segments.split_last()?;
    let name = name.strip_suffix(".git").unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    Some(
        owners
            .iter()
            .map(|s| (*s).to_owned())
            .chain(std::iter::once(name.to_owned()))
            .collect(),
    )
}
