//! Host pipeline plugin contract and the Elm adapter implementing it.
//!
//! The pipeline hands the adapter one candidate file at a time. Designated
//! entry points are compiled through the configured strategy and come back
//! with the artifact attached; everything else resolves to `None`, still
//! consumed by the watcher but producing no artifact. Calls are independent
//! and stateless aside from the shared immutable configuration, so the host
//! may invoke them concurrently without coordination.

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::compiler::CompileRequest;
use crate::config::{AdapterConfig, ConfigOverlay};
use crate::deps;
use crate::error::{AdapterError, AdapterResult};
use crate::fallback::FallbackRequest;
use crate::resolve::{self, ModuleName};

/// The artifact kind a plugin contributes to the pipeline's asset graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactType {
    /// Script assets.
    JavaScript,
    /// Style assets.
    Stylesheet,
    /// Markup template assets.
    Template,
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::JavaScript => "javascript",
            Self::Stylesheet => "stylesheet",
            Self::Template => "template",
        })
    }
}

/// A candidate source file owned by the pipeline.
///
/// Created per source file by the host, mutated in place by the adapter on a
/// successful compile, never retained by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path as the pipeline presented it.
    pub path: PathBuf,
    /// Produced artifact text, filled in by a successful compile.
    pub data: Option<String>,
}

impl SourceFile {
    /// A candidate file with no artifact yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: None,
        }
    }
}

/// The contract the host pipeline consumes.
#[async_trait]
pub trait PipelinePlugin: Send + Sync {
    /// Which asset graph the produced artifacts join.
    fn artifact_type(&self) -> ArtifactType;

    /// File extension (without dot) of the sources this plugin handles.
    fn extension(&self) -> &'static str;

    /// Compile one candidate file.
    ///
    /// Resolves to `Some(file)` with `data` attached for a designated entry
    /// point, or `None` for anything else.
    ///
    /// # Errors
    ///
    /// Propagates the compile strategy's failure when error rendering is
    /// disabled, and any fallback failure when it is enabled.
    async fn compile(&self, file: SourceFile) -> AdapterResult<Option<SourceFile>>;

    /// Files whose changes must trigger recompilation of `file`.
    ///
    /// Empty for a file that is not a designated entry point.
    ///
    /// # Errors
    ///
    /// Fails only when a configured source directory cannot be scanned.
    async fn get_dependencies(&self, file: &SourceFile) -> AdapterResult<Vec<PathBuf>>;
}

impl fmt::Debug for dyn PipelinePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelinePlugin")
            .field("artifact_type", &self.artifact_type())
            .field("extension", &self.extension())
            .finish_non_exhaustive()
    }
}

/// The Elm compiler adapter.
///
/// Holds the resolved immutable configuration and implements
/// [`PipelinePlugin`] for `.elm` sources producing JavaScript artifacts.
#[derive(Debug, Clone)]
pub struct ElmCompiler {
    config: AdapterConfig,
}

impl ElmCompiler {
    /// Adapter over an already-resolved configuration.
    #[must_use]
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    /// Resolve configuration for `project_root` (manifests, defaults,
    /// overlay) and build the adapter from it.
    #[must_use]
    pub fn resolve(project_root: &Path, overlay: ConfigOverlay) -> Self {
        Self::new(AdapterConfig::resolve(project_root, overlay))
    }

    /// The resolved configuration.
    #[must_use]
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Module identity for `path`, if it is a designated entry point.
    fn designated_module(&self, path: &Path) -> Option<ModuleName> {
        let module = resolve::module_name(path, &self.config.source_directories)?;
        if self.config.is_exposed(module.as_str()) {
            Some(module)
        } else {
            debug!(%module, "module not designated, skipping");
            None
        }
    }

    /// The failure text handed to the fallback: captured stderr for
    /// subprocess failures, the error display otherwise.
    fn failure_text(error: &AdapterError) -> String {
        match error {
            AdapterError::CompileFailed { stderr, .. } => stderr.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
impl PipelinePlugin for ElmCompiler {
    fn artifact_type(&self) -> ArtifactType {
        ArtifactType::JavaScript
    }

    fn extension(&self) -> &'static str {
        "elm"
    }

    async fn compile(&self, mut file: SourceFile) -> AdapterResult<Option<SourceFile>> {
        let Some(module) = self.designated_module(&file.path) else {
            return Ok(None);
        };

        let request = CompileRequest {
            source: file.path.clone(),
            module,
            output_dir: self.config.output.clone(),
            parameters: self.config.parameters.clone(),
        };

        match self.config.compile.compile(request).await {
            Ok(artifact) => {
                file.data = Some(artifact);
                Ok(Some(file))
            },
            Err(failure) if self.config.render_errors => {
                warn!(path = %file.path.display(), error = %failure, "rendering compile failure");
                let artifact = self
                    .config
                    .fallback_compile
                    .render(FallbackRequest {
                        failure: Self::failure_text(&failure),
                        parameters: self.config.parameters.clone(),
                    })
                    .await?;
                file.data = Some(artifact);
                Ok(Some(file))
            },
            Err(failure) => Err(failure),
        }
    }

    async fn get_dependencies(&self, file: &SourceFile) -> AdapterResult<Vec<PathBuf>> {
        if self.designated_module(&file.path).is_none() {
            return Ok(Vec::new());
        }
        deps::source_files(&self.config.source_directories, self.extension())
    }
}
