//! External compiler invocation.
//!
//! The default strategy shells out to `elm-make`, which compiles a single
//! entry-point module and writes a JavaScript artifact to the path given via
//! `--output`. The subprocess runs synchronously; [`ElmMake`] wraps it in a
//! blocking task so async callers never stall a shared event loop.

use std::path::{Path, PathBuf};
use std::process::Command;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{AdapterError, AdapterResult};
use crate::resolve::ModuleName;

/// Binary name of the external compiler.
pub const COMPILER_BINARY: &str = "elm-make";

const INSTALL_HINT: &str = "https://www.npmjs.com/package/elm";

/// Everything a strategy needs to produce one artifact.
#[derive(Debug, Clone)]
pub struct CompileRequest {
    /// The entry-point source file.
    pub source: PathBuf,
    /// Module identity derived from the source path.
    pub module: ModuleName,
    /// Build-artifact directory; the artifact lands at
    /// `<output_dir>/<Module>.js`.
    pub output_dir: PathBuf,
    /// Arguments passed to the subprocess ahead of the computed ones.
    pub parameters: Vec<String>,
}

impl CompileRequest {
    /// Full path of the artifact this request produces.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(self.module.artifact_file())
    }
}

/// A process-invocation strategy for producing one artifact.
///
/// The adapter calls this for every designated entry point. Implementations
/// return the artifact text; callers attach it to the candidate file.
#[async_trait]
pub trait CompileStrategy: Send + Sync {
    /// Produce the artifact for `request`.
    ///
    /// # Errors
    ///
    /// Returns the strategy's failure unchanged; the adapter decides whether
    /// to propagate it or hand it to the fallback path.
    async fn compile(&self, request: CompileRequest) -> AdapterResult<String>;
}

/// Default strategy: invoke the external `elm-make` binary.
///
/// Arguments are `parameters ++ ["--output", <artifact>, <source>]`. On
/// success the artifact text is read back from the output path. On non-zero
/// exit the captured standard-error text is surfaced.
#[derive(Debug, Clone)]
pub struct ElmMake {
    binary: PathBuf,
}

impl Default for ElmMake {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(COMPILER_BINARY),
        }
    }
}

impl ElmMake {
    /// Strategy invoking `elm-make` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategy invoking a specific compiler binary.
    #[must_use]
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl CompileStrategy for ElmMake {
    async fn compile(&self, request: CompileRequest) -> AdapterResult<String> {
        let binary = self.binary.clone();
        tokio::task::spawn_blocking(move || invoke(&binary, &request))
            .await
            .map_err(|e| AdapterError::TaskFailed(e.to_string()))?
    }
}

/// Run the compiler synchronously and read the artifact back.
fn invoke(binary: &Path, request: &CompileRequest) -> AdapterResult<String> {
    let resolved = which::which(binary).map_err(|_| AdapterError::CompilerNotFound {
        binary: binary.display().to_string(),
        install_hint: INSTALL_HINT.to_owned(),
    })?;

    let artifact = request.artifact_path();
    debug!(
        binary = %resolved.display(),
        module = %request.module,
        source = %request.source.display(),
        artifact = %artifact.display(),
        "invoking compiler"
    );

    let output = Command::new(&resolved)
        .args(&request.parameters)
        .arg("--output")
        .arg(&artifact)
        .arg(&request.source)
        .output()?;

    if !output.status.success() {
        let status = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
        warn!(module = %request.module, status, "compiler failed");
        return Err(AdapterError::CompileFailed { status, stderr });
    }

    std::fs::read_to_string(&artifact).map_err(|source| AdapterError::ArtifactRead {
        path: artifact,
        source,
    })
}
