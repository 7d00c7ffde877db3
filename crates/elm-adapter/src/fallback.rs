//! Fallback artifact generation.
//!
//! When a compile fails and error rendering is enabled, the adapter swaps
//! the missing artifact for a runnable one that displays the failure text
//! at runtime instead of aborting the build. The default strategy compiles
//! a fixed built-in error-display module and appends generated boot code
//! carrying the failure text.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::compiler::{CompileRequest, CompileStrategy, ElmMake};
use crate::error::AdapterResult;
use crate::resolve::ModuleName;

/// Source of the built-in error-display module, compiled by [`ErrorPage`].
const ERROR_DISPLAY: &str = include_str!("error_display.elm");

/// Background color applied to the page while the error is shown.
const ERROR_BACKGROUND: &str = "#990000";

/// Everything a fallback strategy needs to render a substitute artifact.
#[derive(Debug, Clone)]
pub struct FallbackRequest {
    /// Captured failure text (the compiler's standard error, typically).
    pub failure: String,
    /// The same invocation parameters the failed compile used.
    pub parameters: Vec<String>,
}

/// Substitute artifact generation for a failed compile.
#[async_trait]
pub trait FallbackStrategy: Send + Sync {
    /// Render a runnable artifact that surfaces `request.failure`.
    ///
    /// # Errors
    ///
    /// A failure here is not handled further by the adapter; it propagates
    /// to the caller unchanged (no double fallback).
    async fn render(&self, request: FallbackRequest) -> AdapterResult<String>;
}

/// Default fallback: compile the built-in error-display module, then append
/// boot code that paints the error background and passes the failure text
/// to the module as its flag.
pub struct ErrorPage {
    compiler: Arc<dyn CompileStrategy>,
}

impl Default for ErrorPage {
    fn default() -> Self {
        Self {
            compiler: Arc::new(ElmMake::new()),
        }
    }
}

impl ErrorPage {
    /// Fallback compiling through the default `elm-make` strategy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fallback compiling through a caller-supplied strategy.
    #[must_use]
    pub fn with_compiler(compiler: Arc<dyn CompileStrategy>) -> Self {
        Self { compiler }
    }
}

#[async_trait]
impl FallbackStrategy for ErrorPage {
    async fn render(&self, request: FallbackRequest) -> AdapterResult<String> {
        let scratch = tempfile::tempdir()?;
        let source = scratch.path().join("Errors.elm");
        std::fs::write(&source, ERROR_DISPLAY)?;

        debug!(scratch = %scratch.path().display(), "compiling error display");
        let compiled = self
            .compiler
            .compile(CompileRequest {
                source,
                module: ModuleName::new("Errors"),
                output_dir: scratch.path().to_path_buf(),
                parameters: request.parameters,
            })
            .await?;

        Ok(format!("{compiled}\n{}", boot_code(&request.failure)))
    }
}

/// Generated code that boots the compiled error display with the failure
/// text. Backticks are escaped so the text embeds in a template literal.
fn boot_code(failure: &str) -> String {
    let escaped = failure.replace('`', "\\`");
    format!(
        "(function () {{
    document.addEventListener('DOMContentLoaded', function () {{
        document.body.style.backgroundColor = '{ERROR_BACKGROUND}';
        Elm.Errors.fullscreen(`{escaped}`);
    }});
}})();
"
    )
}
