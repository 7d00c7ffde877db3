//! Asset-pipeline adapter for the external Elm compiler.
//!
//! Given a stream of candidate source files, the adapter decides per file
//! whether it is a designated entry point (listed in the project's exposed
//! modules), shells out to `elm-make` for the ones that are, reads the
//! produced JavaScript artifact back, and reports the source set the host
//! pipeline must watch for cache invalidation. Optionally a failing compile
//! is swapped for a runnable artifact that displays the error text instead
//! of aborting the build.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use elm_adapter::{ConfigOverlay, ElmCompiler, PipelinePlugin, SourceFile};
//!
//! # async fn demo() -> elm_adapter::AdapterResult<()> {
//! let plugin = ElmCompiler::resolve(Path::new("."), ConfigOverlay::default());
//!
//! match plugin.compile(SourceFile::new("src/Main.elm")).await? {
//!     Some(file) => println!("artifact: {} bytes", file.data.unwrap_or_default().len()),
//!     None => println!("not a designated entry point"),
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod compiler;
pub mod config;
pub mod error;
pub mod fallback;
pub mod manifest;
pub mod plugin;
pub mod resolve;

mod deps;
#[cfg(test)]
pub(crate) mod test_support;

pub use compiler::{COMPILER_BINARY, CompileRequest, CompileStrategy, ElmMake};
pub use config::{AdapterConfig, ConfigOverlay};
pub use error::{AdapterError, AdapterResult};
pub use fallback::{ErrorPage, FallbackRequest, FallbackStrategy};
pub use plugin::{ArtifactType, ElmCompiler, PipelinePlugin, SourceFile};
pub use resolve::ModuleName;
