//! End-to-end adapter flow against stub compiler executables.
//!
//! The stubs stand in for `elm-make`: the succeeding one honors `--output`
//! and writes a marker artifact, the failing one prints a diagnostic to
//! stderr and exits 1. Everything else (configuration resolution, module
//! designation, subprocess invocation, artifact read-back, fallback
//! rendering) is the real code path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use elm_adapter::{
    ConfigOverlay, ElmCompiler, ElmMake, ErrorPage, PipelinePlugin, SourceFile,
};

const SUCCEEDING_STUB: &str = r#"#!/bin/sh
out=""
prev=""
for arg in "$@"; do
    if [ "$prev" = "--output" ]; then
        out="$arg"
    fi
    prev="$arg"
done
mkdir -p "$(dirname "$out")"
printf 'COMPILED %s' "$out" > "$out"
"#;

const FAILING_STUB: &str = "#!/bin/sh\necho 'SYNTAX PROBLEM: expected `then`' >&2\nexit 1\n";

fn write_stub(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }
    path
}

/// A project tree with one exposed module, one submodule, and manifests.
fn project(dir: &Path) {
    let src = dir.join("src");
    std::fs::create_dir_all(src.join("Page")).unwrap();
    std::fs::write(src.join("Main.elm"), "module Main exposing (main)\n").unwrap();
    std::fs::write(src.join("Page/Login.elm"), "module Page.Login exposing (view)\n").unwrap();

    std::fs::write(
        dir.join("elm-package.json"),
        format!(
            r#"{{
                "repository": "https://github.com/acme/app.git",
                "version": "1.0.0",
                "exposed-modules": ["Main"],
                "source-directories": ["{}"]
            }}"#,
            src.display()
        ),
    )
    .unwrap();
}

#[tokio::test]
async fn compiles_an_entry_point_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path());
    let stub = write_stub(dir.path(), "fake-elm-make", SUCCEEDING_STUB);

    let plugin = ElmCompiler::resolve(
        dir.path(),
        ConfigOverlay {
            compile: Some(Arc::new(ElmMake::with_binary(&stub))),
            output: Some(dir.path().join("artifacts")),
            ..ConfigOverlay::default()
        },
    );

    let file = plugin
        .compile(SourceFile::new(dir.path().join("src/Main.elm")))
        .await
        .unwrap()
        .expect("Main is a designated entry point");

    let artifact = dir.path().join("artifacts/Main.js");
    assert!(artifact.exists(), "compiler should write to --output path");
    assert_eq!(file.data.unwrap(), std::fs::read_to_string(artifact).unwrap());
}

#[tokio::test]
async fn undesignated_files_produce_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path());
    let stub = write_stub(dir.path(), "fake-elm-make", SUCCEEDING_STUB);

    let plugin = ElmCompiler::resolve(
        dir.path(),
        ConfigOverlay {
            compile: Some(Arc::new(ElmMake::with_binary(&stub))),
            ..ConfigOverlay::default()
        },
    );

    let result = plugin
        .compile(SourceFile::new(dir.path().join("src/Page/Login.elm")))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn failed_compile_propagates_without_error_rendering() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path());
    let stub = write_stub(dir.path(), "failing-elm-make", FAILING_STUB);

    let plugin = ElmCompiler::resolve(
        dir.path(),
        ConfigOverlay {
            compile: Some(Arc::new(ElmMake::with_binary(&stub))),
            ..ConfigOverlay::default()
        },
    );

    let err = plugin
        .compile(SourceFile::new(dir.path().join("src/Main.elm")))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("SYNTAX PROBLEM"));
}

#[tokio::test]
async fn failed_compile_renders_an_error_artifact_when_enabled() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path());
    let failing = write_stub(dir.path(), "failing-elm-make", FAILING_STUB);
    let succeeding = write_stub(dir.path(), "fake-elm-make", SUCCEEDING_STUB);

    let plugin = ElmCompiler::resolve(
        dir.path(),
        ConfigOverlay {
            compile: Some(Arc::new(ElmMake::with_binary(&failing))),
            fallback_compile: Some(Arc::new(ErrorPage::with_compiler(Arc::new(
                ElmMake::with_binary(&succeeding),
            )))),
            render_errors: Some(true),
            ..ConfigOverlay::default()
        },
    );

    let file = plugin
        .compile(SourceFile::new(dir.path().join("src/Main.elm")))
        .await
        .unwrap()
        .expect("fallback should produce an artifact");
    let data = file.data.unwrap();

    // Compiled error display plus generated boot code carrying the
    // diagnostic, backticks escaped for the template literal.
    assert!(data.contains("COMPILED"));
    assert!(data.contains("Elm.Errors.fullscreen(`SYNTAX PROBLEM: expected \\`then\\``)"));
}

#[tokio::test]
async fn dependencies_cover_the_whole_source_set() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path());
    let stub = write_stub(dir.path(), "fake-elm-make", SUCCEEDING_STUB);

    let plugin = ElmCompiler::resolve(
        dir.path(),
        ConfigOverlay {
            compile: Some(Arc::new(ElmMake::with_binary(&stub))),
            ..ConfigOverlay::default()
        },
    );

    let deps = plugin
        .get_dependencies(&SourceFile::new(dir.path().join("src/Main.elm")))
        .await
        .unwrap();
    assert_eq!(
        deps,
        vec![
            dir.path().join("src/Main.elm"),
            dir.path().join("src/Page/Login.elm"),
        ]
    );

    let none = plugin
        .get_dependencies(&SourceFile::new(dir.path().join("src/Page/Login.elm")))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn manifest_feeds_the_artifact_location() {
    let dir = tempfile::tempdir().unwrap();
    project(dir.path());

    let plugin = ElmCompiler::resolve(dir.path(), ConfigOverlay::default());
    assert_eq!(
        plugin.config().output,
        PathBuf::from("elm-stuff/build-artifacts/0.18.0/acme/app/1.0.0")
    );
}
