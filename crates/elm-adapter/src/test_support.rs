//! Shared unit-test fixtures: stub compiler executables.

use std::path::{Path, PathBuf};

/// Shell stub that honors the `--output` argument: writes a marker artifact
/// to the requested path and exits 0.
const SUCCEEDING: &str = r#"#!/bin/sh
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

/// Write a stub compiler that produces an artifact and succeeds.
pub(crate) fn succeeding_compiler(dir: &Path) -> PathBuf {
    write_stub(dir, "fake-elm-make", SUCCEEDING)
}

/// Write a stub compiler that prints `stderr` and exits 1.
pub(crate) fn failing_compiler(dir: &Path, stderr: &str) -> PathBuf {
    write_stub(
        dir,
        "failing-elm-make",
        &format!("#!/bin/sh\necho \"{stderr}\" >&2\nexit 1\n"),
    )
}

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
