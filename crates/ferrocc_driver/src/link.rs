//! Linker invocation — spec.md §4.G's `Link` stage.
//!
//! Generalizes the teacher's `linker::link` (`examples/bherbruck-llts/
//! crates/llts_driver/src/linker.rs`, a single-object `cc <obj> -o <out>
//! -lm` call) to ferrocc's multi-object, optionally-shared surface
//! (spec.md §6.2 `link(objects[], output, is_shared)`). The non-shared path
//! keeps the teacher's "just invoke the system `cc`" shape (respecting
//! `$CC` if set, matching how the rest of this corpus's compilers pick a
//! linker driver); the shared-object path follows spec.md §4.G's literal
//! `clang -no-pie <obj...> -o <out> -shared` recipe, since `cc -shared`
//! alone doesn't universally disable PIE the way the spec wants.

use std::path::{Path, PathBuf};
use std::process::Command;

pub fn link(objects: &[PathBuf], output: &Path, is_shared: bool) -> Result<(), String> {
    let mut cmd = if is_shared {
        let mut c = Command::new("clang");
        c.arg("-no-pie");
        c
    } else {
        let cc = std::env::var("CC").unwrap_or_else(|_| "cc".to_string());
        Command::new(cc)
    };

    cmd.args(objects).arg("-o").arg(output);
    if is_shared {
        cmd.arg("-shared");
    }

    let status = cmd
        .status()
        .map_err(|e| format!("failed to invoke linker: {e}"))?;
    if !status.success() {
        return Err(format!("linker exited with status: {status}"));
    }
    Ok(())
}
