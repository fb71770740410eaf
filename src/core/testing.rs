//! Shared helpers for unit tests that need a real asset executable.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Write an executable shell script that plays the role of an asset.
#[cfg(unix)]
pub fn fake_asset(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write fake asset");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("mark fake asset executable");
    path
}
