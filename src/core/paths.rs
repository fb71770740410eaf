use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Environment variable holding an explicit asset path list
/// (platform path separator, caller order preserved).
pub const ASSETS_ENV: &str = "DISTGO_ASSETS";

/// Base distgo config directory (~/.config/distgo/ on Unix-like systems).
pub fn distgo() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected("APPDATA environment variable not set on Windows")
        })?;
        Ok(PathBuf::from(appdata).join("distgo"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected("HOME environment variable not set on Unix-like system")
        })?;
        Ok(PathBuf::from(home).join(".config").join("distgo"))
    }
}

/// Assets directory scanned when `DISTGO_ASSETS` is not set.
pub fn assets_dir() -> Result<PathBuf> {
    Ok(distgo()?.join("assets"))
}

/// Asset executable paths in discovery order.
///
/// `DISTGO_ASSETS` takes precedence and its order is preserved as-is.
/// Otherwise the assets directory is listed, sorted by file name so
/// discovery order (and with it the command tree) is reproducible.
pub fn discover_asset_paths() -> Result<Vec<PathBuf>> {
    if let Ok(list) = env::var(ASSETS_ENV) {
        return Ok(env::split_paths(&list)
            .filter(|p| !p.as_os_str().is_empty())
            .collect());
    }

    let dir = assets_dir()?;
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(&dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    Ok(paths)
}
