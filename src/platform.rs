//! State directory resolution.
//!
//! The store file has to land somewhere writable on every platform, so the
//! directory is picked from a fallback chain and probed before use.

use crate::config::APP_DIR;
use crate::store::FileStore;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the state directory with cross-platform fallback chain.
///
/// Priority order:
/// 1. Explicit override (for testing/CI)
/// 2. Home directory (~/.healthtrack)
/// 3. Platform-specific data directory (XDG on Linux, AppData on Windows)
/// 4. Current working directory (last resort)
pub fn get_state_dir(override_dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        ensure_writable(dir)?;
        return Ok(dir.clone());
    }

    if let Some(home) = home::home_dir() {
        let dir = home.join(APP_DIR);
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
        log::warn!(
            "cannot write to {}, trying fallback locations",
            dir.display()
        );
    }

    if let Some(data) = dirs::data_local_dir() {
        let dir = data.join("healthtrack");
        if ensure_writable(&dir).is_ok() {
            return Ok(dir);
        }
    }

    let dir = PathBuf::from(APP_DIR);
    ensure_writable(&dir).context(
        "Cannot create state directory in any location. \
         Check file permissions or set state.state_dir_override in config.",
    )?;
    Ok(dir)
}

/// Ensure a directory exists and is writable by the current user.
pub fn ensure_writable(dir: &PathBuf) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let test_path = dir.join(".write_test");
    fs::write(&test_path, b"test")
        .with_context(|| format!("Directory {} is not writable", dir.display()))?;

    // Cleanup can fail on Windows while a scanner holds the file
    let _ = fs::remove_file(&test_path);

    Ok(())
}

/// Open the file store in the resolved state directory.
pub fn open_store(state_dir_override: Option<&PathBuf>) -> Result<FileStore> {
    let dir = get_state_dir(state_dir_override)?;
    Ok(FileStore::in_dir(dir))
}
