use std::env;
use std::path::PathBuf;

use anyhow::{bail, Result};

fn dirs_home() -> Option<PathBuf> {
    env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| env::var("USERPROFILE").ok().map(PathBuf::from))
}

/// Get the data directory for hirecal (config file lives here)
pub fn data_dir() -> Result<PathBuf> {
    let dir = if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("hirecal")
    } else if let Some(home) = dirs_home() {
        if cfg!(target_os = "macos") {
            home.join("Library").join("Application Support").join("hirecal")
        } else {
            // Linux (including WSL)
            home.join(".local").join("share").join("hirecal")
        }
    } else {
        bail!("Cannot determine data directory");
    };

    Ok(dir)
}
