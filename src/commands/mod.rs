//! Command handlers mapping CLI arguments onto the utility entry points

pub mod bump;
pub mod completions;
pub mod plugins;
pub mod session;
pub mod sync;
pub mod version;

use std::path::PathBuf;

use normpath::PathExt;

use crate::error::Result;

/// Resolve the project root: explicit `--root` or the current directory,
/// normalized so status output and config-relative paths are stable.
pub fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match root {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let normalized = dir
        .normalize()
        .map(|np| np.into_path_buf())
        .unwrap_or(dir);
    Ok(normalized)
}
