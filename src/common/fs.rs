//! Common file system operations with unified error handling

use std::fs;
use std::path::Path;

use crate::error::{Result, UpkeepError};

/// Copy a directory recursively
pub fn copy_dir_recursive<P1, P2>(src: P1, dst: P2) -> std::io::Result<()>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let src_ref = src.as_ref();
    let dst_ref = dst.as_ref();

    if !dst_ref.exists() {
        fs::create_dir_all(dst_ref)?;
    }

    for entry in fs::read_dir(src_ref)? {
        let entry = entry?;
        let entry_path = entry.path();
        let dst_path = dst_ref.join(entry.file_name());

        if entry_path.is_dir() {
            copy_dir_recursive(&entry_path, &dst_path)?;
        } else {
            fs::copy(&entry_path, &dst_path)?;
        }
    }

    Ok(())
}

/// Read a file to a string with a path-carrying error
pub fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| UpkeepError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Write a string to a file with a path-carrying error
pub fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| UpkeepError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Write bytes to a file with a path-carrying error
pub fn write_bytes(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents).map_err(|e| UpkeepError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
