//! Common test utilities for Upkeep integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A project root for integration tests
#[allow(dead_code)]
pub struct TestProject {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to the project root
    pub root: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    /// Create a new empty project root
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { temp, root }
    }

    /// Write a file in the project, creating parent directories
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.root.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    /// Write an executable script into the project
    #[cfg(unix)]
    pub fn write_script(&self, path: &str, content: &str) {
        use std::os::unix::fs::PermissionsExt;
        self.write_file(path, content);
        std::fs::set_permissions(
            self.root.join(path),
            std::fs::Permissions::from_mode(0o755),
        )
        .expect("Failed to mark script executable");
    }

    /// Command for the upkeep binary, rooted at this project
    pub fn upkeep(&self) -> Command {
        let mut cmd = Command::cargo_bin("upkeep").expect("Failed to find upkeep binary");
        cmd.arg("--root").arg(&self.root);
        cmd
    }
}
