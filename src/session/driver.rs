//! Native UI test driver handle
//!
//! The driver needs the sync account credentials in its environment. They
//! are bound to the driver's own command environment rather than mutated
//! into the process-wide one, so nothing outside the driver sees them.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::session::AccountCredentials;

pub const ENV_ACCOUNT_EMAIL: &str = "FXA_EMAIL";
pub const ENV_ACCOUNT_PASSWORD: &str = "FXA_PASSWORD";

/// Handle for invoking the native UI test driver
#[derive(Debug)]
pub struct Driver {
    program: String,
    log_path: PathBuf,
    env: Vec<(String, String)>,
}

impl Driver {
    pub fn new(program: &str, credentials: &AccountCredentials, log_path: &Path) -> Self {
        Self {
            program: program.to_string(),
            log_path: log_path.to_path_buf(),
            env: vec![
                (ENV_ACCOUNT_EMAIL.to_string(), credentials.email.clone()),
                (
                    ENV_ACCOUNT_PASSWORD.to_string(),
                    credentials.password.clone(),
                ),
            ],
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Environment bindings applied to every driver invocation
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Build a ready-to-run command with the credential bindings applied
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        command
    }
}
