//! Preflight checks run before the rsync task starts.
//!
//! Each check either logs success or records a failure message; nothing
//! is retried and no timeouts are imposed beyond what `ping` and `ssh`
//! do themselves. The caller decides afterwards whether failures abort
//! the run or merely get reported.

use anyhow::{Result, bail};
use log::{info, warn};
use std::path::Path;

use crate::runner;

/// Collects the outcomes of the requested preflight checks.
pub struct Checks {
    /// Abort with an error from [`Checks::have_passed`] instead of
    /// returning `false` when a check failed.
    raise_on_failure: bool,
    messages: Vec<String>,
    passed: bool,
}

impl Checks {
    pub fn new(raise_on_failure: bool) -> Self {
        Self {
            raise_on_failure,
            messages: Vec::new(),
            passed: true,
        }
    }

    /// All failure messages joined into one line.
    pub fn messages(&self) -> String {
        self.messages.join(" ")
    }

    fn log_fail(&mut self, message: String) {
        warn!("{message}");
        self.messages.push(message);
        self.passed = false;
    }

    /// Check that a file (or directory) exists on the local machine.
    pub fn check_file(&mut self, file_path: &str) {
        let expanded = shellexpand::tilde(file_path);
        if Path::new(expanded.as_ref()).exists() {
            info!("--check-file: The file '{file_path}' exists.");
        } else {
            self.log_fail(format!(
                "--check-file: The file '{file_path}' doesn’t exist."
            ));
        }
    }

    /// Check that a remote host answers pings.
    pub fn check_ping(&mut self, dest: &str) {
        if runner::run_quiet("ping", &["-c", "3", dest]) {
            info!("--check-ping: '{dest}' is reachable.");
        } else {
            self.log_fail(format!("--check-ping: '{dest}' is not reachable."));
        }
    }

    /// Check that an SSH login (`user@host`, `host` or a `~/.ssh/config`
    /// alias) works by running a trivial remote command.
    pub fn check_ssh_login(&mut self, ssh_host: &str) {
        if runner::run_quiet("ssh", &[ssh_host, "ls"]) {
            info!("--check-ssh-login: '{ssh_host}' is reachable.");
        } else {
            self.log_fail(format!("--check-ssh-login: '{ssh_host}' is not reachable."));
        }
    }

    /// Whether every requested check passed.
    ///
    /// With `raise_on_failure` set this errors with the joined failure
    /// messages instead of returning `false`.
    pub fn have_passed(&self) -> Result<bool> {
        if self.raise_on_failure && !self.passed {
            bail!("{}", self.messages());
        }
        Ok(self.passed)
    }
}
