//! Subprocess helpers: run external commands, capture or discard output.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::process::{Command, Stdio};

/// Captured outcome of a finished child process.
pub struct Captured {
    /// Exit code; `-1` when the process was terminated by a signal.
    pub code: i32,
    pub stdout: String,
}

/// Run a command and capture its output.
///
/// stderr is logged line by line at warn level instead of being
/// interleaved into the captured stream. Exit-code policy is the
/// caller's business; only a failure to launch is an error here.
pub fn run_captured(cmd: &str, args: &[String]) -> Result<Captured> {
    debug!("Running: {} {}", cmd, args.join(" "));
    let output = Command::new(cmd)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute: {} {}", cmd, args.join(" ")))?;

    for line in String::from_utf8_lossy(&output.stderr).lines() {
        warn!("{cmd} stderr: {line}");
    }

    Ok(Captured {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

/// Run a command silently, returning success/failure.
pub fn run_quiet(cmd: &str, args: &[&str]) -> bool {
    Command::new(cmd)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captured_collects_stdout() {
        let captured = run_captured("sh", &["-c".to_string(), "echo hello".to_string()]).unwrap();
        assert_eq!(captured.code, 0);
        assert_eq!(captured.stdout, "hello\n");
    }

    #[test]
    fn run_captured_reports_exit_code() {
        let captured = run_captured("sh", &["-c".to_string(), "exit 24".to_string()]).unwrap();
        assert_eq!(captured.code, 24);
    }

    #[test]
    fn run_quiet_success_and_failure() {
        assert!(run_quiet("sh", &["-c", "exit 0"]));
        assert!(!run_quiet("sh", &["-c", "exit 1"]));
    }
}
