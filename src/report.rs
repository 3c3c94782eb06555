//! Passive check submission to a Nagios/Icinga monitoring host.
//!
//! The transport (encryption method, password) is the business of the
//! external `send_nsca` binary and its own config file; this module only
//! renders the wire line and pipes it in. Without a configured remote
//! host the report is logged and dropped.

use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Service states in the Nagios convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Warning,
    Critical,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
        }
    }
}

/// Where to submit passive checks.
#[derive(Debug, Clone)]
pub struct NscaSettings {
    pub remote_host: String,
    pub port: Option<u16>,
    /// Path handed to `send_nsca -c`; holds password and encryption method.
    pub config: Option<PathBuf>,
}

/// One passive service check result.
#[derive(Debug)]
pub struct Report {
    pub host_name: String,
    pub service_name: String,
    pub status: Status,
    pub text_output: String,
}

impl Report {
    /// The classic send_nsca service-check line:
    /// `host<TAB>service<TAB>status<TAB>output`.
    fn wire_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\n",
            self.host_name,
            self.service_name,
            self.status.code(),
            self.text_output
        )
    }

    /// Submit this report, or only log it when no remote host is configured.
    pub fn submit(&self, settings: Option<&NscaSettings>) -> Result<()> {
        info!(
            "Report: service={} status={} output={}",
            self.service_name,
            self.status.code(),
            self.text_output
        );

        let Some(settings) = settings else {
            debug!("No monitoring host configured, report not submitted");
            return Ok(());
        };

        let mut command = Command::new("send_nsca");
        command.arg("-H").arg(&settings.remote_host);
        if let Some(port) = settings.port {
            command.arg("-p").arg(port.to_string());
        }
        if let Some(config) = &settings.config {
            command.arg("-c").arg(config);
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to execute send_nsca")?;

        child
            .stdin
            .take()
            .context("send_nsca stdin not available")?
            .write_all(self.wire_line().as_bytes())
            .context("Failed to write to send_nsca")?;

        let status = child.wait().context("Failed to wait for send_nsca")?;
        if !status.success() {
            bail!(
                "send_nsca exited with a non-zero exit code ({})",
                status.code().unwrap_or(-1)
            );
        }

        info!(
            "Submitted passive check to {} for service {}",
            settings.remote_host, self.service_name
        );
        Ok(())
    }
}
