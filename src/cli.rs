use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rsync-watch")]
#[command(version)]
#[command(about = "Monitor the execution of a rsync task", long_about = None)]
pub struct Cli {
    /// The source ([[USER@]HOST:]SRC)
    pub src: String,

    /// The destination ([[USER@]HOST:]DEST)
    pub dest: String,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    pub quiet: bool,

    /// The hostname to submit to the monitoring (defaults to the machine hostname)
    #[arg(long)]
    pub host_name: Option<String>,

    /// Set both the user name and the group name of the destination to this name
    #[arg(long, value_name = "USER_GROUP_NAME")]
    pub dest_user_group: Option<String>,

    /// Exclude a pattern from the transfer (repeatable)
    #[arg(long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Extra rsync arguments, wrapped in one string,
    /// for example: --rsync-args '--exclude "this folder"'
    #[arg(long, value_name = "ARGS")]
    pub rsync_args: Option<String>,

    /// Comma-separated rsync exit codes to tolerate as non-fatal
    /// (code 24, files vanished during transfer, is always tolerated)
    #[arg(long, value_name = "CODES")]
    pub ignore_exit_codes: Option<String>,

    /// What to do when a check failed
    #[arg(long, value_enum, default_value_t = CheckAction::Skip, help_heading = "Checks")]
    pub action_check_failed: CheckAction,

    /// Check if a file exists on the local machine
    #[arg(long, value_name = "FILE_PATH", help_heading = "Checks")]
    pub check_file: Option<String>,

    /// Check if a remote host is reachable by pinging it
    #[arg(long, value_name = "DESTINATION", help_heading = "Checks")]
    pub check_ping: Option<String>,

    /// Check if a remote host is reachable over SSH
    /// (SSH_LOGIN: "root@192.168.1.1" or "example.com")
    #[arg(long, value_name = "SSH_LOGIN", help_heading = "Checks")]
    pub check_ssh_login: Option<String>,

    /// The monitoring host to submit the passive check to over NSCA
    #[arg(long, value_name = "HOST", help_heading = "Monitoring")]
    pub nsca_remote_host: Option<String>,

    /// The NSCA port on the monitoring host
    #[arg(long, value_name = "PORT", help_heading = "Monitoring")]
    pub nsca_port: Option<u16>,

    /// A send_nsca config file (password, encryption method)
    #[arg(long, value_name = "FILE", help_heading = "Monitoring")]
    pub nsca_config: Option<PathBuf>,
}

/// Action when a preflight check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CheckAction {
    /// Abort with an error before the rsync task runs
    Exception,
    /// Report the failure and exit cleanly
    Skip,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from([&["rsync-watch"][..], args].concat()).unwrap()
    }

    #[test]
    fn positionals() {
        let cli = parse(&["tmp1", "tmp2"]);
        assert_eq!(cli.src, "tmp1");
        assert_eq!(cli.dest, "tmp2");
    }

    #[test]
    fn requires_src_and_dest() {
        assert!(Cli::try_parse_from(["rsync-watch"]).is_err());
        assert!(Cli::try_parse_from(["rsync-watch", "only-src"]).is_err());
    }

    #[test]
    fn check_action_defaults_to_skip() {
        let cli = parse(&["a", "b"]);
        assert_eq!(cli.action_check_failed, CheckAction::Skip);
    }

    #[test]
    fn check_action_exception() {
        let cli = parse(&["--action-check-failed", "exception", "a", "b"]);
        assert_eq!(cli.action_check_failed, CheckAction::Exception);
    }

    #[test]
    fn repeatable_excludes() {
        let cli = parse(&["--exclude", "cache", "--exclude", "*.tmp", "a", "b"]);
        assert_eq!(cli.exclude, ["cache", "*.tmp"]);
    }

    #[test]
    fn nsca_flags() {
        let cli = parse(&[
            "--nsca-remote-host",
            "1.2.3.4",
            "--nsca-port",
            "5667",
            "a",
            "b",
        ]);
        assert_eq!(cli.nsca_remote_host.as_deref(), Some("1.2.3.4"));
        assert_eq!(cli.nsca_port, Some(5667));
    }
}
