//! Construct the rsync command line and the set of tolerated exit codes.

use anyhow::{Context, Result};

/// rsync exit code 24, RERR_VANISHED in errcode.h: files vanished on the
/// sender side during the transfer. Happens routinely when a live maildir
/// or browser profile is being synced, so it is always tolerated.
pub const VANISHED_FILES: i32 = 24;

/// Options that shape the generated rsync command line.
#[derive(Debug, Default)]
pub struct RsyncOptions<'a> {
    /// Remap both owner and group of the destination to this name.
    pub dest_user_group: Option<&'a str>,
    /// Patterns passed through as `--exclude=…`.
    pub excludes: &'a [String],
    /// Extra rsync arguments as one shell-quoted string.
    pub rsync_args: Option<&'a str>,
}

/// Build the full rsync command line, program name included.
pub fn build_rsync_command(src: &str, dest: &str, opts: &RsyncOptions) -> Result<Vec<String>> {
    let mut command: Vec<String> = ["rsync", "-av", "--delete", "--stats"]
        .iter()
        .map(ToString::to_string)
        .collect();

    if let Some(user_group) = opts.dest_user_group {
        // A remote destination hands the argument to the login shell on
        // the other side, where a bare `*` may be glob-expanded (zsh:
        // "no matches found: --usermap=*:smb").
        let escape_star = if dest.contains(':') { "\\" } else { "" };
        command.push(format!("--usermap={escape_star}*:{user_group}"));
        command.push(format!("--groupmap={escape_star}*:{user_group}"));
    }

    for exclude in opts.excludes {
        command.push(format!("--exclude={exclude}"));
    }

    if let Some(args) = opts.rsync_args {
        command.extend(
            shell_words::split(args)
                .with_context(|| format!("Could not split --rsync-args value: {args}"))?,
        );
    }

    command.push(src.to_string());
    command.push(dest.to_string());
    Ok(command)
}

/// Parse the `--ignore-exit-codes` value (comma-separated integers).
///
/// [`VANISHED_FILES`] is always part of the resulting set.
pub fn ignore_exit_codes(raw: Option<&str>) -> Result<Vec<i32>> {
    let mut codes: Vec<i32> = Vec::new();
    if let Some(raw) = raw {
        for part in raw.split(',') {
            let part = part.trim();
            codes.push(
                part.parse()
                    .with_context(|| format!("Invalid exit code in --ignore-exit-codes: {part}"))?,
            );
        }
    }
    if !codes.contains(&VANISHED_FILES) {
        codes.push(VANISHED_FILES);
    }
    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(src: &str, dest: &str, opts: &RsyncOptions) -> Vec<String> {
        build_rsync_command(src, dest, opts).unwrap()
    }

    #[test]
    fn minimal_command() {
        assert_eq!(
            base("tmp1", "tmp2", &RsyncOptions::default()),
            ["rsync", "-av", "--delete", "--stats", "tmp1", "tmp2"]
        );
    }

    #[test]
    fn user_group_remap_local_dest() {
        let opts = RsyncOptions {
            dest_user_group: Some("smb"),
            ..Default::default()
        };
        assert_eq!(
            base("tmp1", "/data/backup", &opts),
            [
                "rsync",
                "-av",
                "--delete",
                "--stats",
                "--usermap=*:smb",
                "--groupmap=*:smb",
                "tmp1",
                "/data/backup"
            ]
        );
    }

    #[test]
    fn user_group_remap_remote_dest_escapes_star() {
        let opts = RsyncOptions {
            dest_user_group: Some("smb"),
            ..Default::default()
        };
        assert_eq!(
            base("tmp1", "nas:/data/backup", &opts),
            [
                "rsync",
                "-av",
                "--delete",
                "--stats",
                "--usermap=\\*:smb",
                "--groupmap=\\*:smb",
                "tmp1",
                "nas:/data/backup"
            ]
        );
    }

    #[test]
    fn excludes() {
        let excludes = vec!["cache".to_string(), "*.tmp".to_string()];
        let opts = RsyncOptions {
            excludes: &excludes,
            ..Default::default()
        };
        assert_eq!(
            base("a", "b", &opts),
            [
                "rsync",
                "-av",
                "--delete",
                "--stats",
                "--exclude=cache",
                "--exclude=*.tmp",
                "a",
                "b"
            ]
        );
    }

    #[test]
    fn rsync_args_are_shell_split() {
        let opts = RsyncOptions {
            rsync_args: Some("--exclude \"lol lol\""),
            ..Default::default()
        };
        assert_eq!(
            base("tmp1", "tmp2", &opts),
            [
                "rsync",
                "-av",
                "--delete",
                "--stats",
                "--exclude",
                "lol lol",
                "tmp1",
                "tmp2"
            ]
        );
    }

    #[test]
    fn ignore_codes_default() {
        assert_eq!(ignore_exit_codes(None).unwrap(), [24]);
    }

    #[test]
    fn ignore_codes_single_keeps_vanished() {
        assert_eq!(ignore_exit_codes(Some("1")).unwrap(), [1, 24]);
    }

    #[test]
    fn ignore_codes_multiple() {
        assert_eq!(ignore_exit_codes(Some("1,2,3")).unwrap(), [1, 2, 3, 24]);
    }

    #[test]
    fn ignore_codes_with_vanished_not_duplicated() {
        assert_eq!(ignore_exit_codes(Some("24,1")).unwrap(), [24, 1]);
    }

    #[test]
    fn ignore_codes_invalid() {
        assert!(ignore_exit_codes(Some("x")).is_err());
    }
}
