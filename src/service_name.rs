//! Build a monitoring-safe service identifier from the job parameters.

use regex::Regex;

/// Format a service name usable as a Nagios or Icinga service identifier.
///
/// Joins `rsync`, the host name, the rsync source and the rsync
/// destination with underscores, then normalizes the result.
pub fn format_service_name(host_name: &str, src: &str, dest: &str) -> String {
    normalize(&format!("rsync_{host_name}_{src}_{dest}"))
}

/// Rewrite the characters host names and rsync paths typically carry
/// (`/ @ : . ~`) into dashes and collapse the resulting noise.
///
/// The rule order matters: later rules clean up artifacts of earlier
/// ones. Already-normalized strings are fixed points.
fn normalize(raw: &str) -> String {
    let specials = Regex::new(r"[/@:\.~]").expect("fixed pattern");
    let dashed_separator = Regex::new(r"-*_-*").expect("fixed pattern");
    let dash_runs = Regex::new(r"-{2,}").expect("fixed pattern");
    let underscore_runs = Regex::new(r"_{2,}").expect("fixed pattern");

    let result = specials.replace_all(raw, "-");
    let result = dashed_separator.replace_all(&result, "_");
    let result = dash_runs.replace_all(&result, "-");
    let result = underscore_runs.replace_all(&result, "_");
    let result = result.strip_suffix('-').unwrap_or(&result);
    let result = result.strip_prefix('-').unwrap_or(result);
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_characters() {
        assert_eq!(format_service_name("/@:.", "", ""), "rsync_");
    }

    #[test]
    fn dash_underscore() {
        assert_eq!(format_service_name("-_-", "", ""), "rsync_");
    }

    #[test]
    fn multiple_dashes_around_underscore() {
        assert_eq!(format_service_name("---_---", "", ""), "rsync_");
    }

    #[test]
    fn tilde() {
        assert_eq!(
            format_service_name("l~o~l", "tmp1", "tmp2"),
            "rsync_l-o-l_tmp1_tmp2"
        );
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(format_service_name("", "", ""), "rsync_");
    }

    #[test]
    fn real_world() {
        assert_eq!(
            format_service_name(
                "wnas",
                "serverway:/var/backups/mysql",
                "/data/backup/host/serverway/mysql"
            ),
            "rsync_wnas_serverway-var-backups-mysql_data-backup-host-serverway-mysql"
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            ("/@:.", "", ""),
            ("l~o~l", "tmp1", "tmp2"),
            ("wnas", "serverway:/var/backups/mysql", "/data/backup"),
            ("-_-", "", ""),
        ];
        for (host, src, dest) in inputs {
            let once = format_service_name(host, src, dest);
            assert_eq!(normalize(&once), once);
        }
    }
}
