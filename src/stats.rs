//! Parse the `--stats` summary block from captured rsync output.
//!
//! rsync prints the block as fixed English labels followed by
//! locale-formatted numbers, e.g.:
//!
//! ```text
//! Number of files: 4,928 (reg: 3,256, dir: 1,672)
//! Total file size: 4,222,882,233 bytes
//! File list generation time: 0.001 seconds
//! ```
//!
//! Depending on the locale the numbers are grouped with commas or dots,
//! and the two time values may use a decimal comma. Every labeled line
//! is mandatory except `Number of deleted files:`, which some rsync
//! 3.1.2 builds omit.

use regex::Regex;

use crate::error::StatsError;

/// The metrics extracted from one rsync run, in the order rsync prints them.
#[derive(Debug, Clone, PartialEq)]
pub struct RsyncStats {
    pub num_files: u64,
    pub num_created_files: u64,
    pub num_deleted_files: u64,
    pub num_files_transferred: u64,
    pub total_size: u64,
    pub transferred_size: u64,
    pub literal_data: u64,
    pub matched_data: u64,
    pub list_size: u64,
    pub list_generation_time: f64,
    pub list_transfer_time: f64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

impl RsyncStats {
    /// Render the metrics as space-joined `key=value` pairs for the
    /// passive check payload, in canonical order.
    pub fn performance_data(&self) -> String {
        let pairs = [
            ("num_files", self.num_files.to_string()),
            ("num_created_files", self.num_created_files.to_string()),
            ("num_deleted_files", self.num_deleted_files.to_string()),
            (
                "num_files_transferred",
                self.num_files_transferred.to_string(),
            ),
            ("total_size", self.total_size.to_string()),
            ("transferred_size", self.transferred_size.to_string()),
            ("literal_data", self.literal_data.to_string()),
            ("matched_data", self.matched_data.to_string()),
            ("list_size", self.list_size.to_string()),
            (
                "list_generation_time",
                format_seconds(self.list_generation_time),
            ),
            (
                "list_transfer_time",
                format_seconds(self.list_transfer_time),
            ),
            ("bytes_sent", self.bytes_sent.to_string()),
            ("bytes_received", self.bytes_received.to_string()),
        ];

        pairs
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render a seconds value so whole numbers keep one decimal place
/// (`11.0`, not `11`), matching the payload format monitoring graphs
/// were built against.
fn format_seconds(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// Normalize a grouped integer numeral by deleting every `,` and `.`.
///
/// Integers in rsync stats output never carry a fractional part, so both
/// characters can only be thousands separators here.
fn parse_grouped_int(raw: &str) -> Option<u64> {
    raw.replace([',', '.'], "").parse().ok()
}

/// Normalize a seconds numeral: a decimal comma becomes a decimal point.
///
/// Unlike [`parse_grouped_int`] this must keep the decimal indicator, so
/// only the comma is rewritten. Do not fold the two rules into one, the
/// asymmetry is what keeps both locale conventions correct.
fn parse_seconds(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}

/// What follows the captured numeral on the stats line.
#[derive(Clone, Copy)]
enum Tail {
    /// Nothing anchored; the line may continue (e.g. `(reg: …, dir: …)`).
    Open,
    /// End of line.
    Eol,
    /// ` bytes` then end of line.
    Bytes,
    /// ` seconds` then end of line.
    Seconds,
}

struct Matcher<'a> {
    stdout: &'a str,
}

impl<'a> Matcher<'a> {
    fn new(stdout: &'a str) -> Self {
        Self { stdout }
    }

    /// Locate `label: <numeral>` at a line start and return the raw numeral,
    /// or `None` when no line matches.
    fn capture(&self, label: &str, tail: Tail) -> Option<&'a str> {
        let mut pattern = format!(r"(?m)^{}: ([\d,\.]*)", regex::escape(label));
        pattern.push_str(match tail {
            Tail::Open => "",
            Tail::Eol => r"\r?$",
            Tail::Bytes => r" bytes\r?$",
            Tail::Seconds => r" seconds\r?$",
        });
        let re = Regex::new(&pattern).expect("stats patterns are built from fixed labels");
        re.captures(self.stdout)
            .map(|captures| captures.get(1).map_or("", |m| m.as_str()))
    }

    /// A mandatory integer field: missing line or unparseable numeral
    /// fails with the expected-line template for this field.
    fn int(&self, label: &str, tail: Tail, template: &'static str) -> Result<u64, StatsError> {
        self.capture(label, tail)
            .and_then(parse_grouped_int)
            .ok_or(StatsError::StatsNotFound { expected: template })
    }

    /// The one optional integer field: an absent line yields the default
    /// instead of an error.
    fn int_or(
        &self,
        label: &str,
        tail: Tail,
        template: &'static str,
        default: u64,
    ) -> Result<u64, StatsError> {
        match self.capture(label, tail) {
            None => Ok(default),
            Some(raw) => {
                parse_grouped_int(raw).ok_or(StatsError::StatsNotFound { expected: template })
            }
        }
    }

    /// A mandatory floating-point seconds field.
    fn seconds(&self, label: &str, template: &'static str) -> Result<f64, StatsError> {
        self.capture(label, Tail::Seconds)
            .and_then(parse_seconds)
            .ok_or(StatsError::StatsNotFound { expected: template })
    }
}

/// Extract all thirteen metrics from the captured stdout of a finished
/// rsync run.
///
/// Fails fast: the first mandatory line that cannot be located aborts the
/// parse with a [`StatsError`] carrying the exact line shape that was
/// expected, so a format change in a new rsync release is recognizable
/// from the error message alone.
pub fn parse_stats(stdout: &str) -> Result<RsyncStats, StatsError> {
    let m = Matcher::new(stdout);

    Ok(RsyncStats {
        num_files: m.int(
            "Number of files",
            Tail::Open,
            "Number of files: X,XXX (reg: X,XXX, dir: X,XXX)",
        )?,
        num_created_files: m.int(
            "Number of created files",
            Tail::Open,
            "Number of created files: X,XXX (reg: X,XXX, dir: X,XXX)",
        )?,
        // Missing on some rsync 3.1.2 builds, deliberately not an error.
        num_deleted_files: m.int_or(
            "Number of deleted files",
            Tail::Open,
            "Number of deleted files: X,XXX (reg: X,XXX, dir: X,XXX)",
            0,
        )?,
        num_files_transferred: m.int(
            "Number of regular files transferred",
            Tail::Eol,
            "Number of regular files transferred: X,XXX",
        )?,
        total_size: m.int(
            "Total file size",
            Tail::Bytes,
            "Total file size: X,XXX bytes",
        )?,
        transferred_size: m.int(
            "Total transferred file size",
            Tail::Bytes,
            "Total transferred file size: X,XXX bytes",
        )?,
        literal_data: m.int("Literal data", Tail::Bytes, "Literal data: X,XXX bytes")?,
        matched_data: m.int("Matched data", Tail::Bytes, "Matched data: X,XXX bytes")?,
        list_size: m.int("File list size", Tail::Eol, "File list size: X,XXX")?,
        list_generation_time: m.seconds(
            "File list generation time",
            "File list generation time: X.XXX seconds",
        )?,
        list_transfer_time: m.seconds(
            "File list transfer time",
            "File list transfer time: X.XXX seconds",
        )?,
        bytes_sent: m.int("Total bytes sent", Tail::Eol, "Total bytes sent: X,XXX")?,
        bytes_received: m.int(
            "Total bytes received",
            Tail::Eol,
            "Total bytes received: X,XXX",
        )?,
    })
}
