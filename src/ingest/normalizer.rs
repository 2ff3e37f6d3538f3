use fancy_regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Level assigned to lines that match no line-format pattern.
pub const UNPARSED_LEVEL: &str = "UNPARSED";
/// Timestamp assigned when no pattern captures one.
pub const UNKNOWN_TIMESTAMP: &str = "UNKNOWN";
/// Timestamp sentinel for lines where the matcher itself faulted.
pub const PARSE_FAULT_TIMESTAMP: &str = "ERROR PARSING LOG LINE";

// Line-format patterns, most structured first. First match wins, so the
// order is load-bearing: the bracketed-level-with-timestamp form must be
// tried before the looser bracketed-level-only form.
static LINE_FORMATS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // [ERROR] 2025-01-14T09:12:03.442Z Test failed
        r"^\[(?P<level>\w+)\] (?P<timestamp>\d{4}-\d{2}-\d{2}[T\s]\d{2}:\d{2}:\d{2}[\.\d]*Z?) (?P<message>.*)",
        // [ERROR] Test failed
        r"^\[(?P<level>\w+)\] (?P<message>.*)",
        // [2024-01-15 10:30:45] ERROR: Database connection failed
        r"^\[(?P<timestamp>\d{4}[-/]\d{2}[-/]\d{2}[T\s]?\d{2}:\d{2}:\d{2}[\.\d]*[Z\s]*)\] (?P<level>\w+): (?P<message>.*)",
        // 2024-01-15 10:30:45 ERROR Database connection failed
        r"^(?P<timestamp>\d{4}-\d{2}-\d{2}[T\s]?\d{2}:\d{2}:\d{2}[\.\d]*Z?) (?P<level>\w+) (?P<message>.*)",
        // ERROR: Database connection failed
        r"^(?P<level>\w+): (?P<message>.*)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("line-format patterns are valid"))
    .collect()
});

/// One raw log line in structured form.
///
/// Every input line produces exactly one record, in input order, no drops.
/// Fields a line does not carry hold the documented sentinels rather than
/// being absent, so downstream stages never deal with missing data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedRecord {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    /// 1-based position in the original input.
    pub line_number: usize,
}

/// Normalize a batch of raw lines.
///
/// Output length always equals input length and `line_number` runs 1..=N.
pub fn normalize(lines: &[String]) -> Vec<NormalizedRecord> {
    tracing::debug!(lines = lines.len(), "normalizing log lines");
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| normalize_line(line, idx + 1))
        .collect()
}

/// Normalize a single line against the format table.
///
/// A regex-engine fault on one line yields the parse-fault record and the
/// batch continues; it never propagates.
pub fn normalize_line(line: &str, line_number: usize) -> NormalizedRecord {
    for format in LINE_FORMATS.iter() {
        match format.captures(line) {
            Ok(Some(caps)) => {
                let timestamp = caps
                    .name("timestamp")
                    .map_or(UNKNOWN_TIMESTAMP, |m| m.as_str());
                let level = caps.name("level").map_or(UNPARSED_LEVEL, |m| m.as_str());
                let message = caps
                    .name("message")
                    .map_or_else(|| line.trim(), |m| m.as_str());
                return NormalizedRecord {
                    timestamp: timestamp.to_string(),
                    level: level.to_string(),
                    message: message.to_string(),
                    line_number,
                };
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(line_number, error = %e, "log line parsing faulted");
                return NormalizedRecord {
                    timestamp: PARSE_FAULT_TIMESTAMP.to_string(),
                    level: "ERROR".to_string(),
                    message: format!("Error parsing log line: {e}"),
                    line_number,
                };
            }
        }
    }

    NormalizedRecord {
        timestamp: UNKNOWN_TIMESTAMP.to_string(),
        level: UNPARSED_LEVEL.to_string(),
        message: line.trim().to_string(),
        line_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn totality_one_record_per_line() {
        let input = lines(&[
            "[ERROR] boom",
            "",
            "   ",
            "random noise",
            "2024-01-15 10:30:45 WARN low disk",
        ]);
        let records = normalize(&input);
        assert_eq!(records.len(), input.len());
        for (idx, record) in records.iter().enumerate() {
            assert_eq!(record.line_number, idx + 1);
        }
    }

    #[test]
    fn bracketed_level_with_iso_timestamp() {
        let records = normalize(&lines(&["[ERROR] 2025-01-14T09:12:03.442Z Test failed"]));
        assert_eq!(records[0].level, "ERROR");
        assert_eq!(records[0].timestamp, "2025-01-14T09:12:03.442Z");
        assert_eq!(records[0].message, "Test failed");
    }

    #[test]
    fn pattern_priority_structured_form_wins() {
        // Matches both the level+timestamp form and the level-only form;
        // the more structured pattern must win.
        let records = normalize(&lines(&["[ERROR] 2024-01-15T10:30:45Z boom"]));
        assert_eq!(records[0].level, "ERROR");
        assert_eq!(records[0].timestamp, "2024-01-15T10:30:45Z");
        assert_eq!(records[0].message, "boom");
    }

    #[test]
    fn bracketed_level_only() {
        let records = normalize(&lines(&["[FATAL] out of memory"]));
        assert_eq!(records[0].level, "FATAL");
        assert_eq!(records[0].timestamp, "UNKNOWN");
        assert_eq!(records[0].message, "out of memory");
    }

    #[test]
    fn bracketed_timestamp_with_colon_level() {
        let records = normalize(&lines(&[
            "[2024-01-15 10:30:45] ERROR: Database connection failed",
        ]));
        assert_eq!(records[0].timestamp, "2024-01-15 10:30:45");
        assert_eq!(records[0].level, "ERROR");
        assert_eq!(records[0].message, "Database connection failed");
    }

    #[test]
    fn bare_timestamp_then_level() {
        let records = normalize(&lines(&["2024-01-15 10:30:45 ERROR connection reset"]));
        assert_eq!(records[0].timestamp, "2024-01-15 10:30:45");
        assert_eq!(records[0].level, "ERROR");
        assert_eq!(records[0].message, "connection reset");
    }

    #[test]
    fn bare_level_prefix() {
        let records = normalize(&lines(&["ERROR: something went wrong"]));
        assert_eq!(records[0].timestamp, "UNKNOWN");
        assert_eq!(records[0].level, "ERROR");
        assert_eq!(records[0].message, "something went wrong");
    }

    #[test]
    fn unmatched_line_becomes_unparsed() {
        let records = normalize(&lines(&["  ValueError: boom  "]));
        // "ValueError: boom" actually matches the bare level prefix form,
        // so use something with no colon structure.
        let records2 = normalize(&lines(&["  just some text  "]));
        assert_eq!(records2[0].level, "UNPARSED");
        assert_eq!(records2[0].timestamp, "UNKNOWN");
        assert_eq!(records2[0].message, "just some text");
        // Leading whitespace keeps the colon form from matching here too.
        assert_eq!(records[0].level, "UNPARSED");
        assert_eq!(records[0].message, "ValueError: boom");
    }

    #[test]
    fn empty_and_whitespace_lines_are_valid_input() {
        let records = normalize(&lines(&["", "\t"]));
        assert_eq!(records[0].level, "UNPARSED");
        assert_eq!(records[0].message, "");
        assert_eq!(records[1].level, "UNPARSED");
        assert_eq!(records[1].message, "");
    }
}
