//! Failure extraction: selects failure-relevant records from the normalized
//! sequence and binds stray exception fragments to the failure line they
//! belong to.

use crate::ingest::normalizer::{NormalizedRecord, UNPARSED_LEVEL};
use fancy_regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static PYTHON_TRACEBACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Traceback\s*\(most recent call last\)").expect("valid pattern")
});
static PYTHON_FILE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)File\s+"[^"]+""#).expect("valid pattern"));
static MEMORY_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)at\s+0x[0-9a-f]+").expect("valid pattern"));

static JAVA_EXCEPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)java\.(lang|sql|io|util|net)\.[\w.]+(Exception|Error):").expect("valid pattern")
});
static JAVA_STACK_FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+at\s+[\w.$]+\.[\w$]+\s*\([^)]+\.(java|kt|scala|groovy):\d+\)")
        .expect("valid pattern")
});
static CAUSED_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Caused by:").expect("valid pattern"));

static EXCEPTION_TYPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\w+(Exception|Error):").expect("valid pattern"));
static AT_WITH_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+at\s+.*[/\\].*\(").expect("valid pattern"));

/// How many records back an unbound exception fragment may look for its
/// failure line, and the maximum line-number distance for the bind.
const BINDING_WINDOW: usize = 3;

fn matches(pattern: &Regex, message: &str) -> bool {
    pattern.is_match(message).unwrap_or_else(|e| {
        // Engine faults on one record degrade to "no match"; the stream
        // must keep going.
        tracing::warn!(error = %e, "stack-trace detection faulted, treating as no match");
        false
    })
}

/// True if the message looks like part of a stack trace, whatever its level.
pub fn is_stack_trace(message: &str) -> bool {
    if message.is_empty() {
        return false;
    }
    matches(&PYTHON_TRACEBACK, message)
        || matches(&PYTHON_FILE_REF, message)
        || matches(&MEMORY_ADDR, message)
        || matches(&JAVA_EXCEPTION, message)
        || matches(&JAVA_STACK_FRAME, message)
        || matches(&CAUSED_BY, message)
        || matches(&EXCEPTION_TYPE, message)
        || matches(&AT_WITH_PATH, message)
}

/// True if the message is traceback scaffolding (banner, file reference,
/// memory address) with no exception type of its own.
pub fn is_traceback_header(message: &str) -> bool {
    if message.is_empty() || matches(&EXCEPTION_TYPE, message) {
        return false;
    }
    matches(&PYTHON_TRACEBACK, message)
        || matches(&PYTHON_FILE_REF, message)
        || matches(&MEMORY_ADDR, message)
}

/// True if the message carries an exception-type signature.
pub fn has_exception_type(message: &str) -> bool {
    !message.is_empty()
        && (matches(&EXCEPTION_TYPE, message) || matches(&JAVA_EXCEPTION, message))
}

/// A normalized record judged failure-relevant.
///
/// Copied from its source record; `message` may be extended by
/// newline-joined exception fragments bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    pub timestamp: String,
    pub level: String,
    pub message: String,
    pub line_number: usize,
}

impl From<&NormalizedRecord> for ExtractedRecord {
    fn from(record: &NormalizedRecord) -> Self {
        Self {
            timestamp: record.timestamp.clone(),
            level: record.level.clone(),
            message: record.message.clone(),
            line_number: record.line_number,
        }
    }
}

/// Statistics for one `extract` call. Not cumulative across calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub total_lines: usize,
    pub extracted_count: usize,
    pub filtered_noise_count: usize,
}

/// Selects failure records from the normalized sequence.
///
/// Holds instance-local counters reset at the start of every [`extract`]
/// call, so concurrent analyses must each own their own `Extractor`.
///
/// [`extract`]: Extractor::extract
pub struct Extractor {
    failure_levels: HashSet<String>,
    total_lines_processed: usize,
    filtered_noise_count: usize,
}

impl Extractor {
    /// Extractor with the default failure-level set: ERROR, FATAL, CRITICAL.
    pub fn new() -> Self {
        Self::with_levels(["ERROR", "FATAL", "CRITICAL"])
    }

    /// Extractor with a custom failure-level set, case-normalized on entry.
    pub fn with_levels(levels: impl IntoIterator<Item = impl AsRef<str>>) -> Self {
        let failure_levels: HashSet<String> = levels
            .into_iter()
            .map(|level| level.as_ref().to_uppercase())
            .collect();
        tracing::debug!(?failure_levels, "initialized extractor");
        Self {
            failure_levels,
            total_lines_processed: 0,
            filtered_noise_count: 0,
        }
    }

    /// Extract failure records, two passes.
    ///
    /// Pass 1 binds each non-header `UNPARSED` record carrying an exception
    /// signature to the nearest preceding failure-level record within
    /// [`BINDING_WINDOW`] records and the same distance in line numbers.
    /// Pass 2 emits failure-level records (with bound fragments merged into
    /// their message), unbound exception fragments, and any other record
    /// that looks like a stack trace. Everything else is filtered noise.
    /// Bound fragments are consumed: merged into their failure record and
    /// never emitted standalone.
    pub fn extract(&mut self, records: &[NormalizedRecord]) -> Vec<ExtractedRecord> {
        self.filtered_noise_count = 0;
        self.total_lines_processed = records.len();

        // Pass 1: fragment index -> target record index.
        let mut bindings: HashMap<usize, Vec<&str>> = HashMap::new();
        let mut bound: HashSet<usize> = HashSet::new();
        for (idx, record) in records.iter().enumerate() {
            if record.level.to_uppercase() != UNPARSED_LEVEL {
                continue;
            }
            if !has_exception_type(&record.message) || is_traceback_header(&record.message) {
                continue;
            }
            for back in (idx.saturating_sub(BINDING_WINDOW)..idx).rev() {
                let prev = &records[back];
                if self.failure_levels.contains(&prev.level.to_uppercase())
                    && record.line_number.abs_diff(prev.line_number) <= BINDING_WINDOW
                {
                    bindings.entry(back).or_default().push(&record.message);
                    bound.insert(idx);
                    tracing::debug!(
                        fragment_line = record.line_number,
                        target_line = prev.line_number,
                        "bound exception fragment to failure record"
                    );
                    break;
                }
            }
        }

        // Pass 2: emit in order.
        let mut extracted = Vec::new();
        for (idx, record) in records.iter().enumerate() {
            let level = record.level.to_uppercase();
            if self.failure_levels.contains(&level) {
                let mut failure = ExtractedRecord::from(record);
                if let Some(fragments) = bindings.get(&idx) {
                    for fragment in fragments {
                        failure.message.push('\n');
                        failure.message.push_str(fragment);
                    }
                }
                extracted.push(failure);
            } else if level == UNPARSED_LEVEL {
                if has_exception_type(&record.message) && !is_traceback_header(&record.message) {
                    // Fragments merged in pass 1 are consumed, not re-emitted
                    // and not noise.
                    if !bound.contains(&idx) {
                        extracted.push(ExtractedRecord::from(record));
                    }
                } else {
                    self.filtered_noise_count += 1;
                }
            } else if is_stack_trace(&record.message) {
                extracted.push(ExtractedRecord::from(record));
            } else {
                self.filtered_noise_count += 1;
            }
        }

        tracing::info!(
            extracted = self.total_lines_processed - self.filtered_noise_count,
            total = self.total_lines_processed,
            "extraction complete"
        );
        extracted
    }

    /// Statistics for the most recent [`extract`](Extractor::extract) call.
    pub fn stats(&self) -> ExtractStats {
        ExtractStats {
            total_lines: self.total_lines_processed,
            extracted_count: self.total_lines_processed - self.filtered_noise_count,
            filtered_noise_count: self.filtered_noise_count,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
