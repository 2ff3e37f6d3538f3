//! `logtriage` - CI build-log failure triage
//!
//! Turns raw build-log text into a classified failure report in three stages:
//!
//! 1. [`ingest`] reads lines from a source and normalizes each one into a
//!    structured record (timestamp, level, message, line number).
//! 2. [`extract`] selects the failure-relevant records: failure-level lines,
//!    stack-trace fragments, and unparsed lines carrying an exception
//!    signature, binding stray exception fragments to the nearby failure
//!    line they belong to.
//! 3. [`classify`] assigns each extracted failure a category from a fixed
//!    taxonomy via an ordered rule table, with a confidence score and the
//!    identifier of the rule that fired.
//!
//! [`report`] renders the classified failures and run statistics for humans
//! (console) or machines (JSON). The pipeline is synchronous and per-record
//! fault isolated: malformed input degrades to documented sentinel values,
//! it never aborts a run.

pub mod classify;
pub mod extract;
pub mod ingest;
pub mod report;

#[cfg(test)]
mod tests {
    use crate::classify::{Category, Classifier};
    use crate::extract::Extractor;
    use crate::ingest::normalizer::normalize;
    use crate::ingest::source::{FileSource, Source};
    use std::io::Write;

    #[test]
    fn end_to_end_database_and_oom() {
        let lines: Vec<String> = [
            "[2024-01-15 10:30:45] ERROR: Database connection failed",
            "[2024-01-15 10:31:00] INFO: ok",
            "[2024-01-15 10:32:00] FATAL: OutOfMemory",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        let records = normalize(&lines);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, "2024-01-15 10:30:45");
        assert_eq!(records[0].level, "ERROR");

        let mut extractor = Extractor::new();
        let failures = extractor.extract(&records);
        assert_eq!(failures.len(), 2);
        let stats = extractor.stats();
        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.extracted_count, 2);
        assert_eq!(stats.filtered_noise_count, 1);

        let mut classifier = Classifier::new();
        let classified = classifier.classify_batch(&failures);
        assert_eq!(classified[0].category, Category::InfrastructureError);
        assert_eq!(classified[1].category, Category::ResourceError);
        assert!(classified.iter().all(|c| c.confidence >= 0.5));
    }

    #[test]
    fn file_source_feeds_pipeline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[2024-01-15 10:30:45] ERROR: build failed").unwrap();
        writeln!(file, "[2024-01-15 10:30:46] INFO: done").unwrap();
        file.flush().unwrap();

        let mut source = FileSource::new(file.path());
        let lines = source.read().unwrap();
        assert_eq!(lines.len(), 2);

        let records = normalize(&lines);
        let mut extractor = Extractor::new();
        let failures = extractor.extract(&records);
        assert_eq!(failures.len(), 1);

        let mut classifier = Classifier::new();
        let classified = classifier.classify_batch(&failures);
        assert_eq!(classified[0].category, Category::BuildError);
    }
}
