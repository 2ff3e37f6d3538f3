//! Report rendering. The pipeline makes no formatting decisions; everything
//! presentation-related lives here.

use crate::classify::{Category, ClassifiedRecord};
use crate::extract::ExtractStats;
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};

/// Maximum characters of a message shown in the detailed listing.
const PREVIEW_CHARS: usize = 400;
/// Maximum lines of a merged multi-line message shown in a preview.
const PREVIEW_LINES: usize = 3;

/// Renders classified failures and run statistics as a console report.
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Full report: banner, summary, category breakdown, detailed failures.
    pub fn render(
        &mut self,
        failures: &[ClassifiedRecord],
        stats: &ExtractStats,
    ) -> io::Result<()> {
        self.banner()?;
        if failures.is_empty() {
            writeln!(self.out, "No failures found in log.")?;
            return Ok(());
        }
        self.summary(failures, stats)?;
        self.details(failures)
    }

    /// Summary and category breakdown only, no per-failure listing.
    pub fn render_summary_only(
        &mut self,
        failures: &[ClassifiedRecord],
        stats: &ExtractStats,
    ) -> io::Result<()> {
        self.banner()?;
        if failures.is_empty() {
            writeln!(self.out, "No failures found in log.")?;
            return Ok(());
        }
        self.summary(failures, stats)
    }

    fn banner(&mut self) -> io::Result<()> {
        let rule = "=".repeat(80);
        writeln!(self.out)?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{:^80}", "L O G T R I A G E")?;
        writeln!(self.out, "{rule}")?;
        Ok(())
    }

    fn summary(
        &mut self,
        failures: &[ClassifiedRecord],
        stats: &ExtractStats,
    ) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", "=".repeat(80))?;
        writeln!(self.out, "FAILURE SUMMARY")?;
        writeln!(self.out, "{}", "=".repeat(80))?;
        writeln!(self.out, "Total log lines: {}", stats.total_lines)?;
        writeln!(self.out, "Failures extracted: {}", stats.extracted_count)?;
        writeln!(self.out, "Noise filtered: {}", stats.filtered_noise_count)?;
        writeln!(self.out)?;

        writeln!(self.out, "Category Breakdown:")?;
        writeln!(self.out, "{}", "-".repeat(80))?;
        for (category, count) in category_counts(failures) {
            writeln!(self.out, "  {:30} : {count}", category.as_str())?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn details(&mut self, failures: &[ClassifiedRecord]) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(80))?;
        writeln!(self.out, "DETAILED FAILURES")?;
        writeln!(self.out, "{}", "=".repeat(80))?;

        for (idx, failure) in failures.iter().enumerate() {
            let confidence_pct = format!("{:.0}%", failure.confidence * 100.0);
            writeln!(
                self.out,
                "\n{}. Line {:<4} | [{:<8}] | {:<25} | Confidence: {confidence_pct:>4}",
                idx + 1,
                failure.line_number,
                failure.level,
                failure.category.as_str(),
            )?;
            writeln!(self.out, "   {}", message_preview(&failure.message))?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

/// Category histogram sorted by count descending, name ascending on ties,
/// so the output is deterministic.
fn category_counts(failures: &[ClassifiedRecord]) -> Vec<(Category, usize)> {
    let mut counts: HashMap<Category, usize> = HashMap::new();
    for failure in failures {
        *counts.entry(failure.category).or_insert(0) += 1;
    }
    let mut sorted: Vec<(Category, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    sorted
}

/// Preview for the detailed listing: multi-line merged messages show their
/// first few lines, single-line messages get a character cap.
fn message_preview(message: &str) -> String {
    let lines: Vec<&str> = message.split('\n').collect();
    if lines.len() > 1 {
        let mut preview_lines: Vec<String> = Vec::new();
        let mut total_chars = 0;
        let mut truncated = false;
        for line in lines.iter().take(PREVIEW_LINES) {
            let len = line.chars().count();
            if total_chars + len <= PREVIEW_CHARS {
                preview_lines.push((*line).to_string());
                total_chars += len + 1;
            } else {
                let remaining = PREVIEW_CHARS.saturating_sub(total_chars);
                // A tiny tail is not worth showing.
                if remaining > 20 {
                    let cut: String = line.chars().take(remaining).collect();
                    preview_lines.push(format!("{cut}..."));
                }
                truncated = true;
                break;
            }
        }
        let mut preview = preview_lines.join("\n   ");
        if truncated || lines.len() > PREVIEW_LINES || total_chars >= PREVIEW_CHARS {
            preview.push_str("\n   ...");
        }
        preview
    } else if message.chars().count() > PREVIEW_CHARS {
        let cut: String = message.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        message.to_string()
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a ExtractStats,
    failures: &'a [ClassifiedRecord],
}

/// Machine-readable report: `{ "summary": ..., "failures": [...] }`.
pub fn render_json<W: Write>(
    mut out: W,
    failures: &[ClassifiedRecord],
    stats: &ExtractStats,
) -> io::Result<()> {
    let report = JsonReport {
        summary: stats,
        failures,
    };
    serde_json::to_writer_pretty(&mut out, &report)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::NO_RULE;

    fn classified(category: Category, line_number: usize, message: &str) -> ClassifiedRecord {
        ClassifiedRecord {
            category,
            line_number,
            message: message.to_string(),
            level: "ERROR".to_string(),
            confidence: 0.87,
            matched_rule: NO_RULE,
        }
    }

    fn stats() -> ExtractStats {
        ExtractStats {
            total_lines: 10,
            extracted_count: 2,
            filtered_noise_count: 8,
        }
    }

    #[test]
    fn empty_report_says_so() {
        let mut buffer = Vec::new();
        ConsoleReport::new(&mut buffer).render(&[], &stats()).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("No failures found in log."));
        assert!(!text.contains("FAILURE SUMMARY"));
    }

    #[test]
    fn full_report_contains_summary_and_details() {
        let failures = vec![
            classified(Category::BuildError, 3, "build failed"),
            classified(Category::BuildError, 7, "build aborted with error"),
            classified(Category::Timeout, 9, "operation timed out"),
        ];
        let mut buffer = Vec::new();
        ConsoleReport::new(&mut buffer)
            .render(&failures, &stats())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("Total log lines: 10"));
        assert!(text.contains("Failures extracted: 2"));
        assert!(text.contains("DETAILED FAILURES"));
        assert!(text.contains("Confidence:  87%"));
        // Build Error (2) sorts before Timeout (1).
        let build = text.find("Build Error").unwrap();
        let timeout = text.find("Timeout").unwrap();
        assert!(build < timeout);
    }

    #[test]
    fn summary_only_omits_details() {
        let failures = vec![classified(Category::Other, 1, "boom")];
        let mut buffer = Vec::new();
        ConsoleReport::new(&mut buffer)
            .render_summary_only(&failures, &stats())
            .unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("FAILURE SUMMARY"));
        assert!(!text.contains("DETAILED FAILURES"));
    }

    #[test]
    fn multiline_preview_shows_first_lines() {
        let message = "first\nsecond\nthird\nfourth";
        let preview = message_preview(message);
        assert!(preview.contains("first"));
        assert!(preview.contains("third"));
        assert!(!preview.contains("fourth"));
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn long_single_line_is_capped() {
        let message = "x".repeat(500);
        let preview = message_preview(&message);
        assert_eq!(preview.chars().count(), 403);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn json_report_shape() {
        let failures = vec![classified(Category::DatabaseError, 4, "db down")];
        let mut buffer = Vec::new();
        render_json(&mut buffer, &failures, &stats()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["summary"]["total_lines"], 10);
        assert_eq!(value["failures"][0]["category"], "Database Error");
        assert_eq!(value["failures"][0]["line_number"], 4);
    }
}
