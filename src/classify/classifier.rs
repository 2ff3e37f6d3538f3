use super::category::Category;
use super::rules::{rule_table, Rule};
use crate::extract::ExtractedRecord;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Rule identifier reported when classification fell back to context.
pub const CONTEXT_RULE: &str = "context-based";
/// Rule identifier reported when nothing matched at all.
pub const NO_RULE: &str = "none";
/// Rule identifier reported when a record faulted and got the safe default.
pub const ERROR_RULE: &str = "error";

/// How many trailing context records the confidence boost examines.
const BOOST_WINDOW: usize = 3;
/// How many trailing context records the fallback classification examines.
const FALLBACK_WINDOW: usize = 5;
/// Sliding context window size maintained by [`Classifier::classify_batch`].
const CONTEXT_WINDOW: usize = 10;

/// A per-record classification fault.
///
/// Raised when the regex engine faults while scanning the rule table for a
/// record. Handled locally by [`Classifier::classify_batch`], which converts
/// it into the safe default classification instead of aborting the batch.
#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("rule {rule_id} faulted on line {line_number}: {source}")]
    Pattern {
        rule_id: &'static str,
        line_number: usize,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}

/// One classified failure, terminal output of the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub category: Category,
    pub line_number: usize,
    pub message: String,
    pub level: String,
    /// Heuristic certainty in [0.0, 1.0], not a probability.
    pub confidence: f64,
    pub matched_rule: &'static str,
}

/// Aggregate classification statistics since the last batch started.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifierStats {
    /// Usage count per `"<Category>:<rule_id>"` key.
    pub pattern_usage: HashMap<String, u64>,
    pub category_distribution: HashMap<Category, u64>,
    pub total_classifications: u64,
}

/// Assigns each extracted failure a category, confidence, and rule id.
///
/// Matching is deterministic and explainable: a linear scan of the ordered
/// rule table, first match wins. Confidence blends rule position (earlier =
/// more specific = higher), log-level severity, and agreement with the
/// recent context window.
pub struct Classifier {
    rules: Vec<Rule>,
    pattern_usage: HashMap<String, u64>,
    category_distribution: HashMap<Category, u64>,
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            rules: rule_table(),
            pattern_usage: HashMap::new(),
            category_distribution: HashMap::new(),
        }
    }

    /// Classify one record, optionally informed by a context window of
    /// recently extracted records (empty slice = no context).
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if the regex engine faults while scanning
    /// the rule table for this record.
    pub fn classify(
        &mut self,
        record: &ExtractedRecord,
        context: &[ExtractedRecord],
    ) -> Result<ClassifiedRecord, ClassifyError> {
        let message_lower = record.message.to_lowercase();
        let level = record.level.to_uppercase();

        let mut category = None;
        let mut confidence = 0.0_f64;
        let mut matched_rule = NO_RULE;

        for (index, rule) in self.rules.iter().enumerate() {
            let hit = rule
                .pattern
                .is_match(&message_lower)
                .map_err(|e| ClassifyError::Pattern {
                    rule_id: rule.id,
                    line_number: record.line_number,
                    source: Box::new(e),
                })?;
            if !hit {
                continue;
            }

            // Earlier rules are more specific and start with more confidence.
            let base = (1.0 - index as f64 * 0.01).max(0.5);
            let level_boost = match level.as_str() {
                "FATAL" | "CRITICAL" => 0.2,
                "ERROR" => 0.1,
                _ => 0.0,
            };
            let context_boost = self.context_boost(rule.category, context);

            category = Some(rule.category);
            confidence = (base + level_boost + context_boost).min(1.0);
            matched_rule = rule.id;
            *self
                .pattern_usage
                .entry(format!("{}:{}", rule.category, rule.id))
                .or_insert(0) += 1;
            // First match wins; the rest of the table is not consulted.
            break;
        }

        if category.is_none() && !context.is_empty() {
            if let Some(inferred) = self.classify_from_context(context) {
                category = Some(inferred);
                confidence = 0.6;
                matched_rule = CONTEXT_RULE;
            }
        }

        let category = category.unwrap_or_else(|| {
            confidence = 0.3;
            tracing::debug!(line_number = record.line_number, "no rule matched, defaulting to Other");
            Category::Other
        });

        *self.category_distribution.entry(category).or_insert(0) += 1;

        Ok(ClassifiedRecord {
            category,
            line_number: record.line_number,
            message: record.message.clone(),
            level,
            confidence: round2(confidence),
            matched_rule,
        })
    }

    /// Classify a batch, maintaining a sliding window of the last
    /// [`CONTEXT_WINDOW`] extracted records as context.
    ///
    /// A record whose classification faults gets the safe default
    /// (`Other`, confidence 0.1, rule `"error"`); the batch never aborts.
    ///
    /// Usage counters restart with each batch, mirroring the extractor's
    /// per-call statistics.
    pub fn classify_batch(&mut self, records: &[ExtractedRecord]) -> Vec<ClassifiedRecord> {
        self.pattern_usage.clear();
        self.category_distribution.clear();

        let mut classified = Vec::with_capacity(records.len());
        let mut context: Vec<ExtractedRecord> = Vec::new();

        for record in records {
            let result = match self.classify(record, &context) {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "classification faulted, using safe default");
                    *self
                        .category_distribution
                        .entry(Category::Other)
                        .or_insert(0) += 1;
                    ClassifiedRecord {
                        category: Category::Other,
                        line_number: record.line_number,
                        message: record.message.clone(),
                        level: record.level.to_uppercase(),
                        confidence: 0.1,
                        matched_rule: ERROR_RULE,
                    }
                }
            };
            classified.push(result);

            context.push(record.clone());
            if context.len() > CONTEXT_WINDOW {
                context.remove(0);
            }
        }

        classified
    }

    /// Context-agreement boost: 0.05 per record among the last
    /// [`BOOST_WINDOW`] context records that matches any rule of the
    /// candidate category, capped at 0.15. Failure clusters tend to share a
    /// category, so neighbors agreeing raises certainty.
    fn context_boost(&self, category: Category, context: &[ExtractedRecord]) -> f64 {
        if context.is_empty() {
            return 0.0;
        }
        let start = context.len().saturating_sub(BOOST_WINDOW);
        let mut matches = 0_u32;
        for ctx in &context[start..] {
            let ctx_lower = ctx.message.to_lowercase();
            let hit = self
                .rules
                .iter()
                .filter(|rule| rule.category == category)
                .any(|rule| rule.pattern.is_match(&ctx_lower).unwrap_or(false));
            if hit {
                matches += 1;
            }
        }
        (f64::from(matches) * 0.05).min(0.15)
    }

    /// Fallback when nothing matches the record itself: scan the last
    /// [`FALLBACK_WINDOW`] context records, most recent first, and adopt the
    /// category of the first rule that matches any of them.
    fn classify_from_context(&self, context: &[ExtractedRecord]) -> Option<Category> {
        let start = context.len().saturating_sub(FALLBACK_WINDOW);
        for ctx in context[start..].iter().rev() {
            let ctx_lower = ctx.message.to_lowercase();
            for rule in &self.rules {
                if rule.pattern.is_match(&ctx_lower).unwrap_or(false) {
                    return Some(rule.category);
                }
            }
        }
        None
    }

    /// Usage statistics accumulated since the last batch started (single
    /// [`classify`](Classifier::classify) calls accumulate without reset).
    pub fn stats(&self) -> ClassifierStats {
        ClassifierStats {
            pattern_usage: self.pattern_usage.clone(),
            category_distribution: self.category_distribution.clone(),
            total_classifications: self.category_distribution.values().sum(),
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(line_number: usize, level: &str, message: &str) -> ExtractedRecord {
        ExtractedRecord {
            timestamp: "UNKNOWN".to_string(),
            level: level.to_string(),
            message: message.to_string(),
            line_number,
        }
    }

    #[test]
    fn first_rule_full_confidence() {
        let mut classifier = Classifier::new();
        let record = failure(1, "UNPARSED", "junit suite failed");
        let result = classifier.classify(&record, &[]).unwrap();
        assert_eq!(result.category, Category::TestFailure);
        assert_eq!(result.matched_rule, "test_framework_error");
        // Rule index 0, no level or context boost.
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn level_boosts_confidence() {
        let mut classifier = Classifier::new();
        let plain = classifier
            .classify(&failure(1, "UNPARSED", "assertion failed"), &[])
            .unwrap();
        let error = classifier
            .classify(&failure(1, "ERROR", "assertion failed"), &[])
            .unwrap();
        // Index 1: base 0.99; ERROR adds 0.1, capped at 1.0.
        assert!((plain.confidence - 0.99).abs() < 1e-9);
        assert!((error.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn first_match_wins_over_later_rules() {
        let mut classifier = Classifier::new();
        // Matches both test_assertion_failure (TestFailure) and, later in
        // the table, nothing earlier: first match must decide.
        let result = classifier
            .classify(&failure(1, "ERROR", "test failed: assertion error"), &[])
            .unwrap();
        assert_eq!(result.category, Category::TestFailure);
        assert_eq!(result.matched_rule, "test_assertion_failure");
    }

    #[test]
    fn determinism_same_input_same_output() {
        let mut classifier = Classifier::new();
        let record = failure(7, "ERROR", "connection refused by host");
        let first = classifier.classify(&record, &[]).unwrap();
        let second = classifier.classify(&record, &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn default_fallback_is_other() {
        let mut classifier = Classifier::new();
        let result = classifier
            .classify(&failure(1, "UNPARSED", "nothing interesting here"), &[])
            .unwrap();
        assert_eq!(result.category, Category::Other);
        assert!((result.confidence - 0.3).abs() < 1e-9);
        assert_eq!(result.matched_rule, NO_RULE);
    }

    #[test]
    fn context_fallback_adopts_neighbor_category() {
        let mut classifier = Classifier::new();
        let context = vec![failure(1, "ERROR", "assertion failed in spec")];
        let result = classifier
            .classify(&failure(2, "ERROR", "nothing interesting here"), &context)
            .unwrap();
        assert_eq!(result.category, Category::TestFailure);
        assert!((result.confidence - 0.6).abs() < 1e-9);
        assert_eq!(result.matched_rule, CONTEXT_RULE);
    }

    #[test]
    fn context_boost_rewards_same_category_neighbors() {
        let mut classifier = Classifier::new();
        let record = failure(3, "UNPARSED", "assertion failed");
        let bare = classifier.classify(&record, &[]).unwrap();
        let context = vec![
            failure(1, "ERROR", "pytest run failed"),
            failure(2, "ERROR", "test suite exploded with error"),
        ];
        let boosted = classifier.classify(&record, &context).unwrap();
        // Two agreeing neighbors add 0.10; 0.99 + 0.10 caps at 1.0.
        assert!((bare.confidence - 0.99).abs() < 1e-9);
        assert!((boosted.confidence - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn confidence_always_within_bounds() {
        let mut classifier = Classifier::new();
        let messages = [
            "junit suite failed",
            "OutOfMemory",
            "connection refused",
            "workflow failed permanently",
            "completely unmatched text",
        ];
        for (idx, message) in messages.iter().enumerate() {
            for level in ["FATAL", "ERROR", "INFO", "UNPARSED"] {
                let result = classifier
                    .classify(&failure(idx + 1, level, message), &[])
                    .unwrap();
                assert!(result.confidence >= 0.0 && result.confidence <= 1.0);
            }
        }
    }

    #[test]
    fn later_rules_hit_the_confidence_floor() {
        let mut classifier = Classifier::new();
        // "workflow failed permanently" sits at the end of the table, well
        // past index 50, so its base confidence is the 0.5 floor.
        let result = classifier
            .classify(&failure(1, "UNPARSED", "workflow failed permanently"), &[])
            .unwrap();
        assert_eq!(result.category, Category::Other);
        assert_eq!(result.matched_rule, "workflow_failed_summary");
        assert!((result.confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn batch_keeps_sliding_context_window() {
        let mut classifier = Classifier::new();
        let mut records: Vec<ExtractedRecord> = (1..=12)
            .map(|n| failure(n, "ERROR", "assertion failed"))
            .collect();
        // Unmatched record at the end should still classify from context.
        records.push(failure(13, "ERROR", "nothing interesting here"));
        let classified = classifier.classify_batch(&records);
        assert_eq!(classified.len(), 13);
        assert_eq!(classified[12].category, Category::TestFailure);
        assert_eq!(classified[12].matched_rule, CONTEXT_RULE);
    }

    #[test]
    fn stats_accumulate_across_calls() {
        let mut classifier = Classifier::new();
        classifier
            .classify(&failure(1, "ERROR", "assertion failed"), &[])
            .unwrap();
        classifier
            .classify(&failure(2, "ERROR", "assertion failed"), &[])
            .unwrap();
        classifier
            .classify(&failure(3, "ERROR", "completely unmatched"), &[])
            .unwrap();
        let stats = classifier.stats();
        assert_eq!(stats.total_classifications, 3);
        assert_eq!(
            stats.category_distribution.get(&Category::TestFailure),
            Some(&2)
        );
        assert_eq!(stats.category_distribution.get(&Category::Other), Some(&1));
        assert_eq!(
            stats
                .pattern_usage
                .get("Test Failure:test_assertion_failure"),
            Some(&2)
        );
    }
}
