//! Failure classification: a fixed ordered rule table, first-match-wins
//! matching, confidence scoring, and context-aware heuristics.

pub mod category;
pub mod classifier;
pub mod rules;

pub use category::Category;
pub use classifier::{
    ClassifiedRecord, Classifier, ClassifierStats, ClassifyError, CONTEXT_RULE, ERROR_RULE,
    NO_RULE,
};
pub use rules::{rule_table, Rule};
