use serde::{Serialize, Serializer};
use std::fmt;

/// Closed taxonomy of failure categories.
///
/// Categories are meant to be actionable: each one suggests a different
/// remediation path. Several overlap semantically (for example `Timeout`
/// and `InfrastructureTimeout`); the rule-table order decides which one a
/// given message lands in, and that ordering is part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    TestFailure,
    DependencyError,
    InfrastructureTimeout,
    BuildError,
    LintError,
    AuthenticationError,
    PermissionError,
    NetworkError,
    ConfigurationError,
    DatabaseError,
    ResourceError,
    InfrastructureError,
    CompilationError,
    RuntimeError,
    Timeout,
    SecurityPermissionError,
    ToolingError,
    AvailabilityError,
    Other,
}

impl Category {
    /// The human-facing category name, as it appears in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::TestFailure => "Test Failure",
            Category::DependencyError => "Dependency Error",
            Category::InfrastructureTimeout => "Infrastructure Timeout",
            Category::BuildError => "Build Error",
            Category::LintError => "Lint Error",
            Category::AuthenticationError => "Authentication Error",
            Category::PermissionError => "Permission Error",
            Category::NetworkError => "Network Error",
            Category::ConfigurationError => "Configuration Error",
            Category::DatabaseError => "Database Error",
            Category::ResourceError => "Resource Error",
            Category::InfrastructureError => "Infrastructure Error",
            Category::CompilationError => "Compilation Error",
            Category::RuntimeError => "Runtime Error",
            Category::Timeout => "Timeout",
            Category::SecurityPermissionError => "Security / Permission Error",
            Category::ToolingError => "Tooling Error",
            Category::AvailabilityError => "Availability Error",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
