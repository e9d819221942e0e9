//! Check results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smoke_common::ContainerName;

use super::Check;

/// How a check ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "message", rename_all = "lowercase")]
pub enum Outcome {
    /// The check held.
    Passed,
    /// The check did not hold.
    Failed(String),
    /// The runtime failed while the check ran.
    Errored(String),
    /// The check was not run.
    Skipped(String),
}

impl Outcome {
    /// Upper-case label used in text output.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed(_) => "FAILED",
            Self::Errored(_) => "ERROR",
            Self::Skipped(_) => "SKIPPED",
        }
    }

    /// Detail message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Passed => None,
            Self::Failed(m) | Self::Errored(m) | Self::Skipped(m) => Some(m),
        }
    }

    /// Returns true if this outcome fails the run.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_) | Self::Errored(_))
    }
}

/// One check and how it went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The check.
    pub check: Check,
    /// Its outcome.
    pub outcome: Outcome,
    /// Wall time spent in the check.
    pub duration_ms: u64,
}

/// Results of one suite run against one container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Image under test.
    pub image_tag: String,
    /// Container the checks ran against.
    pub container_name: ContainerName,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Per-check results, in run order.
    pub results: Vec<CheckResult>,
}

impl Report {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Number of passed checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    /// Number of failed checks.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    /// Number of checks that hit a runtime error.
    #[must_use]
    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Errored(_)))
    }

    /// Number of skipped checks.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// Returns true if no check failed or errored.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.results.iter().any(|r| r.outcome.is_failure())
    }

    /// Result for `check`, if it was part of the run.
    #[must_use]
    pub fn result(&self, check: Check) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.check == check)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            write!(f, "{:<8}{}", result.outcome.label(), result.check)?;
            if let Some(message) = result.outcome.message() {
                write!(f, ": {message}")?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "{} passed, {} failed, {} errors, {} skipped",
            self.passed(),
            self.failed(),
            self.errored(),
            self.skipped()
        )
    }
}
