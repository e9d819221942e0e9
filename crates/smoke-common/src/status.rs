//! Container lifecycle status as observed from the runtime.
//!
//! Mirrors the status values of the Docker Engine API
//! (`State.Status` in `GET /containers/{id}/json`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Container status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerStatus {
    /// Container has been created but not started.
    Created,
    /// Container is running.
    Running,
    /// Container is paused.
    Paused,
    /// Container is being restarted by its restart policy.
    Restarting,
    /// Container is being removed.
    Removing,
    /// Container has exited.
    Exited,
    /// Container could not be stopped or removed cleanly.
    Dead,
    /// The runtime reported no status or one outside this set.
    Unknown,
}

impl ContainerStatus {
    /// Returns true while the container has not left its initial status.
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created)
    }

    /// Returns true if the status is one a started container is expected
    /// to settle in: `running` or `exited`.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Running | Self::Exited)
    }

    /// Returns true if `next` may follow `self`.
    ///
    /// Nothing moves back to `created` once it has been left.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        !matches!(next, Self::Created) || matches!(self, Self::Created)
    }

    /// The lowercase name the runtime uses for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Exited => "exited",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exit status of a container that reached a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitStatus {
    /// Numeric exit code reported by the runtime.
    pub code: i64,
}

impl ExitStatus {
    /// Create an exit status from a code.
    #[must_use]
    pub const fn new(code: i64) -> Self {
        Self { code }
    }

    /// Returns true for a clean exit (code 0).
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.code == 0
    }
}

impl fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit code {}", self.code)
    }
}
