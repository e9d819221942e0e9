//! Smoke checks run against one container.
//!
//! Checks share a single container and run in order; a failing check does
//! not stop the ones after it.

mod group;
mod report;

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use smoke_common::SmokeResult;

use crate::monitor::ReadinessMonitor;
use crate::runtime::{ContainerHandle, ContainerRuntime, HarnessConfig, with_container};

pub use group::LogGroup;
pub use report::{CheckResult, Outcome, Report};

/// Reason given for slow checks that were not asked for.
pub const SLOW_SKIP_REASON: &str = "need --run-slow option to run";

/// A named verification against the container under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Check {
    /// The container left `created` and is `running` or `exited`.
    ContainerRunning,
    /// The container exited with code 0.
    CleanExit,
    /// The container printed a known platform string.
    PlatformReported,
}

impl Check {
    /// Every check, in run order.
    pub const ALL: [Self; 3] = [Self::ContainerRunning, Self::CleanExit, Self::PlatformReported];

    /// Kebab-case name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ContainerRunning => "container-running",
            Self::CleanExit => "clean-exit",
            Self::PlatformReported => "platform-reported",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::ContainerRunning => "container has started",
            Self::CleanExit => "container exits cleanly",
            Self::PlatformReported => "container reports a known platform",
        }
    }

    /// Slow checks only run when asked for.
    #[must_use]
    pub const fn is_slow(&self) -> bool {
        matches!(self, Self::PlatformReported)
    }

    async fn execute<H>(self, handle: &mut H, monitor: &ReadinessMonitor) -> Outcome
    where
        H: ContainerHandle + ?Sized,
    {
        match self {
            Self::ContainerRunning => match monitor.await_left_created(handle).await {
                Ok(outcome) if outcome.is_ready() => Outcome::Passed,
                Ok(outcome) => Outcome::Failed(format!(
                    "container status is `{}` after {} refreshes, expected `running` or `exited`",
                    outcome.status, outcome.attempts
                )),
                Err(err) => Outcome::Errored(err.to_string()),
            },
            Self::CleanExit => match monitor.await_clean_exit(handle).await {
                Ok(exit) if exit.is_clean() => Outcome::Passed,
                Ok(exit) => Outcome::Failed(format!("The container did not exit cleanly ({exit})")),
                Err(err) => Outcome::Errored(err.to_string()),
            },
            // Output is only complete once the container has exited.
            Self::PlatformReported => {
                if let Err(err) = monitor.await_clean_exit(handle).await {
                    return Outcome::Errored(err.to_string());
                }
                match handle.logs().await {
                    Ok(logs) => platform_outcome(&logs),
                    Err(err) => Outcome::Errored(err.to_string()),
                }
            }
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn platform_outcome(logs: &str) -> Outcome {
    match logs.lines().map(str::trim).rfind(|line| !line.is_empty()) {
        Some(line) if arch_info::is_known_platform(line) => Outcome::Passed,
        Some(line) => Outcome::Failed(format!(
            "last output line `{line}` is not a known platform"
        )),
        None => Outcome::Failed("container produced no output".to_string()),
    }
}

/// An ordered set of checks plus the settings to run them with.
#[derive(Debug, Clone)]
pub struct Suite {
    config: HarnessConfig,
    checks: Vec<Check>,
}

impl Suite {
    /// Every check, configured by `config`.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            checks: Check::ALL.to_vec(),
        }
    }

    /// Restrict the run to `checks`, kept in run order. An empty selection
    /// keeps every check.
    #[must_use]
    pub fn with_checks(mut self, checks: impl IntoIterator<Item = Check>) -> Self {
        let selected: Vec<Check> = checks.into_iter().collect();
        if !selected.is_empty() {
            self.checks = Check::ALL
                .into_iter()
                .filter(|check| selected.contains(check))
                .collect();
        }
        self
    }

    /// Checks that will run, in order.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The settings in use.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Start the container, run every check against it, remove it.
    ///
    /// # Errors
    ///
    /// Fails only if the container cannot be started; problems during a
    /// check are recorded in the report.
    pub async fn run<R: ContainerRuntime>(&self, runtime: &R) -> SmokeResult<Report> {
        let started_at = chrono::Utc::now();
        tracing::info!(
            image = %self.config.image_tag,
            container = %self.config.container_name,
            checks = self.checks.len(),
            "Running smoke checks"
        );

        let checks = self.checks.clone();
        let monitor = self.config.monitor();
        let run_slow = self.config.run_slow;
        let log_groups = self.config.log_groups;

        let results = with_container(runtime, &self.config.run_spec(), move |handle| {
            Box::pin(async move {
                let mut results = Vec::with_capacity(checks.len());
                for check in checks {
                    if check.is_slow() && !run_slow {
                        tracing::debug!(check = %check, "Skipping slow check");
                        results.push(CheckResult {
                            check,
                            outcome: Outcome::Skipped(SLOW_SKIP_REASON.to_string()),
                            duration_ms: 0,
                        });
                        continue;
                    }

                    let _group = LogGroup::open(log_groups, check.name());
                    let start = Instant::now();
                    let outcome = check.execute(handle, &monitor).await;
                    let duration_ms =
                        u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

                    tracing::info!(
                        check = %check,
                        outcome = outcome.label(),
                        duration_ms,
                        "Check finished"
                    );
                    results.push(CheckResult {
                        check,
                        outcome,
                        duration_ms,
                    });
                }
                results
            })
        })
        .await?;

        Ok(Report {
            image_tag: self.config.image_tag.clone(),
            container_name: self.config.container_name.clone(),
            started_at,
            results,
        })
    }
}
