//! # Smoke
//!
//! Starts a container image and checks that it comes up and exits cleanly.
//!
//! ## Usage
//!
//! ```no_run
//! use smoke::runtime::{DockerRuntime, HarnessConfig};
//! use smoke::suite::Suite;
//!
//! # async fn example() -> smoke_common::SmokeResult<()> {
//! let runtime = DockerRuntime::connect()?;
//! let config = HarnessConfig::default().with_image_tag("local/test-image:latest");
//!
//! let report = Suite::new(config).run(&runtime).await?;
//! assert!(report.is_success(), "{report}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod mock;
pub mod monitor;
pub mod runtime;
pub mod suite;

pub use monitor::{PollOutcome, ReadinessMonitor};
pub use runtime::{ContainerHandle, ContainerRuntime};
