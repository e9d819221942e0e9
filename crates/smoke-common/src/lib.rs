//! # smoke-common
//!
//! Shared types for the container smoke-test harness.
//!
//! This crate provides the vocabulary used across the workspace:
//! - Container lifecycle status as reported by the runtime
//! - Validated container names
//! - Common error types

#![warn(missing_docs)]

pub mod error;
pub mod name;
pub mod status;

pub use error::{SmokeError, SmokeResult};
pub use name::ContainerName;
pub use status::{ContainerStatus, ExitStatus};
