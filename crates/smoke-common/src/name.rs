//! Container name validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{SmokeError, SmokeResult};

/// A validated container name.
///
/// Container names must:
/// - Be 1-128 characters long
/// - Contain only alphanumeric characters, `_`, `.` and `-`
/// - Start with an alphanumeric character
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContainerName(String);

impl ContainerName {
    /// Maximum length of a container name.
    pub const MAX_LENGTH: usize = 128;

    /// Name used when none is given.
    pub const DEFAULT: &'static str = "main";

    /// Create a new container name, validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the name format is invalid.
    pub fn new(name: impl Into<String>) -> SmokeResult<Self> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Get the container name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> SmokeResult<()> {
        let invalid = || SmokeError::InvalidContainerName {
            name: name.to_string(),
        };

        if name.len() > Self::MAX_LENGTH {
            return Err(invalid());
        }

        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphanumeric() => {}
            _ => return Err(invalid()),
        }

        if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
            Ok(())
        } else {
            Err(invalid())
        }
    }
}

impl Default for ContainerName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContainerName {
    type Err = SmokeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContainerName {
    type Error = SmokeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContainerName> for String {
    fn from(name: ContainerName) -> Self {
        name.0
    }
}

impl AsRef<str> for ContainerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_container_names() {
        assert!(ContainerName::new("main").is_ok());
        assert!(ContainerName::new("smoke-main").is_ok());
        assert!(ContainerName::new("smoke_main.1").is_ok());
        assert!(ContainerName::new("a".repeat(128)).is_ok());
    }

    #[test]
    fn invalid_container_names() {
        assert!(ContainerName::new("").is_err());
        assert!(ContainerName::new("-main").is_err());
        assert!(ContainerName::new(".main").is_err());
        assert!(ContainerName::new("main!").is_err());
        assert!(ContainerName::new("has space").is_err());
        assert!(ContainerName::new("a".repeat(129)).is_err());
    }

    #[test]
    fn default_is_main() {
        assert_eq!(ContainerName::default().as_str(), "main");
    }

    #[test]
    fn serde_rejects_invalid_names() {
        let ok: ContainerName = serde_json::from_str("\"main\"").unwrap();
        assert_eq!(ok.as_str(), "main");
        assert!(serde_json::from_str::<ContainerName>("\"-bad\"").is_err());
    }
}
