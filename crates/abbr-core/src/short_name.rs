use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated short name, the key under which a URL is registered.
///
/// Short names must be 1-64 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortName(String);

const MAX_LENGTH: usize = 64;

impl ShortName {
    /// Creates a new `ShortName` after validating the input.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    /// Creates a `ShortName` without validation.
    ///
    /// Use this only for names read back from trusted storage or in tests.
    pub fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(name: &str) -> Result<()> {
        if name.is_empty() || name.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortName(format!(
                "length must be between 1 and {}, got {}",
                MAX_LENGTH,
                name.len()
            )));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CoreError::InvalidShortName(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                name
            )));
        }

        Ok(())
    }
}

impl TryFrom<String> for ShortName {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ShortName> for String {
    fn from(value: ShortName) -> Self {
        value.0
    }
}

impl AsRef<str> for ShortName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Display for ShortName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
