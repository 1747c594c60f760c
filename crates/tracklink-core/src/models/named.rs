//! Identifier-compared field values

use serde::{Deserialize, Serialize};
use std::fmt;

/// A field value identified by `value`, optionally carrying a display name.
///
/// Two named values are equal when their identifiers are equal; the display
/// name never takes part in comparisons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NamedValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: None,
        }
    }

    pub fn with_name(value: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name: Some(name.into()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Display name if known, otherwise the identifier
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.value)
    }
}

impl PartialEq for NamedValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for NamedValue {}

impl PartialEq<str> for NamedValue {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for NamedValue {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}

impl From<&str> for NamedValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NamedValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
