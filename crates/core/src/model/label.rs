use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LabelError {
    #[error("topic label cannot be empty")]
    EmptyTopic,

    #[error("specialty label cannot be empty")]
    EmptySpecialty,
}

/// AI-assigned topic label (trimmed, non-empty) used for client-side filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Create a validated topic label.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::EmptyTopic` if the label is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LabelError::EmptyTopic);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Topic {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(value: Topic) -> Self {
        value.0
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User-chosen category under which a saved analysis is filed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Specialty(String);

impl Specialty {
    /// Create a validated specialty label.
    ///
    /// # Errors
    ///
    /// Returns `LabelError::EmptySpecialty` if the label is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, LabelError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LabelError::EmptySpecialty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Specialty {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Specialty> for String {
    fn from(value: Specialty) -> Self {
        value.0
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_is_trimmed() {
        let topic = Topic::new("  Cardiology ").unwrap();
        assert_eq!(topic.as_str(), "Cardiology");
    }

    #[test]
    fn blank_labels_are_rejected() {
        assert_eq!(Topic::new("   ").unwrap_err(), LabelError::EmptyTopic);
        assert_eq!(Specialty::new("").unwrap_err(), LabelError::EmptySpecialty);
    }

    #[test]
    fn deserialization_validates() {
        let err = serde_json::from_str::<Topic>("\" \"");
        assert!(err.is_err());
        let ok: Specialty = serde_json::from_str("\"Neurology\"").unwrap();
        assert_eq!(ok.as_str(), "Neurology");
    }
}
