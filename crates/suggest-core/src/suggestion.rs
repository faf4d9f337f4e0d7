use serde::{Deserialize, Serialize};

/// One entry of a suggestion list, as produced by the fetch collaborator.
///
/// `value` is the consumer's opaque identifier; `label` is what the field shows.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    pub value: String,
    pub label: String,
}

impl Suggestion {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// The record passed to the consumer when a committed selection is discarded:
    /// empty value, the prior free text as label.
    pub fn cleared(label: impl Into<String>) -> Self {
        Self::new(String::new(), label)
    }

    pub fn is_cleared(&self) -> bool {
        self.value.is_empty()
    }
}

/// Failure reported by a fetch collaborator.
///
/// Never fatal: a failed fetch stops loading and leaves the current list alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("fetch rejected: {reason}")]
    Rejected { reason: String },
    #[error("fetch source disconnected")]
    Disconnected,
}

impl FetchError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleared_has_empty_value() {
        let s = Suggestion::cleared("Paris");
        assert!(s.is_cleared());
        assert_eq!(s.label, "Paris");
        assert!(!Suggestion::new("p1", "Paris").is_cleared());
    }

    #[test]
    fn fetch_error_messages() {
        assert_eq!(
            FetchError::rejected("timeout").to_string(),
            "fetch rejected: timeout"
        );
        assert_eq!(
            FetchError::Disconnected.to_string(),
            "fetch source disconnected"
        );
    }

    #[test]
    fn suggestion_deserializes_from_toml() {
        let s: Suggestion = toml::from_str("value = \"p1\"\nlabel = \"London\"").unwrap();
        assert_eq!(s, Suggestion::new("p1", "London"));
    }
}
