//! Error types for affix data decoding and registry handling.
//!
//! Structural decoding failures are reported as `MalformedRecordError`,
//! which carries the path of the offending field. Everything else the
//! crate can fail on is wrapped in `AffixError`.

use crate::key::AffixKey;
use thiserror::Error;

/// What was wrong with a field of a persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedKind {
    /// A required field was absent.
    MissingField,
    /// A field held a value of the wrong type.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// An operation tag outside the closed operation set.
    UnknownOperation(String),
    /// A modifier identifier that is not a valid UUID.
    InvalidUuid(String),
    /// A tier that does not fit a non-negative 32-bit integer.
    TierOutOfRange(i64),
    /// A NaN or infinite double, which has no persisted text form.
    NonFinite,
}

impl std::fmt::Display for MalformedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedKind::MissingField => write!(f, "missing field"),
            MalformedKind::WrongType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            MalformedKind::UnknownOperation(tag) => write!(f, "unknown operation '{}'", tag),
            MalformedKind::InvalidUuid(raw) => write!(f, "invalid uuid '{}'", raw),
            MalformedKind::TierOutOfRange(tier) => write!(f, "tier {} out of range", tier),
            MalformedKind::NonFinite => write!(f, "non-finite number"),
        }
    }
}

/// A persisted record could not be decoded.
///
/// `path` names the offending field, e.g. `initial_modifiers[1].operation`.
/// An empty path refers to the record root.
///
/// # Examples
///
/// ```rust
/// use weapon_affix::{MalformedKind, MalformedRecordError};
///
/// let err = MalformedRecordError::new("initial_modifiers[0].operation", MalformedKind::MissingField);
/// assert_eq!(
///     err.to_string(),
///     "Malformed record at initial_modifiers[0].operation: missing field"
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
#[error("Malformed record at {}: {}", display_path(.path), .kind)]
pub struct MalformedRecordError {
    pub path: String,
    pub kind: MalformedKind,
}

impl MalformedRecordError {
    pub fn new(path: impl Into<String>, kind: MalformedKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Errors produced by the affix crate.
#[derive(Debug, Error)]
pub enum AffixError {
    /// A persisted record was structurally invalid.
    #[error(transparent)]
    Malformed(#[from] MalformedRecordError),

    /// JSON text could not be parsed or produced.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// A registry file could not be read.
    #[error("Failed to read registry file: {0}")]
    Io(#[from] std::io::Error),

    /// A registry file was not valid TOML for the registry layout.
    #[error("Failed to parse registry TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A basic element key is not present in the registry.
    #[error("Unknown basic element: {0}")]
    UnknownElement(AffixKey),

    /// A basic element tier exceeds the registered maximum.
    #[error("Tier {tier} of element {key} exceeds maximum {max_tier}")]
    TierAboveMax {
        key: AffixKey,
        tier: u32,
        max_tier: u32,
    },

    /// A basic element carries a source the registry does not allow.
    #[error("Source '{source_tag}' not allowed for element {key}")]
    DisallowedSource { key: AffixKey, source_tag: String },

    /// A modifier targets an attachment slot that is not registered.
    #[error("Unknown attachment slot: {0}")]
    UnknownAttachment(AffixKey),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display_includes_path() {
        let err = MalformedRecordError::new(
            "basic_elements[2].tier",
            MalformedKind::WrongType {
                expected: "int",
                found: "string",
            },
        );
        let display = err.to_string();
        assert!(display.contains("basic_elements[2].tier"));
        assert!(display.contains("expected int, found string"));
    }

    #[test]
    fn test_root_path_display() {
        let err = MalformedRecordError::new(
            "",
            MalformedKind::WrongType {
                expected: "compound",
                found: "list",
            },
        );
        assert!(err.to_string().contains("<root>"));
    }

    #[test]
    fn test_affix_error_wraps_malformed() {
        let inner = MalformedRecordError::new(
            "initial_modifiers[0].operation",
            MalformedKind::UnknownOperation("MULTIPLY".to_string()),
        );
        let err: AffixError = inner.clone().into();
        assert_eq!(err.to_string(), inner.to_string());
        assert!(matches!(err, AffixError::Malformed(e) if e == inner));
    }
}
