//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors for core types and operation arguments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Plain integers are reserved for short-ID arguments.
    #[error("keyword cannot be a number: {keyword}")]
    ReservedKeyword { keyword: String },

    /// A duration or time offset was negative.
    #[error("{field} cannot be negative, got {seconds}s")]
    NegativeDuration { field: &'static str, seconds: i64 },

    /// A duration or time offset exceeds the representable time range.
    #[error("{field} is out of range")]
    OutOfRange { field: &'static str },

    /// An end time preceded its start time.
    #[error("end time must not be before start time")]
    EndBeforeStart,

    /// A rename whose source and target are identical.
    #[error("old and new {field} cannot be the same: {value}")]
    Unchanged { field: &'static str, value: String },
}

/// Validates a keyword for new or edited entries.
///
/// Keywords must be non-blank and must not parse as an integer, since numeric
/// arguments address entries by short ID.
pub fn validate_keyword(keyword: &str) -> Result<(), ValidationError> {
    if keyword.trim().is_empty() {
        return Err(ValidationError::Empty { field: "keyword" });
    }
    if keyword.parse::<i64>().is_ok() {
        return Err(ValidationError::ReservedKeyword {
            keyword: keyword.to_string(),
        });
    }
    Ok(())
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Generates a fresh random ID.
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A stable entry identifier.
    ///
    /// Never changes for the lifetime of an entry, unlike its short ID.
    EntryId, "entry ID"
);

define_string_id!(
    /// A stash identifier.
    StashId, "stash ID"
);

define_string_id!(
    /// An undo record identifier.
    UndoId, "undo record ID"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_rejects_empty() {
        assert!(EntryId::new("").is_err());
        assert!(EntryId::new("valid-id").is_ok());
    }

    #[test]
    fn generated_ids_are_unique_uuids() {
        let a = EntryId::generate();
        let b = EntryId::generate();
        assert_ne!(a, b);
        Uuid::parse_str(a.as_str()).unwrap();
    }

    #[test]
    fn entry_id_serde_roundtrip() {
        let id = EntryId::new("entry-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"entry-123\"");
        let parsed: EntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn undo_id_serde_rejects_empty() {
        let result: Result<UndoId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn keyword_validation() {
        assert!(validate_keyword("coding").is_ok());
        assert!(validate_keyword("v2").is_ok());
        assert_eq!(
            validate_keyword("42"),
            Err(ValidationError::ReservedKeyword {
                keyword: "42".to_string()
            })
        );
        assert_eq!(
            validate_keyword("-7"),
            Err(ValidationError::ReservedKeyword {
                keyword: "-7".to_string()
            })
        );
        assert_eq!(
            validate_keyword("   "),
            Err(ValidationError::Empty { field: "keyword" })
        );
    }

    #[test]
    fn validation_messages() {
        let err = ValidationError::NegativeDuration {
            field: "duration",
            seconds: -5,
        };
        assert_eq!(err.to_string(), "duration cannot be negative, got -5s");
    }
}
