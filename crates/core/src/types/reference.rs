//! Reference number type for correlating ledger events with business documents.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ReferenceNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    /// The input string is empty or whitespace-only.
    #[error("reference number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("reference number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A reference number correlating a ledger event with an external business
/// document (purchase order, delivery note, receipt, ...).
///
/// Reference numbers are caller- or system-supplied and are stored verbatim
/// after trimming surrounding whitespace. Uniqueness is **not** enforced;
/// retried operations with the same reference produce distinct ledger rows.
///
/// ## Constraints
///
/// - Must contain at least one non-whitespace character
/// - Length: at most 64 characters after trimming
///
/// ## Examples
///
/// ```
/// use stockroom_core::ReferenceNumber;
///
/// assert!(ReferenceNumber::parse("GRN-2024-0015").is_ok());
/// assert!(ReferenceNumber::parse("  REF1  ").is_ok()); // trimmed
/// assert!(ReferenceNumber::parse("").is_err());
/// assert!(ReferenceNumber::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ReferenceNumber(String);

impl ReferenceNumber {
    /// Maximum length of a reference number.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `ReferenceNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty (after trimming) or longer
    /// than 64 characters.
    pub fn parse(s: &str) -> Result<Self, ReferenceError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ReferenceError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(ReferenceError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the reference number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ReferenceNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReferenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ReferenceNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
