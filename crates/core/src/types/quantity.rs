//! Positive stock quantity type used by ledger events.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`StockQuantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The quantity is zero or negative.
    #[error("quantity must be a positive integer (got {0})")]
    NotPositive(i32),
}

/// A strictly positive stock quantity.
///
/// Every ledger event (stock receipt, transfer, sale line) carries the
/// number of units involved as a `StockQuantity`; the sign of the resulting
/// on-hand delta is determined by the event kind, never by the quantity.
///
/// ## Examples
///
/// ```
/// use stockroom_core::StockQuantity;
///
/// assert_eq!(StockQuantity::new(5).map(|q| q.get()), Ok(5));
/// assert!(StockQuantity::new(0).is_err());
/// assert!(StockQuantity::new(-3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockQuantity(i32);

impl StockQuantity {
    /// Create a new `StockQuantity`.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] if `value` is zero or negative.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(QuantityError::NotPositive(value))
        }
    }

    /// Get the underlying unit count.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for StockQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StockQuantity> for i32 {
    fn from(quantity: StockQuantity) -> Self {
        quantity.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_quantity() {
        let quantity = StockQuantity::new(10).unwrap();
        assert_eq!(quantity.get(), 10);
        assert_eq!(i32::from(quantity), 10);
    }

    #[test]
    fn test_zero_rejected() {
        assert_eq!(StockQuantity::new(0), Err(QuantityError::NotPositive(0)));
    }

    #[test]
    fn test_negative_rejected() {
        assert_eq!(StockQuantity::new(-5), Err(QuantityError::NotPositive(-5)));
    }

    #[test]
    fn test_serde_transparent() {
        let quantity = StockQuantity::new(3).unwrap();
        let json = serde_json::to_string(&quantity).unwrap();
        assert_eq!(json, "3");

        let parsed: StockQuantity = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, quantity);
    }
}
