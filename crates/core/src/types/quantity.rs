//! Cart line quantity.

use core::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// Quantity was zero.
    #[error("quantity must be at least {min}")]
    BelowMinimum {
        /// Smallest accepted quantity.
        min: u32,
    },
}

/// A positive number of units on a cart line.
///
/// The remote API does not enforce a lower bound, so the client never
/// constructs a quantity below [`Quantity::MIN`]. Decrementing a quantity of
/// one is not possible; the cart page disables that control.
///
/// ```
/// use shopfront_core::Quantity;
///
/// let one = Quantity::ONE;
/// assert_eq!(one.decrement(), None);
/// assert_eq!(one.increment().get(), 2);
/// assert!(Quantity::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// Smallest quantity a cart line can hold.
    pub const MIN: u32 = 1;

    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Values offered by the product page quantity selector.
    pub const SELECTABLE: RangeInclusive<u32> = 1..=10;

    /// Create a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::BelowMinimum`] for zero.
    pub const fn new(value: u32) -> Result<Self, QuantityError> {
        if value < Self::MIN {
            return Err(QuantityError::BelowMinimum { min: Self::MIN });
        }
        Ok(Self(value))
    }

    /// Create a quantity from a product page selector value, clamping it
    /// into [`Quantity::SELECTABLE`].
    #[must_use]
    pub fn from_selector(value: u32) -> Self {
        Self(value.clamp(*Self::SELECTABLE.start(), *Self::SELECTABLE.end()))
    }

    /// Returns the number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// One more unit.
    #[must_use]
    pub const fn increment(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer unit, or `None` when already at the minimum.
    #[must_use]
    pub const fn decrement(self) -> Option<Self> {
        if self.0 <= Self::MIN {
            None
        } else {
            Some(Self(self.0 - 1))
        }
    }

    /// Whether the decrement control must be disabled.
    #[must_use]
    pub const fn is_minimum(self) -> bool {
        self.0 <= Self::MIN
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
