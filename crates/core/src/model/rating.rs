use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing an anxiety rating.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
    #[error("anxiety rating {0} is outside the 1..=5 scale")]
    OutOfRange(u8),
}

/// A 1-5 self-report of subjective distress.
///
/// The scale is closed: 1 is calm, 5 is maximum distress. Values outside the
/// range cannot be represented, so a present rating is always meaningful and
/// guards never have to disambiguate "unset" from a zero rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct AnxietyRating(u8);

impl AnxietyRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Construct a rating from a raw 1-5 value.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` if the value is not in 1..=5.
    pub fn new(value: u8) -> Result<Self, RatingError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Trend delta between a pre-exposure and post-exposure rating.
    ///
    /// Positive values indicate anxiety reduction.
    #[must_use]
    pub fn delta(initial: Self, final_: Self) -> i16 {
        i16::from(initial.0) - i16::from(final_.0)
    }
}

impl TryFrom<u8> for AnxietyRating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AnxietyRating> for u8 {
    fn from(rating: AnxietyRating) -> Self {
        rating.0
    }
}
