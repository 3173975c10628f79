//! Integer rupee prices and minor-unit (paise) conversion.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A price in whole Indian rupees.
///
/// The catalog and the order endpoint both work in display units (rupees);
/// the payment gateway wants minor units (paise). Keeping the two conversions
/// on one type avoids the off-by-100 bugs that come from passing bare
/// integers around.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    /// Create a price from whole rupees.
    #[must_use]
    pub const fn from_rupees(rupees: i64) -> Self {
        Self(rupees)
    }

    /// The amount in whole rupees.
    #[must_use]
    pub const fn rupees(self) -> i64 {
        self.0
    }

    /// The amount in paise, as the gateway's amount field expects.
    ///
    /// Overflows above `i64::MAX / 100` rupees; callers that accept
    /// untrusted amounts must bound them first (the order endpoint does).
    #[must_use]
    pub const fn paise(self) -> i64 {
        self.0 * 100
    }

    /// Whether the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Format with the rupee sign and Indian digit grouping, e.g. `₹1,18,000`.
    #[must_use]
    pub fn display(self) -> String {
        format!("₹{}", group_indian(self.0))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl std::ops::Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, p| acc + p)
    }
}

/// Group digits the Indian way: the last three together, then pairs.
fn group_indian(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();

    let mut grouped = String::new();
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        let remaining = len - i;
        if i > 0 && (remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0)) {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}
