//! Indian postal (PIN) code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PinCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PinCodeError {
    /// The input string is empty.
    #[error("PIN code cannot be empty")]
    Empty,
    /// The input is not exactly six ASCII digits.
    #[error("PIN code must be exactly 6 digits")]
    NotSixDigits,
}

/// A six-digit Indian postal code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PinCode(String);

impl TryFrom<String> for PinCode {
    type Error = PinCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PinCode> for String {
    fn from(pin: PinCode) -> Self {
        pin.0
    }
}

impl PinCode {
    /// Parse a `PinCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly six ASCII
    /// digits.
    pub fn parse(s: &str) -> Result<Self, PinCodeError> {
        if s.is_empty() {
            return Err(PinCodeError::Empty);
        }
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinCodeError::NotSixDigits);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the PIN code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PinCode {
    type Err = PinCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PinCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
