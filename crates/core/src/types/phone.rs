//! Indian mobile number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not exactly ten ASCII digits.
    #[error("phone number must be exactly 10 digits")]
    NotTenDigits,
}

/// A ten-digit Indian mobile number, stored without country code.
///
/// The logistics provider and the gateway prefill both take the bare
/// ten-digit form, so no `+91` normalization happens here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly ten ASCII
    /// digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }
        if s.len() != 10 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PhoneError::NotTenDigits);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(
            PhoneNumber::parse("9876543210").unwrap().as_str(),
            "9876543210"
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_eq!(
            PhoneNumber::parse("123456789"),
            Err(PhoneError::NotTenDigits)
        );
        assert_eq!(
            PhoneNumber::parse("12345678901"),
            Err(PhoneError::NotTenDigits)
        );
    }

    #[test]
    fn test_parse_non_numeric() {
        assert_eq!(
            PhoneNumber::parse("98765abcde"),
            Err(PhoneError::NotTenDigits)
        );
        // Unicode digits are not ASCII digits
        assert_eq!(
            PhoneNumber::parse("٩٨٧٦٥٤٣٢١٠"),
            Err(PhoneError::NotTenDigits)
        );
    }
}
