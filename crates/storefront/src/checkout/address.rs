//! Shipping address form validation.
//!
//! The form arrives as loose strings; `validate` turns it into a
//! [`ShippingAddress`] whose fields carry the core newtypes, or a per-field
//! error map the form can render inline. Field messages match what the
//! checkout page shows under each input.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use dynasty_core::{Email, IndianState, PhoneNumber, PinCode};

/// The shipping form as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddressForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub line1: String,
    #[serde(default)]
    pub line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
}

/// A validated shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: String,
    pub phone: PhoneNumber,
    pub email: Email,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: IndianState,
    pub pincode: PinCode,
}

impl ShippingAddress {
    /// Both street lines joined for single-field consumers.
    #[must_use]
    pub fn full_street(&self) -> String {
        match &self.line2 {
            Some(line2) => format!("{}, {}", self.line1, line2),
            None => self.line1.clone(),
        }
    }
}

/// Per-field validation errors, keyed by form field name.
///
/// `BTreeMap` keeps the serialized order stable for the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AddressErrors(pub BTreeMap<&'static str, &'static str>);

impl AddressErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The message for one field, if it failed.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static str> {
        self.0.get(name).copied()
    }
}

impl AddressForm {
    /// Validate the whole form.
    ///
    /// # Errors
    ///
    /// Returns the full per-field error map; every failing field is reported,
    /// not just the first.
    pub fn validate(&self) -> Result<ShippingAddress, AddressErrors> {
        let mut errors = BTreeMap::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }

        let phone = PhoneNumber::parse(self.phone.trim());
        if phone.is_err() {
            errors.insert("phone", "Please enter a valid 10-digit phone number");
        }

        let email = Email::parse(self.email.trim());
        if email.is_err() {
            errors.insert("email", "Please enter a valid email address");
        }

        if self.line1.trim().is_empty() {
            errors.insert("line1", "Address Line 1 is required");
        }

        if self.city.trim().is_empty() {
            errors.insert("city", "City is required");
        }

        let state: Result<IndianState, _> = self.state.parse();
        if state.is_err() {
            errors.insert("state", "State is required");
        }

        let pincode = PinCode::parse(self.pincode.trim());
        if self.pincode.trim().is_empty() {
            errors.insert("pincode", "PIN Code is required");
        } else if pincode.is_err() {
            errors.insert("pincode", "Please enter a valid 6-digit PIN code");
        }

        match (phone, email, state, pincode) {
            (Ok(phone), Ok(email), Ok(state), Ok(pincode)) if errors.is_empty() => {
                Ok(ShippingAddress {
                    name: self.name.trim().to_string(),
                    phone,
                    email,
                    line1: self.line1.trim().to_string(),
                    line2: Some(self.line2.trim().to_string()).filter(|l| !l.is_empty()),
                    city: self.city.trim().to_string(),
                    state,
                    pincode,
                })
            }
            _ => Err(AddressErrors(errors)),
        }
    }

    /// Revalidate a single field, for inline feedback as the user types.
    /// Returns the error message for that field, or `None` if it now passes.
    #[must_use]
    pub fn validate_field(&self, field: &str) -> Option<&'static str> {
        match self.validate() {
            Ok(_) => None,
            Err(errors) => errors.field(field),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_form() -> AddressForm {
        AddressForm {
            name: "Priya Nair".to_string(),
            phone: "9876543210".to_string(),
            email: "priya@example.com".to_string(),
            line1: "42 Marine Drive".to_string(),
            line2: String::new(),
            city: "Mumbai".to_string(),
            state: "Maharashtra".to_string(),
            pincode: "400002".to_string(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let address = valid_form().validate().unwrap();
        assert_eq!(address.name, "Priya Nair");
        assert_eq!(address.state, IndianState::Maharashtra);
        assert_eq!(address.line2, None);
        assert_eq!(address.full_street(), "42 Marine Drive");
    }

    #[test]
    fn test_line2_is_kept_when_present() {
        let mut form = valid_form();
        form.line2 = "Flat 3B".to_string();
        let address = form.validate().unwrap();
        assert_eq!(address.line2.as_deref(), Some("Flat 3B"));
        assert_eq!(address.full_street(), "42 Marine Drive, Flat 3B");
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = AddressForm::default().validate().unwrap_err();
        assert_eq!(errors.field("name"), Some("Name is required"));
        assert_eq!(
            errors.field("phone"),
            Some("Please enter a valid 10-digit phone number")
        );
        assert_eq!(
            errors.field("email"),
            Some("Please enter a valid email address")
        );
        assert_eq!(errors.field("line1"), Some("Address Line 1 is required"));
        assert_eq!(errors.field("city"), Some("City is required"));
        assert_eq!(errors.field("state"), Some("State is required"));
        assert_eq!(errors.field("pincode"), Some("PIN Code is required"));
    }

    #[test]
    fn test_bad_phone() {
        let mut form = valid_form();
        form.phone = "12345".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("phone"),
            Some("Please enter a valid 10-digit phone number")
        );
        // Only the phone field should fail
        assert_eq!(errors.0.len(), 1);
    }

    #[test]
    fn test_short_pincode_gets_format_message() {
        let mut form = valid_form();
        form.pincode = "4000".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.field("pincode"),
            Some("Please enter a valid 6-digit PIN code")
        );
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut form = valid_form();
        form.state = "Atlantis".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.field("state"), Some("State is required"));
    }

    #[test]
    fn test_validate_field_isolates_one_field() {
        let mut form = valid_form();
        form.email = "not-an-email".to_string();
        assert_eq!(
            form.validate_field("email"),
            Some("Please enter a valid email address")
        );
        assert_eq!(form.validate_field("phone"), None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let mut form = valid_form();
        form.name = "  Priya Nair  ".to_string();
        form.pincode = " 400002 ".to_string();
        let address = form.validate().unwrap();
        assert_eq!(address.name, "Priya Nair");
        assert_eq!(address.pincode.as_str(), "400002");
    }
}
