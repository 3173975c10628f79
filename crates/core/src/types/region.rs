//! Indian states and territories served by the storefront.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a state name does not match a shipping destination.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown state: {0}")]
pub struct IndianStateError(pub String);

/// The Indian states and territories the address form accepts.
///
/// These are the destinations the logistics provider serves; the wire format
/// on both the address form and the shipment payload is the full display
/// name (e.g. "Tamil Nadu").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndianState {
    AndhraPradesh,
    ArunachalPradesh,
    Assam,
    Bihar,
    Chhattisgarh,
    Goa,
    Gujarat,
    Haryana,
    HimachalPradesh,
    Jharkhand,
    Karnataka,
    Kerala,
    MadhyaPradesh,
    Maharashtra,
    Manipur,
    Meghalaya,
    Mizoram,
    Nagaland,
    Odisha,
    Punjab,
    Rajasthan,
    Sikkim,
    TamilNadu,
    Telangana,
    Tripura,
    UttarPradesh,
    Uttarakhand,
    WestBengal,
    Delhi,
}

impl IndianState {
    /// All accepted destinations, in the order the address form lists them.
    pub const ALL: [Self; 29] = [
        Self::AndhraPradesh,
        Self::ArunachalPradesh,
        Self::Assam,
        Self::Bihar,
        Self::Chhattisgarh,
        Self::Goa,
        Self::Gujarat,
        Self::Haryana,
        Self::HimachalPradesh,
        Self::Jharkhand,
        Self::Karnataka,
        Self::Kerala,
        Self::MadhyaPradesh,
        Self::Maharashtra,
        Self::Manipur,
        Self::Meghalaya,
        Self::Mizoram,
        Self::Nagaland,
        Self::Odisha,
        Self::Punjab,
        Self::Rajasthan,
        Self::Sikkim,
        Self::TamilNadu,
        Self::Telangana,
        Self::Tripura,
        Self::UttarPradesh,
        Self::Uttarakhand,
        Self::WestBengal,
        Self::Delhi,
    ];

    /// The display name used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AndhraPradesh => "Andhra Pradesh",
            Self::ArunachalPradesh => "Arunachal Pradesh",
            Self::Assam => "Assam",
            Self::Bihar => "Bihar",
            Self::Chhattisgarh => "Chhattisgarh",
            Self::Goa => "Goa",
            Self::Gujarat => "Gujarat",
            Self::Haryana => "Haryana",
            Self::HimachalPradesh => "Himachal Pradesh",
            Self::Jharkhand => "Jharkhand",
            Self::Karnataka => "Karnataka",
            Self::Kerala => "Kerala",
            Self::MadhyaPradesh => "Madhya Pradesh",
            Self::Maharashtra => "Maharashtra",
            Self::Manipur => "Manipur",
            Self::Meghalaya => "Meghalaya",
            Self::Mizoram => "Mizoram",
            Self::Nagaland => "Nagaland",
            Self::Odisha => "Odisha",
            Self::Punjab => "Punjab",
            Self::Rajasthan => "Rajasthan",
            Self::Sikkim => "Sikkim",
            Self::TamilNadu => "Tamil Nadu",
            Self::Telangana => "Telangana",
            Self::Tripura => "Tripura",
            Self::UttarPradesh => "Uttar Pradesh",
            Self::Uttarakhand => "Uttarakhand",
            Self::WestBengal => "West Bengal",
            Self::Delhi => "Delhi",
        }
    }
}

impl fmt::Display for IndianState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IndianState {
    type Err = IndianStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| IndianStateError(s.to_owned()))
    }
}

impl TryFrom<String> for IndianState {
    type Error = IndianStateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IndianState> for String {
    fn from(state: IndianState) -> Self {
        state.as_str().to_owned()
    }
}
