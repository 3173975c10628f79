//! Core types for the Dynasty storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod phone;
pub mod postal;
pub mod price;
pub mod region;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use postal::{PinCode, PinCodeError};
pub use price::Price;
pub use region::{IndianState, IndianStateError};
pub use status::CheckoutStatus;
