//! Clients for the third-party services behind checkout.
//!
//! - [`razorpay`] - payment gateway: order creation and webhook signatures
//! - [`delhivery`] - logistics provider: shipment creation

pub mod delhivery;
pub mod razorpay;

pub use delhivery::{DelhiveryClient, DelhiveryError};
pub use razorpay::{RazorpayClient, RazorpayError};
