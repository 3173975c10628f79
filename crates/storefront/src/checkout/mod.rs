//! The checkout flow: shipping address collection through payment and
//! shipment.
//!
//! [`address`] validates the shipping form into a [`ShippingAddress`];
//! [`flow`] drives the order -> popup -> shipment sequence.

pub mod address;
pub mod flow;

pub use address::{AddressErrors, AddressForm, ShippingAddress};
pub use flow::{
    CheckoutFlow, CheckoutOutcome, CheckoutPhase, GatewayReadiness, PopupBranding, PopupRequest,
};
