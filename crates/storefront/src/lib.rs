//! Dynasty Storefront - catalog and checkout service.
//!
//! Serves the JSON API behind the Dynasty neckwear storefront:
//!
//! - Product catalog with price/color filtering and sorting
//! - Order endpoint proxying payment-gateway order creation
//! - Shipment endpoint proxying the logistics provider
//! - Payment webhook verification
//! - Order confirmation view model
//!
//! The checkout orchestration sequence itself lives in [`checkout::flow`]:
//! address collection, gateway order creation, the payment popup, and
//! shipment booking, with failure handling at each step.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod routes;
pub mod services;
pub mod state;

pub use config::StorefrontConfig;
pub use state::AppState;
