//! Dynasty Core - Shared types library.
//!
//! This crate provides common types used across the Dynasty storefront:
//! - `storefront` - Public-facing catalog and checkout service
//! - `integration-tests` - End-to-end tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and parsing - no I/O, no HTTP clients,
//! no gateway or logistics API access. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for prices, ids, contact details, and
//!   checkout status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
