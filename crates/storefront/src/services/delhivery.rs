//! Delhivery API client for shipment creation.
//!
//! Maps a paid checkout into the provider's shipment shape: one shipment
//! entry, the configured pickup-location block, payment mode always
//! "Prepaid" with a zero COD amount, and a normalized result carrying the
//! waybill and an estimated delivery date.

use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dynasty_core::{PaymentId, Price, Waybill};

use crate::checkout::address::ShippingAddress;
use crate::config::{DelhiveryConfig, PickupLocation};

/// Days until the default delivery estimate when the provider supplies none.
const DEFAULT_DELIVERY_DAYS: i64 = 3;

/// Errors that can occur when talking to Delhivery.
#[derive(Debug, Error)]
pub enum DelhiveryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response carried no packages to take a waybill from.
    #[error("no packages in provider response")]
    NoPackages,

    /// Failed to build the client or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// One line of the order being shipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
}

/// What was bought, for the shipment manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSummary {
    pub products: Vec<LineItem>,
    /// Order total in rupees.
    pub amount: Price,
}

impl OrderSummary {
    /// Total number of units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.products.iter().map(|p| p.quantity).sum()
    }

    /// Product names joined for the manifest description field.
    #[must_use]
    pub fn description(&self) -> String {
        self.products
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Normalized result of a shipment creation.
#[derive(Debug, Clone)]
pub struct ShipmentResult {
    pub waybill: Waybill,
    pub estimated_delivery: NaiveDate,
}

/// Client for the Delhivery shipment creation API.
#[derive(Clone)]
pub struct DelhiveryClient {
    client: reqwest::Client,
    endpoint: String,
    pickup: PickupLocation,
}

impl DelhiveryClient {
    /// Create a new Delhivery API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &DelhiveryConfig) -> Result<Self, DelhiveryError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Token {}", config.api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| DelhiveryError::Parse(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            pickup: config.pickup.clone(),
        })
    }

    /// Create a shipment for a paid order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the provider rejects it, or the
    /// response carries no packages.
    pub async fn create_shipment(
        &self,
        payment_id: &PaymentId,
        order: &OrderSummary,
        address: &ShippingAddress,
    ) -> Result<ShipmentResult, DelhiveryError> {
        let payload = self.build_payload(payment_id, order, address);

        let response = self.client.post(&self.endpoint).json(&payload).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(DelhiveryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: CreateResponse = response
            .json()
            .await
            .map_err(|e| DelhiveryError::Parse(e.to_string()))?;

        let package = body
            .packages
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or(DelhiveryError::NoPackages)?;

        let estimated_delivery = package
            .edd
            .as_deref()
            .and_then(|edd| NaiveDate::parse_from_str(edd, "%Y-%m-%d").ok())
            .unwrap_or_else(default_delivery_estimate);

        Ok(ShipmentResult {
            waybill: Waybill::new(package.waybill),
            estimated_delivery,
        })
    }

    fn build_payload(
        &self,
        payment_id: &PaymentId,
        order: &OrderSummary,
        address: &ShippingAddress,
    ) -> CreatePayload {
        CreatePayload {
            format: "json",
            data: CreateData {
                shipments: vec![ShipmentEntry {
                    name: address.name.clone(),
                    add: address.full_street(),
                    city: address.city.clone(),
                    state: address.state.as_str().to_string(),
                    country: "India".to_string(),
                    pin: address.pincode.as_str().to_string(),
                    phone: address.phone.as_str().to_string(),
                    order: payment_id.as_str().to_string(),
                    payment_mode: "Prepaid".to_string(),
                    total_amount: order.amount.rupees(),
                    cod_amount: "0".to_string(),
                    product_quantity: order.total_quantity(),
                    product_desc: order.description(),
                }],
                pickup_location: PickupEntry {
                    name: self.pickup.name.clone(),
                    add: self.pickup.address.clone(),
                    city: self.pickup.city.clone(),
                    state: self.pickup.state.clone(),
                    country: self.pickup.country.clone(),
                    pin: self.pickup.pin.clone(),
                    phone: self.pickup.phone.clone(),
                },
            },
        }
    }
}

/// The delivery estimate used when the provider supplies none: three days
/// from now.
#[must_use]
pub fn default_delivery_estimate() -> NaiveDate {
    (Utc::now() + Duration::days(DEFAULT_DELIVERY_DAYS)).date_naive()
}

/// A simulated shipment result for demo mode. The waybill is `SIM-` prefixed
/// so it can never be mistaken for a real tracking id.
#[must_use]
pub fn simulated_result() -> ShipmentResult {
    let suffix: u32 = rand::rng().random_range(0..1_000_000);
    ShipmentResult {
        waybill: Waybill::new(format!("SIM-{suffix:06}")),
        estimated_delivery: default_delivery_estimate(),
    }
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreatePayload {
    format: &'static str,
    data: CreateData,
}

#[derive(Debug, Serialize)]
struct CreateData {
    shipments: Vec<ShipmentEntry>,
    pickup_location: PickupEntry,
}

#[derive(Debug, Serialize)]
struct ShipmentEntry {
    name: String,
    add: String,
    city: String,
    state: String,
    country: String,
    pin: String,
    phone: String,
    /// The provider's order reference; we use the payment id.
    order: String,
    payment_mode: String,
    total_amount: i64,
    cod_amount: String,
    product_quantity: u32,
    product_desc: String,
}

#[derive(Debug, Serialize)]
struct PickupEntry {
    name: String,
    add: String,
    city: String,
    state: String,
    country: String,
    pin: String,
    phone: String,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    packages: Option<Vec<PackageEntry>>,
}

#[derive(Debug, Deserialize)]
struct PackageEntry {
    waybill: String,
    edd: Option<String>,
}
