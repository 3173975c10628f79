//! Razorpay API client and webhook signature verification.
//!
//! The orders API is authenticated with HTTP basic auth (key id as username,
//! key secret as password). Amounts on the wire are always minor units
//! (paise); conversion happens here so callers stay in rupees.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distr::Alphanumeric;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use dynasty_core::{GatewayOrderId, Price, ReceiptToken};

use crate::config::RazorpayConfig;

/// Length of generated receipt tokens. Short enough for the gateway's
/// 40-character receipt limit with room for a client prefix.
const RECEIPT_TOKEN_LENGTH: usize = 14;

type HmacSha256 = Hmac<Sha256>;

/// Errors that can occur when talking to Razorpay.
#[derive(Debug, Error)]
pub enum RazorpayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the client or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the Razorpay orders API.
#[derive(Clone)]
pub struct RazorpayClient {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
}

impl RazorpayClient {
    /// Create a new Razorpay API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &RazorpayConfig) -> Result<Self, RazorpayError> {
        let mut headers = HeaderMap::new();

        // Basic auth: key id as username, key secret as password
        let credentials = format!("{}:{}", config.key_id, config.key_secret.expose_secret());
        let auth_value = format!("Basic {}", BASE64.encode(credentials));
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| RazorpayError::Parse(format!("Invalid API credentials: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base.clone(),
            key_id: config.key_id.clone(),
        })
    }

    /// The publishable key id, safe to hand to the popup client-side.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Create a gateway order for `amount`, with capture enabled.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the gateway rejects the order.
    pub async fn create_order(
        &self,
        amount: Price,
        currency: &str,
        receipt: &ReceiptToken,
    ) -> Result<GatewayOrder, RazorpayError> {
        let url = format!("{}/orders", self.base_url);

        let body = CreateOrderBody {
            amount: amount.paise(),
            currency,
            receipt: receipt.as_str(),
            payment_capture: 1,
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| RazorpayError::Parse(e.to_string()))
    }
}

/// Request body for order creation.
#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    /// Minor units (paise).
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    /// 1 = capture the payment automatically on authorization.
    payment_capture: u8,
}

/// An order as returned by the gateway. The gateway echoes more fields
/// (receipt, status, timestamps); only the ones read downstream are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayOrder {
    pub id: GatewayOrderId,
    /// Minor units (paise).
    pub amount: i64,
    pub currency: String,
}

/// Generate a short receipt token correlating an order with the gateway.
#[must_use]
pub fn generate_receipt_token() -> ReceiptToken {
    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(RECEIPT_TOKEN_LENGTH)
        .map(char::from)
        .collect();
    ReceiptToken::new(token)
}

/// Verify a webhook notification signature.
///
/// The signature header is the hex-encoded HMAC-SHA256 of the raw request
/// body under the webhook secret. Comparison goes through
/// [`Mac::verify_slice`], which is constant-time.
#[must_use]
pub fn verify_webhook_signature(secret: &SecretString, body: &[u8], signature_hex: &str) -> bool {
    let Ok(signature) = hex::decode(signature_hex) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.expose_secret().as_bytes()) else {
        return false;
    };
    mac.update(body);

    mac.verify_slice(&signature).is_ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sign(secret: &str, body: &[u8]) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_receipt_token_shape() {
        let token = generate_receipt_token();
        assert_eq!(token.as_str().len(), RECEIPT_TOKEN_LENGTH);
        assert!(token.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        // Two tokens from the same process should differ
        assert_ne!(token, generate_receipt_token());
    }

    #[test]
    fn test_verify_webhook_signature_accepts_valid() {
        let secret = SecretString::from("k9#Qz@pW2!mXv7Rt");
        let body = br#"{"event":"payment.captured"}"#;
        let signature = sign("k9#Qz@pW2!mXv7Rt", body);
        assert!(verify_webhook_signature(&secret, body, &signature));
    }

    #[test]
    fn test_verify_webhook_signature_rejects_tampered_signature() {
        let secret = SecretString::from("k9#Qz@pW2!mXv7Rt");
        let body = br#"{"event":"payment.captured"}"#;
        let mut signature = sign("k9#Qz@pW2!mXv7Rt", body);

        // Flip one nibble of the hex signature
        let last = signature.pop().unwrap();
        signature.push(if last == '0' { '1' } else { '0' });

        assert!(!verify_webhook_signature(&secret, body, &signature));
    }

    #[test]
    fn test_verify_webhook_signature_rejects_tampered_body() {
        let secret = SecretString::from("k9#Qz@pW2!mXv7Rt");
        let signature = sign("k9#Qz@pW2!mXv7Rt", br#"{"amount":500}"#);
        assert!(!verify_webhook_signature(
            &secret,
            br#"{"amount":501}"#,
            &signature
        ));
    }

    #[test]
    fn test_verify_webhook_signature_rejects_non_hex() {
        let secret = SecretString::from("k9#Qz@pW2!mXv7Rt");
        assert!(!verify_webhook_signature(&secret, b"{}", "not-hex!"));
        assert!(!verify_webhook_signature(&secret, b"{}", ""));
    }

    #[test]
    fn test_create_order_body_shape() {
        let body = CreateOrderBody {
            amount: Price::from_rupees(500).paise(),
            currency: "INR",
            receipt: "abc123",
            payment_capture: 1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["amount"], 50_000);
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["receipt"], "abc123");
        assert_eq!(json["payment_capture"], 1);
    }
}
