//! Shared harness for the storefront integration tests.
//!
//! Each test gets its own [`TestContext`]: a router wired to wiremock stand-ins
//! for the payment gateway and the logistics provider, driven in-process with
//! `tower::ServiceExt::oneshot`. No network listener, no shared state between
//! tests.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use hmac::{Hmac, Mac};
use http_body_util::BodyExt;
use secrecy::SecretString;
use sha2::Sha256;
use tower::ServiceExt;
use wiremock::MockServer;

use dynasty_storefront::config::{
    DelhiveryConfig, PickupLocation, RazorpayConfig, StorefrontConfig,
};
use dynasty_storefront::{AppState, routes};

/// Webhook secret the test context configures; use it to sign test payloads.
pub const WEBHOOK_SECRET: &str = "wZ3#kP9@qT5!xM1&vB7*cJ2";

/// A storefront router backed by mock upstreams.
pub struct TestContext {
    pub razorpay: MockServer,
    pub delhivery: MockServer,
    app: Router,
}

impl TestContext {
    /// A context with demo mode off: provider failures surface as errors.
    pub async fn new() -> Self {
        Self::with_demo_mode(false).await
    }

    pub async fn with_demo_mode(demo_mode: bool) -> Self {
        let razorpay = MockServer::start().await;
        let delhivery = MockServer::start().await;

        let config = StorefrontConfig {
            host: [127, 0, 0, 1].into(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            razorpay: RazorpayConfig {
                key_id: "rzp_test_k3y1d".to_string(),
                key_secret: SecretString::from("tG8$nV4@rL6!wQ9^zD2&"),
                webhook_secret: SecretString::from(WEBHOOK_SECRET),
                api_base: razorpay.uri(),
            },
            delhivery: DelhiveryConfig {
                api_key: SecretString::from("hY7%mK3@fB9!sX5&cN1*"),
                endpoint: format!("{}/api/cmu/create.json", delhivery.uri()),
                pickup: PickupLocation {
                    name: "Dynasty HQ".to_string(),
                    address: "Dynasty Warehouse, Delhi NCR".to_string(),
                    city: "Delhi".to_string(),
                    state: "Delhi".to_string(),
                    country: "India".to_string(),
                    pin: "110001".to_string(),
                    phone: "9876543210".to_string(),
                },
            },
            demo_mode,
            sentry_dsn: None,
        };

        let state = AppState::new(config).expect("failed to build test state");

        Self {
            razorpay,
            delhivery,
            app: routes::router(state),
        }
    }

    /// Drive one request through the router.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .uri(path)
            .body(Body::empty())
            .expect("failed to build request");
        self.send(request).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.send(request).await
    }

    /// POST a raw webhook body with its signature header.
    pub async fn post_webhook(
        &self,
        body: &[u8],
        signature: &str,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/webhooks/payment")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-razorpay-signature", signature)
            .body(Body::from(body.to_vec()))
            .expect("failed to build request");
        self.send(request).await
    }
}

/// Sign a webhook body the way the gateway does: hex HMAC-SHA256 under the
/// context's webhook secret.
#[must_use]
pub fn sign_webhook(body: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// A shipping address that passes validation, as the checkout form sends it.
#[must_use]
pub fn valid_address() -> serde_json::Value {
    serde_json::json!({
        "name": "Ananya Iyer",
        "phone": "9876501234",
        "email": "ananya@example.com",
        "line1": "221 Residency Road",
        "line2": "",
        "city": "Bengaluru",
        "state": "Karnataka",
        "pincode": "560025"
    })
}
