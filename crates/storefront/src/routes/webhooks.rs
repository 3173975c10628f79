//! Payment gateway webhook receiver.
//!
//! Verification runs over the raw request body before any parsing: the
//! signature header is the hex HMAC-SHA256 of the exact bytes the gateway
//! sent, so the body must not pass through a JSON extractor first.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use dynasty_core::{GatewayOrderId, PaymentId};

use crate::services::razorpay;
use crate::state::AppState;

const SIGNATURE_HEADER: &str = "x-razorpay-signature";

pub fn router() -> Router<AppState> {
    Router::new().route("/api/webhooks/payment", post(handle_webhook))
}

/// The subset of the event envelope we act on.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    #[serde(default)]
    payload: Option<WebhookPayload>,
}

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    payment: Option<PaymentWrapper>,
}

#[derive(Debug, Deserialize)]
struct PaymentWrapper {
    entity: PaymentEntity,
}

#[derive(Debug, Deserialize)]
struct PaymentEntity {
    id: PaymentId,
    order_id: GatewayOrderId,
}

#[instrument(skip(state, headers, body))]
async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let secret = &state.config().razorpay.webhook_secret;
    if !razorpay::verify_webhook_signature(secret, &body, signature) {
        warn!("webhook signature verification failed");
        return (StatusCode::FORBIDDEN, Json(json!({ "message": "Invalid" }))).into_response();
    }

    // A verified notification always gets a 200, even if we cannot use it;
    // anything else makes the gateway retry a delivery that already landed
    match serde_json::from_slice::<WebhookEvent>(&body) {
        Ok(event) if event.event == "payment.captured" => {
            if let Some(entity) = event
                .payload
                .and_then(|p| p.payment)
                .map(|wrapper| wrapper.entity)
            {
                match state.orders().mark_paid(&entity.order_id, entity.id).await {
                    Some(record) => {
                        info!(order_id = %record.gateway_order_id, "payment captured");
                    }
                    None => {
                        warn!(order_id = %entity.order_id, "captured payment for unknown order");
                    }
                }
            }
        }
        Ok(event) => {
            info!(event = %event.event, "ignoring webhook event");
        }
        Err(cause) => {
            warn!(%cause, "webhook body was verified but unparseable");
        }
    }

    (StatusCode::OK, Json(json!({ "message": "OK" }))).into_response()
}
