//! Order confirmation endpoint.
//!
//! The checkout client lands here after a completed flow with the tracking
//! details in the query string; the server-side record, when one exists,
//! takes precedence over what the client passed.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use dynasty_core::PaymentId;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/order-confirmation", get(order_confirmation))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationQuery {
    pub tracking_id: Option<String>,
    pub estimated_delivery: Option<String>,
    pub payment_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum ConfirmationResponse {
    Found(ConfirmationView),
    Missing { message: &'static str },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationView {
    pub status: &'static str,
    pub tracking_id: String,
    pub estimated_delivery: Option<String>,
    pub payment_id: Option<String>,
    /// Carrier tracking page; absent for simulated waybills.
    pub tracking_url: Option<String>,
}

#[instrument(skip(state))]
async fn order_confirmation(
    State(state): State<AppState>,
    Query(query): Query<ConfirmationQuery>,
) -> Json<ConfirmationResponse> {
    // Prefer the server-side record over client-reported query params
    if let Some(raw) = query.payment_id.as_deref() {
        let payment_id = PaymentId::new(raw);
        if let Some(record) = state.orders().get_by_payment(&payment_id).await {
            if let Some(waybill) = record.waybill {
                return Json(ConfirmationResponse::Found(ConfirmationView {
                    status: "Processing",
                    tracking_url: tracking_url(waybill.as_str()),
                    tracking_id: waybill.as_str().to_string(),
                    estimated_delivery: record
                        .estimated_delivery
                        .map(|d| d.format("%Y-%m-%d").to_string()),
                    payment_id: Some(raw.to_string()),
                }));
            }
        }
    }

    // Both tracking parameters must be present to show anything
    match (query.tracking_id, query.estimated_delivery) {
        (Some(tracking_id), Some(estimated_delivery))
            if !tracking_id.is_empty() && !estimated_delivery.is_empty() =>
        {
            Json(ConfirmationResponse::Found(ConfirmationView {
                status: "Processing",
                tracking_url: tracking_url(&tracking_id),
                tracking_id,
                estimated_delivery: Some(estimated_delivery),
                payment_id: query.payment_id,
            }))
        }
        _ => Json(ConfirmationResponse::Missing {
            message: "No order information found.",
        }),
    }
}

fn tracking_url(waybill: &str) -> Option<String> {
    if waybill.starts_with("SIM-") {
        return None;
    }
    Some(format!(
        "https://www.delhivery.com/track/package/{waybill}"
    ))
}
