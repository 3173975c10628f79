//! Shipment creation endpoint, called after a captured payment.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use dynasty_core::PaymentId;

use crate::checkout::AddressForm;
use crate::error::AppError;
use crate::services::delhivery::{self, OrderSummary};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout/shipments", post(create_shipment))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub payment_id: String,
    pub address: AddressForm,
    pub order: OrderSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentResponse {
    pub success: bool,
    pub tracking_id: String,
    /// ISO date, `YYYY-MM-DD`.
    pub estimated_delivery: String,
}

#[instrument(skip(state, request))]
async fn create_shipment(
    State(state): State<AppState>,
    Json(request): Json<CreateShipmentRequest>,
) -> Result<Json<CreateShipmentResponse>, AppError> {
    if request.payment_id.trim().is_empty() {
        return Err(AppError::BadRequest("paymentId is required".to_string()));
    }
    let payment_id = PaymentId::new(request.payment_id.trim());

    let address = request.address.validate()?;

    let result = match state
        .delhivery()
        .create_shipment(&payment_id, &request.order, &address)
        .await
    {
        Ok(result) => result,
        Err(cause) if state.config().demo_mode => {
            // Demo installs have no live provider account; hand back a
            // clearly simulated waybill instead of failing the checkout
            warn!(%cause, "provider unavailable, returning simulated shipment");
            delhivery::simulated_result()
        }
        Err(cause) => {
            error!(%cause, payment_id = %payment_id, "shipment creation failed");
            state.orders().mark_shipment_failed(&payment_id).await;
            return Err(cause.into());
        }
    };

    state
        .orders()
        .mark_shipped(
            &payment_id,
            result.waybill.clone(),
            result.estimated_delivery,
        )
        .await;

    info!(waybill = %result.waybill, "shipment created");

    Ok(Json(CreateShipmentResponse {
        success: true,
        tracking_id: result.waybill.as_str().to_string(),
        estimated_delivery: result.estimated_delivery.format("%Y-%m-%d").to_string(),
    }))
}
