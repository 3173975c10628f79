//! Payment order creation endpoint.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use dynasty_core::{Price, ReceiptToken};

use crate::error::AppError;
use crate::orders::CheckoutRecord;
use crate::services::razorpay::{self, RazorpayError};
use crate::state::AppState;

/// The amount used when a request carries none. Kept from the first version
/// of this endpoint, which some storefront builds still rely on.
const LEGACY_DEFAULT_AMOUNT: i64 = 500;

/// Largest order amount accepted, in rupees. Far above any cart total, and
/// keeps the paise conversion inside `i64`.
const MAX_ORDER_AMOUNT_RUPEES: i64 = 10_000_000;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/checkout/orders", post(create_order))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// Rupees. Defaults to [`LEGACY_DEFAULT_AMOUNT`] when absent.
    pub amount: Option<i64>,
    /// Defaults to INR.
    pub currency: Option<String>,
    /// Client-supplied receipt token. Resubmitting the same token returns
    /// the order already created for it instead of creating a second one.
    pub receipt: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub id: String,
    pub currency: String,
    /// Minor units (paise).
    pub amount: i64,
    pub receipt: String,
    /// The publishable gateway key the popup needs.
    pub key_id: String,
}

#[instrument(skip(state, request))]
async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let amount = Price::from_rupees(request.amount.unwrap_or(LEGACY_DEFAULT_AMOUNT));
    if !amount.is_positive() {
        return Err(AppError::BadRequest(
            "Order amount must be positive".to_string(),
        ));
    }
    if amount.rupees() > MAX_ORDER_AMOUNT_RUPEES {
        return Err(AppError::BadRequest(format!(
            "Order amount must not exceed {MAX_ORDER_AMOUNT_RUPEES} rupees"
        )));
    }

    let currency = request.currency.unwrap_or_else(|| "INR".to_string());
    if currency != "INR" {
        return Err(AppError::BadRequest(format!(
            "Unsupported currency: {currency}"
        )));
    }

    let receipt = match request.receipt {
        Some(token) if !token.trim().is_empty() => ReceiptToken::new(token.trim()),
        _ => razorpay::generate_receipt_token(),
    };

    // Idempotency: resubmissions of one receipt coalesce on a single store
    // entry, so at most one gateway order exists per receipt even when the
    // submissions race each other.
    let record = state
        .orders()
        .get_or_insert_with(&receipt, async {
            let order = state
                .razorpay()
                .create_order(amount, &currency, &receipt)
                .await?;
            info!(
                order_id = %order.id,
                amount_paise = order.amount,
                currency = %order.currency,
                "created payment order"
            );
            Ok::<_, RazorpayError>(CheckoutRecord::new(
                receipt.clone(),
                order.id,
                amount,
                currency.clone(),
            ))
        })
        .await?;

    if record.amount != amount {
        return Err(AppError::Conflict(format!(
            "Receipt {receipt} was already used for a different amount"
        )));
    }

    Ok(Json(CreateOrderResponse {
        id: record.gateway_order_id.as_str().to_string(),
        currency: record.currency,
        amount: record.amount.paise(),
        receipt: receipt.as_str().to_string(),
        key_id: state.razorpay().key_id().to_string(),
    }))
}
