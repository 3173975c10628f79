//! In-memory order records, keyed by receipt token.
//!
//! Every gateway order we create gets a record here before the popup opens,
//! so later webhook notifications and shipment updates can be correlated
//! server-side instead of trusting client-reported state. Records are held in
//! bounded TTL caches; an abandoned checkout ages out on its own.

use chrono::{DateTime, NaiveDate, Utc};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use dynasty_core::{CheckoutStatus, GatewayOrderId, PaymentId, Price, ReceiptToken, Waybill};

/// How long an order record stays resolvable.
const RECORD_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Upper bound on concurrently tracked checkouts.
const MAX_RECORDS: u64 = 10_000;

/// One checkout's server-side record.
#[derive(Debug, Clone)]
pub struct CheckoutRecord {
    pub receipt: ReceiptToken,
    pub gateway_order_id: GatewayOrderId,
    /// Order total in rupees.
    pub amount: Price,
    pub currency: String,
    pub status: CheckoutStatus,
    pub payment_id: Option<PaymentId>,
    pub waybill: Option<Waybill>,
    pub estimated_delivery: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl CheckoutRecord {
    #[must_use]
    pub fn new(
        receipt: ReceiptToken,
        gateway_order_id: GatewayOrderId,
        amount: Price,
        currency: String,
    ) -> Self {
        Self {
            receipt,
            gateway_order_id,
            amount,
            currency,
            status: CheckoutStatus::OrderCreated,
            payment_id: None,
            waybill: None,
            estimated_delivery: None,
            created_at: Utc::now(),
        }
    }
}

/// Store of in-flight checkout records.
///
/// Cheap to clone; all clones share the same caches.
#[derive(Clone)]
pub struct OrderStore {
    by_receipt: Cache<String, CheckoutRecord>,
    receipt_by_order: Cache<String, ReceiptToken>,
    receipt_by_payment: Cache<String, ReceiptToken>,
}

impl OrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_receipt: Cache::builder()
                .max_capacity(MAX_RECORDS)
                .time_to_live(RECORD_TTL)
                .build(),
            receipt_by_order: Cache::builder()
                .max_capacity(MAX_RECORDS)
                .time_to_live(RECORD_TTL)
                .build(),
            receipt_by_payment: Cache::builder()
                .max_capacity(MAX_RECORDS)
                .time_to_live(RECORD_TTL)
                .build(),
        }
    }

    /// Fetch the record for `receipt`, or create it with `init`.
    ///
    /// Concurrent calls for the same receipt coalesce on one cache entry:
    /// exactly one runs `init` and the rest wait for its result, so a
    /// double-submitted checkout cannot create two gateway orders. A failed
    /// `init` caches nothing; the next call runs it again.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `init`, shared between waiters.
    pub async fn get_or_insert_with<E>(
        &self,
        receipt: &ReceiptToken,
        init: impl Future<Output = Result<CheckoutRecord, E>>,
    ) -> Result<CheckoutRecord, Arc<E>>
    where
        E: Send + Sync + 'static,
    {
        let receipt_by_order = self.receipt_by_order.clone();
        self.by_receipt
            .try_get_with(receipt.as_str().to_string(), async move {
                let record = init.await?;
                receipt_by_order
                    .insert(
                        record.gateway_order_id.as_str().to_string(),
                        record.receipt.clone(),
                    )
                    .await;
                Ok(record)
            })
            .await
    }

    /// Look up a record by its receipt token.
    pub async fn get_by_receipt(&self, receipt: &ReceiptToken) -> Option<CheckoutRecord> {
        self.by_receipt.get(receipt.as_str()).await
    }

    /// Look up a record by the gateway's order id.
    pub async fn get_by_gateway_order(
        &self,
        order_id: &GatewayOrderId,
    ) -> Option<CheckoutRecord> {
        let receipt = self.receipt_by_order.get(order_id.as_str()).await?;
        self.get_by_receipt(&receipt).await
    }

    /// Look up a record by the payment that settled it.
    pub async fn get_by_payment(&self, payment_id: &PaymentId) -> Option<CheckoutRecord> {
        let receipt = self.receipt_by_payment.get(payment_id.as_str()).await?;
        self.get_by_receipt(&receipt).await
    }

    /// Mark the order behind `order_id` as paid by `payment_id`.
    ///
    /// Returns the updated record, or `None` if no record matches (a webhook
    /// for an order this process never created, or one that aged out).
    pub async fn mark_paid(
        &self,
        order_id: &GatewayOrderId,
        payment_id: PaymentId,
    ) -> Option<CheckoutRecord> {
        let mut record = self.get_by_gateway_order(order_id).await?;
        record.status = CheckoutStatus::Paid;
        record.payment_id = Some(payment_id.clone());

        self.receipt_by_payment
            .insert(payment_id.as_str().to_string(), record.receipt.clone())
            .await;
        self.by_receipt
            .insert(record.receipt.as_str().to_string(), record.clone())
            .await;
        Some(record)
    }

    /// Attach a shipment to the record paid by `payment_id`.
    pub async fn mark_shipped(
        &self,
        payment_id: &PaymentId,
        waybill: Waybill,
        estimated_delivery: NaiveDate,
    ) -> Option<CheckoutRecord> {
        let mut record = self.get_by_payment(payment_id).await?;
        record.status = CheckoutStatus::ShipmentCreated;
        record.waybill = Some(waybill);
        record.estimated_delivery = Some(estimated_delivery);

        self.by_receipt
            .insert(record.receipt.as_str().to_string(), record.clone())
            .await;
        Some(record)
    }

    /// Record that shipment creation failed for a paid order. The payment
    /// stands; the record stays around for manual follow-up.
    pub async fn mark_shipment_failed(&self, payment_id: &PaymentId) -> Option<CheckoutRecord> {
        let mut record = self.get_by_payment(payment_id).await?;
        record.status = CheckoutStatus::ShipmentFailed;

        self.by_receipt
            .insert(record.receipt.as_str().to_string(), record.clone())
            .await;
        Some(record)
    }
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new()
    }
}
