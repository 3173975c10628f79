//! Checkout record status.

use serde::{Deserialize, Serialize};

/// Where a checkout attempt's server-side record stands.
///
/// Advances monotonically: a record is created when the gateway order is
/// created, marked paid by the payment webhook, and finished by the shipment
/// endpoint one way or the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStatus {
    /// Gateway order created; payment not yet confirmed.
    #[default]
    OrderCreated,
    /// Payment confirmed (webhook or client callback).
    Paid,
    /// Shipment booked with the logistics provider.
    ShipmentCreated,
    /// Payment went through but shipment booking failed; manual follow-up.
    ShipmentFailed,
}

impl CheckoutStatus {
    /// Whether money has moved for this record.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid | Self::ShipmentCreated | Self::ShipmentFailed)
    }
}
