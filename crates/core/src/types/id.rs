//! Newtype identifiers for catalog entities and external references.
//!
//! `ProductId` is a numeric catalog id. The remaining identifiers are opaque
//! strings issued by the payment gateway or the logistics provider; wrapping
//! them prevents a payment id from being passed where an order id belongs.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Numeric identifier of a catalog product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u32);

impl ProductId {
    /// Create a new product id.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the underlying numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ProductId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Macro to define an opaque string reference issued by an external system.
macro_rules! define_reference {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw reference string.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// The reference as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the reference is empty.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_reference!(
    /// Order identifier assigned by the payment gateway (e.g. `order_Nxq...`).
    GatewayOrderId
);

define_reference!(
    /// Payment identifier delivered by the gateway's success callback.
    PaymentId
);

define_reference!(
    /// The logistics provider's tracking reference for a shipment.
    Waybill
);

define_reference!(
    /// Client-generated short token correlating an order with the gateway.
    ///
    /// Also keys the server-side checkout record, so a resubmission with the
    /// same token returns the already-created gateway order.
    ReceiptToken
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_roundtrip() {
        let id = ProductId::new(42);
        assert_eq!(id.as_u32(), 42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(ProductId::from(42), id);
    }

    #[test]
    fn test_references_are_distinct_types() {
        let order = GatewayOrderId::new("order_abc123");
        let payment = PaymentId::new("pay_abc123");
        assert_eq!(order.as_str(), "order_abc123");
        assert_eq!(payment.as_str(), "pay_abc123");
    }

    #[test]
    fn test_reference_serde_transparent() {
        let waybill = Waybill::new("WB123");
        let json = serde_json::to_string(&waybill).unwrap();
        assert_eq!(json, "\"WB123\"");
    }
}
