//! Checkout orchestration: order creation, the gateway popup, shipment.
//!
//! The flow is generic over a [`CheckoutBackend`] (our own order and shipment
//! endpoints) and a [`GatewayPopup`] (the payment window the customer
//! completes or abandons). Order and payment failures return the customer to
//! an idle checkout so they can retry; a shipment failure after a captured
//! payment is terminal and is surfaced for manual follow-up instead.

use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, warn};

use dynasty_core::{Email, GatewayOrderId, PaymentId, PhoneNumber, Price, Waybill};

use crate::checkout::address::{AddressErrors, AddressForm, ShippingAddress};
use crate::services::delhivery::OrderSummary;

/// Where the checkout currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutPhase {
    /// Nothing in flight; the form is editable.
    #[default]
    Idle,
    /// The shipping form is being filled in or corrected.
    CollectingAddress,
    /// The order endpoint has been called, no response yet.
    CreatingOrder,
    /// Order exists; waiting for the gateway script to finish loading.
    AwaitingGateway,
    /// The payment popup is open.
    PresentingGateway,
    /// Payment captured; the shipment endpoint has been called.
    CreatingShipment,
    /// Shipment created; checkout is done.
    Completed,
    /// Payment captured but shipment creation failed. Terminal.
    Failed,
}

/// An order placed through the backend, ready to hand to the popup.
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub id: GatewayOrderId,
    /// Minor units (paise), as the popup expects.
    pub amount_paise: i64,
    pub currency: String,
}

/// The gateway's success callback payload.
#[derive(Debug, Clone)]
pub struct PaymentConfirmation {
    pub payment_id: PaymentId,
    pub order_id: GatewayOrderId,
    pub signature: String,
}

/// A shipment created through the backend.
#[derive(Debug, Clone)]
pub struct ShipmentDetails {
    pub tracking_id: Waybill,
    pub estimated_delivery: NaiveDate,
}

/// Merchant-side popup settings, fixed per deployment.
#[derive(Debug, Clone)]
pub struct PopupBranding {
    /// Publishable gateway key id.
    pub key_id: String,
    pub merchant_name: String,
    pub description: String,
    /// Hex color for the popup theme.
    pub brand_color: String,
}

impl Default for PopupBranding {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            merchant_name: "Dynasty".to_string(),
            description: "Order payment".to_string(),
            brand_color: "#1f2a44".to_string(),
        }
    }
}

/// Everything the popup needs: the order, the branding, and the customer
/// prefill taken from the shipping address.
#[derive(Debug, Clone)]
pub struct PopupRequest {
    pub key_id: String,
    pub order_id: GatewayOrderId,
    /// Minor units (paise).
    pub amount_paise: i64,
    pub currency: String,
    pub merchant_name: String,
    pub description: String,
    pub brand_color: String,
    pub prefill_name: String,
    pub prefill_email: Email,
    pub prefill_phone: PhoneNumber,
}

/// How the popup closed.
#[derive(Debug, Clone)]
pub enum PopupOutcome {
    /// Payment went through.
    Completed(PaymentConfirmation),
    /// The customer closed the window without paying.
    Dismissed,
    /// The gateway reported a failed payment attempt.
    Failed { description: String },
}

/// The order and shipment operations the flow drives.
pub trait CheckoutBackend: Send + Sync {
    /// Create a payment order for `amount`.
    fn create_order(
        &self,
        amount: Price,
    ) -> impl Future<Output = Result<PlacedOrder, String>> + Send;

    /// Create a shipment for a captured payment.
    fn create_shipment(
        &self,
        payment: &PaymentConfirmation,
        address: &ShippingAddress,
        order: &OrderSummary,
    ) -> impl Future<Output = Result<ShipmentDetails, String>> + Send;
}

/// The payment window presented to the customer.
pub trait GatewayPopup: Send + Sync {
    fn present(&self, request: &PopupRequest) -> impl Future<Output = PopupOutcome> + Send;
}

/// Resolve-once signal that the gateway script has loaded.
///
/// Waiters before the script arrives park on a watch channel; waiters after
/// resolve immediately. `mark_ready` is idempotent.
#[derive(Clone)]
pub struct GatewayReadiness {
    tx: Arc<watch::Sender<bool>>,
}

impl GatewayReadiness {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal that the gateway is ready. Safe to call more than once.
    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the gateway is ready. Returns immediately if it already is.
    pub async fn ready(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so wait_for cannot see a closed channel
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for GatewayReadiness {
    fn default() -> Self {
        Self::new()
    }
}

/// How a checkout run ended.
#[derive(Debug, Clone)]
pub enum CheckoutOutcome {
    /// Paid and shipped.
    Completed {
        tracking_id: Waybill,
        estimated_delivery: NaiveDate,
        payment_id: PaymentId,
    },
    /// The customer closed the popup; nothing was charged.
    Dismissed,
    /// Order creation failed before any payment.
    OrderFailed { notice: String },
    /// The gateway reported a failed payment attempt.
    PaymentFailed { notice: String },
    /// Payment captured but the shipment could not be created.
    ShipmentFailed {
        notice: String,
        payment_id: PaymentId,
    },
}

/// Drives one checkout from a validated address to an outcome.
pub struct CheckoutFlow<B, P> {
    backend: B,
    popup: P,
    readiness: GatewayReadiness,
    branding: PopupBranding,
    phase: CheckoutPhase,
    loading: bool,
}

impl<B: CheckoutBackend, P: GatewayPopup> CheckoutFlow<B, P> {
    pub fn new(backend: B, popup: P, readiness: GatewayReadiness, branding: PopupBranding) -> Self {
        Self {
            backend,
            popup,
            readiness,
            branding,
            phase: CheckoutPhase::Idle,
            loading: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        self.phase
    }

    /// Whether a run is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Validate the shipping form. A failed validation keeps the checkout in
    /// `CollectingAddress` so the form can be corrected and resubmitted.
    ///
    /// # Errors
    ///
    /// Returns the per-field error map from the form.
    pub fn collect_address(&mut self, form: &AddressForm) -> Result<ShippingAddress, AddressErrors> {
        self.phase = CheckoutPhase::CollectingAddress;
        form.validate()
    }

    /// Run the checkout for a validated address and order.
    pub async fn run(&mut self, address: &ShippingAddress, order: &OrderSummary) -> CheckoutOutcome {
        self.loading = true;
        self.phase = CheckoutPhase::CreatingOrder;

        let placed = match self.backend.create_order(order.amount).await {
            Ok(placed) => placed,
            Err(cause) => {
                warn!(%cause, "order creation failed");
                return self.finish(
                    CheckoutPhase::Idle,
                    CheckoutOutcome::OrderFailed {
                        notice: "Unable to initiate payment. Please try again.".to_string(),
                    },
                );
            }
        };

        self.phase = CheckoutPhase::AwaitingGateway;
        self.readiness.ready().await;

        self.phase = CheckoutPhase::PresentingGateway;
        let request = PopupRequest {
            key_id: self.branding.key_id.clone(),
            order_id: placed.id.clone(),
            amount_paise: placed.amount_paise,
            currency: placed.currency.clone(),
            merchant_name: self.branding.merchant_name.clone(),
            description: self.branding.description.clone(),
            brand_color: self.branding.brand_color.clone(),
            prefill_name: address.name.clone(),
            prefill_email: address.email.clone(),
            prefill_phone: address.phone.clone(),
        };
        let confirmation = match self.popup.present(&request).await {
            PopupOutcome::Completed(confirmation) => confirmation,
            PopupOutcome::Dismissed => {
                return self.finish(CheckoutPhase::Idle, CheckoutOutcome::Dismissed);
            }
            PopupOutcome::Failed { description } => {
                warn!(%description, "payment attempt failed");
                return self.finish(
                    CheckoutPhase::Idle,
                    CheckoutOutcome::PaymentFailed {
                        notice: format!("Payment failed: {description}"),
                    },
                );
            }
        };

        self.phase = CheckoutPhase::CreatingShipment;
        match self
            .backend
            .create_shipment(&confirmation, address, order)
            .await
        {
            Ok(shipment) => self.finish(
                CheckoutPhase::Completed,
                CheckoutOutcome::Completed {
                    tracking_id: shipment.tracking_id,
                    estimated_delivery: shipment.estimated_delivery,
                    payment_id: confirmation.payment_id,
                },
            ),
            Err(cause) => {
                // The payment stands; never retry into a double shipment
                error!(%cause, payment_id = %confirmation.payment_id, "shipment creation failed after capture");
                self.finish(
                    CheckoutPhase::Failed,
                    CheckoutOutcome::ShipmentFailed {
                        notice: "Your payment was received but we could not arrange shipping. \
                                 Our team will contact you shortly."
                            .to_string(),
                        payment_id: confirmation.payment_id,
                    },
                )
            }
        }
    }

    fn finish(&mut self, phase: CheckoutPhase, outcome: CheckoutOutcome) -> CheckoutOutcome {
        self.loading = false;
        self.phase = phase;
        outcome
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dynasty_core::{Email, IndianState, PhoneNumber, PinCode};
    use crate::services::delhivery::LineItem;

    fn test_address() -> ShippingAddress {
        ShippingAddress {
            name: "Kavya Reddy".to_string(),
            phone: PhoneNumber::parse("9123456780").unwrap(),
            email: Email::parse("kavya@example.com").unwrap(),
            line1: "7 Jubilee Hills".to_string(),
            line2: None,
            city: "Hyderabad".to_string(),
            state: IndianState::Telangana,
            pincode: PinCode::parse("500033").unwrap(),
        }
    }

    fn test_order() -> OrderSummary {
        OrderSummary {
            products: vec![LineItem {
                name: "Regal Paisley Necktie".to_string(),
                quantity: 1,
            }],
            amount: Price::from_rupees(4200),
        }
    }

    struct StubBackend {
        order: Result<(), String>,
        shipment: Result<(), String>,
    }

    impl StubBackend {
        fn ok() -> Self {
            Self {
                order: Ok(()),
                shipment: Ok(()),
            }
        }
    }

    impl CheckoutBackend for StubBackend {
        async fn create_order(&self, amount: Price) -> Result<PlacedOrder, String> {
            self.order.clone()?;
            Ok(PlacedOrder {
                id: GatewayOrderId::new("order_test1"),
                amount_paise: amount.paise(),
                currency: "INR".to_string(),
            })
        }

        async fn create_shipment(
            &self,
            _payment: &PaymentConfirmation,
            _address: &ShippingAddress,
            _order: &OrderSummary,
        ) -> Result<ShipmentDetails, String> {
            self.shipment.clone()?;
            Ok(ShipmentDetails {
                tracking_id: Waybill::new("WB777"),
                estimated_delivery: NaiveDate::from_ymd_opt(2026, 9, 2).unwrap(),
            })
        }
    }

    struct StubPopup {
        outcome: PopupOutcome,
    }

    impl GatewayPopup for StubPopup {
        async fn present(&self, request: &PopupRequest) -> PopupOutcome {
            assert_eq!(request.currency, "INR");
            assert_eq!(request.merchant_name, "Dynasty");
            if let PopupOutcome::Completed(confirmation) = &self.outcome {
                let mut confirmation = confirmation.clone();
                confirmation.order_id = request.order_id.clone();
                return PopupOutcome::Completed(confirmation);
            }
            self.outcome.clone()
        }
    }

    fn completing_popup() -> StubPopup {
        StubPopup {
            outcome: PopupOutcome::Completed(PaymentConfirmation {
                payment_id: PaymentId::new("pay_test1"),
                order_id: GatewayOrderId::new(""),
                signature: "deadbeef".to_string(),
            }),
        }
    }

    fn ready_signal() -> GatewayReadiness {
        let readiness = GatewayReadiness::new();
        readiness.mark_ready();
        readiness
    }

    #[tokio::test]
    async fn test_happy_path_completes() {
        let mut flow = CheckoutFlow::new(StubBackend::ok(), completing_popup(), ready_signal(), PopupBranding::default());
        let outcome = flow.run(&test_address(), &test_order()).await;

        let CheckoutOutcome::Completed {
            tracking_id,
            payment_id,
            ..
        } = outcome
        else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(tracking_id, Waybill::new("WB777"));
        assert_eq!(payment_id, PaymentId::new("pay_test1"));
        assert_eq!(flow.phase(), CheckoutPhase::Completed);
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn test_order_failure_returns_to_idle() {
        let backend = StubBackend {
            order: Err("gateway 503".to_string()),
            shipment: Ok(()),
        };
        let mut flow = CheckoutFlow::new(backend, completing_popup(), ready_signal(), PopupBranding::default());
        let outcome = flow.run(&test_address(), &test_order()).await;

        assert!(matches!(outcome, CheckoutOutcome::OrderFailed { .. }));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn test_dismissal_returns_to_idle() {
        let popup = StubPopup {
            outcome: PopupOutcome::Dismissed,
        };
        let mut flow = CheckoutFlow::new(StubBackend::ok(), popup, ready_signal(), PopupBranding::default());
        let outcome = flow.run(&test_address(), &test_order()).await;

        assert!(matches!(outcome, CheckoutOutcome::Dismissed));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn test_payment_failure_returns_to_idle() {
        let popup = StubPopup {
            outcome: PopupOutcome::Failed {
                description: "card declined".to_string(),
            },
        };
        let mut flow = CheckoutFlow::new(StubBackend::ok(), popup, ready_signal(), PopupBranding::default());
        let outcome = flow.run(&test_address(), &test_order()).await;

        let CheckoutOutcome::PaymentFailed { notice } = outcome else {
            panic!("expected payment failure");
        };
        assert!(notice.contains("card declined"));
        assert_eq!(flow.phase(), CheckoutPhase::Idle);
    }

    #[tokio::test]
    async fn test_shipment_failure_is_terminal_and_keeps_payment() {
        let backend = StubBackend {
            order: Ok(()),
            shipment: Err("provider down".to_string()),
        };
        let mut flow = CheckoutFlow::new(backend, completing_popup(), ready_signal(), PopupBranding::default());
        let outcome = flow.run(&test_address(), &test_order()).await;

        let CheckoutOutcome::ShipmentFailed { payment_id, .. } = outcome else {
            panic!("expected shipment failure");
        };
        assert_eq!(payment_id, PaymentId::new("pay_test1"));
        assert_eq!(flow.phase(), CheckoutPhase::Failed);
        assert!(!flow.is_loading());
    }

    #[tokio::test]
    async fn test_collect_address_gates_on_validation() {
        let mut flow = CheckoutFlow::new(
            StubBackend::ok(),
            completing_popup(),
            ready_signal(),
            PopupBranding::default(),
        );

        let mut form = AddressForm {
            name: "Kavya Reddy".to_string(),
            phone: "9123456780".to_string(),
            email: "kavya@example.com".to_string(),
            line1: "7 Jubilee Hills".to_string(),
            line2: String::new(),
            city: "Hyderabad".to_string(),
            state: "Telangana".to_string(),
            pincode: "50003".to_string(),
        };

        let errors = flow.collect_address(&form).unwrap_err();
        assert!(errors.field("pincode").is_some());
        assert_eq!(flow.phase(), CheckoutPhase::CollectingAddress);

        form.pincode = "500033".to_string();
        let address = flow.collect_address(&form).unwrap();
        assert_eq!(address, test_address());
    }

    #[tokio::test]
    async fn test_run_waits_for_gateway_readiness() {
        let readiness = GatewayReadiness::new();
        assert!(!readiness.is_ready());

        let waiter = {
            let readiness = readiness.clone();
            tokio::spawn(async move { readiness.ready().await })
        };
        readiness.mark_ready();
        waiter.await.unwrap();
        assert!(readiness.is_ready());

        // Resolves immediately once ready, and marking again is harmless
        readiness.mark_ready();
        readiness.ready().await;
    }
}
