//! Integration tests for payment order creation.
//!
//! The gateway is a wiremock server; matchers on the mock assert what the
//! storefront actually sends upstream (paise amounts, capture flag).

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use dynasty_integration_tests::TestContext;

fn gateway_order(id: &str, amount_paise: i64) -> serde_json::Value {
    json!({
        "id": id,
        "entity": "order",
        "amount": amount_paise,
        "currency": "INR",
        "receipt": "rcpt",
        "status": "created"
    })
}

#[tokio::test]
async fn creates_order_with_amount_in_paise() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({
            "amount": 50_000,
            "currency": "INR",
            "payment_capture": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_A1", 50_000)))
        .expect(1)
        .mount(&ctx.razorpay)
        .await;

    let (status, body) = ctx
        .post_json("/api/checkout/orders", &json!({ "amount": 500 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "order_A1");
    assert_eq!(body["amount"], 50_000);
    assert_eq!(body["currency"], "INR");
    assert_eq!(body["keyId"], "rzp_test_k3y1d");
    assert!(body["receipt"].as_str().is_some_and(|r| !r.is_empty()));
}

#[tokio::test]
async fn missing_amount_defaults_to_500_rupees() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .and(body_partial_json(json!({ "amount": 50_000 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_D1", 50_000)))
        .expect(1)
        .mount(&ctx.razorpay)
        .await;

    let (status, body) = ctx.post_json("/api/checkout/orders", &json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 50_000);
}

#[tokio::test]
async fn rejects_non_positive_amounts() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .post_json("/api/checkout/orders", &json!({ "amount": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = ctx
        .post_json("/api/checkout/orders", &json!({ "amount": -100 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_amounts_beyond_the_order_cap() {
    let ctx = TestContext::new().await;

    // Above the cap and large enough that a paise conversion would leave i64
    let (status, body) = ctx
        .post_json(
            "/api/checkout/orders",
            &json!({ "amount": i64::MAX / 100 + 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("must not exceed")));

    let (status, _) = ctx
        .post_json("/api/checkout/orders", &json!({ "amount": 10_000_001 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejects_unsupported_currency() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .post_json(
            "/api/checkout/orders",
            &json!({ "amount": 500, "currency": "USD" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn resubmitted_receipt_reuses_existing_order() {
    let ctx = TestContext::new().await;

    // The gateway must only see one order for the receipt
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_R1", 420_000)))
        .expect(1)
        .mount(&ctx.razorpay)
        .await;

    let request = json!({ "amount": 4200, "receipt": "rcpt_repeat01" });

    let (status, first) = ctx.post_json("/api/checkout/orders", &request).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = ctx.post_json("/api/checkout/orders", &request).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["amount"], 420_000);
}

#[tokio::test]
async fn concurrent_resubmissions_create_one_gateway_order() {
    let ctx = TestContext::new().await;

    // A slow gateway widens the window in which both submissions are in
    // flight; the store must still collapse them onto one order.
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(gateway_order("order_R2", 420_000))
                .set_delay(std::time::Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&ctx.razorpay)
        .await;

    let request = json!({ "amount": 4200, "receipt": "rcpt_doubleclk" });

    let (first, second) = tokio::join!(
        ctx.post_json("/api/checkout/orders", &request),
        ctx.post_json("/api/checkout/orders", &request),
    );

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);
    assert_eq!(first.1["id"], "order_R2");
    assert_eq!(first.1["id"], second.1["id"]);
}

#[tokio::test]
async fn resubmitted_receipt_with_different_amount_is_rejected() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(gateway_order("order_R3", 420_000)))
        .expect(1)
        .mount(&ctx.razorpay)
        .await;

    let (status, _) = ctx
        .post_json(
            "/api/checkout/orders",
            &json!({ "amount": 4200, "receipt": "rcpt_amended1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // A retry with a corrected amount must not silently return the old order
    let (status, body) = ctx
        .post_json(
            "/api/checkout/orders",
            &json!({ "amount": 5200, "receipt": "rcpt_amended1" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("different amount")));
}

#[tokio::test]
async fn gateway_failure_maps_to_bad_gateway() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&ctx.razorpay)
        .await;

    let (status, body) = ctx
        .post_json("/api/checkout/orders", &json!({ "amount": 500 }))
        .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    // Upstream details stay out of the response
    assert_eq!(body["error"], "Payment gateway unavailable");
}
