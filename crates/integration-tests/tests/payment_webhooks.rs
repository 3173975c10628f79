//! Integration tests for the payment webhook and the captured-payment flow.

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use dynasty_integration_tests::{TestContext, sign_webhook, valid_address};

fn captured_event(payment_id: &str, order_id: &str) -> Vec<u8> {
    json!({
        "event": "payment.captured",
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "order_id": order_id,
                    "status": "captured"
                }
            }
        }
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn valid_signature_is_accepted() {
    let ctx = TestContext::new().await;

    let body = captured_event("pay_wh1", "order_wh1");
    let signature = sign_webhook(&body);

    let (status, response) = ctx.post_webhook(&body, &signature).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "OK");
}

#[tokio::test]
async fn single_altered_byte_is_rejected() {
    let ctx = TestContext::new().await;

    let body = captured_event("pay_wh2", "order_wh2");
    let signature = sign_webhook(&body);

    let mut tampered = body.clone();
    let last = tampered.len() - 1;
    tampered[last] ^= 0x01;

    let (status, response) = ctx.post_webhook(&tampered, &signature).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Invalid");
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let ctx = TestContext::new().await;

    let body = captured_event("pay_wh3", "order_wh3");
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/webhooks/payment")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body))
        .expect("failed to build request");

    let (status, response) = ctx.send(request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["message"], "Invalid");
}

#[tokio::test]
async fn unknown_events_are_acknowledged() {
    let ctx = TestContext::new().await;

    let body = json!({ "event": "refund.processed" }).to_string().into_bytes();
    let signature = sign_webhook(&body);

    let (status, response) = ctx.post_webhook(&body, &signature).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "OK");
}

/// Order creation, capture webhook, shipment, confirmation: the whole
/// sequence correlated through the server-side record.
#[tokio::test]
async fn captured_payment_flows_through_to_confirmation() {
    let ctx = TestContext::new().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_flow1",
            "amount": 50_000,
            "currency": "INR",
            "receipt": "rcpt_flow1"
        })))
        .mount(&ctx.razorpay)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/cmu/create.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "packages": [{ "waybill": "WB9900112233", "edd": "2026-09-10" }]
        })))
        .mount(&ctx.delhivery)
        .await;

    let (status, _) = ctx
        .post_json(
            "/api/checkout/orders",
            &json!({ "amount": 500, "receipt": "rcpt_flow1" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let body = captured_event("pay_flow1", "order_flow1");
    let signature = sign_webhook(&body);
    let (status, _) = ctx.post_webhook(&body, &signature).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .post_json(
            "/api/checkout/shipments",
            &json!({
                "paymentId": "pay_flow1",
                "address": valid_address(),
                "order": {
                    "products": [{ "name": "Regal Paisley Necktie", "quantity": 1 }],
                    "amount": 500
                }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The confirmation view comes from the server-side record, not the query
    let (status, view) = ctx
        .get("/order-confirmation?paymentId=pay_flow1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "Processing");
    assert_eq!(view["trackingId"], "WB9900112233");
    assert_eq!(view["estimatedDelivery"], "2026-09-10");
    assert_eq!(
        view["trackingUrl"],
        "https://www.delhivery.com/track/package/WB9900112233"
    );
}
