mod common;

use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use intouch_gateway::db::PaymentStore;
use intouch_gateway::models::PaymentRequest;

async fn post_callback(
    router: axum::Router,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/payment/intouch/callback")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn callback_initiates_and_settles_asynchronously() {
    let server = MockServer::start().await;
    let app = common::spawn_app(&server.uri());
    let id = Uuid::new_v4();
    app.store.insert(PaymentRequest::new(id, 2500)).await;

    Mock::given(method("PUT"))
        .and(path("/touchpayapi/AG_TEST/transaction"))
        .and(query_param("loginAgent", "agent_t"))
        .and(query_param("passwordAgent", "secret_t"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "idFromClient": id.to_string(),
            "amount": "2500",
            "recipientNumber": "697770011",
            "serviceCode": "CM_PAIEMENTMARCHAND_OM_TP",
            "additionnalInfos": { "destinataire": "697770011" },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "INITIATED"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/NKWEK10292/check_status"))
        .and(body_partial_json(json!({
            "partner_id": "PAW0000",
            "partner_transaction_id": id.to_string(),
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "SUCCESSFUL", "transactionId": "T1"})),
        )
        .mount(&server)
        .await;

    let (status, body) = post_callback(
        app.router.clone(),
        json!({ "payment_id": id, "mobile_number": "697770011" }),
    )
    .await;

    // The caller is released immediately; settlement happens in the worker.
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "PENDING");

    let settled = wait_for_settlement(&app.store, id).await;
    assert!(settled.is_paid);
    assert_eq!(settled.transaction_id.as_deref(), Some("T1"));
    assert_eq!(settled.payment_method.as_deref(), Some("intouch"));
}

#[tokio::test]
async fn callback_accepts_the_providers_field_spelling() {
    let server = MockServer::start().await;
    let app = common::spawn_app(&server.uri());
    let id = Uuid::new_v4();
    app.store.insert(PaymentRequest::new(id, 1000)).await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "FAILED"})))
        .mount(&server)
        .await;

    let (status, _) = post_callback(
        app.router.clone(),
        json!({ "paymentID": id, "mobile_number": "697770011" }),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn callback_for_unknown_payment_is_a_no_op() {
    let server = MockServer::start().await;
    let app = common::spawn_app(&server.uri());

    // The provider must not be contacted at all.
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = post_callback(
        app.router.clone(),
        json!({ "payment_id": Uuid::new_v4(), "mobile_number": "697770011" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "NO_PENDING_PAYMENT");
}

#[tokio::test]
async fn initiation_transport_failure_is_a_bad_gateway_and_enqueues_nothing() {
    // Status host is mocked so any queued settlement would show up as a
    // poll; the initiation host refuses connections outright.
    let server = MockServer::start().await;
    let mut config = common::intouch_config("http://127.0.0.1:9");
    config.status.base_url = server.uri();
    let app = common::spawn_app_with(config);

    let id = Uuid::new_v4();
    app.store.insert(PaymentRequest::new(id, 2500)).await;

    Mock::given(method("POST"))
        .and(path("/NKWEK10292/check_status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESSFUL"})))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = post_callback(
        app.router.clone(),
        json!({ "payment_id": id, "mobile_number": "697770011" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "EXTERNAL_SERVICE_ERROR");

    // Give a mistakenly queued job time to poll before verifying.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let payment = app.store.find_by_id(id).await.unwrap().unwrap();
    assert!(!payment.is_paid);
    server.verify().await;
}

#[tokio::test]
async fn callback_rejects_invalid_mobile_numbers() {
    let app = common::spawn_app("http://provider.invalid");
    let id = Uuid::new_v4();
    app.store.insert(PaymentRequest::new(id, 1000)).await;

    let (status, body) = post_callback(
        app.router.clone(),
        json!({ "payment_id": id, "mobile_number": "123" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"].get("mobile_number").is_some());
}

async fn wait_for_settlement(
    store: &intouch_gateway::db::InMemoryPaymentStore,
    id: Uuid,
) -> PaymentRequest {
    for _ in 0..200 {
        if let Some(payment) = store.find_by_id(id).await.unwrap() {
            if payment.is_paid {
                return payment;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("payment {} never settled", id);
}
