//! HTTP 接口测试

mod common;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use courier_errors::ProblemDetails;
use postal::api::{AppState, router};
use postal::application::dto::{ClientDto, ShipmentDto, ShipmentTrackingDetailDto, TariffGridDto};
use postal::domain::value_objects::{ClientId, ShipmentId};
use rust_decimal_macros::dec;
use serde::de::DeserializeOwned;
use serde_json::json;
use tower::ServiceExt;

async fn app() -> Router {
    let fixture = common::seeded().await;
    router(AppState::new(fixture.services))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_list_shipments() {
    let response = app().await.oneshot(get("/shipments")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let shipments: Vec<ShipmentDto> = read(response).await;
    assert_eq!(shipments.len(), 3);
}

#[tokio::test]
async fn test_missing_shipment_is_problem_json() {
    let uri = format!("/shipments/{}", ShipmentId::new());
    let response = app().await.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    let problem: ProblemDetails = read(response).await;
    assert_eq!(problem.status, 404);
}

#[tokio::test]
async fn test_sentinels_map_to_not_found() {
    let app = app().await;
    let missing = ShipmentId::new();

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/shipments/{}", missing))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let add = send_json("POST", &format!("/shipments/{}/parcels", missing), json!([]));
    let response = app.clone().oneshot(add).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let by_client = format!("/clients/{}/shipments", ClientId::new());
    let response = app.oneshot(get(&by_client)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_shipment() {
    let app = app().await;
    let clients: Vec<ClientDto> = read(app.clone().oneshot(get("/clients")).await.unwrap()).await;
    let sender = clients[0].id.unwrap();
    let recipient = clients[1].id.unwrap();

    let body = json!({
        "sender_id": sender,
        "recipient_id": recipient,
        "delivery_type": "W2W",
        "parcels": [{
            "weight": 3.0,
            "length": 1.0,
            "declared_price": "8.5",
            "parcel_items": [{ "name": "Book", "quantity": 1, "weight": 0.5, "price": "10" }]
        }]
    });
    let response = app
        .clone()
        .oneshot(send_json("POST", "/shipments", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let created: ShipmentDto = read(response).await;
    assert_eq!(created.price.amount(), dec!(36.34));
    assert_eq!(created.barcode.as_deref(), Some("000030000004"));

    let uri = format!("/clients/{}/shipments", sender);
    let sent: Vec<ShipmentDto> = read(app.oneshot(get(&uri)).await.unwrap()).await;
    assert_eq!(sent.len(), 3);
}

#[tokio::test]
async fn test_delete_shipment() {
    let app = app().await;
    let shipments: Vec<ShipmentDto> =
        read(app.clone().oneshot(get("/shipments")).await.unwrap()).await;
    let uri = format!("/shipments/{}", shipments[0].id.unwrap());

    let delete = Request::builder()
        .method("DELETE")
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_shipment_tracking() {
    let app = app().await;
    let shipments: Vec<ShipmentDto> =
        read(app.clone().oneshot(get("/shipments")).await.unwrap()).await;

    let uri = format!("/shipments/{}/tracking", shipments[0].id.unwrap());
    let response = app.oneshot(get(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tracking: Vec<ShipmentTrackingDetailDto> = read(response).await;
    assert_eq!(tracking.len(), 1);
}

#[tokio::test]
async fn test_tariff_by_dimension() {
    let response = app()
        .await
        .oneshot(get("/tariffs/by-dimension?weight=3&length=1&variation=COUNTRY"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let tariff: TariffGridDto = read(response).await;
    assert_eq!(tariff.weight, 5.0);
    assert_eq!(tariff.price.amount(), dec!(36));
}

#[tokio::test]
async fn test_invalid_postcode_is_rejected() {
    let response = app()
        .await
        .oneshot(send_json("POST", "/postcodes", json!({ "postcode": "12" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_postcode_is_conflict() {
    let response = app()
        .await
        .oneshot(send_json("POST", "/postcodes", json!({ "postcode": "00001" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}
