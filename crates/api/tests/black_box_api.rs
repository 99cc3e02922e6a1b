use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};

use shiptrack_api::app::services::build_services;
use shiptrack_api::app::{build_app, AppServices};
use shiptrack_core::{Clock, ManualClock};
use shiptrack_infra::InMemoryDeliveryRepository;

struct TestServer {
    base_url: String,
    services: Arc<AppServices>,
    clock: Arc<ManualClock>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over an in-memory store and a hand-driven clock.
        let clock = Arc::new(ManualClock::starting_now());
        let services = Arc::new(
            build_services(
                Arc::new(InMemoryDeliveryRepository::new()),
                clock.clone() as Arc<dyn Clock>,
            )
            .expect("services should build"),
        );
        let app = build_app(services.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            services,
            clock,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/deliveries"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    async fn status_of(&self, delivery_id: &str) -> Value {
        let res = self
            .client
            .get(self.url(&format!("/deliveries/{delivery_id}/status")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        res.json().await.unwrap()
    }

    async fn webhook(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/webhooks/tls/status"))
            .json(body)
            .send()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn address(street: &str) -> Value {
    json!({
        "street": street,
        "city": "Barcelona",
        "state": "Catalonia",
        "country": "Spain",
        "zipCode": "08008"
    })
}

fn delivery_body(order_id: &str, weight: f64) -> Value {
    json!({
        "orderId": order_id,
        "sender": address("Carrer de Balmes 123"),
        "recipient": address("Passeig de Gracia 456"),
        "packagingType": "box",
        "dimensions": { "length": 30, "width": 20, "height": 15, "weight": weight },
        "items": [
            { "productId": "PROD-1", "quantity": 1, "unitWeight": weight }
        ]
    })
}

#[tokio::test]
async fn health_is_ok() {
    let server = TestServer::spawn().await;

    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn light_parcel_is_tracked_through_the_tls_webhook() {
    let server = TestServer::spawn().await;

    let res = server.create(&delivery_body("ORDER-LIGHT", 2.5)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();

    assert_eq!(created["status"], "created");
    assert_eq!(created["shippingLabel"]["provider"], "TLS");
    let delivery_id = created["deliveryId"].as_str().unwrap().to_string();
    let tracking = created["shippingLabel"]["trackingNumber"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(created["shippingLabel"]["labelUrl"]
        .as_str()
        .unwrap()
        .contains(&tracking));

    let res = server
        .webhook(&json!({
            "trackingId": tracking,
            "status": "shipped",
            "timestamp": Utc::now().to_rfc3339()
        }))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let ack: Value = res.json().await.unwrap();
    assert_eq!(ack, json!({ "success": true }));

    let status = server.status_of(&delivery_id).await;
    assert_eq!(status["deliveryId"], delivery_id.as_str());
    assert_eq!(status["status"], "shipped");
    assert!(status["lastUpdated"].as_str().unwrap().ends_with('Z'));

    // A sweep never touches webhook-driven deliveries.
    server.clock.advance(ChronoDuration::hours(2));
    let summary = server.services.polling.run_once().await.unwrap();
    assert_eq!(summary.polled, 0);
    assert_eq!(summary.skipped, 1);
    assert_eq!(server.status_of(&delivery_id).await["status"], "shipped");
}

#[tokio::test]
async fn heavy_parcel_advances_with_each_nrw_sweep() {
    let server = TestServer::spawn().await;

    let res = server.create(&delivery_body("ORDER-HEAVY", 45.0)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["shippingLabel"]["provider"], "NRW");
    let delivery_id = created["deliveryId"].as_str().unwrap().to_string();

    for (minutes, expected) in [(6, "shipped"), (10, "in_transit"), (30, "delivered")] {
        server.clock.advance(ChronoDuration::minutes(minutes));
        server.services.polling.run_once().await.unwrap();
        assert_eq!(server.status_of(&delivery_id).await["status"], expected);
    }

    // Delivered parcels are no longer active.
    let summary = server.services.polling.run_once().await.unwrap();
    assert_eq!(summary.polled, 0);
}

#[tokio::test]
async fn webhook_for_a_polled_parcel_is_refused_and_polling_still_delivers_it() {
    let server = TestServer::spawn().await;

    let res = server.create(&delivery_body("ORDER-NRW-HOOK", 45.0)).await;
    let created: Value = res.json().await.unwrap();
    let delivery_id = created["deliveryId"].as_str().unwrap().to_string();
    let tracking = created["shippingLabel"]["trackingNumber"]
        .as_str()
        .unwrap()
        .to_string();

    let res = server
        .webhook(&json!({
            "trackingId": tracking,
            "status": "shipped",
            "timestamp": Utc::now().to_rfc3339()
        }))
        .await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
    assert_eq!(server.status_of(&delivery_id).await["status"], "created");

    server.clock.advance(ChronoDuration::hours(5));
    let summary = server.services.polling.run_once().await.unwrap();
    assert_eq!(summary.polled, 1);
    assert_eq!(server.status_of(&delivery_id).await["status"], "delivered");
}

#[tokio::test]
async fn second_delivery_for_an_order_is_a_conflict() {
    let server = TestServer::spawn().await;

    let res = server.create(&delivery_body("ORDER-DUP", 3.0)).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = server.create(&delivery_body("ORDER-DUP", 30.0)).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn invalid_requests_are_rejected_with_400() {
    let server = TestServer::spawn().await;

    let mut blank_street = delivery_body("ORDER-BAD-1", 2.0);
    blank_street["sender"]["street"] = json!("   ");
    let res = server.create(&blank_street).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["message"], "Street is required");

    let mut no_items = delivery_body("ORDER-BAD-2", 2.0);
    no_items["items"] = json!([]);
    let res = server.create(&no_items).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url("/deliveries"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn unknown_and_malformed_ids_are_reported() {
    let server = TestServer::spawn().await;

    let unknown = uuid_like();
    let res = server
        .client
        .get(server.url(&format!("/deliveries/{unknown}/status")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .client
        .get(server.url("/deliveries/not-a-uuid/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_id");

    let res = server
        .webhook(&json!({
            "trackingId": uuid_like(),
            "status": "delivered",
            "timestamp": Utc::now().to_rfc3339()
        }))
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server.client.get(server.url("/nowhere")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Route not found");
}

fn uuid_like() -> String {
    shiptrack_core::TrackingId::new().to_string()
}
