//! End-to-end test against a real listener using an HTTP client.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;

use hotel_booking::api::{build_metrics_router, build_router};
use hotel_booking::app_state::AppState;
use hotel_booking::metrics::BookingMetrics;
use hotel_booking::persistence::SqlitePersistence;
use hotel_booking::service::BookingService;

async fn spawn_server() -> (SocketAddr, SocketAddr, Arc<BookingMetrics>) {
    let Ok(store) = SqlitePersistence::in_memory().await else {
        panic!("in-memory database should open");
    };
    let Ok(true) = store.seed_if_empty().await else {
        panic!("fresh database should seed");
    };
    let Ok(metrics) = BookingMetrics::new() else {
        panic!("metrics registry should build");
    };
    let metrics = Arc::new(metrics);
    let state = AppState::new(BookingService::new(store, Arc::clone(&metrics)));

    let addr = serve(build_router(state.clone())).await;
    let metrics_addr = serve(build_metrics_router(state)).await;
    (addr, metrics_addr, metrics)
}

async fn serve(app: axum::Router) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn client() -> reqwest::Client {
    let Ok(client) = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
    else {
        panic!("client should build");
    };
    client
}

async fn get_json(client: &reqwest::Client, url: &str) -> serde_json::Value {
    let Ok(response) = client.get(url).send().await else {
        panic!("GET {url} failed");
    };
    assert!(response.status().is_success(), "GET {url}");
    let Ok(json) = response.json::<serde_json::Value>().await else {
        panic!("GET {url} returned non-json");
    };
    json
}

#[tokio::test]
async fn book_and_cancel_over_the_wire() {
    let (addr, metrics_addr, metrics) = spawn_server().await;
    let base = format!("http://{addr}");
    let client = client();

    let hotels = get_json(&client, &format!("{base}/")).await;
    assert_eq!(hotels["total"], 3);

    let hotel = get_json(&client, &format!("{base}/hotel/1")).await;
    let Some(room_101) = hotel["rooms"]
        .as_array()
        .and_then(|rooms| rooms.iter().find(|r| r["number"] == "101"))
        .and_then(|r| r["id"].as_i64())
    else {
        panic!("room 101 not listed");
    };

    let room_field = room_101.to_string();
    let Ok(response) = client
        .post(format!("{base}/hotel/1"))
        .form(&[("room_id", room_field.as_str()), ("date", "2024-01-01")])
        .send()
        .await
    else {
        panic!("booking request failed");
    };
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    assert_eq!(location.as_deref(), Some("/bookings"));

    let bookings = get_json(&client, &format!("{base}/bookings")).await;
    assert_eq!(bookings["total"], 1);
    assert_eq!(metrics.total_bookings(), 1);
    let Some(booking_id) = bookings["data"][0]["id"].as_i64() else {
        panic!("booking has no id");
    };

    let Ok(response) = client
        .post(format!("{base}/cancel/{booking_id}"))
        .send()
        .await
    else {
        panic!("cancel request failed");
    };
    assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);

    let bookings = get_json(&client, &format!("{base}/bookings")).await;
    assert_eq!(bookings["total"], 0);
    assert_eq!(metrics.total_bookings(), 0);

    let Ok(response) = client
        .get(format!("http://{metrics_addr}/metrics"))
        .send()
        .await
    else {
        panic!("scrape failed");
    };
    let Ok(text) = response.text().await else {
        panic!("scrape body unreadable");
    };
    assert!(text.contains("new_bookings_total 1"));
    assert!(text.contains("canceled_bookings_total 1"));
    assert!(text.contains("db_commits_total 2"));
    assert!(text.contains("total_bookings 0"));
}

#[tokio::test]
async fn metrics_listener_serves_only_metrics() {
    let (_, metrics_addr, _) = spawn_server().await;
    let client = client();

    let Ok(response) = client.get(format!("http://{metrics_addr}/")).send().await else {
        panic!("request failed");
    };
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn following_the_redirect_lands_on_the_booking_list() {
    let (addr, _, _) = spawn_server().await;
    let Ok(client) = reqwest::Client::builder().build() else {
        panic!("client should build");
    };

    let Ok(response) = client
        .post(format!("http://{addr}/hotel/2"))
        .form(&[("room_id", "9999"), ("date", "2024-01-01")])
        .send()
        .await
    else {
        panic!("booking request failed");
    };
    // A failed commit looks exactly like a successful one to the client.
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.url().path(), "/bookings");
    let Ok(list) = response.json::<serde_json::Value>().await else {
        panic!("booking list is not json");
    };
    assert_eq!(list["total"], 0);
}
