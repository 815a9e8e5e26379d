use std::{net::SocketAddr, path::Path};

use ml_core::{ArtifactStore, LinearRegression, StandardScaler};
use ndarray::array;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use server::AppState;
use tokio::net::TcpListener;

async fn spawn_server(artifacts: &Path) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = AppState::new(artifacts);
    tokio::spawn(server::run(listener, state));
    addr
}

fn write_artifacts(dir: &Path) {
    let x = array![
        [50.0, 1.0, 5.0],
        [60.0, 2.0, 10.0],
        [45.0, 1.0, 2.0],
        [70.0, 3.0, 15.0],
        [80.0, 3.0, 20.0],
        [90.0, 4.0, 25.0],
        [55.0, 2.0, 8.0],
        [65.0, 2.0, 12.0],
    ];
    let scaler = StandardScaler::fit(x.view()).unwrap();
    let model = LinearRegression::new(vec![54.08, 10.91, 2.73], 242.65);
    ArtifactStore::new(dir).save(&scaler, &model).unwrap();
}

async fn post_json(addr: SocketAddr, body: Value) -> (StatusCode, Value) {
    let res = Client::new()
        .post(format!("http://{addr}/api/predict"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn health_tracks_artifacts_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(dir.path()).await;
    let url = format!("http://{addr}/api/health");

    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(
        body,
        json!({ "status": "unhealthy", "model_loaded": false, "scaler_loaded": false })
    );

    write_artifacts(dir.path());
    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(
        body,
        json!({ "status": "healthy", "model_loaded": true, "scaler_loaded": true })
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn info_is_static() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(dir.path()).await;

    let res = reqwest::get(format!("http://{addr}/api/info")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["algorithm"], "LinearRegression");
    assert_eq!(body["features"], json!(["size", "bedrooms", "age"]));
    assert_eq!(body["target"], "price");
    assert_eq!(body["metrics"], json!({ "r2": 0.9783, "rmse": 11.6, "mae": 8.24 }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn predicts_deterministically() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let addr = spawn_server(dir.path()).await;

    let input = json!({ "size": 80, "bedrooms": 3, "age": 15 });
    let (status, first) = post_json(addr, input.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let price = first["prediction"].as_f64().unwrap();
    assert!(price.is_finite());
    assert_eq!(price, (price * 100.0).round() / 100.0);
    assert_eq!(first["features"], json!({ "size": 80.0, "bedrooms": 3, "age": 15 }));
    assert_eq!(first["model_info"]["algorithm"], "LinearRegression");

    let (_, second) = post_json(addr, input).await;
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn range_bounds_are_inclusive() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let addr = spawn_server(dir.path()).await;

    for (size, bedrooms, age) in [(40, 1, 1), (120, 5, 35)] {
        let body = json!({ "size": size, "bedrooms": bedrooms, "age": age });
        let (status, _) = post_json(addr, body).await;
        assert_eq!(status, StatusCode::OK, "{size}/{bedrooms}/{age}");
    }

    let rejected = [
        (39, 3, 10),
        (121, 3, 10),
        (80, 0, 10),
        (80, 6, 10),
        (80, 3, 0),
        (80, 3, 36),
    ];
    for (size, bedrooms, age) in rejected {
        let body = json!({ "size": size, "bedrooms": bedrooms, "age": age });
        let (status, body) = post_json(addr, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{size}/{bedrooms}/{age}");
        assert!(body["error"].as_str().unwrap().contains("must be between"));
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_field_is_a_client_error() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let addr = spawn_server(dir.path()).await;

    let (status, body) = post_json(addr, json!({ "size": 80, "bedrooms": 3 })).await;
    assert!(status.is_client_error(), "{status}");
    assert!(body["error"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn missing_artifacts_make_predictions_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let addr = spawn_server(dir.path()).await;

    let (status, body) = post_json(addr, json!({ "size": 80, "bedrooms": 3, "age": 15 })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].is_string());

    let (status, _) = post_json(addr, json!({ "size": 10, "bedrooms": 3, "age": 15 })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn corrupt_model_is_unhealthy_and_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    std::fs::write(dir.path().join("modelo.json"), b"{ not a model").unwrap();
    let addr = spawn_server(dir.path()).await;

    let url = format!("http://{addr}/api/health");
    let body: Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert_eq!(
        body,
        json!({ "status": "unhealthy", "model_loaded": false, "scaler_loaded": true })
    );

    let (status, body) = post_json(addr, json!({ "size": 80, "bedrooms": 3, "age": 15 })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("corrupt"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fractional_counts_are_truncated() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let addr = spawn_server(dir.path()).await;

    let (status, fractional) =
        post_json(addr, json!({ "size": 80, "bedrooms": 5.5, "age": 15.7 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fractional["features"], json!({ "size": 80.0, "bedrooms": 5, "age": 15 }));

    let (_, whole) = post_json(addr, json!({ "size": 80, "bedrooms": 5, "age": 15 })).await;
    assert_eq!(fractional["prediction"], whole["prediction"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn form_renders_estimate_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    write_artifacts(dir.path());
    let addr = spawn_server(dir.path()).await;
    let client = Client::new();

    let page = client
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("<form"));

    let res = client
        .post(format!("http://{addr}/"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("size=80&bedrooms=3&age=15")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Estimated price: $"));

    let res = client
        .post(format!("http://{addr}/"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("size=300&bedrooms=3&age=15")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().contains("size must be between 40 and 120"));

    let res = client
        .post(format!("http://{addr}/"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("size=80&bedrooms=2.5&age=15")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.text().await.unwrap().contains("bedrooms must be a whole number"));
}
