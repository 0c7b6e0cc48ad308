//! Planning API integration tests against a running server.
//!
//! Run with: cargo test --test routes_test -- --ignored

use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("DROPROUTE_TEST_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

#[tokio::test]
#[ignore]
async fn test_health() {
    let resp = reqwest::get(format!("{}/health", base_url())).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
#[ignore]
async fn test_plan_rejects_single_point() {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/v1/routes/plan", base_url()))
        .json(&json!({ "points": [[7.46, 51.51]] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(!body["errors"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_plan_round_trip() {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/v1/routes/plan", base_url()))
        .json(&json!({
            "points": [
                [7.4600, 51.5100],
                [7.4610, 51.5105],
                [7.4620, 51.5110],
                [7.4630, 51.5100],
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    // The plan succeeds even when no routing engine is reachable; the
    // segments then degrade to straight lines.
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["ok"], true);
    assert_eq!(body["visit_order"].as_array().unwrap().len(), 4);
    assert!(body["stats"]["cluster_count"].as_u64().unwrap() >= 1);
}

#[tokio::test]
#[ignore]
async fn test_footprint_crud() {
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/v1/footprints", base_url()))
        .json(&json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": { "name": "crud block" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[
                        [7.4600, 51.5100],
                        [7.4610, 51.5100],
                        [7.4610, 51.5110],
                        [7.4600, 51.5110],
                        [7.4600, 51.5100]
                    ]]
                }
            }]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["added"], 1);

    let resp = client
        .get(format!("{}/v1/footprints", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let listing: Value = resp.json().await.unwrap();
    let entry = listing
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["name"] == "crud block")
        .expect("uploaded footprint should be listed")
        .clone();

    let id = entry["id"].as_str().unwrap();
    let resp = client
        .delete(format!("{}/v1/footprints/{}", base_url(), id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client
        .delete(format!("{}/v1/footprints/{}", base_url(), id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_upload_rejects_non_polygon_geojson() {
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("{}/v1/footprints", base_url()))
        .json(&json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [7.46, 51.51] }
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_clear_footprints() {
    let client = reqwest::Client::new();
    let resp = client
        .delete(format!("{}/v1/footprints", base_url()))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let body: Value = resp.json().await.unwrap();
    assert!(body["removed"].as_u64().is_some());
}
