use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use droproute_core::{Footprint, Point};

use crate::{api, config::Config, state::AppState};

fn setup_app() -> (Router, Arc<AppState>) {
    let config = Config {
        server_port: 0,
        valhalla_url: "http://localhost:8888".to_string(),
        profile: "pedestrian".to_string(),
        cell_size_deg: 0.0015,
        two_opt_passes: 5,
        detour_factor: 3.0,
        detour_min_m: 50.0,
        global_opt_max_points: 75,
        max_concurrent_calls: 4,
    };
    let state = Arc::new(AppState::new(config));
    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn square_footprint(id: &str) -> Footprint {
    Footprint {
        id: id.to_string(),
        name: Some("block".to_string()),
        rings: vec![vec![
            Point::new(7.4595, 51.5120),
            Point::new(7.4605, 51.5120),
            Point::new(7.4605, 51.5124),
            Point::new(7.4595, 51.5124),
        ]],
    }
}

#[tokio::test]
async fn upload_and_list_footprints() {
    let (app, state) = setup_app();

    let upload_req = Request::builder()
        .method("POST")
        .uri("/v1/footprints")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": { "name": "Depot Block" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [7.4595, 51.5120],
                            [7.4605, 51.5120],
                            [7.4605, 51.5124],
                            [7.4595, 51.5124],
                            [7.4595, 51.5120]
                        ]]
                    }
                }]
            })
            .to_string(),
        ))
        .unwrap();

    let upload_res = app.clone().oneshot(upload_req).await.unwrap();
    assert_eq!(upload_res.status(), StatusCode::CREATED);
    let upload_body = read_json(upload_res).await;
    assert_eq!(upload_body["added"], 1);
    assert_eq!(upload_body["skipped"], 0);
    assert_eq!(state.footprints().len(), 1);

    let list_req = Request::builder()
        .method("GET")
        .uri("/v1/footprints")
        .body(Body::empty())
        .unwrap();
    let list_res = app.clone().oneshot(list_req).await.unwrap();
    assert_eq!(list_res.status(), StatusCode::OK);
    let list_body = read_json(list_res).await;
    assert_eq!(list_body[0]["name"], "Depot Block");
    assert_eq!(list_body[0]["ring_count"], 1);
    // The closing vertex of the ring is kept as uploaded.
    assert_eq!(list_body[0]["vertex_count"], 5);
    assert!(list_body[0]["id"].as_str().is_some());
}

#[tokio::test]
async fn upload_without_polygons_is_rejected() {
    let (app, state) = setup_app();

    let req = Request::builder()
        .method("POST")
        .uri("/v1/footprints")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {},
                    "geometry": { "type": "Point", "coordinates": [7.46, 51.51] }
                }]
            })
            .to_string(),
        ))
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["error"], "No polygon features found");
    assert_eq!(body["skipped"], 1);
    assert!(state.footprints().is_empty());
}

#[tokio::test]
async fn plan_with_one_point_is_rejected() {
    let (app, _state) = setup_app();

    // Fails input validation before the planner contacts the routing engine.
    let req = Request::builder()
        .method("POST")
        .uri("/v1/routes/plan")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "points": [[7.46, 51.51]] }).to_string()))
        .unwrap();

    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = read_json(res).await;
    assert_eq!(body["ok"], false);
    assert!(body["errors"][0]
        .as_str()
        .expect("error message")
        .contains("need at least 2 valid points"));
}

#[tokio::test]
async fn delete_footprint_by_id() {
    let (app, state) = setup_app();
    state.add_footprint(square_footprint("fp-1"));

    let del_req = Request::builder()
        .method("DELETE")
        .uri("/v1/footprints/fp-1")
        .body(Body::empty())
        .unwrap();
    let del_res = app.clone().oneshot(del_req).await.unwrap();
    assert_eq!(del_res.status(), StatusCode::NO_CONTENT);
    assert!(state.footprints().is_empty());

    let again_req = Request::builder()
        .method("DELETE")
        .uri("/v1/footprints/fp-1")
        .body(Body::empty())
        .unwrap();
    let again_res = app.clone().oneshot(again_req).await.unwrap();
    assert_eq!(again_res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn clear_reports_removed_count() {
    let (app, state) = setup_app();
    state.add_footprint(square_footprint("fp-1"));
    state.add_footprint(square_footprint("fp-2"));

    let req = Request::builder()
        .method("DELETE")
        .uri("/v1/footprints")
        .body(Body::empty())
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = read_json(res).await;
    assert_eq!(body["removed"], 2);
    assert!(state.footprints().is_empty());
}
