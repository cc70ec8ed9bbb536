use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use crop_recommender::server::recommender_app;
use crop_recommender::server::state::RecommenderState;
use crop_recommender::{
    LocalStore, Recommender, RecommenderTrainPipeline, TrainEngine, TrainRecommenderConfig,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn dataset_csv() -> String {
    let mut csv = String::from("Location,Time,Soil Condition,pH,Crop\n");
    let rows = [
        ("Ratnapura", "Rice"),
        ("Kandy", "Tea"),
        ("Galle", "Coconut"),
    ];
    for (location, crop) in rows {
        for time in ["Yala", "Maha"] {
            for soil in ["Sandy loam", "Clay"] {
                for ph in ["5.8", "6.3"] {
                    csv.push_str(&format!("{location},{time},{soil},{ph},{crop}\n"));
                }
            }
        }
    }
    csv
}

async fn build_app() -> (Router, Vec<String>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("crop_dataset.csv");
    std::fs::write(&dataset, dataset_csv()).unwrap();

    let model_out = dir.path().join("crop_model.bin").display().to_string();
    let label_out = dir
        .path()
        .join("crop_label_encoder.bin")
        .display()
        .to_string();

    let config = TrainRecommenderConfig {
        dataset: dataset.display().to_string(),
        target_column: "Crop".to_string(),
        model_out: model_out.clone(),
        label_out: label_out.clone(),
        trees: 25,
        max_depth: None,
        holdout: 0.2,
        seed: 42,
        config: None,
        verbose: false,
        monitor: false,
    };

    let pipeline = RecommenderTrainPipeline::new(LocalStore::default(), config);
    TrainEngine::new(pipeline).run().await.unwrap();

    let recommender = Recommender::load(&LocalStore::default(), &model_out, &label_out)
        .await
        .unwrap();
    let classes = recommender.classes().to_vec();
    let app = recommender_app(Arc::new(RecommenderState { recommender }));
    (app, classes, dir)
}

async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

fn valid_payload() -> Value {
    json!({
        "Location": "Ratnapura",
        "Time": "Yala",
        "Soil Condition": "Sandy loam",
        "pH": 6.3
    })
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _, _dir) = build_app().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn valid_payload_returns_recommendation() {
    let (app, classes, _dir) = build_app().await;

    let (status, body) = post_json(app, "/api/crop/recommend", valid_payload()).await;

    assert_eq!(status, StatusCode::OK);
    let crop = body["recommended_crop"].as_str().unwrap();
    assert!(classes.iter().any(|c| c == crop));

    let top3 = body["top3"].as_array().unwrap();
    assert!(top3.len() <= 3);
    assert_eq!(top3.len(), 3); // three classes in the training set

    let probs: Vec<f64> = top3.iter().map(|e| e["prob"].as_f64().unwrap()).collect();
    assert!(probs.windows(2).all(|w| w[0] >= w[1]));
    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!(probs.iter().sum::<f64>() <= 1.0 + 1e-9);

    // Top-1 and the head of top-3 agree.
    assert_eq!(top3[0]["crop"].as_str().unwrap(), crop);
}

#[tokio::test]
async fn legacy_predict_route_matches_contract() {
    let (app, classes, _dir) = build_app().await;

    let (status, body) = post_json(app, "/predict", valid_payload()).await;

    assert_eq!(status, StatusCode::OK);
    let crop = body["recommended_crop"].as_str().unwrap();
    assert!(classes.iter().any(|c| c == crop));
    assert!(body["top3"].is_array());
}

#[tokio::test]
async fn missing_keys_name_the_missing_keys() {
    let (app, _, _dir) = build_app().await;

    let (status, body) = post_json(app, "/api/crop/recommend", json!({"Time": "Yala"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("Missing required keys:"));
    assert!(message.contains("Location"));
    assert!(message.contains("Soil Condition"));
    assert!(message.contains("pH"));
}

#[tokio::test]
async fn every_single_missing_key_is_reported() {
    let (app, _, _dir) = build_app().await;

    for key in ["Location", "Time", "Soil Condition", "pH"] {
        let mut payload = valid_payload();
        payload.as_object_mut().unwrap().remove(key);
        let (status, body) = post_json(app.clone(), "/api/crop/recommend", payload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains(key));
    }
}

#[tokio::test]
async fn unknown_season_is_a_bad_request() {
    let (app, _, _dir) = build_app().await;

    let mut payload = valid_payload();
    payload["Time"] = json!("Monsoon");
    let (status, body) = post_json(app, "/predict", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Time must be 'Yala' or 'Maha'.");
}

#[tokio::test]
async fn non_numeric_ph_is_a_bad_request() {
    let (app, _, _dir) = build_app().await;

    let mut payload = valid_payload();
    payload["pH"] = json!("acidic");
    let (status, body) = post_json(app, "/api/crop/recommend", payload).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "pH must be numeric.");
}

#[tokio::test]
async fn unseen_location_is_an_internal_error() {
    let (app, _, _dir) = build_app().await;

    let mut payload = valid_payload();
    payload["Location"] = json!("Atlantis");
    let (status, body) = post_json(app, "/api/crop/recommend", payload).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("Atlantis"));
}
