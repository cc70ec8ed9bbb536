use crate::core::payload::parse_payload;
use crate::domain::model::Prediction;
use crate::server::state::SharedRecommender;
use crate::server::ApiError;
use axum::extract::State;
use axum::Json;
use serde_json::Value;

/// POST /api/crop/recommend and POST /predict - validate the payload, build
/// the feature row, predict top-1 and, when the model estimates
/// probabilities, top-3.
pub async fn recommend(
    State(state): State<SharedRecommender>,
    Json(payload): Json<Value>,
) -> Result<Json<Prediction>, ApiError> {
    let row = parse_payload(&payload)?;
    let prediction = state.recommender.recommend(&row)?;
    Ok(Json(prediction))
}
