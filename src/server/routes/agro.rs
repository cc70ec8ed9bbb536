use crate::core::payload::parse_agro_payload;
use crate::server::state::SharedAgro;
use crate::server::ApiError;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct AgroResponse {
    pub recommended_crop: String,
}

/// POST /predict - no input validation; any lookup or prediction failure is
/// an internal error, matching the contract this endpoint has always had.
pub async fn predict(
    State(state): State<SharedAgro>,
    Json(payload): Json<Value>,
) -> Result<Json<AgroResponse>, ApiError> {
    let features =
        parse_agro_payload(&payload).map_err(|e| ApiError::internal(e.to_string()))?;
    let recommended_crop = state
        .recommender
        .predict(&features)
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(AgroResponse { recommended_crop }))
}
