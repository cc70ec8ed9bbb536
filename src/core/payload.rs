use crate::domain::model::{AgroFeatures, FeatureRow};
use crate::utils::error::{CropError, Result};
use serde_json::Value;

/// Keys the recommendation endpoints require, named exactly as the trained
/// pipeline's columns.
pub const REQUIRED_KEYS: [&str; 4] = ["Location", "Time", "Soil Condition", "pH"];

/// The two cultivation seasons the model knows.
pub const SEASONS: [&str; 2] = ["Yala", "Maha"];

/// Field order Service B's model was trained with.
pub const AGRO_KEYS: [&str; 7] = [
    "N",
    "P",
    "K",
    "temperature",
    "humidity",
    "ph",
    "rainfall",
];

/// Validates a Service A payload and builds the feature row.
///
/// Checks run in order and the first failure wins; the messages are part of
/// the endpoint contract.
pub fn parse_payload(payload: &Value) -> Result<FeatureRow> {
    let object = payload
        .as_object()
        .ok_or_else(|| CropError::validation("Request body must be a JSON object."))?;

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(CropError::validation(format!(
            "Missing required keys: {}",
            missing.join(", ")
        )));
    }

    let location = object["Location"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CropError::validation("Location must be a non-empty string."))?;

    let time = object["Time"]
        .as_str()
        .filter(|s| SEASONS.contains(s))
        .ok_or_else(|| CropError::validation("Time must be 'Yala' or 'Maha'."))?;

    let soil_condition = object["Soil Condition"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CropError::validation("Soil Condition must be a non-empty string."))?;

    let ph = parse_number(&object["pH"])
        .ok_or_else(|| CropError::validation("pH must be numeric."))?;

    Ok(FeatureRow {
        location: location.to_string(),
        time: time.to_string(),
        soil_condition: soil_condition.to_string(),
        ph,
    })
}

/// Extracts Service B's seven fields. Deliberately no validation: a missing
/// or non-numeric field is a plain lookup failure, surfaced to the caller as
/// an internal error.
pub fn parse_agro_payload(payload: &Value) -> Result<AgroFeatures> {
    let mut values = [0f64; 7];
    for (slot, key) in values.iter_mut().zip(AGRO_KEYS) {
        *slot = payload
            .get(key)
            .and_then(parse_number)
            .ok_or_else(|| CropError::FieldLookupError {
                field: key.to_string(),
            })?;
    }
    let [n, p, k, temperature, humidity, ph, rainfall] = values;
    Ok(AgroFeatures {
        n,
        p,
        k,
        temperature,
        humidity,
        ph,
        rainfall,
    })
}

/// JSON numbers pass through; numeric strings are coerced, so clients may
/// send pH either way.
fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "Location": "Ratnapura",
            "Time": "Yala",
            "Soil Condition": "Sandy loam",
            "pH": 6.3
        })
    }

    #[test]
    fn accepts_valid_payload() {
        let row = parse_payload(&valid_payload()).unwrap();
        assert_eq!(row.location, "Ratnapura");
        assert_eq!(row.time, "Yala");
        assert_eq!(row.soil_condition, "Sandy loam");
        assert!((row.ph - 6.3).abs() < f64::EPSILON);
    }

    #[test]
    fn reports_all_missing_keys() {
        let err = parse_payload(&json!({"Time": "Yala"})).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Missing required keys:"));
        assert!(message.contains("Location"));
        assert!(message.contains("Soil Condition"));
        assert!(message.contains("pH"));
        assert!(!message.contains("Time,"));
    }

    #[test]
    fn rejects_blank_location() {
        let mut payload = valid_payload();
        payload["Location"] = json!("   ");
        let err = parse_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Location must be a non-empty string.");
    }

    #[test]
    fn rejects_unknown_season() {
        let mut payload = valid_payload();
        payload["Time"] = json!("Monsoon");
        let err = parse_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "Time must be 'Yala' or 'Maha'.");
    }

    #[test]
    fn rejects_non_string_season() {
        let mut payload = valid_payload();
        payload["Time"] = json!(3);
        assert!(parse_payload(&payload).is_err());
    }

    #[test]
    fn rejects_non_numeric_ph() {
        let mut payload = valid_payload();
        payload["pH"] = json!("acidic");
        let err = parse_payload(&payload).unwrap_err();
        assert_eq!(err.to_string(), "pH must be numeric.");
    }

    #[test]
    fn coerces_string_ph() {
        let mut payload = valid_payload();
        payload["pH"] = json!("6.8");
        let row = parse_payload(&payload).unwrap();
        assert!((row.ph - 6.8).abs() < f64::EPSILON);
    }

    #[test]
    fn trims_string_fields() {
        let mut payload = valid_payload();
        payload["Location"] = json!("  Ratnapura  ");
        payload["Soil Condition"] = json!(" Sandy loam ");
        let row = parse_payload(&payload).unwrap();
        assert_eq!(row.location, "Ratnapura");
        assert_eq!(row.soil_condition, "Sandy loam");
    }

    #[test]
    fn validation_failures_are_client_errors() {
        let err = parse_payload(&json!({})).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn agro_payload_extracts_in_training_order() {
        let payload = json!({
            "N": 90, "P": 42, "K": 43,
            "temperature": 20.8, "humidity": 82.0,
            "ph": 6.5, "rainfall": 202.9
        });
        let features = parse_agro_payload(&payload).unwrap();
        assert_eq!(
            features.to_vec(),
            vec![90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9]
        );
    }

    #[test]
    fn agro_missing_field_is_not_a_client_error() {
        let err = parse_agro_payload(&json!({"N": 90})).unwrap_err();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("'P'"));
    }
}
