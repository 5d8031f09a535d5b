use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde_json::{json, Value};

use crate::{
    artifacts::ModelState,
    error::EtaError,
    features::{is_peak_hour, predict_minutes, DeliveryInput},
    insights::{
        format_arrival, headline, insight_lines, peak_label, traffic_indicator, BufferedEstimate,
        SpeedBand,
    },
    options::{presets, CategoryOptions, DEFAULT_PRESET},
    types::{HealthOut, PredictRequest, PredictResponse, PresetsOut, QuickInfo},
};

// ---------- Server state ----------

#[derive(Clone, Default)]
pub struct AppState {
    pub model: ModelState,
    pub log_predictions: bool,
}

impl AppState {
    pub fn new(model: ModelState, log_predictions: bool) -> Self {
        Self {
            model,
            log_predictions,
        }
    }
}

type Rejection = (StatusCode, Json<Value>);

fn reject(e: EtaError) -> Rejection {
    let (code, error) = match &e {
        EtaError::NotLoaded(_) => (StatusCode::SERVICE_UNAVAILABLE, "model not loaded"),
        EtaError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid input"),
        EtaError::UnknownCategory { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "prediction failed"),
        EtaError::Model(_) => (StatusCode::INTERNAL_SERVER_ERROR, "prediction failed"),
    };
    (code, Json(json!({ "error": error, "detail": e.to_string() })))
}

// ---------- Response assembly ----------

/// Everything shown for one prediction, derived from the scalar and the clock.
pub fn build_response(
    input: &DeliveryInput,
    minutes: f64,
    now: NaiveDateTime,
    t: i64,
) -> PredictResponse {
    let peak = is_peak_hour(input.order_hour);
    PredictResponse {
        t,
        minutes,
        headline: headline(minutes),
        arrival: format_arrival(now, minutes),
        buffer: BufferedEstimate::new(minutes).into(),
        speed: SpeedBand::classify(minutes).into(),
        quick_info: QuickInfo {
            is_peak_hour: peak,
            peak_label: peak_label(peak).to_string(),
            traffic: input.traffic.clone(),
            traffic_indicator: traffic_indicator(&input.traffic).to_string(),
        },
        insights: insight_lines(input, peak),
    }
}

// ---------- Handlers ----------

pub async fn health(State(state): State<AppState>) -> Json<HealthOut> {
    Json(HealthOut {
        status: state.model.status().to_string(),
        reason: state.model.failure().map(str::to_string),
    })
}

pub async fn options(State(state): State<AppState>) -> Json<CategoryOptions> {
    Json(CategoryOptions::for_state(&state.model))
}

pub async fn list_presets() -> Json<PresetsOut> {
    Json(PresetsOut {
        default: DEFAULT_PRESET,
        presets: presets(),
    })
}

pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, Rejection> {
    // Malformed bodies get the same JSON error shape as every other failure.
    let Json(payload) = payload.map_err(|r| reject(EtaError::InvalidInput(r.body_text())))?;
    let artifacts = state.model.artifacts().map_err(reject)?;

    let (record, minutes) =
        predict_minutes(&payload, &artifacts.encoders, artifacts.model.as_ref()).map_err(|e| {
            tracing::warn!(error = %e, "prediction failed");
            reject(e)
        })?;

    if state.log_predictions {
        let sample: Vec<String> = record
            .named()
            .map(|(name, v)| format!("{}={:.3}", name, v))
            .collect();
        tracing::info!(minutes, "features=[{}]", sample.join(", "));
    }

    let now = Local::now();
    Ok(Json(build_response(
        &payload,
        minutes,
        now.naive_local(),
        now.timestamp_millis(),
    )))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/options", get(options))
        .route("/presets", get(list_presets))
        .route("/predict", post(predict))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn input() -> DeliveryInput {
        DeliveryInput {
            age: 28,
            rating: 4.5,
            distance_km: 5.2,
            multiple_deliveries: 2,
            order_hour: 13,
            is_weekend: false,
            weather: "Sunny".into(),
            traffic: "Low".into(),
            order_type: "Meal".into(),
            vehicle: "motorcycle".into(),
            city: "Metropolitan".into(),
            festival: "No".into(),
        }
    }

    #[test]
    fn response_is_derived_from_minutes() {
        let now = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(13, 0, 0)
            .unwrap();
        let out = build_response(&input(), 40.0, now, 7);
        assert_eq!(out.t, 7);
        assert_eq!(out.headline, "⏱ 40 minutes");
        assert_eq!(out.arrival.as_deref(), Some("01:40 PM"));
        assert_eq!(out.buffer.buffered_minutes, 46.0);
        assert_eq!(out.speed.label, "Takes a While");
        assert!(out.quick_info.is_peak_hour);
        assert_eq!(out.quick_info.traffic_indicator, "🟢");
        // peak, two deliveries, 5.2 km
        assert_eq!(out.insights.len(), 3);
    }

    #[tokio::test]
    async fn predict_without_model_is_unavailable() {
        let state = AppState::new(
            ModelState::Failed {
                reason: "missing file".into(),
            },
            false,
        );
        let (code, Json(body)) = predict(State(state), Ok(Json(input()))).await.unwrap_err();
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "model not loaded");
        assert!(body["detail"].as_str().unwrap().contains("missing file"));
    }
}
