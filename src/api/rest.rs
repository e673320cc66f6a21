// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`:
//
//   GET  /api/v1/health             liveness + server time
//   GET  /api/v1/indicators         catalog of every indicator key
//   GET  /api/v1/indicators/:key    one catalog entry (404 if unknown)
//   POST /api/v1/enrich             candles + query -> enriched rows
//
// The caller supplies the candle rows; the server never fetches market data.
// Engine work runs on the blocking pool so large requests do not stall the
// reactor.  Every engine error maps to 422 with `{"error", "kind"}`.
//
// CORS is configured permissively.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, info_span, warn};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::catalog;
use crate::dispatch::IndicatorKey;
use crate::error::EngineError;

type ApiError = (StatusCode, Json<Value>);

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let body_limit = DefaultBodyLimit::max(state.config.max_body_bytes);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/indicators", get(list_indicators))
        .route("/api/v1/indicators/:key", get(indicator_detail))
        .route("/api/v1/enrich", post(enrich))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
    requests_served: u64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
        requests_served: state.requests_served(),
    })
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_indicators() -> impl IntoResponse {
    Json(serde_json::json!({ "indicators": catalog::all() }))
}

async fn indicator_detail(Path(key): Path<String>) -> Result<impl IntoResponse, ApiError> {
    match key.parse::<IndicatorKey>() {
        Ok(key) => Ok(Json(key.catalog())),
        Err(e) => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() })),
        )),
    }
}

// =============================================================================
// Enrich
// =============================================================================

#[derive(Debug, Deserialize)]
struct EnrichRequest {
    candles: Vec<Value>,
    #[serde(default)]
    indicators: Map<String, Value>,
}

fn engine_error(e: &EngineError) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({ "error": e.to_string(), "kind": e.kind() })),
    )
}

async fn enrich(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EnrichRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("enrich", %request_id, candles = req.candles.len());
    let engine = state.engine;

    let result = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        engine.run(&req.candles, &req.indicators)
    })
    .await
    .map_err(|e| {
        error!(%request_id, error = %e, "enrich task failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "internal error", "kind": "InternalError" })),
        )
    })?;

    match result {
        Ok(rows) => {
            let total = state.record_request();
            info!(%request_id, rows = rows.len(), requests_served = total, "enrich served");
            Ok((
                [("x-request-id", request_id.to_string())],
                Json(serde_json::json!({ "data": rows })),
            ))
        }
        Err(e) => {
            warn!(%request_id, kind = e.kind(), error = %e, "enrich rejected");
            Err(engine_error(&e))
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_config::EngineConfig;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use serde_json::json;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState::new(EngineConfig::default())))
    }

    async fn body_json(resp: Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn candle(t: i64, h: f64, l: f64, c: f64, v: f64) -> Value {
        json!({
            "Open_time": t, "Open": c, "High": h, "Low": l, "Close": c, "Volume": v,
            "Close_time": t + 59_999, "Quote_Asset_Volume": c * v, "Number_of_Trades": 3,
            "Taker_Buy_Base_Asset_Volume": v / 2.0, "Taker_Buy_Quote_Asset_Volume": c * v / 2.0,
        })
    }

    #[tokio::test]
    async fn health_ok() {
        let resp = app()
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = body_json(resp).await;
        assert_eq!(v["status"], "ok");
        assert!(v["server_time"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn catalog_lists_all_keys() {
        let resp = app()
            .oneshot(Request::get("/api/v1/indicators").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let v = body_json(resp).await;
        assert_eq!(v["indicators"].as_array().unwrap().len(), 22);
    }

    #[tokio::test]
    async fn catalog_detail_and_unknown() {
        let resp = app()
            .oneshot(Request::get("/api/v1/indicators/RSI").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["key"], "rsi");

        let resp = app()
            .oneshot(Request::get("/api/v1/indicators/zigzag").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn enrich_vwap() {
        let body = json!({
            "candles": [candle(0, 12.0, 8.0, 10.0, 100.0), candle(60_000, 22.0, 18.0, 20.0, 200.0)],
            "indicators": {"vwap": true, "only_columns": ["Close"]},
        });
        let resp = app().oneshot(post_json("/api/v1/enrich", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));

        let v = body_json(resp).await;
        let rows = v["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], json!({"Close": 10.0, "VWAP": 10.0}));
        let vwap = rows[1]["VWAP"].as_f64().unwrap();
        assert!((vwap - 5000.0 / 300.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn enrich_errors_are_422() {
        let cases = [
            (json!({"macd": "12,26"}), "ParameterError"),
            (json!({"bogus": true}), "UnknownIndicatorError"),
            (json!({"drop_columns": ["Volume"], "only_columns": ["Close"]}), "ConflictingProjectionError"),
        ];
        for (indicators, kind) in cases {
            let body = json!({"candles": [candle(0, 2.0, 1.0, 1.5, 1.0)], "indicators": indicators});
            let resp = app().oneshot(post_json("/api/v1/enrich", body)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(body_json(resp).await["kind"], kind);
        }
    }

    #[tokio::test]
    async fn enrich_invalid_candle_is_422() {
        let body = json!({"candles": [{"Open": 1.0}], "indicators": {}});
        let resp = app().oneshot(post_json("/api/v1/enrich", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(resp).await["kind"], "ValidationError");
    }

    #[tokio::test]
    async fn body_limit_applies() {
        let config = EngineConfig {
            max_body_bytes: 64,
            ..EngineConfig::default()
        };
        let app = router(Arc::new(AppState::new(config)));
        let candles: Vec<_> = (0..10).map(|i| candle(i * 60_000, 2.0, 1.0, 1.5, 1.0)).collect();
        let body = json!({"candles": candles, "indicators": {}});
        let resp = app.oneshot(post_json("/api/v1/enrich", body)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
