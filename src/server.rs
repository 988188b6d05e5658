use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{SystemTime, UNIX_EPOCH},
};
use tower_http::cors::CorsLayer;

use crate::api::{ApiAnalysisRequest, ApiAnalysisResponse, ApiCaptionRequest};
use viralens::classifier::HttpSentimentClassifier;
use viralens::config::ScoringConfig;
use viralens::{
    analyze_post, CaptionAnalysis, CaptionAnalyzer, MetricBundle, ViralityBreakdown,
    ViralityScorer,
};

type Analyzer = CaptionAnalyzer<HttpSentimentClassifier>;

#[derive(Clone)]
struct AppState {
    scorer: Arc<ViralityScorer>,
    analyzer: Option<Arc<Analyzer>>,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs, config: ScoringConfig) -> Result<(), String> {
    let analyzer = match HttpSentimentClassifier::from_config(&config.classifier) {
        Ok(classifier) => {
            let analyzer = CaptionAnalyzer::new(classifier, config.caption.clone());
            tracing::info!(
                url = analyzer.classifier().url(),
                "sentiment classifier configured"
            );
            Some(Arc::new(analyzer))
        }
        Err(err) => {
            tracing::warn!(error = %err, "caption analysis disabled");
            None
        }
    };

    let state = AppState {
        scorer: Arc::new(ViralityScorer::new(config.weights.clone())),
        analyzer,
    };

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("failed to bind server: {}", err))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/virality", post(virality_handler))
        .route("/api/caption", post(caption_handler))
        .route("/api/analyze", post(analyze_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(json!({ "message": "ViraLens API running" }))
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn virality_handler(
    State(state): State<AppState>,
    Json(bundle): Json<MetricBundle>,
) -> Json<ViralityBreakdown> {
    let breakdown = state.scorer.compute_bundle(&bundle);
    tracing::debug!(final_score = breakdown.final_score, "virality computed");
    Json(breakdown)
}

async fn caption_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiCaptionRequest>,
) -> Result<Json<CaptionAnalysis>, (StatusCode, String)> {
    let analyzer = require_analyzer(&state)?;
    let caption = request.caption.unwrap_or_default();
    let analysis = analyzer.analyze(&caption).await.map_err(classifier_failure)?;
    Ok(Json(analysis))
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalysisRequest>,
) -> Result<Json<ApiAnalysisResponse>, (StatusCode, String)> {
    let request_id = request
        .request_id
        .clone()
        .unwrap_or_else(generate_request_id);
    let input = request
        .into_input()
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let analyzer = require_analyzer(&state)?;

    tracing::info!(%request_id, "analyzing post");
    let analysis = analyze_post(analyzer.as_ref(), &state.scorer, input)
        .await
        .map_err(classifier_failure)?;
    tracing::info!(
        %request_id,
        final_score = analysis.virality.final_score,
        "analysis complete"
    );

    Ok(Json(ApiAnalysisResponse::from_analysis(analysis, request_id)))
}

fn require_analyzer(state: &AppState) -> Result<Arc<Analyzer>, (StatusCode, String)> {
    state.analyzer.clone().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "sentiment classifier not configured".to_string(),
        )
    })
}

fn classifier_failure(err: String) -> (StatusCode, String) {
    tracing::warn!(error = %err, "caption analysis failed");
    (StatusCode::BAD_GATEWAY, format!("caption analysis failed: {}", err))
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Request};
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(analyzer: Option<Arc<Analyzer>>) -> Router {
        router(AppState {
            scorer: Arc::new(ViralityScorer::default()),
            analyzer,
        })
    }

    // Nothing listens on the returned port, so every classify call fails.
    async fn unreachable_analyzer() -> Arc<Analyzer> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let classifier = HttpSentimentClassifier::new(
            format!("http://{}/models/sentiment", addr),
            None,
            Duration::from_secs(2),
        )
        .expect("client");
        Arc::new(CaptionAnalyzer::new(classifier, Default::default()))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, String) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn root_reports_running() {
        let request = Request::builder().uri("/").body(Body::empty()).expect("request");
        let response = app(None).oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(value["message"], "ViraLens API running");
    }

    #[tokio::test]
    async fn virality_returns_flat_breakdown() {
        let (status, body) = post_json(
            app(None),
            "/api/virality",
            json!({
                "aesthetic_score": 0.70,
                "geometry_scores": {"rule_of_thirds": 0.6, "symmetry": 0.4, "clutter": 0.2},
                "color_scores": {"brightness": 0.5, "contrast": 0.6},
                "caption_score": 0.85,
                "trend_similarity": 0.72
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).expect("json");
        let object = value.as_object().expect("flat object");
        assert_eq!(object.len(), 6);
        for key in ["aesthetic", "geometry", "color_light", "caption", "trend"] {
            assert!(object[key].is_f64(), "missing {key}");
        }
        let final_score = object["final_score"].as_f64().expect("final score");
        assert!((final_score - 69.37).abs() < 1e-6);
    }

    #[tokio::test]
    async fn caption_without_classifier_is_unavailable() {
        let (status, body) =
            post_json(app(None), "/api/caption", json!({ "caption": "hello" })).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("not configured"));

        let (status, _) = post_json(
            app(None),
            "/api/analyze",
            json!({ "caption": "hello", "aesthetic_score": 0.5 }),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn bad_subject_frame_is_rejected() {
        let (status, body) = post_json(
            app(None),
            "/api/analyze",
            json!({
                "caption": "hello",
                "subject": {"main_box": null, "width": 0.0, "height": 900.0}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid subject frame"));
    }

    #[tokio::test]
    async fn classifier_failure_maps_to_bad_gateway() {
        let analyzer = unreachable_analyzer().await;

        let (status, body) = post_json(
            app(Some(analyzer.clone())),
            "/api/caption",
            json!({ "caption": "Did you know this works" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.starts_with("caption analysis failed"));

        let (status, _) = post_json(
            app(Some(analyzer)),
            "/api/analyze",
            json!({ "caption": "Did you know this works", "request_id": "req-1" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn blank_caption_never_reaches_the_classifier() {
        let analyzer = unreachable_analyzer().await;
        let (status, body) = post_json(
            app(Some(analyzer.clone())),
            "/api/caption",
            json!({ "caption": "   " }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["sentiment_score"], 0.5);
        assert_eq!(value["overall_caption_score"], 0.0);

        let (status, body) = post_json(
            app(Some(analyzer)),
            "/api/analyze",
            json!({
                "request_id": "req-blank",
                "aesthetic_score": 0.70,
                "geometry_scores": {"rule_of_thirds": 0.6, "symmetry": 0.4, "clutter": 0.2},
                "color_scores": {"brightness": 0.5, "contrast": 0.6},
                "trend_similarity": 0.72
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).expect("json");
        assert_eq!(value["request_id"], "req-blank");
        assert!(value["virality"]["final_score"].is_f64());
    }
}
