//! REST surface over [`codetran_core::TranslationFacade`].
//!
//! Endpoints: `GET /api/health`, `GET /api/languages`, `POST /api/detect`,
//! `POST /api/translate`, `POST /api/explain`, `POST /api/analyze`,
//! `POST /api/generate-tests`, `POST /api/notebook/translate`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![warn(clippy::all)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use codetran_analysis::{CodeAnalysis, TestFramework, CANDIDATE_LANGUAGES};
use codetran_core::{CoreError, TranslationFacade, DEFAULT_CACHE_CAPACITY};
use codetran_errors::{classify, Classifiable, ErrorCategory};
use codetran_providers::{
    AnthropicProvider, GoogleProvider, OfflineProvider, OpenAiProvider, ProviderChain,
    ProviderConfig, TranslationOptions, TranslationProvider,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
struct AppState {
    facade: Arc<TranslationFacade>,
    providers_available: Arc<Vec<String>>,
}

/// A façade error wrapped so it can be returned directly from a handler.
struct ApiError(CoreError);

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (category, _severity) = classify(self.0.kind_name(), &self.0.to_string());
        let status = match category {
            ErrorCategory::Validation | ErrorCategory::UserInput => StatusCode::BAD_REQUEST,
            ErrorCategory::Authentication => StatusCode::UNAUTHORIZED,
            ErrorCategory::RateLimit => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::Configuration
            | ErrorCategory::Network
            | ErrorCategory::Provider
            | ErrorCategory::System
            | ErrorCategory::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "codetran_http=info,tower_http=info".into()))
        .with_target(false)
        .compact()
        .init();

    let facade = build_facade();
    let providers_available = Arc::new(available_provider_names());
    let state = AppState { facade: Arc::new(facade), providers_available };

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/languages", get(languages))
        .route("/api/detect", post(detect))
        .route("/api/translate", post(translate))
        .route("/api/explain", post(explain))
        .route("/api/analyze", post(analyze))
        .route("/api/generate-tests", post(generate_tests))
        .route("/api/notebook/translate", post(notebook_translate))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = std::env::var("CODETRAN_HTTP_ADDR")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8787)));

    tracing::info!("codetran-http listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.expect("binding listener address");
    axum::serve(listener, app).await.expect("serving http");
}

fn available_provider_names() -> Vec<String> {
    let mut names = Vec::new();
    if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        names.push("anthropic".to_string());
    }
    if std::env::var("OPENAI_API_KEY").is_ok() {
        names.push("openai".to_string());
    }
    if std::env::var("GOOGLE_API_KEY").is_ok() {
        names.push("google".to_string());
    }
    names.push("offline".to_string());
    names
}

fn build_facade() -> TranslationFacade {
    let offline: Arc<dyn TranslationProvider> = Arc::new(OfflineProvider);
    let mut providers: Vec<Arc<dyn TranslationProvider>> = Vec::new();

    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        providers.push(Arc::new(AnthropicProvider::new(ProviderConfig::new(key, "claude-3-5-sonnet-20241022"))));
    }
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        providers.push(Arc::new(OpenAiProvider::openai(ProviderConfig::new(key, "gpt-4o"))));
    }
    if let Ok(key) = std::env::var("GOOGLE_API_KEY") {
        providers.push(Arc::new(GoogleProvider::new(ProviderConfig::new(key, "gemini-1.5-pro"))));
    }

    TranslationFacade::new(ProviderChain::new(providers), offline, DEFAULT_CACHE_CAPACITY)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    providers_available: Vec<String>,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        providers_available: state.providers_available.as_ref().clone(),
    })
}

#[derive(Serialize)]
struct LanguagesResponse {
    languages: &'static [&'static str],
}

async fn languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse { languages: CANDIDATE_LANGUAGES })
}

#[derive(Deserialize)]
struct DetectRequest {
    code: String,
}

#[derive(Serialize)]
struct DetectResponse {
    detected_language: Option<&'static str>,
    confidence: f64,
}

async fn detect(State(state): State<AppState>, Json(req): Json<DetectRequest>) -> Json<DetectResponse> {
    let detected_language = state.facade.detect(&req.code);
    let confidence = if detected_language.is_some() { 1.0 } else { 0.0 };
    Json(DetectResponse { detected_language, confidence })
}

#[derive(Deserialize)]
struct TranslateRequest {
    code: String,
    source_lang: Option<String>,
    target_lang: String,
    provider: Option<String>,
}

#[derive(Serialize)]
struct TranslateResponse {
    translated_code: String,
    source_lang: String,
    target_lang: String,
    confidence: f64,
    provider_used: String,
}

async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let source_lang = req.source_lang.clone().or_else(|| state.facade.detect(&req.code).map(str::to_string));
    let (translated_code, confidence) = state
        .facade
        .translate(&req.code, req.source_lang.as_deref(), &req.target_lang, &TranslationOptions::default())
        .await?;

    Ok(Json(TranslateResponse {
        translated_code,
        source_lang: source_lang.unwrap_or_else(|| "unknown".to_string()),
        target_lang: req.target_lang,
        confidence,
        provider_used: req.provider.unwrap_or_else(|| "auto".to_string()),
    }))
}

#[derive(Deserialize)]
struct ExplainRequest {
    code: String,
    language: Option<String>,
    #[serde(default)]
    line_by_line: bool,
}

#[derive(Serialize)]
struct ExplainResponse {
    explanation: String,
    language: String,
}

async fn explain(
    State(state): State<AppState>,
    Json(req): Json<ExplainRequest>,
) -> Result<Json<ExplainResponse>, ApiError> {
    let language = req.language.clone().or_else(|| state.facade.detect(&req.code).map(str::to_string));
    let explanation = state.facade.explain(&req.code, req.language.as_deref(), req.line_by_line).await?;
    Ok(Json(ExplainResponse { explanation, language: language.unwrap_or_else(|| "unknown".to_string()) }))
}

#[derive(Deserialize)]
struct AnalyzeRequest {
    code: String,
    language: Option<String>,
}

async fn analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<CodeAnalysis>, ApiError> {
    let analysis = state.facade.analyze(&req.code, req.language.as_deref())?;
    Ok(Json(analysis))
}

#[derive(Deserialize)]
struct GenerateTestsRequest {
    code: String,
    language: Option<String>,
    framework: Option<String>,
}

#[derive(Serialize)]
struct GenerateTestsResponse {
    tests: String,
    framework: String,
    language: String,
}

async fn generate_tests(
    State(state): State<AppState>,
    Json(req): Json<GenerateTestsRequest>,
) -> Result<Json<GenerateTestsResponse>, ApiError> {
    let framework = match req.framework.as_deref() {
        None => None,
        Some("pytest") => Some(TestFramework::Pytest),
        Some("jest") => Some(TestFramework::Jest),
        Some("junit") => Some(TestFramework::Junit),
        Some(other) => {
            return Err(ApiError(CoreError::UnsupportedLanguage(format!("unknown test framework: {other}"))));
        },
    };

    let language = req.language.clone().or_else(|| state.facade.detect(&req.code).map(str::to_string));
    let tests = state.facade.generate_tests(&req.code, req.language.as_deref(), framework)?;
    Ok(Json(GenerateTestsResponse {
        tests,
        framework: req.framework.unwrap_or_else(|| "default".to_string()),
        language: language.unwrap_or_else(|| "unknown".to_string()),
    }))
}

#[derive(Deserialize)]
struct NotebookTranslateRequest {
    notebook_json: String,
    source_lang: Option<String>,
    target_lang: String,
}

#[derive(Serialize)]
struct NotebookTranslateResponse {
    notebook: codetran_analysis::NotebookDocument,
    stats: codetran_analysis::NotebookStats,
}

async fn notebook_translate(
    State(state): State<AppState>,
    Json(req): Json<NotebookTranslateRequest>,
) -> Result<Json<NotebookTranslateResponse>, ApiError> {
    let mut doc = codetran_analysis::parse_notebook(&req.notebook_json)
        .map_err(|error| ApiError(CoreError::Analysis(error)))?;

    // codetran_analysis::transform_notebook's per-cell callback is
    // synchronous, so the async facade calls are resolved up front, in cell
    // order, and replayed into it below.
    let mut translations = Vec::new();
    for cell in &doc.cells {
        if cell.kind == codetran_analysis::CellKind::Code {
            let source_language =
                req.source_lang.clone().or_else(|| state.facade.detect(&cell.source).map(str::to_string)).unwrap_or_else(|| "unknown".to_string());
            let result = state
                .facade
                .translate(&cell.source, req.source_lang.as_deref(), &req.target_lang, &TranslationOptions::default())
                .await
                .map(|(text, confidence)| (text, source_language, confidence))
                .map_err(|error| error.to_string());
            translations.push(result);
        }
    }

    let mut translations = translations.into_iter();
    let stats = codetran_analysis::transform_notebook(&mut doc, &req.target_lang, |_source| {
        translations.next().unwrap_or_else(|| Err("no translation result available".to_string()))
    });

    Ok(Json(NotebookTranslateResponse { notebook: doc, stats }))
}
