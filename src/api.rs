// 🌐 REST API - axum router, query validation and the JSON envelope
//
// Successful responses:  {"ok": true, "data": ...}
// Failures:              {"ok": false, "error": "...", "where": "/api/..."}

use crate::dashboard;
use crate::entities::{FirmId, ScoringParameters};
use crate::error::DssError;
use crate::money::{parse_number, parse_positive_integer};
use axum::{
    extract::{OriginalUri, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Datelike, Utc};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{debug, error, Level};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        AppState {
            db: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `f` with the connection; the lock is released before returning
    fn with_conn<T>(
        &self,
        path: &'static str,
        f: impl FnOnce(&Connection) -> crate::error::Result<T>,
    ) -> Result<T, ApiFailure> {
        let conn = self
            .db
            .lock()
            .map_err(|_| ApiFailure::new(path, DssError::Internal("database lock poisoned".to_string())))?;
        f(&conn).map_err(|e| ApiFailure::new(path, e))
    }
}

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            ok: true,
            data: Some(data),
            error: None,
            location: None,
        }
    }

    pub fn failure(message: String, location: &str) -> Self {
        ApiResponse {
            ok: false,
            data: None,
            error: Some(message),
            location: Some(location.to_string()),
        }
    }
}

impl DssError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DssError::Validation(_) => StatusCode::BAD_REQUEST,
            DssError::NotFound(_) => StatusCode::NOT_FOUND,
            DssError::Dependency { .. } | DssError::Config(_) | DssError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show callers
    fn public_message(&self) -> String {
        match self {
            DssError::Validation(_) | DssError::NotFound(_) | DssError::Dependency { .. } => {
                self.to_string()
            }
            DssError::Config(_) | DssError::Internal(_) => {
                "An unexpected error occurred".to_string()
            }
        }
    }
}

/// A classified error plus the endpoint it came from
#[derive(Debug)]
pub struct ApiFailure {
    path: &'static str,
    error: DssError,
}

impl ApiFailure {
    fn new(path: &'static str, error: DssError) -> Self {
        ApiFailure { path, error }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        if self.error.is_client_error() {
            debug!(path = self.path, error = %self.error, "request rejected");
        } else {
            match std::error::Error::source(&self.error) {
                Some(source) => error!(path = self.path, error = %self.error, source = %source, "request failed"),
                None => error!(path = self.path, error = %self.error, "request failed"),
            }
        }

        let body = ApiResponse::<()>::failure(self.error.public_message(), self.path);
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiFailure>;

// ============================================================================
// QUERY VALIDATION
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct KpiQuery {
    pub firma_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DssQuery {
    pub ref_kadin: Option<String>,
    pub ref_engelli: Option<String>,
    pub ref_min_yil: Option<String>,
}

/// Optional firm id; an empty value means "no firm selected"
pub fn parse_firm_id(query: &KpiQuery) -> Result<Option<FirmId>, DssError> {
    match query.firma_id.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_positive_integer(raw)
            .map(Some)
            .ok_or_else(|| DssError::validation("Invalid firm id")),
    }
}

/// Scoring references from the query, defaults for anything omitted
pub fn parse_scoring_params(query: &DssQuery) -> Result<ScoringParameters, DssError> {
    let invalid = || DssError::validation("Invalid DSS parameters");
    let mut params = ScoringParameters::default();

    if let Some(raw) = &query.ref_kadin {
        params.ref_female_ratio = parse_number(raw).ok_or_else(invalid)?;
    }
    if let Some(raw) = &query.ref_engelli {
        params.ref_disabled_ratio = parse_number(raw).ok_or_else(invalid)?;
    }
    if let Some(raw) = &query.ref_min_yil {
        let year = parse_positive_integer(raw).ok_or_else(invalid)?;
        params.ref_min_year = i32::try_from(year).map_err(|_| invalid())?;
    }

    params.validate()?;
    Ok(params)
}

// ============================================================================
// API HANDLERS
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub database: bool,
    pub version: String,
    pub now: String,
}

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let database = state
        .with_conn("/api/health", |conn| Ok(crate::db::ping(conn)))
        .unwrap_or(false);

    Json(HealthResponse {
        ok: true,
        database,
        version: crate::VERSION.to_string(),
        now: Utc::now().to_rfc3339(),
    })
}

/// GET /api/firms - Firm list for the selector
async fn get_firms(State(state): State<AppState>) -> ApiResult<Vec<crate::entities::Firm>> {
    let firms = state.with_conn("/api/firms", dashboard::list_firms)?;
    Ok(Json(ApiResponse::ok(firms)))
}

/// GET /api/dashboard/kpis?firma_id=X
async fn get_kpis(
    State(state): State<AppState>,
    Query(query): Query<KpiQuery>,
) -> ApiResult<crate::kpi::KpiResult> {
    const PATH: &str = "/api/dashboard/kpis";

    let firm_id = parse_firm_id(&query).map_err(|e| ApiFailure::new(PATH, e))?;
    let kpi = state.with_conn(PATH, |conn| dashboard::firm_kpis(conn, firm_id))?;

    Ok(Json(ApiResponse::ok(kpi)))
}

/// GET /api/dashboard/all-returns
async fn get_all_returns(State(state): State<AppState>) -> ApiResult<dashboard::ReturnsOverview> {
    let overview = state.with_conn("/api/dashboard/all-returns", dashboard::all_returns)?;
    Ok(Json(ApiResponse::ok(overview)))
}

/// GET /api/dashboard/sustainability-top7
async fn get_sustainability(
    State(state): State<AppState>,
) -> ApiResult<dashboard::FirmChart<crate::entities::FirmSustainability>> {
    let chart = state.with_conn("/api/dashboard/sustainability-top7", dashboard::sustainability_top7)?;
    Ok(Json(ApiResponse::ok(chart)))
}

/// GET /api/dashboard/recycling-top10
async fn get_recycling(
    State(state): State<AppState>,
) -> ApiResult<dashboard::FirmChart<crate::entities::FirmRecycling>> {
    let chart = state.with_conn("/api/dashboard/recycling-top10", dashboard::recycling_top10)?;
    Ok(Json(ApiResponse::ok(chart)))
}

/// GET /api/dashboard/entrepreneur-top10?ref_kadin=X&ref_engelli=Y&ref_min_yil=Z
async fn get_entrepreneurs(
    State(state): State<AppState>,
    Query(query): Query<DssQuery>,
) -> ApiResult<crate::scoring::EntrepreneurRanking> {
    const PATH: &str = "/api/dashboard/entrepreneur-top10";

    let params = parse_scoring_params(&query).map_err(|e| ApiFailure::new(PATH, e))?;
    let current_year = Utc::now().year();
    let ranking = state.with_conn(PATH, |conn| {
        dashboard::entrepreneur_top10(conn, params, current_year)
    })?;

    Ok(Json(ApiResponse::ok(ranking)))
}

/// Unknown /api/* paths
async fn api_not_found(OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::failure(
            format!("No endpoint at {}", uri.path()),
            uri.path(),
        )),
    )
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/firms", get(get_firms))
        .route("/dashboard/kpis", get(get_kpis))
        .route("/dashboard/all-returns", get(get_all_returns))
        .route("/dashboard/sustainability-top7", get(get_sustainability))
        .route("/dashboard/recycling-top10", get(get_recycling))
        .route("/dashboard/entrepreneur-top10", get(get_entrepreneurs))
        .fallback(api_not_found)
        .with_state(state)
}

/// Full application: `/api` plus frontend assets from `static_dir`
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .nest("/api", api_routes(state))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
