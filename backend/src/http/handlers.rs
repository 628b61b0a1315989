//! HTTP handlers for the REST API.
//!
//! Read endpoints load one user's climbs and hand them to the aggregation
//! functions; write endpoints delegate to the ingestion services.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    ClimbLog, DashboardStats, DashboardView, EndSessionRequest, EndSessionResponse,
    GradePyramid, HealthResponse, LogClimbResponse, ProfileView, SaveSessionRequest,
    SaveSessionResponse, SessionView, SessionsQuery, StartSessionRequest, StartSessionResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::RepositoryError;
use crate::db::services as db_services;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Result type for handlers that create something.
pub type CreatedResult<T> = Result<(StatusCode, Json<T>), AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Views
// =============================================================================

/// GET /api/stats/{user}
pub async fn get_stats(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> HandlerResult<DashboardStats> {
    let climbs = db_services::fetch_user_climbs(state.repository.as_ref(), &user).await?;
    Ok(Json(services::dashboard_stats(&climbs, &state.grades)))
}

/// GET /api/sessions/{user}?order=name|recent
pub async fn get_sessions(
    State(state): State<AppState>,
    Path(user): Path<String>,
    query: Result<Query<SessionsQuery>, QueryRejection>,
) -> HandlerResult<Vec<SessionView>> {
    let Query(query) = query?;
    let climbs = db_services::fetch_user_climbs(state.repository.as_ref(), &user).await?;
    Ok(Json(services::sessions_view(
        &climbs,
        &state.grades,
        query.order.unwrap_or_default(),
    )))
}

/// GET /api/grade_pyramid/{user}
pub async fn get_grade_pyramid(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> HandlerResult<GradePyramid> {
    let climbs = db_services::fetch_user_climbs(state.repository.as_ref(), &user).await?;
    Ok(Json(services::grade_pyramid(&climbs)))
}

/// GET /api/profile/{user}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> HandlerResult<ProfileView> {
    let climbs = db_services::fetch_user_climbs(state.repository.as_ref(), &user).await?;
    Ok(Json(services::profile_view(&climbs, &state.grades)))
}

/// GET /api/dashboard/{user}
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(user): Path<String>,
) -> HandlerResult<DashboardView> {
    let climbs = db_services::fetch_user_climbs(state.repository.as_ref(), &user).await?;
    let sessions = db_services::fetch_user_sessions(state.repository.as_ref(), &user).await?;
    Ok(Json(services::dashboard_view(
        &climbs,
        &sessions,
        &state.grades,
        Utc::now(),
    )))
}

// =============================================================================
// Writes
// =============================================================================

/// POST /api/session
///
/// Save a whole legacy session in one atomic batch.
pub async fn save_session(
    State(state): State<AppState>,
    body: Result<Json<SaveSessionRequest>, JsonRejection>,
) -> CreatedResult<SaveSessionResponse> {
    let Json(request) = body?;
    let saved = db_services::save_new_session(
        state.repository.as_ref(),
        request.climbs.as_deref().unwrap_or_default(),
        request.user_name.as_deref(),
        request.session_name.as_deref(),
        Utc::now(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(SaveSessionResponse {
            status: "success".to_string(),
            message: format!("Session '{}' saved", saved.session_name),
            session_name: saved.session_name,
            session_date: saved.session_date,
            climbs_saved: saved.climbs_saved,
        }),
    ))
}

/// POST /api/session/start
pub async fn start_session(
    State(state): State<AppState>,
    body: Result<Json<StartSessionRequest>, JsonRejection>,
) -> CreatedResult<StartSessionResponse> {
    let Json(request) = body?;
    let session = db_services::start_session(
        state.repository.as_ref(),
        request.user_name.as_deref(),
        request.location.as_deref(),
        Utc::now(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(StartSessionResponse {
            session_id: session.id,
            start_time: session.start_time,
        }),
    ))
}

/// POST /api/session/end
///
/// Ending an unknown or already-closed session still answers 200.
pub async fn end_session(
    State(state): State<AppState>,
    body: Result<Json<EndSessionRequest>, JsonRejection>,
) -> HandlerResult<EndSessionResponse> {
    let Json(request) = body?;
    let session_id = request
        .session_id
        .ok_or_else(|| RepositoryError::validation("Missing 'session_id'"))?;

    let closed = db_services::end_session(state.repository.as_ref(), session_id, Utc::now()).await?;

    Ok(Json(EndSessionResponse {
        status: "success".to_string(),
        session_id,
        end_time: closed.and_then(|session| session.end_time),
    }))
}

/// POST /api/climb
pub async fn log_climb(
    State(state): State<AppState>,
    body: Result<Json<ClimbLog>, JsonRejection>,
) -> CreatedResult<LogClimbResponse> {
    let Json(climb) = body?;
    let climb_id = db_services::log_climb(state.repository.as_ref(), &climb, Utc::now()).await?;

    Ok((
        StatusCode::CREATED,
        Json(LogClimbResponse {
            status: "success".to_string(),
            climb_id,
        }),
    ))
}
