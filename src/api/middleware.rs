//! API Middleware
//!
//! Coach identification and request logging middleware.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::CoachContext;

// =========================================================================
// Coach Identification Middleware
// =========================================================================

/// Resolve the calling coach from the X-Coach-Id header.
///
/// The header is trusted; authentication happens upstream. This resolves
/// the coach to their team and the team's current season, and rejects
/// callers that are unknown or deactivated.
pub async fn coach_middleware(
    State(pool): State<PgPool>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    // Extract coach id
    let coach_id_str = match headers.get("X-Coach-Id").and_then(|v| v.to_str().ok()) {
        Some(value) => value,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Missing X-Coach-Id header",
                    "error_code": "missing_coach_id"
                })),
            )
                .into_response());
        }
    };

    let coach_id = match Uuid::parse_str(coach_id_str) {
        Ok(id) => id,
        Err(_) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid X-Coach-Id header format",
                    "error_code": "invalid_coach_id"
                })),
            )
                .into_response());
        }
    };

    // Resolve the coach's team and its current season
    let coach_row: Option<(Uuid, String)> = match sqlx::query_as(
        r#"
        SELECT c.team_id, t.current_season
        FROM coaches c
        JOIN teams t ON t.id = c.team_id
        WHERE c.id = $1 AND c.is_active
        "#,
    )
    .bind(coach_id)
    .fetch_optional(&pool)
    .await
    {
        Ok(row) => row,
        Err(e) => {
            tracing::error!("Database error during coach lookup: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Internal server error",
                    "error_code": "database_error"
                })),
            )
                .into_response());
        }
    };

    let (team_id, season) = match coach_row {
        Some(row) => row,
        None => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unknown or inactive coach",
                    "error_code": "unknown_coach"
                })),
            )
                .into_response());
        }
    };

    // Extract correlation ID or generate new one
    let correlation_id = headers
        .get("X-Correlation-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    // Build coach context
    let context = CoachContext::new(coach_id, team_id, season).with_correlation_id(correlation_id);

    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

// =========================================================================
// mask_headers_for_logging
// =========================================================================

/// Headers that should be masked in logs
const SENSITIVE_HEADERS: &[&str] = &["x-coach-id", "authorization", "cookie", "set-cookie"];

/// Mask sensitive headers for logging
pub fn mask_headers_for_logging(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let name_lower = name.as_str().to_lowercase();
            let masked_value = if SENSITIVE_HEADERS.contains(&name_lower.as_str()) {
                "[REDACTED]".to_string()
            } else {
                value.to_str().unwrap_or("[invalid utf8]").to_string()
            };
            (name.to_string(), masked_value)
        })
        .collect()
}

// =========================================================================
// Request Logging Middleware
// =========================================================================

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let version = request.version();

    // Mask sensitive headers
    let headers = mask_headers_for_logging(request.headers());

    // Correlation comes from the header here; the coach context does not
    // exist yet when this layer runs.
    let correlation_id = request
        .headers()
        .get("X-Correlation-Id")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok());

    let start = std::time::Instant::now();

    // Log request
    tracing::info!(
        method = %method,
        uri = %uri,
        version = ?version,
        correlation_id = ?correlation_id,
        headers = ?headers,
        "Incoming request"
    );

    // Process request
    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    // Log response
    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        correlation_id = ?correlation_id,
        "Request completed"
    );

    response
}
