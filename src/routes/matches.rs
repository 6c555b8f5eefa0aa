use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::core::{EngineError, LeaderboardService, MatchingEngine, SubmissionService};
use crate::models::{
    AcceptMatchRequest, AcceptMatchResponse, DismissNotificationRequest, ErrorResponse,
    HealthResponse, MatchesResponse,
};
use crate::services::{
    AuthError, AuthGateway, LocationError, LocationResolver, PersistenceError, TipsClient,
};
use crate::routes::session_from;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthGateway>,
    pub location: Arc<LocationResolver>,
    pub engine: Arc<MatchingEngine>,
    pub submissions: Arc<SubmissionService>,
    pub leaderboard: Arc<LeaderboardService>,
    pub tips: Arc<TipsClient>,
}

/// Configure match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(load_matches))
        .route("/matches/accept", web::post().to(accept_match))
        .route("/matches/dismiss", web::post().to(dismiss_notification));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn unauthenticated_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse {
        error: "not_authenticated".to_string(),
        message: "User not logged in.".to_string(),
        status_code: 401,
    })
}

/// Map an engine error to a distinct, human-readable response
pub fn engine_error_response(err: &EngineError) -> HttpResponse {
    match err {
        EngineError::NotAuthenticated => unauthenticated_response(),
        EngineError::Location(LocationError::PermissionDenied) => {
            HttpResponse::Forbidden().json(ErrorResponse {
                error: "permission_denied".to_string(),
                message: "Location permission is required to fetch your location.".to_string(),
                status_code: 403,
            })
        }
        EngineError::Location(LocationError::Timeout)
        | EngineError::Auth(AuthError::Timeout)
        | EngineError::Persistence(PersistenceError::Timeout) => {
            HttpResponse::GatewayTimeout().json(ErrorResponse {
                error: "timeout".to_string(),
                message: "The request timed out. Please try again.".to_string(),
                status_code: 504,
            })
        }
        EngineError::Location(_) => HttpResponse::ServiceUnavailable().json(ErrorResponse {
            error: "location_unavailable".to_string(),
            message: "Could not fetch your location. Please try again.".to_string(),
            status_code: 503,
        }),
        EngineError::Persistence(PersistenceError::NotFound(what)) => {
            HttpResponse::NotFound().json(ErrorResponse {
                error: "not_found".to_string(),
                message: format!("{} was not found.", what),
                status_code: 404,
            })
        }
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "load_failed".to_string(),
            message: "Unable to load matches.".to_string(),
            status_code: 500,
        }),
    }
}

/// Run one load cycle for the caller
///
/// GET /api/v1/matches
async fn load_matches(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let session = match session_from(&http_req) {
        Some(session) => session,
        None => return unauthenticated_response(),
    };

    match state.engine.load_matches(&session).await {
        Ok(snapshot) => HttpResponse::Ok().json(MatchesResponse { snapshot }),
        Err(err) => {
            tracing::error!("Load cycle failed: {}", err);
            engine_error_response(&err)
        }
    }
}

/// Accept a candidate alert as a match
///
/// POST /api/v1/matches/accept
///
/// Request body:
/// ```json
/// { "alertId": "string" }
/// ```
async fn accept_match(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<AcceptMatchRequest>,
) -> impl Responder {
    if session_from(&http_req).is_none() {
        return unauthenticated_response();
    }

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    match state.engine.accept_match(&req.alert_id).await {
        Ok(()) => HttpResponse::Ok().json(AcceptMatchResponse {
            success: true,
            alert_id: req.alert_id.clone(),
        }),
        Err(err) => {
            tracing::error!("Failed to accept match {}: {}", req.alert_id, err);
            engine_error_response(&err)
        }
    }
}

/// Dismiss one notification from the current snapshot
///
/// POST /api/v1/matches/dismiss
async fn dismiss_notification(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<DismissNotificationRequest>,
) -> impl Responder {
    if session_from(&http_req).is_none() {
        return unauthenticated_response();
    }

    let removed = state.engine.dismiss_notification(req.index).await;

    HttpResponse::Ok().json(serde_json::json!({ "removed": removed }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }
}
