use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, LogInRequest, SessionResponse, SignUpRequest};
use crate::routes::matches::AppState;
use crate::routes::session_from;
use crate::services::AuthError;

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/signup", web::post().to(sign_up))
        .route("/auth/login", web::post().to(log_in))
        .route("/auth/logout", web::post().to(log_out))
        .route("/auth/me", web::get().to(current_user));
}

fn auth_error_response(err: &AuthError) -> HttpResponse {
    match err {
        AuthError::DuplicateAccount => HttpResponse::Conflict().json(ErrorResponse {
            error: "duplicate_account".to_string(),
            message: "An account with this email already exists.".to_string(),
            status_code: 409,
        }),
        AuthError::InvalidCredentials => HttpResponse::Unauthorized().json(ErrorResponse {
            error: "invalid_credentials".to_string(),
            message: "Invalid email or password.".to_string(),
            status_code: 401,
        }),
        AuthError::Validation(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation Error".to_string(),
            message: message.clone(),
            status_code: 400,
        }),
        AuthError::Timeout => HttpResponse::GatewayTimeout().json(ErrorResponse {
            error: "timeout".to_string(),
            message: "The request timed out. Please try again.".to_string(),
            status_code: 504,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "auth_failed".to_string(),
            message: "Authentication service is unavailable.".to_string(),
            status_code: 500,
        }),
    }
}

/// Create an account and log the new user in
///
/// POST /api/v1/auth/signup
async fn sign_up(state: web::Data<AppState>, req: web::Json<SignUpRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation Error".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let contactno = match &req.contactno {
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(number) => Some(number),
            Err(_) => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "Contact number must be numeric.".to_string(),
                    status_code: 400,
                });
            }
        },
        None => None,
    };

    match state
        .auth
        .sign_up(&req.email, &req.password, &req.username, contactno)
        .await
    {
        Ok((session, user)) => HttpResponse::Ok().json(SessionResponse {
            secret: session.secret,
            user,
        }),
        Err(err) => {
            tracing::error!("Sign-up failed for {}: {}", req.email, err);
            auth_error_response(&err)
        }
    }
}

/// Log in with email and password
///
/// POST /api/v1/auth/login
async fn log_in(state: web::Data<AppState>, req: web::Json<LogInRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation Error".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let session = match state.auth.log_in(&req.email, &req.password).await {
        Ok(session) => session,
        Err(err) => {
            tracing::info!("Login failed for {}: {}", req.email, err);
            return auth_error_response(&err);
        }
    };

    match state.auth.current_user(&session).await {
        Ok(Some(user)) => HttpResponse::Ok().json(SessionResponse {
            secret: session.secret,
            user,
        }),
        Ok(None) => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "auth_failed".to_string(),
            message: "Failed to fetch user information after login.".to_string(),
            status_code: 500,
        }),
        Err(err) => auth_error_response(&err),
    }
}

/// Invalidate the caller's session
///
/// POST /api/v1/auth/logout
async fn log_out(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    // Logging out without a session is already the desired end state
    let session = match session_from(&http_req) {
        Some(session) => session,
        None => return HttpResponse::Ok().json(serde_json::json!({ "success": true })),
    };

    match state.auth.log_out(&session).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(err) => {
            tracing::error!("Logout failed: {}", err);
            auth_error_response(&err)
        }
    }
}

/// Fetch the caller's user record
///
/// GET /api/v1/auth/me
async fn current_user(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let session = match session_from(&http_req) {
        Some(session) => session,
        None => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "not_authenticated".to_string(),
                message: "User not logged in.".to_string(),
                status_code: 401,
            });
        }
    };

    match state.auth.current_user(&session).await {
        Ok(Some(user)) => HttpResponse::Ok().json(user),
        Ok(None) => HttpResponse::Unauthorized().json(ErrorResponse {
            error: "not_authenticated".to_string(),
            message: "User not logged in.".to_string(),
            status_code: 401,
        }),
        Err(err) => {
            tracing::error!("Failed to fetch current user: {}", err);
            auth_error_response(&err)
        }
    }
}
