use actix_web::{web, HttpRequest, HttpResponse, Responder};
use base64::Engine as _;
use validator::Validate;
use crate::core::{AlertSubmission, RequestSubmission, SubmissionError};
use crate::models::{
    ErrorResponse, PostAlertRequest, PostAlertResponse, PostRequestRequest, PostRequestResponse,
};
use crate::routes::matches::AppState;
use crate::routes::session_from;
use crate::services::{truncate_for_display, ClassifierError, LocationError, PersistenceError};

/// Display cap for prefilled addresses
const ADDRESS_DISPLAY_MAX: usize = 50;

/// Configure posting routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/alerts", web::post().to(post_alert))
        .route("/requests", web::post().to(post_request))
        .route("/location", web::get().to(location_prefill));
}

fn unauthenticated_response() -> HttpResponse {
    HttpResponse::Unauthorized().json(ErrorResponse {
        error: "not_authenticated".to_string(),
        message: "User not logged in.".to_string(),
        status_code: 401,
    })
}

fn submission_error_response(err: &SubmissionError) -> HttpResponse {
    match err {
        SubmissionError::NotAuthenticated => unauthenticated_response(),
        SubmissionError::Validation(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation Error".to_string(),
            message: message.clone(),
            status_code: 400,
        }),
        SubmissionError::RottenItem => HttpResponse::UnprocessableEntity().json(ErrorResponse {
            error: "rotten_item".to_string(),
            message: "The Item is Classified as Rotten and Cannot be Donated.".to_string(),
            status_code: 422,
        }),
        SubmissionError::Classifier(ClassifierError::Timeout)
        | SubmissionError::Persistence(PersistenceError::Timeout)
        | SubmissionError::Auth(crate::services::AuthError::Timeout) => {
            HttpResponse::GatewayTimeout().json(ErrorResponse {
                error: "timeout".to_string(),
                message: "The request timed out. Please try again.".to_string(),
                status_code: 504,
            })
        }
        SubmissionError::Classifier(_) => HttpResponse::BadGateway().json(ErrorResponse {
            error: "classification_failed".to_string(),
            message: "Failed to classify the image.".to_string(),
            status_code: 502,
        }),
        SubmissionError::Persistence(PersistenceError::Validation(message)) => {
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Validation Error".to_string(),
                message: message.clone(),
                status_code: 400,
            })
        }
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: "submission_failed".to_string(),
            message: "Unable to post. Please try again.".to_string(),
            status_code: 500,
        }),
    }
}

/// Post a food alert (donor side)
///
/// POST /api/v1/alerts
///
/// The image field carries base64-encoded bytes when the food type requires
/// a freshness check.
async fn post_alert(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<PostAlertRequest>,
) -> impl Responder {
    let session = match session_from(&http_req) {
        Some(session) => session,
        None => return unauthenticated_response(),
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation Error".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let image = match &req.image {
        Some(encoded) => match base64::engine::general_purpose::STANDARD.decode(encoded) {
            Ok(bytes) => Some(bytes),
            Err(_) => {
                return HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation Error".to_string(),
                    message: "Image is not valid base64.".to_string(),
                    status_code: 400,
                });
            }
        },
        None => None,
    };

    let submission = AlertSubmission {
        food_type: req.food_type.clone(),
        quantity: req.quantity,
        special_notes: req.special_notes.clone(),
        location: req.location.clone(),
        expiration_date: req.expiration_date,
        image,
    };

    match state.submissions.post_alert(&session, submission).await {
        Ok(posted) => HttpResponse::Ok().json(PostAlertResponse {
            success: true,
            alert: posted.alert,
        }),
        Err(err) => {
            tracing::error!("Failed to post alert: {}", err);
            submission_error_response(&err)
        }
    }
}

/// Post a food request (recipient side)
///
/// POST /api/v1/requests
async fn post_request(
    state: web::Data<AppState>,
    http_req: HttpRequest,
    req: web::Json<PostRequestRequest>,
) -> impl Responder {
    let session = match session_from(&http_req) {
        Some(session) => session,
        None => return unauthenticated_response(),
    };

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation Error".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let submission = RequestSubmission {
        food_type: req.food_type.clone(),
        quantity: req.quantity,
        special_notes: req.special_notes.clone(),
        location: req.location.clone(),
    };

    match state.submissions.post_request(&session, submission).await {
        Ok(request) => HttpResponse::Ok().json(PostRequestResponse {
            success: true,
            request,
        }),
        Err(err) => {
            tracing::error!("Failed to post request: {}", err);
            submission_error_response(&err)
        }
    }
}

/// Resolve the caller's address for prefilling the posting form
///
/// GET /api/v1/location
///
/// The address is capped for display here, at the edge; queries always use
/// the full form.
async fn location_prefill(state: web::Data<AppState>) -> impl Responder {
    match state.location.resolve_current_address().await {
        Ok(address) => HttpResponse::Ok().json(serde_json::json!({
            "address": truncate_for_display(&address, ADDRESS_DISPLAY_MAX),
        })),
        Err(LocationError::PermissionDenied) => HttpResponse::Forbidden().json(ErrorResponse {
            error: "permission_denied".to_string(),
            message: "Location permission is required to fetch your location.".to_string(),
            status_code: 403,
        }),
        Err(err) => {
            tracing::error!("Failed to resolve location: {}", err);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "location_unavailable".to_string(),
                message: "Could not fetch your location. Please try again.".to_string(),
                status_code: 503,
            })
        }
    }
}
