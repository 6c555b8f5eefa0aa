use actix_web::{web, HttpResponse, Responder};
use crate::models::TipsResponse;
use crate::routes::matches::AppState;
use crate::services::FETCH_ERROR_FALLBACK;

/// Configure tips routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/tips", web::get().to(tips));
}

/// Generated sustainability tips
///
/// GET /api/v1/tips
///
/// A fetch failure degrades to a single error tip rather than an error
/// status; the tips panel is decorative and must never break the screen.
async fn tips(state: web::Data<AppState>) -> impl Responder {
    match state.tips.fetch_tips().await {
        Ok(tips) => HttpResponse::Ok().json(TipsResponse { tips }),
        Err(err) => {
            tracing::warn!("Failed to fetch tips: {}", err);
            HttpResponse::Ok().json(TipsResponse {
                tips: vec![FETCH_ERROR_FALLBACK.to_string()],
            })
        }
    }
}
