use actix_web::{web, HttpResponse, Responder};
use crate::core::rank_donors;
use crate::models::{ErrorResponse, LeaderboardResponse};
use crate::routes::matches::AppState;

/// Configure leaderboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/leaderboard", web::get().to(leaderboard));
}

/// Top donors by donation count
///
/// GET /api/v1/leaderboard
async fn leaderboard(state: web::Data<AppState>) -> impl Responder {
    match state.leaderboard.top_donors().await {
        Ok(donors) => HttpResponse::Ok().json(LeaderboardResponse {
            donors: rank_donors(&donors),
        }),
        Err(err) => {
            tracing::error!("Failed to fetch leaderboard: {}", err);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "leaderboard_failed".to_string(),
                message: "Unable to load the leaderboard.".to_string(),
                status_code: 500,
            })
        }
    }
}
