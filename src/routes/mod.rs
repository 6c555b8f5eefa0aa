// Route exports
pub mod alerts;
pub mod auth;
pub mod leaderboard;
pub mod matches;
pub mod tips;

use crate::models::Session;
use actix_web::{web, HttpRequest};

/// Header carrying the Appwrite session secret
pub const SESSION_HEADER: &str = "X-Session-Token";

/// Extract the caller's session from the request headers
pub fn session_from(req: &HttpRequest) -> Option<Session> {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|secret| !secret.is_empty())
        .map(Session::new)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(alerts::configure)
            .configure(auth::configure)
            .configure(leaderboard::configure)
            .configure(tips::configure),
    );
}
