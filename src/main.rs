mod config;
mod core;
mod models;
mod routes;
mod services;

use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use crate::config::Settings;
use crate::core::{LeaderboardService, MatchingEngine, SubmissionService};
use crate::routes::matches::AppState;
use crate::services::{
    AuthGateway, ClassificationClient, Collections, LocationResolver, PersistenceGateway,
    TipsClient,
};
use std::sync::Arc;
use tracing::{error, info};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .body(serde_json::to_string(self).unwrap())
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Nourish Match service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    let timeout_secs = settings.http.timeout_secs;

    // Initialize the persistence gateway
    let collections = Collections {
        users: settings.collection.users.clone(),
        food_alerts: settings.collection.food_alerts,
        food_requests: settings.collection.food_requests,
    };

    let persistence = Arc::new(PersistenceGateway::new(
        settings.appwrite.endpoint.clone(),
        settings.appwrite.api_key.clone(),
        settings.appwrite.project_id.clone(),
        settings.appwrite.database_id.clone(),
        collections,
        timeout_secs,
    ));

    info!("Persistence gateway initialized");

    // Initialize the auth gateway
    let auth = Arc::new(AuthGateway::new(
        settings.appwrite.endpoint,
        settings.appwrite.api_key,
        settings.appwrite.project_id,
        settings.appwrite.database_id,
        settings.collection.users,
        timeout_secs,
    ));

    // Initialize the external collaborators
    let location = Arc::new(LocationResolver::new(
        settings.location.endpoint,
        timeout_secs,
    ));
    let classifier = Arc::new(ClassificationClient::new(
        settings.classifier.endpoint,
        timeout_secs,
    ));
    let tips = Arc::new(TipsClient::new(
        settings.tips.endpoint,
        settings.tips.api_key,
        timeout_secs,
    ));

    info!("External service clients initialized");

    // Initialize the workflow services
    let engine = Arc::new(MatchingEngine::new(
        auth.clone(),
        location.clone(),
        persistence.clone(),
    ));
    let submissions = Arc::new(SubmissionService::new(
        auth.clone(),
        classifier,
        persistence.clone(),
        settings.rewards.points_per_donation,
    ));
    let leaderboard = Arc::new(LeaderboardService::new(
        persistence,
        settings.leaderboard.limit,
    ));

    info!(
        "Matching engine initialized (reward: {} points, leaderboard top {})",
        settings.rewards.points_per_donation, settings.leaderboard.limit
    );

    // Build application state
    let app_state = AppState {
        auth,
        location,
        engine,
        submissions,
        leaderboard,
        tips,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
