use serde::{Deserialize, Serialize};
use crate::models::domain::{FoodAlert, FoodRequest, MatchSnapshot, UserRecord};

/// Response for a completed load cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    #[serde(flatten)]
    pub snapshot: MatchSnapshot,
}

/// Response after accepting a match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptMatchResponse {
    pub success: bool,
    #[serde(rename = "alertId")]
    pub alert_id: String,
}

/// Response after posting a food alert
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostAlertResponse {
    pub success: bool,
    pub alert: FoodAlert,
}

/// Response after posting a food request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequestResponse {
    pub success: bool,
    pub request: FoodRequest,
}

/// One leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub username: String,
    #[serde(rename = "donationCount")]
    pub donation_count: u32,
    pub points: u32,
}

/// Response for the leaderboard endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub donors: Vec<LeaderboardEntry>,
}

/// Response for the tips endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipsResponse {
    pub tips: Vec<String>,
}

/// Session created by signup or login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub secret: String,
    pub user: UserRecord,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
