use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create an account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[serde(default)]
    pub contactno: Option<String>,
}

/// Request to log in with email and password
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Request to accept a candidate alert as a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AcceptMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "alert_id", rename = "alertId")]
    pub alert_id: String,
}

/// Request to dismiss a single notification from the current snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DismissNotificationRequest {
    pub index: usize,
}

/// Request to post a food alert (donor side)
///
/// `image` carries the captured photo as base64 when the food type requires
/// a freshness check before the alert may be persisted.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostAlertRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "food_type", rename = "foodType")]
    pub food_type: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[serde(alias = "special_notes", rename = "specialNotes", default)]
    pub special_notes: Option<String>,
    #[validate(length(min = 1))]
    pub location: String,
    #[serde(alias = "expiration_date", rename = "expirationDate")]
    pub expiration_date: DateTime<Utc>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Request to post a food request (recipient side)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PostRequestRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "food_type", rename = "foodType")]
    pub food_type: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
    #[serde(alias = "special_notes", rename = "specialNotes", default)]
    pub special_notes: Option<String>,
    #[validate(length(min = 1))]
    pub location: String,
}
