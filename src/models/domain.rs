use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record merged from the Appwrite auth account and the users
/// collection document (the two live in different places backend-side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub contactno: Option<i64>,
    #[serde(rename = "donationCount", default)]
    pub donation_count: u32,
    #[serde(default)]
    pub points: u32,
}

/// A donor's posting of surplus food available for pickup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodAlert {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "foodType")]
    pub food_type: String,
    pub quantity: u32,
    #[serde(rename = "specialNotes", default)]
    pub special_notes: Option<String>,
    pub location: String,
    #[serde(rename = "expirationDate")]
    pub expiration_date: DateTime<Utc>,
    // isMatched may be absent on old documents; treat absent as false
    #[serde(rename = "isMatched", default)]
    pub is_matched: bool,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A recipient's posting of a food need. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodRequest {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "foodType")]
    pub food_type: String,
    pub quantity: u32,
    #[serde(rename = "specialNotes", default)]
    pub special_notes: Option<String>,
    pub location: String,
    #[serde(rename = "$createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating a food alert. The gateway assigns the document id
/// and initializes `isMatched` to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlert {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "foodType")]
    pub food_type: String,
    pub quantity: u32,
    #[serde(rename = "specialNotes")]
    pub special_notes: Option<String>,
    pub location: String,
    #[serde(rename = "expirationDate")]
    pub expiration_date: DateTime<Utc>,
}

/// Payload for creating a food request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRequest {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "foodType")]
    pub food_type: String,
    pub quantity: u32,
    #[serde(rename = "specialNotes")]
    pub special_notes: Option<String>,
    pub location: String,
}

/// Ephemeral notification derived from a load cycle. Never persisted; the
/// whole set is replaced on the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    AlertMatched,
    NewPostings,
}

impl Notification {
    pub fn alert_matched() -> Self {
        Self {
            message: "Your Food Alert Has Been Matched!".to_string(),
            kind: NotificationKind::AlertMatched,
        }
    }

    pub fn new_postings() -> Self {
        Self {
            message: "New Food Postings Are Available!".to_string(),
            kind: NotificationKind::NewPostings,
        }
    }
}

/// Geographic coordinates reported by the positioning provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Structured postal address from reverse geocoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub region: String,
    pub country: String,
}

impl Address {
    /// Format as the single-line form used as the alert/request location key.
    pub fn formatted(&self) -> String {
        format!("{}, {}, {}, {}", self.street, self.city, self.region, self.country)
    }
}

/// An authenticated Appwrite session. Constructed by login, torn down by
/// logout; threaded explicitly through the engine and gateways.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub secret: String,
}

impl Session {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

/// Everything a completed load cycle produced, committed as one unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub requests: Vec<FoodRequest>,
    #[serde(rename = "candidateAlerts")]
    pub candidate_alerts: Vec<FoodAlert>,
    #[serde(rename = "ownAlerts")]
    pub own_alerts: Vec<FoodAlert>,
    pub notifications: Vec<Notification>,
    pub address: String,
}

/// Filter for listing food alerts. All predicates combine with AND.
#[derive(Debug, Clone, Default)]
pub struct AlertFilter {
    pub location: Option<String>,
    pub unmatched_only: bool,
    pub not_expired_before: Option<DateTime<Utc>>,
    pub owner_id: Option<String>,
}

impl AlertFilter {
    /// Candidate alerts for a recipient at `location`: unmatched and not yet
    /// expired at `now`.
    pub fn candidates_at(location: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            location: Some(location.into()),
            unmatched_only: true,
            not_expired_before: Some(now),
            owner_id: None,
        }
    }

    /// All alerts posted by `owner_id`, regardless of match status.
    pub fn owned_by(owner_id: impl Into<String>) -> Self {
        Self {
            owner_id: Some(owner_id.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_constructors() {
        let matched = Notification::alert_matched();
        assert_eq!(matched.kind, NotificationKind::AlertMatched);
        assert_eq!(matched.message, "Your Food Alert Has Been Matched!");

        let postings = Notification::new_postings();
        assert_eq!(postings.kind, NotificationKind::NewPostings);
    }

    #[test]
    fn test_notification_kind_wire_format() {
        let json = serde_json::to_string(&NotificationKind::AlertMatched).unwrap();
        assert_eq!(json, "\"alert-matched\"");
        let json = serde_json::to_string(&NotificationKind::NewPostings).unwrap();
        assert_eq!(json, "\"new-postings\"");
    }

    #[test]
    fn test_address_formatting() {
        let address = Address {
            street: "12 Baker St".to_string(),
            city: "Singapore".to_string(),
            region: "Central".to_string(),
            country: "Singapore".to_string(),
        };
        assert_eq!(address.formatted(), "12 Baker St, Singapore, Central, Singapore");
    }

    #[test]
    fn test_alert_is_matched_defaults_false() {
        // Old documents predate the isMatched attribute
        let json = r#"{
            "$id": "a1",
            "accountId": "u1",
            "foodType": "Baked Goods",
            "quantity": 3,
            "location": "somewhere",
            "expirationDate": "2030-01-01T00:00:00Z"
        }"#;
        let alert: FoodAlert = serde_json::from_str(json).unwrap();
        assert!(!alert.is_matched);
        assert!(alert.special_notes.is_none());
    }

    #[test]
    fn test_candidate_filter_shape() {
        let now = Utc::now();
        let filter = AlertFilter::candidates_at("loc", now);
        assert!(filter.unmatched_only);
        assert_eq!(filter.not_expired_before, Some(now));
        assert!(filter.owner_id.is_none());

        let owned = AlertFilter::owned_by("u1");
        assert!(!owned.unmatched_only);
        assert!(owned.not_expired_before.is_none());
    }
}
