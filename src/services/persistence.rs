use crate::models::{AlertFilter, FoodAlert, FoodRequest, NewAlert, NewRequest, UserRecord};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with the document store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for PersistenceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PersistenceError::Timeout
        } else {
            PersistenceError::RequestError(err)
        }
    }
}

/// Collection IDs in the Appwrite database
#[derive(Debug, Clone)]
pub struct Collections {
    pub users: String,
    pub food_alerts: String,
    pub food_requests: String,
}

/// Typed gateway over the Appwrite Databases API
///
/// Handles all document reads and writes for the matching workflow:
/// - Listing alerts with combined equality/range predicates
/// - Listing a user's requests
/// - Creating alerts and requests (with gateway-side validation)
/// - Flipping an alert's matched flag (idempotent)
/// - Leaderboard reads and atomic donation increments
pub struct PersistenceGateway {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: Collections,
}

/// Build the Appwrite query array for an alert filter
fn alert_queries(filter: &AlertFilter) -> Vec<String> {
    let mut queries = Vec::new();

    if let Some(location) = &filter.location {
        queries.push(format!("equal(\"location\", \"{}\")", location));
    }
    if filter.unmatched_only {
        queries.push("equal(\"isMatched\", false)".to_string());
    }
    if let Some(bound) = filter.not_expired_before {
        queries.push(format!(
            "greaterThanEqual(\"expirationDate\", \"{}\")",
            bound.to_rfc3339()
        ));
    }
    if let Some(owner) = &filter.owner_id {
        queries.push(format!("equal(\"accountId\", \"{}\")", owner));
    }

    queries
}

/// Re-check a returned alert against the filter
///
/// The server applies the same predicates; re-checking here keeps one clock
/// (ours) authoritative for the expiration cut and guards against stale
/// matched flags in the window between query and response.
fn matches_filter(alert: &FoodAlert, filter: &AlertFilter) -> bool {
    if let Some(location) = &filter.location {
        if &alert.location != location {
            return false;
        }
    }
    if filter.unmatched_only && alert.is_matched {
        return false;
    }
    if let Some(bound) = filter.not_expired_before {
        if alert.expiration_date < bound {
            return false;
        }
    }
    if let Some(owner) = &filter.owner_id {
        if &alert.account_id != owner {
            return false;
        }
    }
    true
}

fn require_field(value: &str, name: &str) -> Result<(), PersistenceError> {
    if value.trim().is_empty() {
        return Err(PersistenceError::Validation(format!("{} must not be blank", name)));
    }
    Ok(())
}

fn require_positive(quantity: u32) -> Result<(), PersistenceError> {
    if quantity == 0 {
        return Err(PersistenceError::Validation(
            "quantity must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

impl PersistenceGateway {
    /// Create a new persistence gateway
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: Collections,
        timeout_secs: u64,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        }
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn document_url(&self, collection: &str, document_id: &str) -> String {
        format!("{}/{}", self.documents_url(collection), document_id)
    }

    async fn list_documents(
        &self,
        collection: &str,
        queries: &[String],
    ) -> Result<Vec<Value>, PersistenceError> {
        let queries_json = serde_json::to_string(queries)
            .map_err(|e| PersistenceError::InvalidResponse(e.to_string()))?;
        let encoded_queries = urlencoding::encode(&queries_json);

        let url = format!("{}?query={}", self.documents_url(collection), encoded_queries);

        tracing::debug!("Listing documents from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PersistenceError::ApiError(format!(
                "Failed to list documents: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;

        let documents = body
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| PersistenceError::InvalidResponse("Missing documents array".into()))?;

        Ok(documents.clone())
    }

    /// List food alerts matching the given filter
    pub async fn list_alerts(
        &self,
        filter: &AlertFilter,
    ) -> Result<Vec<FoodAlert>, PersistenceError> {
        let queries = alert_queries(filter);
        let documents = self
            .list_documents(&self.collections.food_alerts, &queries)
            .await?;

        let alerts: Vec<FoodAlert> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .filter(|alert: &FoodAlert| matches_filter(alert, filter))
            .collect();

        tracing::debug!("Listed {} alerts", alerts.len());

        Ok(alerts)
    }

    /// List food requests owned by `owner_id`
    pub async fn list_requests(
        &self,
        owner_id: &str,
    ) -> Result<Vec<FoodRequest>, PersistenceError> {
        let queries = vec![format!("equal(\"accountId\", \"{}\")", owner_id)];
        let documents = self
            .list_documents(&self.collections.food_requests, &queries)
            .await?;

        let requests: Vec<FoodRequest> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .collect();

        tracing::debug!("Listed {} requests for {}", requests.len(), owner_id);

        Ok(requests)
    }

    /// Create a food alert
    ///
    /// The matched flag is always initialized to false; validation re-runs
    /// here because the UI is not a trust boundary.
    pub async fn create_alert(&self, new: &NewAlert) -> Result<FoodAlert, PersistenceError> {
        require_field(&new.food_type, "foodType")?;
        require_field(&new.location, "location")?;
        require_field(&new.account_id, "accountId")?;
        require_positive(new.quantity)?;

        let payload = json!({
            "documentId": uuid::Uuid::new_v4().to_string(),
            "data": {
                "foodType": new.food_type,
                "quantity": new.quantity,
                "specialNotes": new.special_notes,
                "location": new.location,
                "expirationDate": new.expiration_date.to_rfc3339(),
                "accountId": new.account_id,
                "isMatched": false,
            }
        });

        let document = self
            .create_document(&self.collections.food_alerts, payload)
            .await?;

        serde_json::from_value(document)
            .map_err(|e| PersistenceError::InvalidResponse(format!("Failed to parse alert: {}", e)))
    }

    /// Create a food request
    pub async fn create_request(&self, new: &NewRequest) -> Result<FoodRequest, PersistenceError> {
        require_field(&new.food_type, "foodType")?;
        require_field(&new.location, "location")?;
        require_field(&new.account_id, "accountId")?;
        require_positive(new.quantity)?;

        let payload = json!({
            "documentId": uuid::Uuid::new_v4().to_string(),
            "data": {
                "foodType": new.food_type,
                "quantity": new.quantity,
                "specialNotes": new.special_notes,
                "location": new.location,
                "accountId": new.account_id,
            }
        });

        let document = self
            .create_document(&self.collections.food_requests, payload)
            .await?;

        serde_json::from_value(document).map_err(|e| {
            PersistenceError::InvalidResponse(format!("Failed to parse request: {}", e))
        })
    }

    async fn create_document(
        &self,
        collection: &str,
        payload: Value,
    ) -> Result<Value, PersistenceError> {
        let url = self.documents_url(collection);

        let response = self
            .client
            .post(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PersistenceError::ApiError(format!(
                "Failed to create document: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        Ok(body.get("data").cloned().unwrap_or(body))
    }

    /// Mark an alert as matched
    ///
    /// Idempotent: the matched flag only ever moves false -> true, so
    /// re-applying it to an already-matched alert is a no-op, not an error.
    pub async fn set_alert_matched(&self, alert_id: &str) -> Result<(), PersistenceError> {
        let url = self.document_url(&self.collections.food_alerts, alert_id);

        let response = self
            .client
            .patch(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&json!({ "data": { "isMatched": true } }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PersistenceError::NotFound(format!("Alert {}", alert_id)));
        }

        if !response.status().is_success() {
            return Err(PersistenceError::ApiError(format!(
                "Failed to update match status: {}",
                response.status()
            )));
        }

        tracing::debug!("Alert {} marked as matched", alert_id);

        Ok(())
    }

    /// Top donors ordered descending by donation count, ties broken by
    /// document id for a stable order.
    pub async fn top_donors(&self, limit: usize) -> Result<Vec<UserRecord>, PersistenceError> {
        let queries = vec![
            "orderDesc(\"donationCount\")".to_string(),
            "orderAsc(\"$id\")".to_string(),
            format!("limit({})", limit),
        ];

        let documents = self.list_documents(&self.collections.users, &queries).await?;

        let donors: Vec<UserRecord> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                serde_json::from_value(data.clone()).ok()
            })
            .take(limit)
            .collect();

        Ok(donors)
    }

    /// Atomically increment a user's donation count and points
    ///
    /// Issued as single-request server-side attribute increments so that
    /// concurrent donations from multiple devices never lose updates. The
    /// client never reads-modifies-writes the counters.
    pub async fn increment_donation(
        &self,
        user_doc_id: &str,
        reward_points: u32,
    ) -> Result<UserRecord, PersistenceError> {
        self.increment_attribute(user_doc_id, "donationCount", 1)
            .await?;
        let document = self
            .increment_attribute(user_doc_id, "points", reward_points as i64)
            .await?;

        serde_json::from_value(document)
            .map_err(|e| PersistenceError::InvalidResponse(format!("Failed to parse user: {}", e)))
    }

    async fn increment_attribute(
        &self,
        document_id: &str,
        attribute: &str,
        value: i64,
    ) -> Result<Value, PersistenceError> {
        let url = format!(
            "{}/{}/increment",
            self.document_url(&self.collections.users, document_id),
            attribute
        );

        let response = self
            .client
            .patch(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&json!({ "value": value }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PersistenceError::NotFound(format!("User {}", document_id)));
        }

        if !response.status().is_success() {
            return Err(PersistenceError::ApiError(format!(
                "Failed to increment {}: {}",
                attribute,
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        Ok(body.get("data").cloned().unwrap_or(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    fn gateway() -> PersistenceGateway {
        PersistenceGateway::new(
            "https://appwrite.test/v1".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            Collections {
                users: "users".to_string(),
                food_alerts: "food_alerts".to_string(),
                food_requests: "food_requests".to_string(),
            },
            30,
        )
    }

    fn sample_alert(location: &str, matched: bool, expires_in_hours: i64) -> FoodAlert {
        FoodAlert {
            id: "a1".to_string(),
            account_id: "u1".to_string(),
            food_type: "Baked Goods".to_string(),
            quantity: 2,
            special_notes: None,
            location: location.to_string(),
            expiration_date: Utc::now() + ChronoDuration::hours(expires_in_hours),
            is_matched: matched,
            created_at: None,
        }
    }

    #[test]
    fn test_gateway_creation() {
        let gateway = gateway();
        assert_eq!(gateway.base_url, "https://appwrite.test/v1");
        assert_eq!(
            gateway.documents_url("food_alerts"),
            "https://appwrite.test/v1/databases/test_db/collections/food_alerts/documents"
        );
    }

    #[test]
    fn test_alert_queries_candidates() {
        let now = Utc::now();
        let filter = AlertFilter::candidates_at("Bishan, Singapore", now);
        let queries = alert_queries(&filter);

        assert_eq!(queries.len(), 3);
        assert_eq!(queries[0], "equal(\"location\", \"Bishan, Singapore\")");
        assert_eq!(queries[1], "equal(\"isMatched\", false)");
        assert!(queries[2].starts_with("greaterThanEqual(\"expirationDate\""));
    }

    #[test]
    fn test_alert_queries_owner_only() {
        let queries = alert_queries(&AlertFilter::owned_by("acc_9"));
        assert_eq!(queries, vec!["equal(\"accountId\", \"acc_9\")".to_string()]);
    }

    #[test]
    fn test_filter_rejects_expired() {
        let now = Utc::now();
        let filter = AlertFilter::candidates_at("here", now);

        let expired = sample_alert("here", false, -1);
        assert!(!matches_filter(&expired, &filter));

        let fresh = sample_alert("here", false, 24);
        assert!(matches_filter(&fresh, &filter));
    }

    #[test]
    fn test_filter_rejects_matched() {
        let filter = AlertFilter::candidates_at("here", Utc::now());
        let matched = sample_alert("here", true, 24);
        assert!(!matches_filter(&matched, &filter));
    }

    #[test]
    fn test_filter_rejects_other_location() {
        let filter = AlertFilter::candidates_at("here", Utc::now());
        let elsewhere = sample_alert("there", false, 24);
        assert!(!matches_filter(&elsewhere, &filter));
    }

    #[test]
    fn test_validation_rejects_zero_quantity() {
        assert!(require_positive(0).is_err());
        assert!(require_positive(1).is_ok());
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        assert!(require_field("  ", "foodType").is_err());
        assert!(require_field("Dairy Products", "foodType").is_ok());
    }
}
