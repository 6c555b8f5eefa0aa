use crate::models::{Session, UserRecord};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur against the auth service
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("An account with this email already exists")]
    DuplicateAccount,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AuthError::Timeout
        } else {
            AuthError::RequestError(err)
        }
    }
}

/// Session lifecycle gateway over the Appwrite Account API
///
/// Sign-up creates both the auth account and the user document; the current
/// user is the merge of the two, keyed by account id. A missing session is a
/// normal state surfaced as `Ok(None)`, never an error.
pub struct AuthGateway {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    users_collection: String,
    client: Client,
}

impl AuthGateway {
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        users_collection: String,
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
            users_collection,
            client,
        }
    }

    fn account_url(&self, path: &str) -> String {
        format!("{}/account{}", self.base_url.trim_end_matches('/'), path)
    }

    fn users_documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.users_collection
        )
    }

    /// Create an account plus its user document, then log in
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        username: &str,
        contactno: Option<i64>,
    ) -> Result<(Session, UserRecord), AuthError> {
        if email.trim().is_empty() || password.trim().is_empty() || username.trim().is_empty() {
            return Err(AuthError::Validation(
                "email, password and username are required".to_string(),
            ));
        }

        let payload = json!({
            "userId": uuid::Uuid::new_v4().to_string(),
            "email": email,
            "password": password,
            "name": username,
        });

        let response = self
            .client
            .post(self.account_url(""))
            .header("X-Appwrite-Project", &self.project_id)
            .json(&payload)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(AuthError::DuplicateAccount);
        }

        if !response.status().is_success() {
            return Err(AuthError::ApiError(format!(
                "Failed to create account: {}",
                response.status()
            )));
        }

        let account: Value = response.json().await?;
        let account_id = account
            .get("$id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::InvalidResponse("Missing account id".into()))?
            .to_string();

        let session = self.log_in(email, password).await?;

        let document = json!({
            "documentId": uuid::Uuid::new_v4().to_string(),
            "data": {
                "accountId": account_id,
                "email": email,
                "username": username,
                "contactno": contactno,
            }
        });

        let response = self
            .client
            .post(self.users_documents_url())
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&document)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::ApiError(format!(
                "Failed to create user document: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let data = body.get("data").cloned().unwrap_or(body);
        let user = serde_json::from_value(data)
            .map_err(|e| AuthError::InvalidResponse(format!("Failed to parse user: {}", e)))?;

        tracing::info!("Created account for {}", email);

        Ok((session, user))
    }

    /// Create an email/password session
    pub async fn log_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let response = self
            .client
            .post(self.account_url("/sessions/email"))
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AuthError::InvalidCredentials);
        }

        if !response.status().is_success() {
            return Err(AuthError::ApiError(format!(
                "Login failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let secret = body
            .get("secret")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::InvalidResponse("Missing session secret".into()))?;

        Ok(Session::new(secret))
    }

    /// Fetch the user behind the given session
    ///
    /// Returns `Ok(None)` when the session is missing or expired. When the
    /// account exists but its user document does not, a record is built from
    /// the account fields alone, mirroring the merge fallback the mobile
    /// client performed.
    pub async fn current_user(&self, session: &Session) -> Result<Option<UserRecord>, AuthError> {
        let response = self
            .client
            .get(self.account_url(""))
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Session", &session.secret)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(AuthError::ApiError(format!(
                "Failed to fetch account: {}",
                response.status()
            )));
        }

        let account: Value = response.json().await?;
        let account_id = account
            .get("$id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::InvalidResponse("Missing account id".into()))?
            .to_string();

        let queries = vec![format!("equal(\"accountId\", \"{}\")", account_id)];
        let queries_json = serde_json::to_string(&queries)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;
        let url = format!(
            "{}?query={}",
            self.users_documents_url(),
            urlencoding::encode(&queries_json)
        );

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::ApiError(format!(
                "Failed to fetch user document: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        let documents = body
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| AuthError::InvalidResponse("Missing documents array".into()))?;

        if let Some(doc) = documents.first() {
            let data = doc.get("data").unwrap_or(doc);
            let user = serde_json::from_value(data.clone())
                .map_err(|e| AuthError::InvalidResponse(format!("Failed to parse user: {}", e)))?;
            return Ok(Some(user));
        }

        tracing::warn!("No user document found for account {}", account_id);

        let email = account
            .get("email")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let username = account
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(Some(UserRecord {
            id: account_id.clone(),
            account_id,
            email,
            username,
            contactno: None,
            donation_count: 0,
            points: 0,
        }))
    }

    /// Invalidate the current session
    ///
    /// Idempotent: logging out an already-dead session succeeds.
    pub async fn log_out(&self, session: &Session) -> Result<(), AuthError> {
        let response = self
            .client
            .delete(self.account_url("/sessions/current"))
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Session", &session.secret)
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED || response.status().is_success() {
            return Ok(());
        }

        Err(AuthError::ApiError(format!(
            "Logout failed: {}",
            response.status()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> AuthGateway {
        AuthGateway::new(
            "https://appwrite.test/v1".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            "users".to_string(),
            30,
        )
    }

    #[test]
    fn test_url_building() {
        let gateway = gateway();
        assert_eq!(gateway.account_url(""), "https://appwrite.test/v1/account");
        assert_eq!(
            gateway.account_url("/sessions/email"),
            "https://appwrite.test/v1/account/sessions/email"
        );
        assert_eq!(
            gateway.users_documents_url(),
            "https://appwrite.test/v1/databases/test_db/collections/users/documents"
        );
    }

    #[tokio::test]
    async fn test_sign_up_rejects_blank_input() {
        let gateway = gateway();
        let result = gateway.sign_up("", "password123", "someone", None).await;
        assert!(matches!(result, Err(AuthError::Validation(_))));
    }
}
