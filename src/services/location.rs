use crate::models::{Address, Coordinates};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while resolving the device location
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission is required to fetch your location")]
    PermissionDenied,

    #[error("Could not fetch your location: {0}")]
    Unavailable(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for LocationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LocationError::Timeout
        } else {
            LocationError::RequestError(err)
        }
    }
}

/// Client for the geolocation provider
///
/// Resolves the device position (permission semantics included) and reverse
/// geocodes it into a postal address. Returns the full formatted address;
/// display truncation is a caller concern (see [`truncate_for_display`]).
pub struct LocationResolver {
    base_url: String,
    client: Client,
}

impl LocationResolver {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Current device coordinates
    ///
    /// The provider answers 403 when the user refused the location
    /// permission; anything else unsuccessful means the fix is unavailable.
    pub async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let url = format!("{}/position", self.base_url.trim_end_matches('/'));

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::FORBIDDEN {
            return Err(LocationError::PermissionDenied);
        }

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(response.status().to_string()));
        }

        let coordinates = response
            .json::<Coordinates>()
            .await
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        Ok(coordinates)
    }

    /// Reverse geocode coordinates into address components
    pub async fn reverse_geocode(
        &self,
        coordinates: Coordinates,
    ) -> Result<Address, LocationError> {
        let url = format!(
            "{}/reverse?latitude={}&longitude={}",
            self.base_url.trim_end_matches('/'),
            coordinates.latitude,
            coordinates.longitude
        );

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(response.status().to_string()));
        }

        let address = response
            .json::<Address>()
            .await
            .map_err(|e| LocationError::InvalidResponse(e.to_string()))?;

        Ok(address)
    }

    /// Resolve the current position into a formatted address string
    pub async fn resolve_current_address(&self) -> Result<String, LocationError> {
        let coordinates = self.current_position().await?;
        let address = self.reverse_geocode(coordinates).await?;

        tracing::debug!("Resolved address: {}", address.formatted());

        Ok(address.formatted())
    }
}

/// Cap a formatted address for display-constrained contexts
///
/// Presentation-only; callers that key queries on the address must use the
/// untruncated form.
pub fn truncate_for_display(address: &str, max_chars: usize) -> String {
    if address.chars().count() <= max_chars {
        return address.to_string();
    }
    let head: String = address.chars().take(max_chars).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_address_unchanged() {
        let address = "12 Baker St, Singapore";
        assert_eq!(truncate_for_display(address, 50), address);
    }

    #[test]
    fn test_truncate_long_address() {
        let address = "a".repeat(60);
        let truncated = truncate_for_display(&address, 50);
        assert_eq!(truncated.chars().count(), 53);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_truncate_exact_boundary() {
        let address = "b".repeat(50);
        assert_eq!(truncate_for_display(&address, 50), address);
    }

    #[test]
    fn test_resolver_url_building() {
        let resolver = LocationResolver::new("https://geo.test/v1/".to_string(), 30);
        assert_eq!(resolver.base_url, "https://geo.test/v1/");
    }
}
