use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Prompt sent to the text-generation endpoint
const TIPS_PROMPT: &str = "Provide 5 short and practical tips for reducing food waste and \
promoting sustainability. Each tip should be no more than one sentence long and focus on \
simple actions individuals can take daily.";

/// Shown when the endpoint returns no usable candidates
pub const NO_TIPS_FALLBACK: &str = "No tips were generated. Please try again later.";

/// Shown by callers when the fetch itself fails
pub const FETCH_ERROR_FALLBACK: &str = "Error fetching tips. Please try again later.";

/// Errors that can occur while fetching generated tips
#[derive(Debug, Error)]
pub enum TipsError {
    #[error("Request timed out")]
    Timeout,

    #[error("HTTP request failed: {0}")]
    RequestError(reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

impl From<reqwest::Error> for TipsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TipsError::Timeout
        } else {
            TipsError::RequestError(err)
        }
    }
}

/// Client for the generateContent-style text endpoint
pub struct TipsClient {
    endpoint: String,
    api_key: String,
    client: Client,
}

impl TipsClient {
    pub fn new(endpoint: String, api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            endpoint,
            api_key,
            client,
        }
    }

    /// Fetch and parse sustainability tips
    ///
    /// A response without candidates is not an error; it yields the single
    /// placeholder tip so the caller always has something to show.
    pub async fn fetch_tips(&self) -> Result<Vec<String>, TipsError> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);

        let payload = json!({
            "contents": [
                { "parts": [ { "text": TIPS_PROMPT } ] }
            ]
        });

        let response = self.client.post(&url).json(&payload).send().await?;

        if !response.status().is_success() {
            return Err(TipsError::ApiError(format!(
                "Tip generation failed: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;

        let text = body
            .get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str());

        match text {
            Some(text) => Ok(parse_tips(text)),
            None => Ok(vec![NO_TIPS_FALLBACK.to_string()]),
        }
    }
}

/// Parse generated text into a list of tips
///
/// Strips bold markers and leading enumeration, splits on line breaks and
/// drops blank lines. Never panics on malformed text; an effectively empty
/// response collapses to the placeholder tip.
pub fn parse_tips(text: &str) -> Vec<String> {
    let cleaned = text.replace("**", "");

    let tips: Vec<String> = cleaned
        .trim()
        .split('\n')
        .map(strip_enumeration)
        .filter(|tip| !tip.is_empty())
        .map(|tip| tip.to_string())
        .collect();

    if tips.is_empty() {
        return vec![NO_TIPS_FALLBACK.to_string()];
    }

    tips
}

/// Remove a leading "1." / "2" style enumeration marker
fn strip_enumeration(line: &str) -> &str {
    let trimmed = line.trim();
    let rest = trimmed.trim_start_matches(|c: char| c.is_ascii_digit());

    if rest.len() == trimmed.len() {
        return trimmed;
    }

    rest.strip_prefix('.').unwrap_or(rest).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numbered_tips() {
        let tips = parse_tips("1. Do X\n2. Do Y\n");
        assert_eq!(tips, vec!["Do X".to_string(), "Do Y".to_string()]);
    }

    #[test]
    fn test_parse_strips_bold_markers() {
        let tips = parse_tips("1. **Plan meals** before shopping");
        assert_eq!(tips, vec!["Plan meals before shopping".to_string()]);
    }

    #[test]
    fn test_parse_drops_blank_lines() {
        let tips = parse_tips("Compost scraps\n\n   \nFreeze leftovers");
        assert_eq!(
            tips,
            vec!["Compost scraps".to_string(), "Freeze leftovers".to_string()]
        );
    }

    #[test]
    fn test_parse_empty_text_falls_back() {
        assert_eq!(parse_tips(""), vec![NO_TIPS_FALLBACK.to_string()]);
        assert_eq!(parse_tips("   \n  \n"), vec![NO_TIPS_FALLBACK.to_string()]);
    }

    #[test]
    fn test_parse_unnumbered_lines_kept_whole() {
        let tips = parse_tips("Shop with a list");
        assert_eq!(tips, vec!["Shop with a list".to_string()]);
    }

    #[test]
    fn test_enumeration_without_period() {
        assert_eq!(strip_enumeration("3 Store bread frozen"), "Store bread frozen");
        assert_eq!(strip_enumeration("10. Donate extras"), "Donate extras");
    }
}
