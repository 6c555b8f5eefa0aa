use crate::models::{FoodAlert, FoodRequest, NewAlert, NewRequest, Session, UserRecord};
use crate::services::{
    AuthError, AuthGateway, ClassificationClient, ClassifierError, PersistenceError,
    PersistenceGateway,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Food types a posting may carry
pub const FOOD_TYPES: &[&str] = &[
    "Vegetarian",
    "Non-Vegetarian",
    "Fruits and Vegetables",
    "Dairy Products",
    "Grains and Cereals",
    "Proteins",
    "Snacks",
    "Beverages",
    "Canned Goods",
    "Baked Goods",
];

/// The one category that must pass the freshness check before posting
const CLASSIFIED_FOOD_TYPE: &str = "Fruits and Vegetables";

/// Errors that can abort a posting flow
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("User not logged in")]
    NotAuthenticated,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("The Item is Classified as Rotten and Cannot be Donated")]
    RottenItem,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Classifier(#[from] ClassifierError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// A donor's alert submission, image included when the category requires one
#[derive(Debug, Clone)]
pub struct AlertSubmission {
    pub food_type: String,
    pub quantity: u32,
    pub special_notes: Option<String>,
    pub location: String,
    pub expiration_date: DateTime<Utc>,
    pub image: Option<Vec<u8>>,
}

/// A recipient's request submission
#[derive(Debug, Clone)]
pub struct RequestSubmission {
    pub food_type: String,
    pub quantity: u32,
    pub special_notes: Option<String>,
    pub location: String,
}

/// Outcome of a successful alert posting
///
/// `donor` is None when the alert was written but the donation increment
/// failed; the increment can be retried without re-posting the alert.
#[derive(Debug, Clone)]
pub struct PostedAlert {
    pub alert: FoodAlert,
    pub donor: Option<UserRecord>,
}

/// Posting flows for alerts and requests
///
/// The alert flow gates persistence on classification: for produce, the
/// image must classify as fresh before any write happens. A rotten verdict
/// aborts the whole submission with nothing persisted.
pub struct SubmissionService {
    auth: Arc<AuthGateway>,
    classifier: Arc<ClassificationClient>,
    persistence: Arc<PersistenceGateway>,
    reward_points: u32,
}

fn validate_alert(submission: &AlertSubmission, now: DateTime<Utc>) -> Result<(), SubmissionError> {
    if submission.food_type.trim().is_empty() {
        return Err(SubmissionError::Validation(
            "Please Select a Food Type.".to_string(),
        ));
    }
    if !FOOD_TYPES.contains(&submission.food_type.as_str()) {
        return Err(SubmissionError::Validation(format!(
            "Unknown food type: {}",
            submission.food_type
        )));
    }
    if submission.quantity == 0 {
        return Err(SubmissionError::Validation(
            "Please Enter the Quantity.".to_string(),
        ));
    }
    if submission.expiration_date < now {
        return Err(SubmissionError::Validation(
            "Expiration Date Cannot Be in the Past.".to_string(),
        ));
    }
    if submission.food_type == CLASSIFIED_FOOD_TYPE && submission.image.is_none() {
        return Err(SubmissionError::Validation(
            "Please Capture an Image of the Food Item.".to_string(),
        ));
    }
    Ok(())
}

fn validate_request(submission: &RequestSubmission) -> Result<(), SubmissionError> {
    if submission.food_type.trim().is_empty() {
        return Err(SubmissionError::Validation(
            "Please Select a Food Type.".to_string(),
        ));
    }
    if submission.quantity == 0 {
        return Err(SubmissionError::Validation(
            "Please Enter the Quantity.".to_string(),
        ));
    }
    Ok(())
}

impl SubmissionService {
    pub fn new(
        auth: Arc<AuthGateway>,
        classifier: Arc<ClassificationClient>,
        persistence: Arc<PersistenceGateway>,
        reward_points: u32,
    ) -> Self {
        Self {
            auth,
            classifier,
            persistence,
            reward_points,
        }
    }

    /// Post a food alert for the session's user
    pub async fn post_alert(
        &self,
        session: &Session,
        mut submission: AlertSubmission,
    ) -> Result<PostedAlert, SubmissionError> {
        validate_alert(&submission, Utc::now())?;

        let user = self
            .auth
            .current_user(session)
            .await?
            .ok_or(SubmissionError::NotAuthenticated)?;

        // Classification gate: produce must come back fresh before any
        // persistence call is made
        if submission.food_type == CLASSIFIED_FOOD_TYPE {
            let image = submission.image.take().ok_or_else(|| {
                SubmissionError::Validation("Please Capture an Image of the Food Item.".to_string())
            })?;

            let verdict = self.classifier.classify(image).await?;
            if !verdict.is_fresh {
                tracing::info!("Submission by {} rejected: item classified rotten", user.username);
                return Err(SubmissionError::RottenItem);
            }
        }

        let alert = self
            .persistence
            .create_alert(&NewAlert {
                account_id: user.id.clone(),
                food_type: submission.food_type,
                quantity: submission.quantity,
                special_notes: submission.special_notes,
                location: submission.location,
                expiration_date: submission.expiration_date,
            })
            .await?;

        tracing::info!("Food alert {} posted by {}", alert.id, user.username);

        // The increment is decoupled from the alert write: a failure here
        // leaves the alert in place and can be retried on its own
        let donor = match self
            .persistence
            .increment_donation(&user.id, self.reward_points)
            .await
        {
            Ok(donor) => Some(donor),
            Err(err) => {
                tracing::warn!("Donation increment failed for {}: {}", user.id, err);
                None
            }
        };

        Ok(PostedAlert { alert, donor })
    }

    /// Post a food request for the session's user
    pub async fn post_request(
        &self,
        session: &Session,
        submission: RequestSubmission,
    ) -> Result<FoodRequest, SubmissionError> {
        validate_request(&submission)?;

        let user = self
            .auth
            .current_user(session)
            .await?
            .ok_or(SubmissionError::NotAuthenticated)?;

        let request = self
            .persistence
            .create_request(&NewRequest {
                account_id: user.id.clone(),
                food_type: submission.food_type,
                quantity: submission.quantity,
                special_notes: submission.special_notes,
                location: submission.location,
            })
            .await?;

        tracing::info!("Food request {} posted by {}", request.id, user.username);

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn submission(food_type: &str, image: Option<Vec<u8>>) -> AlertSubmission {
        AlertSubmission {
            food_type: food_type.to_string(),
            quantity: 2,
            special_notes: None,
            location: "here".to_string(),
            expiration_date: Utc::now() + Duration::days(2),
            image,
        }
    }

    #[test]
    fn test_validate_alert_passes() {
        assert!(validate_alert(&submission("Snacks", None), Utc::now()).is_ok());
    }

    #[test]
    fn test_validate_alert_rejects_past_expiration() {
        let mut sub = submission("Snacks", None);
        sub.expiration_date = Utc::now() - Duration::days(1);
        assert!(matches!(
            validate_alert(&sub, Utc::now()),
            Err(SubmissionError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_alert_rejects_unknown_food_type() {
        assert!(validate_alert(&submission("Mystery Meat", None), Utc::now()).is_err());
    }

    #[test]
    fn test_produce_requires_image() {
        let sub = submission("Fruits and Vegetables", None);
        assert!(matches!(
            validate_alert(&sub, Utc::now()),
            Err(SubmissionError::Validation(_))
        ));

        let with_image = submission("Fruits and Vegetables", Some(vec![0u8; 4]));
        assert!(validate_alert(&with_image, Utc::now()).is_ok());
    }

    #[test]
    fn test_validate_request_rejects_zero_quantity() {
        let sub = RequestSubmission {
            food_type: "Snacks".to_string(),
            quantity: 0,
            special_notes: None,
            location: "here".to_string(),
        };
        assert!(validate_request(&sub).is_err());
    }
}
