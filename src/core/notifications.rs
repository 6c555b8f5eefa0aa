use crate::models::{FoodAlert, Notification};

/// Derive the notification set for one load cycle
///
/// At most one notification per kind: a matched-alert notice if any of the
/// user's own alerts has been matched, and a new-postings notice if the
/// candidate fetch returned anything. The result replaces the previous
/// cycle's set wholesale.
pub fn derive_notifications(own_alerts: &[FoodAlert], candidate_count: usize) -> Vec<Notification> {
    let mut notifications = Vec::new();

    if own_alerts.iter().any(|alert| alert.is_matched) {
        notifications.push(Notification::alert_matched());
    }

    if candidate_count > 0 {
        notifications.push(Notification::new_postings());
    }

    notifications
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationKind;
    use chrono::Utc;

    fn alert(matched: bool) -> FoodAlert {
        FoodAlert {
            id: "a1".to_string(),
            account_id: "u1".to_string(),
            food_type: "Grains and Cereals".to_string(),
            quantity: 1,
            special_notes: None,
            location: "here".to_string(),
            expiration_date: Utc::now(),
            is_matched: matched,
            created_at: None,
        }
    }

    #[test]
    fn test_matched_alert_only() {
        let notifications = derive_notifications(&[alert(true)], 0);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::AlertMatched);
    }

    #[test]
    fn test_new_postings_only() {
        let notifications = derive_notifications(&[alert(false)], 1);
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::NewPostings);
    }

    #[test]
    fn test_both_conditions_no_duplicates() {
        let notifications = derive_notifications(&[alert(true), alert(true)], 3);
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].kind, NotificationKind::AlertMatched);
        assert_eq!(notifications[1].kind, NotificationKind::NewPostings);
    }

    #[test]
    fn test_nothing_to_notify() {
        let notifications = derive_notifications(&[alert(false)], 0);
        assert!(notifications.is_empty());

        let notifications = derive_notifications(&[], 0);
        assert!(notifications.is_empty());
    }
}
