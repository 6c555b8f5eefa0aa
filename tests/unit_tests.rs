// Unit tests for Nourish Match

use chrono::{Duration, Utc};
use nourish_match::core::{derive_notifications, rank_donors};
use nourish_match::models::{AlertFilter, FoodAlert, NotificationKind, UserRecord};
use nourish_match::services::{parse_tips, truncate_for_display, NO_TIPS_FALLBACK};

fn alert(id: &str, matched: bool) -> FoodAlert {
    FoodAlert {
        id: id.to_string(),
        account_id: "u1".to_string(),
        food_type: "Canned Goods".to_string(),
        quantity: 3,
        special_notes: None,
        location: "12 Baker St, Springfield, IL, USA".to_string(),
        expiration_date: Utc::now() + Duration::days(3),
        is_matched: matched,
        created_at: None,
    }
}

fn donor(username: &str, donations: u32) -> UserRecord {
    UserRecord {
        id: format!("doc_{}", username),
        account_id: format!("acc_{}", username),
        email: format!("{}@example.com", username),
        username: username.to_string(),
        contactno: None,
        donation_count: donations,
        points: donations * 100,
    }
}

#[test]
fn test_notifications_matched_alert_only() {
    let notifications = derive_notifications(&[alert("a1", true)], 0);

    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::AlertMatched);
    assert_eq!(notifications[0].message, "Your Food Alert Has Been Matched!");
}

#[test]
fn test_notifications_new_postings_only() {
    let notifications = derive_notifications(&[alert("a1", false)], 2);

    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::NewPostings);
    assert_eq!(notifications[0].message, "New Food Postings Are Available!");
}

#[test]
fn test_notifications_both_conditions() {
    let own = vec![alert("a1", true), alert("a2", false), alert("a3", true)];
    let notifications = derive_notifications(&own, 1);

    // Exactly one notification per kind, however many alerts are matched
    assert_eq!(notifications.len(), 2);
    assert_eq!(notifications[0].kind, NotificationKind::AlertMatched);
    assert_eq!(notifications[1].kind, NotificationKind::NewPostings);
}

#[test]
fn test_notifications_empty_when_nothing_happened() {
    assert!(derive_notifications(&[], 0).is_empty());
    assert!(derive_notifications(&[alert("a1", false)], 0).is_empty());
}

#[test]
fn test_parse_tips_numbered_list() {
    let tips = parse_tips("1. Do X\n2. Do Y\n");
    assert_eq!(tips, vec!["Do X".to_string(), "Do Y".to_string()]);
}

#[test]
fn test_parse_tips_strips_bold() {
    let tips = parse_tips("1. **Plan your meals** for the week\n2. Use **leftovers** creatively");
    assert_eq!(
        tips,
        vec![
            "Plan your meals for the week".to_string(),
            "Use leftovers creatively".to_string(),
        ]
    );
}

#[test]
fn test_parse_tips_whitespace_only_falls_back() {
    assert_eq!(parse_tips(""), vec![NO_TIPS_FALLBACK.to_string()]);
    assert_eq!(parse_tips(" \n \n "), vec![NO_TIPS_FALLBACK.to_string()]);
}

#[test]
fn test_parse_tips_tolerates_malformed_text() {
    // Stray markers and half-numbered lines must not panic or produce blanks
    let tips = parse_tips("**\n7.\nCompost what you cannot eat\n**3 Freeze bread");
    assert_eq!(
        tips,
        vec![
            "Compost what you cannot eat".to_string(),
            "Freeze bread".to_string(),
        ]
    );
}

#[test]
fn test_truncate_for_display_caps_at_fifty() {
    let long = "Block 123 Serangoon Avenue 3, Serangoon, Singapore, Singapore";
    let truncated = truncate_for_display(long, 50);

    assert!(truncated.ends_with("..."));
    assert_eq!(truncated.chars().count(), 53);

    let short = "Bishan, Singapore";
    assert_eq!(truncate_for_display(short, 50), short);
}

#[test]
fn test_alert_filter_constructors() {
    let now = Utc::now();
    let candidates = AlertFilter::candidates_at("here", now);
    assert_eq!(candidates.location.as_deref(), Some("here"));
    assert!(candidates.unmatched_only);
    assert_eq!(candidates.not_expired_before, Some(now));
    assert!(candidates.owner_id.is_none());

    let owned = AlertFilter::owned_by("u1");
    assert_eq!(owned.owner_id.as_deref(), Some("u1"));
    assert!(owned.location.is_none());
    assert!(!owned.unmatched_only);
}

#[test]
fn test_rank_donors_assigns_positions() {
    let donors = vec![donor("alice", 12), donor("bob", 7), donor("carol", 7)];
    let entries = rank_donors(&donors);

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].username, "alice");
    assert_eq!(entries[1].rank, 2);
    assert_eq!(entries[2].rank, 3);
    assert_eq!(entries[2].points, 700);
}
