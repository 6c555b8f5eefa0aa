use crate::models::{responses::LeaderboardEntry, UserRecord};
use crate::services::{PersistenceError, PersistenceGateway};
use std::sync::Arc;

/// Ranked top-donor reads. Pure query, no side effects.
pub struct LeaderboardService {
    persistence: Arc<PersistenceGateway>,
    limit: usize,
}

impl LeaderboardService {
    pub fn new(persistence: Arc<PersistenceGateway>, limit: usize) -> Self {
        Self { persistence, limit }
    }

    /// Top donors ordered descending by donation count
    pub async fn top_donors(&self) -> Result<Vec<UserRecord>, PersistenceError> {
        self.persistence.top_donors(self.limit).await
    }
}

/// Attach 1-based ranks for presentation
pub fn rank_donors(donors: &[UserRecord]) -> Vec<LeaderboardEntry> {
    donors
        .iter()
        .enumerate()
        .map(|(i, donor)| LeaderboardEntry {
            rank: i + 1,
            username: donor.username.clone(),
            donation_count: donor.donation_count,
            points: donor.points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donor(username: &str, donations: u32) -> UserRecord {
        UserRecord {
            id: username.to_string(),
            account_id: username.to_string(),
            email: format!("{}@example.com", username),
            username: username.to_string(),
            contactno: None,
            donation_count: donations,
            points: donations * 100,
        }
    }

    #[test]
    fn test_rank_donors() {
        let donors = vec![donor("alice", 9), donor("bob", 4), donor("carol", 1)];
        let entries = rank_donors(&donors);

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].username, "alice");
        assert_eq!(entries[0].donation_count, 9);
        assert_eq!(entries[2].rank, 3);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank_donors(&[]).is_empty());
    }
}
