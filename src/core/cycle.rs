use crate::models::MatchSnapshot;
use tokio::sync::Mutex;

/// Identifier of one load cycle. Monotonically increasing per tracker.
pub type CycleId = u64;

/// Observable state of the matching workflow
#[derive(Debug, Clone)]
pub enum CycleState {
    Idle,
    Loading,
    Ready(MatchSnapshot),
    Failed(String),
}

impl CycleState {
    pub fn is_ready(&self) -> bool {
        matches!(self, CycleState::Ready(_))
    }
}

struct Inner {
    current: CycleId,
    state: CycleState,
}

/// Load-cycle tracker with a stale-response guard
///
/// Each refresh starts a new cycle; only the newest cycle may commit its
/// outcome. A cycle that finishes after a newer one has begun is discarded
/// on arrival, so a slow response can never overwrite fresher state.
pub struct CycleTracker {
    inner: Mutex<Inner>,
}

impl CycleTracker {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                current: 0,
                state: CycleState::Idle,
            }),
        }
    }

    /// Start a new cycle, superseding any cycle still in flight
    pub async fn begin(&self) -> CycleId {
        let mut inner = self.inner.lock().await;
        inner.current += 1;
        inner.state = CycleState::Loading;
        inner.current
    }

    /// Commit a completed snapshot. Returns false if the cycle was
    /// superseded and the snapshot was discarded.
    pub async fn complete(&self, cycle: CycleId, snapshot: MatchSnapshot) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.current != cycle {
            return false;
        }
        inner.state = CycleState::Ready(snapshot);
        true
    }

    /// Record a failed cycle. Returns false if the cycle was superseded.
    pub async fn fail(&self, cycle: CycleId, message: String) -> bool {
        let mut inner = self.inner.lock().await;
        if inner.current != cycle {
            return false;
        }
        inner.state = CycleState::Failed(message);
        true
    }

    pub async fn state(&self) -> CycleState {
        self.inner.lock().await.state.clone()
    }

    /// Optimistically drop an accepted alert from the Ready snapshot
    pub async fn remove_candidate(&self, alert_id: &str) -> bool {
        let mut inner = self.inner.lock().await;
        if let CycleState::Ready(snapshot) = &mut inner.state {
            let before = snapshot.candidate_alerts.len();
            snapshot.candidate_alerts.retain(|alert| alert.id != alert_id);
            return snapshot.candidate_alerts.len() < before;
        }
        false
    }

    /// Remove one notification by position from the Ready snapshot
    pub async fn dismiss_notification(&self, index: usize) -> bool {
        let mut inner = self.inner.lock().await;
        if let CycleState::Ready(snapshot) = &mut inner.state {
            if index < snapshot.notifications.len() {
                snapshot.notifications.remove(index);
                return true;
            }
        }
        false
    }
}

impl Default for CycleTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoodAlert, Notification};
    use chrono::Utc;

    fn snapshot_with_candidate(id: &str) -> MatchSnapshot {
        MatchSnapshot {
            requests: vec![],
            candidate_alerts: vec![FoodAlert {
                id: id.to_string(),
                account_id: "u1".to_string(),
                food_type: "Snacks".to_string(),
                quantity: 1,
                special_notes: None,
                location: "here".to_string(),
                expiration_date: Utc::now(),
                is_matched: false,
                created_at: None,
            }],
            own_alerts: vec![],
            notifications: vec![Notification::new_postings()],
            address: "here".to_string(),
        }
    }

    #[tokio::test]
    async fn test_cycle_commits_when_current() {
        let tracker = CycleTracker::new();
        let cycle = tracker.begin().await;

        assert!(tracker.complete(cycle, snapshot_with_candidate("a1")).await);
        assert!(tracker.state().await.is_ready());
    }

    #[tokio::test]
    async fn test_superseded_cycle_is_discarded() {
        let tracker = CycleTracker::new();
        let stale = tracker.begin().await;
        let fresh = tracker.begin().await;

        // The stale cycle finishes after the fresh one started
        assert!(!tracker.complete(stale, snapshot_with_candidate("old")).await);
        assert!(tracker.complete(fresh, snapshot_with_candidate("new")).await);

        match tracker.state().await {
            CycleState::Ready(snapshot) => {
                assert_eq!(snapshot.candidate_alerts[0].id, "new");
            }
            other => panic!("Expected Ready, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_failure_does_not_clobber() {
        let tracker = CycleTracker::new();
        let stale = tracker.begin().await;
        let fresh = tracker.begin().await;

        assert!(tracker.complete(fresh, snapshot_with_candidate("a1")).await);
        assert!(!tracker.fail(stale, "boom".to_string()).await);
        assert!(tracker.state().await.is_ready());
    }

    #[tokio::test]
    async fn test_remove_candidate() {
        let tracker = CycleTracker::new();
        let cycle = tracker.begin().await;
        tracker.complete(cycle, snapshot_with_candidate("a1")).await;

        assert!(tracker.remove_candidate("a1").await);
        // Second removal finds nothing
        assert!(!tracker.remove_candidate("a1").await);
    }

    #[tokio::test]
    async fn test_dismiss_notification() {
        let tracker = CycleTracker::new();
        let cycle = tracker.begin().await;
        tracker.complete(cycle, snapshot_with_candidate("a1")).await;

        assert!(tracker.dismiss_notification(0).await);
        assert!(!tracker.dismiss_notification(0).await);
    }

    #[tokio::test]
    async fn test_remove_candidate_requires_ready_state() {
        let tracker = CycleTracker::new();
        assert!(!tracker.remove_candidate("a1").await);
    }
}
