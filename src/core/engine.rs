use crate::core::cycle::{CycleState, CycleTracker};
use crate::core::notifications::derive_notifications;
use crate::models::{AlertFilter, MatchSnapshot, Session};
use crate::services::{AuthError, AuthGateway, LocationError, LocationResolver, PersistenceError, PersistenceGateway};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can end a load cycle
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("User not logged in")]
    NotAuthenticated,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Location(#[from] LocationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Orchestrates the match load cycle and match commits
///
/// One cycle per explicit refresh: resolve identity, resolve the address,
/// fetch the user's requests and own alerts, conditionally fetch candidate
/// alerts, derive notifications, commit the snapshot. Any error mid-cycle is
/// cycle-fatal; mixed old/new state is never exposed.
pub struct MatchingEngine {
    auth: Arc<AuthGateway>,
    location: Arc<LocationResolver>,
    persistence: Arc<PersistenceGateway>,
    cycles: CycleTracker,
}

impl MatchingEngine {
    pub fn new(
        auth: Arc<AuthGateway>,
        location: Arc<LocationResolver>,
        persistence: Arc<PersistenceGateway>,
    ) -> Self {
        Self {
            auth,
            location,
            persistence,
            cycles: CycleTracker::new(),
        }
    }

    /// Run one load cycle for the session's user
    ///
    /// The returned snapshot is also committed to the tracker unless a newer
    /// cycle started while this one was in flight, in which case the result
    /// is returned but not committed.
    pub async fn load_matches(&self, session: &Session) -> Result<MatchSnapshot, EngineError> {
        let cycle = self.cycles.begin().await;

        match self.run_cycle(session).await {
            Ok(snapshot) => {
                if !self.cycles.complete(cycle, snapshot.clone()).await {
                    tracing::debug!("Load cycle {} superseded, result discarded", cycle);
                }
                Ok(snapshot)
            }
            Err(err) => {
                self.cycles.fail(cycle, err.to_string()).await;
                Err(err)
            }
        }
    }

    async fn run_cycle(&self, session: &Session) -> Result<MatchSnapshot, EngineError> {
        let user = self
            .auth
            .current_user(session)
            .await?
            .ok_or(EngineError::NotAuthenticated)?;

        let address = self.location.resolve_current_address().await?;

        tracing::info!("Loading matches for {} at {}", user.username, address);

        // Own requests and own alerts have no data dependency
        let own_alerts_filter = AlertFilter::owned_by(&user.id);
        let (requests, own_alerts) = tokio::try_join!(
            self.persistence.list_requests(&user.id),
            self.persistence.list_alerts(&own_alerts_filter),
        )?;

        // Users with no outstanding request see no candidates, regardless of
        // what is posted near them
        let candidate_alerts = if requests.is_empty() {
            Vec::new()
        } else {
            self.persistence
                .list_alerts(&AlertFilter::candidates_at(&address, chrono::Utc::now()))
                .await?
        };

        let notifications = derive_notifications(&own_alerts, candidate_alerts.len());

        tracing::debug!(
            "Cycle complete: {} requests, {} candidates, {} own alerts, {} notifications",
            requests.len(),
            candidate_alerts.len(),
            own_alerts.len(),
            notifications.len()
        );

        Ok(MatchSnapshot {
            requests,
            candidate_alerts,
            own_alerts,
            notifications,
            address,
        })
    }

    /// Accept a candidate alert as a match
    ///
    /// Flips the alert's matched flag and drops it from the committed
    /// snapshot without a reload. Donation counters are untouched here; the
    /// increment belongs to the posting flow.
    pub async fn accept_match(&self, alert_id: &str) -> Result<(), EngineError> {
        self.persistence.set_alert_matched(alert_id).await?;
        self.cycles.remove_candidate(alert_id).await;

        tracing::info!("Alert {} accepted and removed from candidates", alert_id);

        Ok(())
    }

    /// Dismiss one notification from the committed snapshot
    pub async fn dismiss_notification(&self, index: usize) -> bool {
        self.cycles.dismiss_notification(index).await
    }

    /// Current state of the workflow
    pub async fn state(&self) -> CycleState {
        self.cycles.state().await
    }
}
