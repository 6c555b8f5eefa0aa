// Core workflow exports
pub mod cycle;
pub mod engine;
pub mod leaderboard;
pub mod notifications;
pub mod submission;

pub use cycle::{CycleId, CycleState, CycleTracker};
pub use engine::{EngineError, MatchingEngine};
pub use leaderboard::{rank_donors, LeaderboardService};
pub use notifications::derive_notifications;
pub use submission::{
    AlertSubmission, PostedAlert, RequestSubmission, SubmissionError, SubmissionService, FOOD_TYPES,
};
