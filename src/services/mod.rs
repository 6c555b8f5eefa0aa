// Service exports
pub mod auth;
pub mod classifier;
pub mod location;
pub mod persistence;
pub mod tips;

pub use auth::{AuthError, AuthGateway};
pub use classifier::{ClassificationClient, ClassifierError, Verdict};
pub use location::{truncate_for_display, LocationError, LocationResolver};
pub use persistence::{Collections, PersistenceError, PersistenceGateway};
pub use tips::{parse_tips, TipsClient, TipsError, FETCH_ERROR_FALLBACK, NO_TIPS_FALLBACK};
