// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Address, AlertFilter, Coordinates, FoodAlert, FoodRequest, MatchSnapshot, NewAlert,
    NewRequest, Notification, NotificationKind, Session, UserRecord,
};
pub use requests::{
    AcceptMatchRequest, DismissNotificationRequest, LogInRequest, PostAlertRequest,
    PostRequestRequest, SignUpRequest,
};
pub use responses::{
    AcceptMatchResponse, ErrorResponse, HealthResponse, LeaderboardEntry, LeaderboardResponse,
    MatchesResponse, PostAlertResponse, PostRequestResponse, SessionResponse, TipsResponse,
};
