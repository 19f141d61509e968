//! Review intake and moderation with per-profile rating aggregates.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ModeratedReview, RatingSummary, ReviewId, ReviewModerationRequest, ReviewRecord,
    ReviewStatus, ReviewSubmission,
};
pub use repository::ReviewRepository;
pub use router::review_router;
pub use service::{ReviewService, ReviewServiceError, ReviewViolation};
