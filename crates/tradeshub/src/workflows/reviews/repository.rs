use super::domain::{RatingSummary, ReviewId, ReviewRecord, ReviewStatus};
use crate::workflows::repository::RepositoryError;

/// Storage for reviews and the per-profile rating aggregate.
///
/// `apply_moderation` must change the review status and recompute the owning
/// profile's aggregate as one unit (a single lock or a database transaction), and
/// must refuse with `RepositoryError::Conflict` when the review is no longer
/// `Pending`. Concurrent moderators then never overwrite each other's aggregate.
pub trait ReviewRepository: Send + Sync {
    fn insert(&self, record: ReviewRecord) -> Result<ReviewRecord, RepositoryError>;
    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError>;
    fn apply_moderation(
        &self,
        id: &ReviewId,
        status: ReviewStatus,
    ) -> Result<(ReviewRecord, RatingSummary), RepositoryError>;
    fn rating(&self, profile_id: &str) -> Result<RatingSummary, RepositoryError>;
}
