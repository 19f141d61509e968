use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use super::domain::{RatingSummary, ReviewId, ReviewRecord, ReviewStatus, ReviewSubmission};
use super::repository::ReviewRepository;
use crate::workflows::repository::RepositoryError;

const MAX_COMMENT_CHARS: usize = 2_000;

/// Validation errors for incoming reviews.
#[derive(Debug, thiserror::Error)]
pub enum ReviewViolation {
    #[error("rating must be between 1 and 5 (found {0})")]
    RatingOutOfRange(u8),
    #[error("review comment is empty")]
    EmptyComment,
    #[error("review comment exceeds {max} characters")]
    CommentTooLong { max: usize },
    #[error("profile and customer ids are required")]
    MissingParticipant,
}

/// Error raised by the review service.
#[derive(Debug, thiserror::Error)]
pub enum ReviewServiceError {
    #[error(transparent)]
    Violation(#[from] ReviewViolation),
    #[error("review has already been {}", .0.label())]
    AlreadyModerated(ReviewStatus),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

static REVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_review_id() -> ReviewId {
    let id = REVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReviewId(format!("rev-{id:06}"))
}

/// Review intake and moderation; rating aggregates are maintained by the repository.
pub struct ReviewService<R> {
    repository: Arc<R>,
}

impl<R> ReviewService<R>
where
    R: ReviewRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn submit(
        &self,
        mut submission: ReviewSubmission,
        today: NaiveDate,
    ) -> Result<ReviewRecord, ReviewServiceError> {
        if !(1..=5).contains(&submission.rating) {
            return Err(ReviewViolation::RatingOutOfRange(submission.rating).into());
        }
        if submission.profile_id.trim().is_empty() || submission.customer_id.trim().is_empty() {
            return Err(ReviewViolation::MissingParticipant.into());
        }

        let comment = submission.comment.trim();
        if comment.is_empty() {
            return Err(ReviewViolation::EmptyComment.into());
        }
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(ReviewViolation::CommentTooLong {
                max: MAX_COMMENT_CHARS,
            }
            .into());
        }
        submission.comment = comment.to_string();

        let record = self.repository.insert(ReviewRecord {
            id: next_review_id(),
            submission,
            status: ReviewStatus::Pending,
            submitted_on: today,
        })?;
        info!(
            review_id = %record.id.0,
            profile_id = %record.submission.profile_id,
            "review awaiting moderation"
        );
        Ok(record)
    }

    /// Approve or reject a pending review, returning the refreshed profile rating.
    pub fn moderate(
        &self,
        review_id: &ReviewId,
        approve: bool,
    ) -> Result<(ReviewRecord, RatingSummary), ReviewServiceError> {
        let current = self
            .repository
            .fetch(review_id)?
            .ok_or(RepositoryError::NotFound)?;
        if current.status != ReviewStatus::Pending {
            return Err(ReviewServiceError::AlreadyModerated(current.status));
        }

        let status = if approve {
            ReviewStatus::Approved
        } else {
            ReviewStatus::Rejected
        };

        let (record, rating) = match self.repository.apply_moderation(review_id, status) {
            Ok(outcome) => outcome,
            Err(RepositoryError::Conflict) => {
                let latest = self
                    .repository
                    .fetch(review_id)?
                    .map(|record| record.status)
                    .unwrap_or(status);
                return Err(ReviewServiceError::AlreadyModerated(latest));
            }
            Err(err) => return Err(err.into()),
        };

        info!(
            review_id = %record.id.0,
            status = record.status.label(),
            average = rating.average_rating,
            count = rating.review_count,
            "review moderated"
        );
        Ok((record, rating))
    }

    pub fn rating(&self, profile_id: &str) -> Result<RatingSummary, ReviewServiceError> {
        Ok(self.repository.rating(profile_id)?)
    }
}
