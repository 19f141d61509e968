use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::repository::RepositoryError;
use crate::workflows::reviews::domain::{
    RatingSummary, ReviewId, ReviewRecord, ReviewStatus, ReviewSubmission,
};
use crate::workflows::reviews::repository::ReviewRepository;
use crate::workflows::reviews::ReviewService;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).expect("valid date")
}

pub(super) fn review(profile_id: &str, rating: u8) -> ReviewSubmission {
    ReviewSubmission {
        profile_id: profile_id.to_string(),
        customer_id: "cust-88".to_string(),
        rating,
        comment: "Turned up on time and left the site tidy".to_string(),
    }
}

pub(super) fn build_service() -> (ReviewService<MemoryReviews>, Arc<MemoryReviews>) {
    let repository = Arc::new(MemoryReviews::default());
    (ReviewService::new(repository.clone()), repository)
}

#[derive(Default)]
struct ReviewState {
    records: HashMap<ReviewId, ReviewRecord>,
    ratings: HashMap<String, RatingSummary>,
}

/// Single-lock store: the status flip and aggregate refresh share one critical section.
#[derive(Default, Clone)]
pub(super) struct MemoryReviews {
    state: Arc<Mutex<ReviewState>>,
}

impl ReviewRepository for MemoryReviews {
    fn insert(&self, record: ReviewRecord) -> Result<ReviewRecord, RepositoryError> {
        let mut state = self.state.lock().expect("review mutex poisoned");
        if state.records.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        state.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError> {
        let state = self.state.lock().expect("review mutex poisoned");
        Ok(state.records.get(id).cloned())
    }

    fn apply_moderation(
        &self,
        id: &ReviewId,
        status: ReviewStatus,
    ) -> Result<(ReviewRecord, RatingSummary), RepositoryError> {
        let mut state = self.state.lock().expect("review mutex poisoned");
        let record = state.records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record.status != ReviewStatus::Pending {
            return Err(RepositoryError::Conflict);
        }
        record.status = status;
        let record = record.clone();

        let profile_id = record.submission.profile_id.clone();
        let summary = RatingSummary::from_ratings(
            &profile_id,
            state
                .records
                .values()
                .filter(|r| r.submission.profile_id == profile_id)
                .filter(|r| r.status == ReviewStatus::Approved)
                .map(|r| r.submission.rating),
        );
        state.ratings.insert(profile_id, summary.clone());
        Ok((record, summary))
    }

    fn rating(&self, profile_id: &str) -> Result<RatingSummary, RepositoryError> {
        let state = self.state.lock().expect("review mutex poisoned");
        Ok(state
            .ratings
            .get(profile_id)
            .cloned()
            .unwrap_or_else(|| RatingSummary::empty(profile_id)))
    }
}

pub(super) struct OfflineReviews;

impl ReviewRepository for OfflineReviews {
    fn insert(&self, _record: ReviewRecord) -> Result<ReviewRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn apply_moderation(
        &self,
        _id: &ReviewId,
        _status: ReviewStatus,
    ) -> Result<(ReviewRecord, RatingSummary), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn rating(&self, _profile_id: &str) -> Result<RatingSummary, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
