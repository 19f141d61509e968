use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;
use tradeshub::workflows::reports::{
    Notification, NotifyError, ReportId, ReportNotifier, ReportRecord, ReportRepository,
    ReportStatus,
};
use tradeshub::workflows::reviews::{
    RatingSummary, ReviewId, ReviewRecord, ReviewRepository, ReviewStatus,
};
use tradeshub::workflows::RepositoryError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryReportRepository {
    records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn transition(
        &self,
        expected: ReportStatus,
        record: ReportRecord,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get_mut(&record.id).ok_or(RepositoryError::NotFound)?;
        if stored.status != expected {
            return Err(RepositoryError::Conflict);
        }
        *stored = record;
        Ok(())
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn with_status(&self, status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.status == status)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct ReviewState {
    records: HashMap<ReviewId, ReviewRecord>,
    ratings: HashMap<String, RatingSummary>,
}

/// Reviews and rating aggregates behind one lock, so a moderation and its
/// aggregate refresh are applied together.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewRepository {
    state: Arc<Mutex<ReviewState>>,
}

impl ReviewRepository for InMemoryReviewRepository {
    fn insert(&self, record: ReviewRecord) -> Result<ReviewRecord, RepositoryError> {
        let mut guard = self.state.lock().expect("review mutex poisoned");
        if guard.records.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError> {
        let guard = self.state.lock().expect("review mutex poisoned");
        Ok(guard.records.get(id).cloned())
    }

    fn apply_moderation(
        &self,
        id: &ReviewId,
        status: ReviewStatus,
    ) -> Result<(ReviewRecord, RatingSummary), RepositoryError> {
        let mut guard = self.state.lock().expect("review mutex poisoned");
        let state = &mut *guard;

        let record = state.records.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if record.status != ReviewStatus::Pending {
            return Err(RepositoryError::Conflict);
        }
        record.status = status;
        let updated = record.clone();

        let profile_id = updated.submission.profile_id.as_str();
        let summary = RatingSummary::from_ratings(
            profile_id,
            state
                .records
                .values()
                .filter(|review| {
                    review.status == ReviewStatus::Approved
                        && review.submission.profile_id == profile_id
                })
                .map(|review| review.submission.rating),
        );
        state
            .ratings
            .insert(profile_id.to_string(), summary.clone());

        Ok((updated, summary))
    }

    fn rating(&self, profile_id: &str) -> Result<RatingSummary, RepositoryError> {
        let guard = self.state.lock().expect("review mutex poisoned");
        Ok(guard
            .ratings
            .get(profile_id)
            .cloned()
            .unwrap_or_else(|| RatingSummary::empty(profile_id)))
    }
}

/// Logs outbound notifications and keeps them for inspection; stands in for
/// the transactional mail provider.
#[derive(Default, Clone)]
pub(crate) struct LoggingNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl ReportNotifier for LoggingNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        info!(
            template = %notification.template,
            recipient = %notification.recipient,
            report_id = %notification.report_id.0,
            "notification queued"
        );
        let mut guard = self.events.lock().expect("notifier mutex poisoned");
        guard.push(notification);
        Ok(())
    }
}

impl LoggingNotifier {
    pub(crate) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
