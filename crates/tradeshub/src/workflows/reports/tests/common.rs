use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::content_filter::ReportContent;
use crate::workflows::reports::domain::{
    BadPayerSubmission, ModerationDecision, ModerationRequest, ReportId, ReportRecord,
    ReportStatus,
};
use crate::workflows::reports::policy::ReportPolicy;
use crate::workflows::reports::repository::{
    Notification, NotifyError, ReportNotifier, ReportRepository,
};
use crate::workflows::reports::BadPayerReportService;
use crate::workflows::repository::RepositoryError;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 20).expect("valid date")
}

pub(super) fn submission() -> BadPayerSubmission {
    BadPayerSubmission {
        tradesperson_id: "trade-417".to_string(),
        postcode_area: "sw1".to_string(),
        amount_owed_pence: 184_000,
        work_completed_on: NaiveDate::from_ymd_opt(2025, 8, 29).expect("valid date"),
        content: ReportContent {
            work_description: "Kitchen renovation not paid for despite completion".to_string(),
            location_area: "North London".to_string(),
            communication_summary: Some(
                "Invoice sent twice, customer stopped replying after the final fix".to_string(),
            ),
        },
    }
}

pub(super) fn pii_submission() -> BadPayerSubmission {
    let mut submission = submission();
    submission.content.work_description =
        "Contact Mr Smith on 07700 900123 or email him at smith@example.com".to_string();
    submission.content.location_area = "Flat 2, 10 Main Street".to_string();
    submission
}

pub(super) fn moderation(decision: ModerationDecision) -> ModerationRequest {
    ModerationRequest {
        moderator_id: "mod-7".to_string(),
        decision,
        note: Some("Evidence checked against invoice".to_string()),
    }
}

pub(super) fn build_service() -> (
    BadPayerReportService<MemoryRepository, MemoryNotifier>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = BadPayerReportService::new(
        repository.clone(),
        notifier.clone(),
        ReportPolicy::default(),
    );
    (service, repository, notifier)
}

/// Submit and approve a clean report, returning its id.
pub(super) fn published_report(
    service: &BadPayerReportService<MemoryRepository, MemoryNotifier>,
) -> ReportId {
    let record = service
        .submit(submission(), today())
        .expect("submission succeeds");
    service
        .moderate(&record.id, moderation(ModerationDecision::Approve), today())
        .expect("approval succeeds");
    record.id
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<ReportId, ReportRecord>>>,
}

impl ReportRepository for MemoryRepository {
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

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotifier {
    pub(super) fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ReportNotifier for MemoryNotifier {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Holds the first `gated` reads at a barrier so concurrent moderators all see
/// the same starting status before any of them writes.
pub(super) struct GatedRepository {
    pub(super) inner: MemoryRepository,
    barrier: Barrier,
    gated: AtomicUsize,
}

impl GatedRepository {
    pub(super) fn new(inner: MemoryRepository, readers: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(readers),
            gated: AtomicUsize::new(readers),
        }
    }
}

impl ReportRepository for GatedRepository {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn transition(
        &self,
        expected: ReportStatus,
        record: ReportRecord,
    ) -> Result<(), RepositoryError> {
        self.inner.transition(expected, record)
    }

    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        let record = self.inner.fetch(id)?;
        let gated = self
            .gated
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| left.checked_sub(1))
            .is_ok();
        if gated {
            self.barrier.wait();
        }
        Ok(record)
    }

    fn with_status(&self, status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError> {
        self.inner.with_status(status)
    }
}

/// Pending report stored directly, bypassing intake.
pub(super) fn stored_record(id: &str, status: ReportStatus) -> ReportRecord {
    ReportRecord {
        id: ReportId(id.to_string()),
        submission: BadPayerSubmission {
            postcode_area: "SW1".to_string(),
            ..submission()
        },
        status,
        submitted_on: today(),
        moderation: None,
        dispute: None,
    }
}

pub(super) struct ConflictRepository;

impl ReportRepository for ConflictRepository {
    fn insert(&self, _record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn transition(
        &self,
        _expected: ReportStatus,
        _record: ReportRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        Ok(None)
    }

    fn with_status(&self, _status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl ReportRepository for UnavailableRepository {
    fn insert(&self, _record: ReportRecord) -> Result<ReportRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn transition(
        &self,
        _expected: ReportStatus,
        _record: ReportRecord,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn with_status(&self, _status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct FailingNotifier;

impl ReportNotifier for FailingNotifier {
    fn notify(&self, _notification: Notification) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp relay down".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
