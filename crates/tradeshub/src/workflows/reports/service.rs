use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use super::domain::{
    BadPayerSubmission, Dispute, DisputeSubmission, ModerationNote, ModerationRequest, ReportId,
    ReportRecord, ReportStatus,
};
use super::policy::{normalize_postcode_area, ReportGuard, ReportPolicy, ReportViolation};
use super::repository::{Notification, NotifyError, ReportNotifier, ReportRepository, MODERATORS};
use crate::workflows::repository::RepositoryError;

/// Service composing the report guard, repository, and notifier.
pub struct BadPayerReportService<R, N> {
    guard: Arc<ReportGuard>,
    repository: Arc<R>,
    notifier: Arc<N>,
}

static REPORT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_report_id() -> ReportId {
    let id = REPORT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReportId(format!("bpr-{id:06}"))
}

impl<R, N> BadPayerReportService<R, N>
where
    R: ReportRepository + 'static,
    N: ReportNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, policy: ReportPolicy) -> Self {
        Self {
            guard: Arc::new(ReportGuard::with_policy(policy)),
            repository,
            notifier,
        }
    }

    pub fn guard(&self) -> &ReportGuard {
        &self.guard
    }

    /// Screen and store a new report as pending review.
    pub fn submit(
        &self,
        submission: BadPayerSubmission,
        today: NaiveDate,
    ) -> Result<ReportRecord, ReportServiceError> {
        let submission = match self.guard.screen(submission, today) {
            Ok(submission) => submission,
            Err(violation) => {
                warn!(reason = %violation, "bad payer report rejected at intake");
                return Err(violation.into());
            }
        };

        let record = ReportRecord {
            id: next_report_id(),
            submission,
            status: ReportStatus::PendingReview,
            submitted_on: today,
            moderation: None,
            dispute: None,
        };

        let stored = self.repository.insert(record)?;
        info!(
            report_id = %stored.id.0,
            area = %stored.submission.postcode_area,
            "bad payer report queued for review"
        );
        Ok(stored)
    }

    /// Apply a moderator decision and notify the reporting tradesperson.
    pub fn moderate(
        &self,
        report_id: &ReportId,
        request: ModerationRequest,
        today: NaiveDate,
    ) -> Result<ReportRecord, ReportServiceError> {
        let mut record = self.fetch_existing(report_id)?;
        let current = record.status;

        let next = record.status.after(request.decision).ok_or(
            ReportServiceError::InvalidTransition {
                status: record.status,
                decision: request.decision.label(),
            },
        )?;

        if record.status == ReportStatus::Disputed && next == ReportStatus::Published {
            info!(report_id = %report_id.0, "dispute dismissed, report republished");
        }

        record.status = next;
        record.moderation = Some(ModerationNote {
            moderator_id: request.moderator_id.clone(),
            decision: request.decision,
            note: request.note.filter(|note| !note.trim().is_empty()),
            decided_on: today,
        });
        self.commit(current, &record, request.decision.label())?;

        let mut details = BTreeMap::new();
        details.insert("status".to_string(), next.label().to_string());
        details.insert("moderator".to_string(), request.moderator_id);
        if let Some(note) = record.moderation.as_ref().and_then(|m| m.note.clone()) {
            details.insert("note".to_string(), note);
        }
        self.notifier.notify(Notification {
            template: format!("report_{}", next.label()),
            recipient: record.submission.tradesperson_id.clone(),
            report_id: record.id.clone(),
            details,
        })?;

        info!(report_id = %report_id.0, status = next.label(), "bad payer report moderated");
        Ok(record)
    }

    /// Record a customer dispute against a published report.
    pub fn dispute(
        &self,
        report_id: &ReportId,
        dispute: DisputeSubmission,
        today: NaiveDate,
    ) -> Result<ReportRecord, ReportServiceError> {
        let mut record = self.fetch_existing(report_id)?;
        if record.status != ReportStatus::Published {
            return Err(ReportServiceError::InvalidTransition {
                status: record.status,
                decision: "dispute",
            });
        }

        let statement = self.guard.screen_dispute(&dispute.statement)?;

        record.status = ReportStatus::Disputed;
        record.dispute = Some(Dispute {
            statement,
            raised_on: today,
        });
        self.commit(ReportStatus::Published, &record, "dispute")?;

        let mut details = BTreeMap::new();
        details.insert("area".to_string(), record.submission.postcode_area.clone());
        self.notifier.notify(Notification {
            template: "report_disputed".to_string(),
            recipient: MODERATORS.to_string(),
            report_id: record.id.clone(),
            details,
        })?;

        info!(report_id = %report_id.0, "bad payer report disputed");
        Ok(record)
    }

    pub fn get(&self, report_id: &ReportId) -> Result<ReportRecord, ReportServiceError> {
        self.fetch_existing(report_id)
    }

    /// Published reports for a postcode area, newest first.
    pub fn published(&self, postcode_area: &str) -> Result<Vec<ReportRecord>, ReportServiceError> {
        let area = normalize_postcode_area(postcode_area)
            .ok_or_else(|| ReportViolation::InvalidPostcodeArea(postcode_area.to_string()))?;

        let mut records: Vec<_> = self
            .repository
            .with_status(ReportStatus::Published)?
            .into_iter()
            .filter(|record| record.submission.postcode_area.eq_ignore_ascii_case(&area))
            .collect();
        records.sort_by(|a, b| {
            b.submitted_on
                .cmp(&a.submitted_on)
                .then_with(|| b.id.sequence().cmp(&a.id.sequence()))
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    /// Store a status change only if nobody moved the report since it was read.
    /// A lost race is reported against the status that won.
    fn commit(
        &self,
        expected: ReportStatus,
        record: &ReportRecord,
        decision: &'static str,
    ) -> Result<(), ReportServiceError> {
        match self.repository.transition(expected, record.clone()) {
            Ok(()) => Ok(()),
            Err(RepositoryError::Conflict) => {
                let status = self
                    .repository
                    .fetch(&record.id)?
                    .map(|latest| latest.status)
                    .unwrap_or(expected);
                warn!(
                    report_id = %record.id.0,
                    status = status.label(),
                    decision,
                    "report changed during moderation"
                );
                Err(ReportServiceError::InvalidTransition { status, decision })
            }
            Err(err) => Err(err.into()),
        }
    }

    fn fetch_existing(&self, report_id: &ReportId) -> Result<ReportRecord, ReportServiceError> {
        let record = self
            .repository
            .fetch(report_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the report service.
#[derive(Debug, thiserror::Error)]
pub enum ReportServiceError {
    #[error(transparent)]
    Violation(#[from] ReportViolation),
    #[error("cannot {decision} a report that is {}", .status.label())]
    InvalidTransition {
        status: ReportStatus,
        decision: &'static str,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}
