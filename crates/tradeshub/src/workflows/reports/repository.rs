use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ReportId, ReportRecord, ReportStatus};
use crate::workflows::repository::RepositoryError;

/// Storage abstraction so the report service can be exercised in isolation.
///
/// `transition` replaces a stored record only while its status still equals
/// `expected` (a compare-and-set under one lock, or a conditional `UPDATE`).
/// It returns `RepositoryError::Conflict` when another moderator got there first
/// and `RepositoryError::NotFound` for unknown ids.
pub trait ReportRepository: Send + Sync {
    fn insert(&self, record: ReportRecord) -> Result<ReportRecord, RepositoryError>;
    fn transition(
        &self,
        expected: ReportStatus,
        record: ReportRecord,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReportId) -> Result<Option<ReportRecord>, RepositoryError>;
    fn with_status(&self, status: ReportStatus) -> Result<Vec<ReportRecord>, RepositoryError>;
}

/// Outbound notification hook (transactional e-mail in production).
pub trait ReportNotifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Recipient group for moderation notices.
pub const MODERATORS: &str = "moderators";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub template: String,
    pub recipient: String,
    pub report_id: ReportId,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
