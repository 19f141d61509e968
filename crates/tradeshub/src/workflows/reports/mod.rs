//! Bad payer report intake, moderation, and dispute handling.
//!
//! Every free-text field passes through the content filter before a report is
//! stored, and again for customer dispute statements.

pub mod domain;
pub mod import;
pub mod policy;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    BadPayerSubmission, Dispute, DisputeSubmission, ModerationDecision, ModerationNote,
    ModerationRequest, ReportId, ReportRecord, ReportStatus, ReportView,
};
pub use import::{screen_csv, screen_csv_path, ImportError, ScreenedRow};
pub use policy::{normalize_postcode_area, ReportGuard, ReportPolicy, ReportViolation};
pub use repository::{Notification, NotifyError, ReportNotifier, ReportRepository, MODERATORS};
pub use router::report_router;
pub use service::{BadPayerReportService, ReportServiceError};
