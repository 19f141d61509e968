use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::content_filter::ReportContent;

/// Identifier wrapper for stored bad payer reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub String);

impl ReportId {
    /// Numeric suffix of a generated id (`bpr-000042` is 42).
    pub fn sequence(&self) -> Option<u64> {
        self.0.strip_prefix("bpr-")?.parse().ok()
    }
}

/// Report as submitted by a tradesperson, before screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadPayerSubmission {
    pub tradesperson_id: String,
    /// Postcode area or district only, e.g. `SW1` or `M4`.
    pub postcode_area: String,
    pub amount_owed_pence: u64,
    pub work_completed_on: NaiveDate,
    #[serde(flatten)]
    pub content: ReportContent,
}

/// Moderation lifecycle of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    PendingReview,
    Published,
    Rejected,
    Disputed,
    Removed,
}

impl ReportStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReportStatus::PendingReview => "pending_review",
            ReportStatus::Published => "published",
            ReportStatus::Rejected => "rejected",
            ReportStatus::Disputed => "disputed",
            ReportStatus::Removed => "removed",
        }
    }

    /// Status reached by applying `decision`, or `None` when the move is not allowed.
    pub const fn after(self, decision: ModerationDecision) -> Option<ReportStatus> {
        match (self, decision) {
            (ReportStatus::PendingReview, ModerationDecision::Approve) => {
                Some(ReportStatus::Published)
            }
            (ReportStatus::PendingReview, ModerationDecision::Reject) => {
                Some(ReportStatus::Rejected)
            }
            (ReportStatus::Disputed, ModerationDecision::Approve) => Some(ReportStatus::Published),
            (ReportStatus::Disputed, ModerationDecision::Remove)
            | (ReportStatus::Published, ModerationDecision::Remove) => Some(ReportStatus::Removed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationDecision {
    Approve,
    Reject,
    Remove,
}

impl ModerationDecision {
    pub const fn label(self) -> &'static str {
        match self {
            ModerationDecision::Approve => "approve",
            ModerationDecision::Reject => "reject",
            ModerationDecision::Remove => "remove",
        }
    }
}

/// Moderator request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationRequest {
    pub moderator_id: String,
    pub decision: ModerationDecision,
    #[serde(default)]
    pub note: Option<String>,
}

/// Most recent moderation decision recorded against a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationNote {
    pub moderator_id: String,
    pub decision: ModerationDecision,
    pub note: Option<String>,
    pub decided_on: NaiveDate,
}

/// Customer response to a published report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeSubmission {
    pub statement: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub statement: String,
    pub raised_on: NaiveDate,
}

/// Repository record for a screened report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: ReportId,
    pub submission: BadPayerSubmission,
    pub status: ReportStatus,
    pub submitted_on: NaiveDate,
    pub moderation: Option<ModerationNote>,
    pub dispute: Option<Dispute>,
}

impl ReportRecord {
    pub fn view(&self) -> ReportView {
        ReportView {
            report_id: self.id.clone(),
            status: self.status.label(),
            postcode_area: self.submission.postcode_area.clone(),
            amount_owed_pence: self.submission.amount_owed_pence,
            work_completed_on: self.submission.work_completed_on,
            work_description: self.submission.content.work_description.clone(),
            location_area: self.submission.content.location_area.clone(),
            submitted_on: self.submitted_on,
            moderation_note: self
                .moderation
                .as_ref()
                .and_then(|moderation| moderation.note.clone()),
            disputed: self.dispute.is_some(),
        }
    }
}

/// Outward representation of a report; the communication summary stays internal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub report_id: ReportId,
    pub status: &'static str,
    pub postcode_area: String,
    pub amount_owed_pence: u64,
    pub work_completed_on: NaiveDate,
    pub work_description: String,
    pub location_area: String,
    pub submitted_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_note: Option<String>,
    pub disputed: bool,
}
