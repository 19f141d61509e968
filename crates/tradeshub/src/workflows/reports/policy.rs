use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::domain::BadPayerSubmission;
use crate::content_filter::{filter_report_content, FilterIssue, FilterResult};

/// Validation errors raised while screening a report or dispute.
#[derive(Debug, thiserror::Error)]
pub enum ReportViolation {
    #[error("report contains personal information\n{message}")]
    Content {
        message: String,
        issues: Vec<FilterIssue>,
    },
    #[error("tradesperson id is required")]
    MissingTradesperson,
    #[error("'{0}' is not a postcode area; use the outward prefix only (e.g. SW1)")]
    InvalidPostcodeArea(String),
    #[error("amount owed must be between 1 and {max} pence (found {found})")]
    AmountOutOfRange { max: u64, found: u64 },
    #[error("work completion date {date} is in the future")]
    FutureWorkDate { date: NaiveDate },
    #[error("work description must be at least {min} characters (found {found})")]
    DescriptionTooShort { min: usize, found: usize },
    #[error("dispute statement is empty")]
    EmptyDispute,
}

impl ReportViolation {
    /// Convert a failed filter pass into a violation; `None` when the text was clean.
    pub fn from_filter(result: FilterResult) -> Option<Self> {
        let message = result.error_message()?;
        Some(ReportViolation::Content {
            message,
            issues: result.issues,
        })
    }
}

const DEFAULT_MIN_DESCRIPTION_CHARS: usize = 20;
const DEFAULT_MAX_AMOUNT_OWED_PENCE: u64 = 5_000_000;

/// Limits applied to a submission once its text has passed the content filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPolicy {
    min_description_chars: usize,
    max_amount_owed_pence: u64,
}

impl ReportPolicy {
    /// A cap of 0 means "no cap configured" and uses the default. `AppConfig::load`
    /// refuses 0 from the environment, so only programmatic callers reach this.
    pub fn new(min_description_chars: usize, max_amount_owed_pence: u64) -> Self {
        let max_amount_owed_pence = if max_amount_owed_pence == 0 {
            DEFAULT_MAX_AMOUNT_OWED_PENCE
        } else {
            max_amount_owed_pence
        };

        Self {
            min_description_chars,
            max_amount_owed_pence,
        }
    }

    pub fn min_description_chars(&self) -> usize {
        self.min_description_chars
    }

    pub fn max_amount_owed_pence(&self) -> u64 {
        self.max_amount_owed_pence
    }
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DESCRIPTION_CHARS, DEFAULT_MAX_AMOUNT_OWED_PENCE)
    }
}

fn postcode_area_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z]{1,2}(?:\d{1,2}|\d[A-Z])?$").expect("postcode area pattern compiles")
    })
}

/// Normalise and check an outward postcode prefix such as `sw1` or `EH12`.
pub fn normalize_postcode_area(raw: &str) -> Option<String> {
    let area = raw.trim().to_ascii_uppercase();
    postcode_area_pattern().is_match(&area).then_some(area)
}

/// Guard producing screened submissions ready for storage.
#[derive(Debug, Clone, Default)]
pub struct ReportGuard {
    policy: ReportPolicy,
}

impl ReportGuard {
    pub fn with_policy(policy: ReportPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReportPolicy {
        &self.policy
    }

    /// Run the content filter, then the submission limits. Returns the normalised submission.
    pub fn screen(
        &self,
        mut submission: BadPayerSubmission,
        today: NaiveDate,
    ) -> Result<BadPayerSubmission, ReportViolation> {
        if let Some(violation) = ReportViolation::from_filter(filter_report_content(
            &submission.content,
        )) {
            return Err(violation);
        }

        if submission.tradesperson_id.trim().is_empty() {
            return Err(ReportViolation::MissingTradesperson);
        }

        submission.postcode_area = normalize_postcode_area(&submission.postcode_area)
            .ok_or_else(|| ReportViolation::InvalidPostcodeArea(submission.postcode_area.clone()))?;

        let amount = submission.amount_owed_pence;
        if amount == 0 || amount > self.policy.max_amount_owed_pence {
            return Err(ReportViolation::AmountOutOfRange {
                max: self.policy.max_amount_owed_pence,
                found: amount,
            });
        }

        if submission.work_completed_on > today {
            return Err(ReportViolation::FutureWorkDate {
                date: submission.work_completed_on,
            });
        }

        let description = submission.content.work_description.trim();
        let found = description.chars().count();
        if found < self.policy.min_description_chars {
            return Err(ReportViolation::DescriptionTooShort {
                min: self.policy.min_description_chars,
                found,
            });
        }
        submission.content.work_description = description.to_string();

        Ok(submission)
    }

    /// Screen a dispute statement with the same filter used for reports.
    pub fn screen_dispute(&self, statement: &str) -> Result<String, ReportViolation> {
        let statement = statement.trim();
        if statement.is_empty() {
            return Err(ReportViolation::EmptyDispute);
        }

        let result =
            crate::content_filter::filter_fields([(DISPUTE_STATEMENT, Some(statement))]);
        match ReportViolation::from_filter(result) {
            Some(violation) => Err(violation),
            None => Ok(statement.to_string()),
        }
    }
}

pub const DISPUTE_STATEMENT: &str = "disputeStatement";
