//! Personal-data screening for free text published on the marketplace.
//!
//! Every field is run through every detection category; nothing short-circuits,
//! so one sentence can raise several issue types at once. The checks are
//! heuristics sitting in front of human moderation, not a security boundary.

mod message;
mod rules;

use serde::{Deserialize, Serialize};

pub use message::generate_filter_error_message;

/// Field names used when screening a bad payer report.
pub const WORK_DESCRIPTION: &str = "workDescription";
pub const LOCATION_AREA: &str = "locationArea";
pub const COMMUNICATION_SUMMARY: &str = "communicationSummary";

/// Category of personal or identifying data detected in a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueType {
    PhoneNumber,
    Email,
    FullPostcode,
    SocialMedia,
    VehicleReg,
    Address,
    PersonalName,
}

impl IssueType {
    pub const ALL: [IssueType; 7] = [
        IssueType::PhoneNumber,
        IssueType::Email,
        IssueType::FullPostcode,
        IssueType::SocialMedia,
        IssueType::VehicleReg,
        IssueType::Address,
        IssueType::PersonalName,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            IssueType::PhoneNumber => "PHONE_NUMBER",
            IssueType::Email => "EMAIL",
            IssueType::FullPostcode => "FULL_POSTCODE",
            IssueType::SocialMedia => "SOCIAL_MEDIA",
            IssueType::VehicleReg => "VEHICLE_REG",
            IssueType::Address => "ADDRESS",
            IssueType::PersonalName => "PERSONAL_NAME",
        }
    }

    /// Reader-facing explanation attached to each issue.
    pub const fn message(self) -> &'static str {
        match self {
            IssueType::PhoneNumber => "Phone numbers are not allowed",
            IssueType::Email => "Email addresses are not allowed",
            IssueType::FullPostcode => {
                "Full postcodes are not allowed, use the postcode area only (e.g. SW1)"
            }
            IssueType::SocialMedia => "Social media handles and links are not allowed",
            IssueType::VehicleReg => "Vehicle registration numbers are not allowed",
            IssueType::Address => {
                "Street addresses are not allowed, describe the general area instead"
            }
            IssueType::PersonalName => "Personal names are not allowed",
        }
    }
}

/// One category of problem found in one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterIssue {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub message: String,
    pub matches: Vec<String>,
}

/// Outcome of screening a set of fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    pub is_valid: bool,
    pub issues: Vec<FilterIssue>,
}

impl FilterResult {
    pub fn issues_for(&self, field: &str) -> impl Iterator<Item = &FilterIssue> + '_ {
        let field = field.to_string();
        self.issues.iter().filter(move |issue| issue.field == field)
    }

    pub fn has_issue(&self, field: &str, kind: IssueType) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.field == field && issue.kind == kind)
    }

    pub fn error_message(&self) -> Option<String> {
        if self.is_valid {
            None
        } else {
            Some(generate_filter_error_message(&self.issues))
        }
    }
}

/// Free-text portion of a bad payer report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContent {
    pub work_description: String,
    pub location_area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_summary: Option<String>,
}

impl ReportContent {
    pub fn fields(&self) -> [(&'static str, Option<&str>); 3] {
        [
            (WORK_DESCRIPTION, Some(self.work_description.as_str())),
            (LOCATION_AREA, Some(self.location_area.as_str())),
            (
                COMMUNICATION_SUMMARY,
                self.communication_summary.as_deref(),
            ),
        ]
    }
}

/// Screen the free-text fields of a bad payer report.
pub fn filter_report_content(content: &ReportContent) -> FilterResult {
    filter_fields(content.fields())
}

/// Screen any set of named fields. Missing or blank fields contribute nothing.
pub fn filter_fields<'a, I>(fields: I) -> FilterResult
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let mut issues = Vec::new();

    for (field, text) in fields {
        let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
            continue;
        };

        for rule in rules::rules() {
            let matches = rule.find_all(text);
            if matches.is_empty() {
                continue;
            }
            issues.push(FilterIssue {
                field: field.to_string(),
                kind: rule.kind,
                message: rule.kind.message().to_string(),
                matches,
            });
        }
    }

    FilterResult {
        is_valid: issues.is_empty(),
        issues,
    }
}
