use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub String);

/// Customer review of a tradesperson profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmission {
    pub profile_id: String,
    pub customer_id: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub submission: ReviewSubmission,
    pub status: ReviewStatus,
    pub submitted_on: NaiveDate,
}

/// Aggregate shown on a tradesperson's public profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub profile_id: String,
    pub average_rating: f32,
    pub review_count: u32,
}

impl RatingSummary {
    /// Average of the given ratings rounded to one decimal place.
    pub fn from_ratings<I>(profile_id: &str, ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (total, count) = ratings
            .into_iter()
            .fold((0u32, 0u32), |(total, count), rating| {
                (total + u32::from(rating), count + 1)
            });

        let average_rating = if count == 0 {
            0.0
        } else {
            ((total as f32 / count as f32) * 10.0).round() / 10.0
        };

        Self {
            profile_id: profile_id.to_string(),
            average_rating,
            review_count: count,
        }
    }

    pub fn empty(profile_id: &str) -> Self {
        Self::from_ratings(profile_id, std::iter::empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewModerationRequest {
    pub approve: bool,
}

/// Response body for a moderated review.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeratedReview {
    pub review_id: ReviewId,
    pub status: &'static str,
    pub rating: RatingSummary,
}
