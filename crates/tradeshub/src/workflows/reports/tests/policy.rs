use super::common::*;
use crate::content_filter::{IssueType, LOCATION_AREA, WORK_DESCRIPTION};
use crate::workflows::reports::domain::{ModerationDecision, ReportStatus};
use crate::workflows::reports::policy::{
    normalize_postcode_area, ReportGuard, ReportPolicy, ReportViolation, DISPUTE_STATEMENT,
};

#[test]
fn guard_rejects_personal_information_before_other_checks() {
    let guard = ReportGuard::default();
    let mut submission = pii_submission();
    submission.amount_owed_pence = 0;

    match guard.screen(submission, today()) {
        Err(ReportViolation::Content { message, issues }) => {
            let kinds: Vec<_> = issues
                .iter()
                .map(|issue| (issue.field.as_str(), issue.kind))
                .collect();
            assert!(kinds.contains(&(WORK_DESCRIPTION, IssueType::PersonalName)));
            assert!(kinds.contains(&(WORK_DESCRIPTION, IssueType::PhoneNumber)));
            assert!(kinds.contains(&(WORK_DESCRIPTION, IssueType::Email)));
            assert!(kinds.contains(&(LOCATION_AREA, IssueType::Address)));
            assert_eq!(message.lines().count(), 2);
        }
        other => panic!("expected content violation, got {other:?}"),
    }
}

#[test]
fn guard_normalises_clean_submissions() {
    let guard = ReportGuard::default();
    let mut submission = submission();
    submission.content.work_description =
        "  Bathroom refit invoice outstanding for two months  ".to_string();

    let screened = guard.screen(submission, today()).expect("clean submission");
    assert_eq!(screened.postcode_area, "SW1");
    assert_eq!(
        screened.content.work_description,
        "Bathroom refit invoice outstanding for two months"
    );
}

#[test]
fn guard_rejects_full_postcode_as_area() {
    let guard = ReportGuard::default();
    let mut submission = submission();
    submission.postcode_area = "SW1A1AA".to_string();

    match guard.screen(submission, today()) {
        Err(ReportViolation::InvalidPostcodeArea(area)) => assert_eq!(area, "SW1A1AA"),
        other => panic!("expected postcode area violation, got {other:?}"),
    }
}

#[test]
fn guard_enforces_amount_bounds() {
    let guard = ReportGuard::with_policy(ReportPolicy::new(20, 100_000));
    let mut submission = submission();
    submission.amount_owed_pence = 100_001;

    match guard.screen(submission, today()) {
        Err(ReportViolation::AmountOutOfRange { max, found }) => {
            assert_eq!(max, 100_000);
            assert_eq!(found, 100_001);
        }
        other => panic!("expected amount violation, got {other:?}"),
    }
}

#[test]
fn guard_rejects_future_work_dates() {
    let guard = ReportGuard::default();
    let mut submission = submission();
    submission.work_completed_on = today().succ_opt().expect("valid date");

    assert!(matches!(
        guard.screen(submission, today()),
        Err(ReportViolation::FutureWorkDate { .. })
    ));
}

#[test]
fn guard_requires_minimum_description() {
    let guard = ReportGuard::default();
    let mut submission = submission();
    submission.content.work_description = "Unpaid".to_string();

    match guard.screen(submission, today()) {
        Err(ReportViolation::DescriptionTooShort { min, found }) => {
            assert_eq!(min, 20);
            assert_eq!(found, 6);
        }
        other => panic!("expected short description, got {other:?}"),
    }
}

#[test]
fn zero_amount_cap_falls_back_to_default() {
    let policy = ReportPolicy::new(10, 0);
    assert_eq!(
        policy.max_amount_owed_pence(),
        ReportPolicy::default().max_amount_owed_pence()
    );
    assert_eq!(policy.min_description_chars(), 10);
}

#[test]
fn dispute_statements_are_filtered() {
    let guard = ReportGuard::default();

    match guard.screen_dispute("Work was never finished, call me on 07700 900456") {
        Err(ReportViolation::Content { issues, .. }) => {
            assert_eq!(issues.len(), 1);
            assert_eq!(issues[0].field, DISPUTE_STATEMENT);
            assert_eq!(issues[0].kind, IssueType::PhoneNumber);
        }
        other => panic!("expected content violation, got {other:?}"),
    }

    assert!(matches!(
        guard.screen_dispute("   "),
        Err(ReportViolation::EmptyDispute)
    ));
}

#[test]
fn postcode_areas_accept_outward_prefixes_only() {
    assert_eq!(normalize_postcode_area(" m "), Some("M".to_string()));
    assert_eq!(normalize_postcode_area("eh12"), Some("EH12".to_string()));
    assert_eq!(normalize_postcode_area("W1A"), Some("W1A".to_string()));
    assert_eq!(normalize_postcode_area("SW1A 1AA"), None);
    assert_eq!(normalize_postcode_area("North London"), None);
}

#[test]
fn status_transitions_follow_moderation_table() {
    use ModerationDecision::*;
    use ReportStatus::*;

    assert_eq!(PendingReview.after(Approve), Some(Published));
    assert_eq!(PendingReview.after(Reject), Some(Rejected));
    assert_eq!(PendingReview.after(Remove), None);
    assert_eq!(Published.after(Remove), Some(Removed));
    assert_eq!(Published.after(Approve), None);
    assert_eq!(Disputed.after(Approve), Some(Published));
    assert_eq!(Disputed.after(Remove), Some(Removed));
    assert_eq!(Rejected.after(Approve), None);
    assert_eq!(Removed.after(Remove), None);
}
