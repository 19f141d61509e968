use crate::infra::{InMemoryReportRepository, InMemoryReviewRepository, LoggingNotifier};
use crate::screening::render_filter_result;
use chrono::{Duration, Local, NaiveDate};
use clap::Args;
use std::sync::Arc;
use tradeshub::content_filter::{filter_report_content, ReportContent};
use tradeshub::error::AppError;
use tradeshub::workflows::reports::{
    BadPayerReportService, BadPayerSubmission, DisputeSubmission, ModerationDecision,
    ModerationRequest, ReportPolicy, ReportRecord, ReportServiceError,
};
use tradeshub::workflows::reviews::{ReviewService, ReviewSubmission};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the demo date (defaults to today).
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Skip the review moderation portion of the demo.
    #[arg(long)]
    pub(crate) skip_reviews: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    println!("TradesHub trust and safety demo");

    println!("\nContent screening");
    let rejected = demo_content(
        "Contact Mr Smith on 07700 900123 or email him at smith@example.com",
        "Flat 2, 10 Main Street",
    );
    render_filter_result(&filter_report_content(&rejected));
    let accepted = demo_content(
        "Kitchen renovation not paid for despite completion",
        "North London",
    );
    render_filter_result(&filter_report_content(&accepted));

    println!("\nBad payer report lifecycle");
    let notifier = Arc::new(LoggingNotifier::default());
    let reports = BadPayerReportService::new(
        Arc::new(InMemoryReportRepository::default()),
        notifier.clone(),
        ReportPolicy::default(),
    );

    match reports.submit(demo_submission(rejected, today), today) {
        Ok(record) => println!("- Unexpectedly stored {}", record.id.0),
        Err(err) => println!("- Report with contact details refused: {}", first_line(&err)),
    }

    let record = match reports.submit(demo_submission(accepted, today), today) {
        Ok(record) => record,
        Err(err) => {
            println!("- Clean report refused: {err}");
            return Ok(());
        }
    };
    print_status("Submitted", &record);

    let approved = reports.moderate(
        &record.id,
        moderation(ModerationDecision::Approve, None),
        today,
    );
    let Some(record) = report_step("Approved", approved) else {
        return Ok(());
    };

    let disputed = reports.dispute(
        &record.id,
        DisputeSubmission {
            statement: "Payment was withheld until the snagging list was finished".to_string(),
        },
        today,
    );
    let Some(record) = report_step("Disputed", disputed) else {
        return Ok(());
    };

    let removed = reports.moderate(
        &record.id,
        moderation(
            ModerationDecision::Remove,
            Some("Customer supplied evidence of part payment"),
        ),
        today,
    );
    let Some(current) = report_step("Removed", removed) else {
        return Ok(());
    };

    match serde_json::to_string_pretty(&current.view()) {
        Ok(json) => println!("  Public report payload:\n{json}"),
        Err(err) => println!("  Public report payload unavailable: {err}"),
    }

    let events = notifier.events();
    println!("  Notifications:");
    for event in events {
        println!("    - template={} -> {}", event.template, event.recipient);
    }

    if args.skip_reviews {
        return Ok(());
    }

    println!("\nReview moderation");
    let reviews = ReviewService::new(Arc::new(InMemoryReviewRepository::default()));
    for (customer, rating, approve) in [("cust-1", 5, true), ("cust-2", 4, true), ("cust-3", 1, false)]
    {
        let submission = ReviewSubmission {
            profile_id: "pro-demo".to_string(),
            customer_id: customer.to_string(),
            rating,
            comment: "Turned up on time and left the site tidy".to_string(),
        };
        let outcome = reviews
            .submit(submission, today)
            .and_then(|record| reviews.moderate(&record.id, approve));
        match outcome {
            Ok((record, summary)) => println!(
                "- {} ({} stars) {} -> profile average {:.1} from {} reviews",
                record.id.0,
                record.submission.rating,
                record.status.label(),
                summary.average_rating,
                summary.review_count
            ),
            Err(err) => println!("- Review from {customer} failed: {err}"),
        }
    }

    Ok(())
}

fn demo_content(work_description: &str, location_area: &str) -> ReportContent {
    ReportContent {
        work_description: work_description.to_string(),
        location_area: location_area.to_string(),
        communication_summary: None,
    }
}

fn demo_submission(content: ReportContent, today: NaiveDate) -> BadPayerSubmission {
    BadPayerSubmission {
        tradesperson_id: "trade-demo".to_string(),
        postcode_area: "n1".to_string(),
        amount_owed_pence: 240_000,
        work_completed_on: today - Duration::days(45),
        content,
    }
}

fn moderation(decision: ModerationDecision, note: Option<&str>) -> ModerationRequest {
    ModerationRequest {
        moderator_id: "mod-demo".to_string(),
        decision,
        note: note.map(str::to_string),
    }
}

fn report_step(
    label: &str,
    outcome: Result<ReportRecord, ReportServiceError>,
) -> Option<ReportRecord> {
    match outcome {
        Ok(record) => {
            print_status(label, &record);
            Some(record)
        }
        Err(err) => {
            println!("- {label} step failed: {err}");
            None
        }
    }
}

fn print_status(label: &str, record: &ReportRecord) {
    println!(
        "- {label} {} -> status {} (area {})",
        record.id.0,
        record.status.label(),
        record.submission.postcode_area
    );
}

fn first_line(err: &impl std::fmt::Display) -> String {
    err.to_string().lines().next().unwrap_or_default().to_string()
}
