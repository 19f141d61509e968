use clap::Args;
use std::path::PathBuf;
use tradeshub::content_filter::{filter_report_content, FilterResult, ReportContent};
use tradeshub::error::AppError;
use tradeshub::workflows::reports::{screen_csv_path, ScreenedRow};

#[derive(Args, Debug)]
pub(crate) struct FilterArgs {
    /// Description of the work carried out
    #[arg(long)]
    pub(crate) work_description: String,
    /// General area of the job (no street address)
    #[arg(long)]
    pub(crate) location_area: String,
    /// Optional summary of communication with the customer
    #[arg(long)]
    pub(crate) communication_summary: Option<String>,
    /// Print the raw filter result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScreenArgs {
    /// CSV export with workDescription, locationArea and communicationSummary columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Only print rows that would be rejected
    #[arg(long)]
    pub(crate) flagged_only: bool,
}

pub(crate) fn run_filter(args: FilterArgs) -> Result<(), AppError> {
    let FilterArgs {
        work_description,
        location_area,
        communication_summary,
        json,
    } = args;

    let result = filter_report_content(&ReportContent {
        work_description,
        location_area,
        communication_summary,
    });

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(payload) => println!("{payload}"),
            Err(err) => println!("Filter result unavailable: {err}"),
        }
    } else {
        render_filter_result(&result);
    }
    Ok(())
}

pub(crate) fn render_filter_result(result: &FilterResult) {
    match result.error_message() {
        None => println!("No personal information found; report text can be submitted."),
        Some(message) => {
            println!("Report text contains personal information:");
            for line in message.lines() {
                println!("  {line}");
            }
            for issue in &result.issues {
                println!(
                    "  - {} / {}: {}",
                    issue.field,
                    issue.kind.label(),
                    issue.matches.join(", ")
                );
            }
        }
    }
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let rows = screen_csv_path(&args.csv)?;
    let flagged = rows.iter().filter(|row| !row.is_valid).count();

    println!(
        "Screened {} rows from {}: {} flagged",
        rows.len(),
        args.csv.display(),
        flagged
    );
    for row in rows
        .iter()
        .filter(|row| !args.flagged_only || !row.is_valid)
    {
        render_screened_row(row);
    }
    Ok(())
}

fn render_screened_row(row: &ScreenedRow) {
    match &row.message {
        None => println!("- row {}: ok", row.row),
        Some(message) => {
            println!("- row {}: rejected", row.row);
            for line in message.lines() {
                println!("    {line}");
            }
        }
    }
}
