//! Human-readable sync reports.

use colored::Colorize;

use crate::sync::types::{FileOutcome, FileStatus, SyncReport};

/// Print the summary of a batch pass to stdout.
pub fn print_report(report: &SyncReport) {
    println!();
    println!("{}", "Sync Summary".bold().underline());
    println!("  Successful: {}", report.succeeded().to_string().green());
    println!("  Failed:     {}", failed_count(report.failed()));
    println!("  Total:      {}", report.total());
    if report.unchanged() > 0 {
        println!(
            "  {}",
            format!("({} unchanged, {} published)", report.unchanged(), report.published())
                .dimmed()
        );
    }

    if report.failed() > 0 {
        println!();
        println!("{}", "Failed files:".red().bold());
        for outcome in report.files.iter().filter(|f| !f.succeeded()) {
            println!("  - {}", describe(outcome));
        }
    } else if report.is_empty() {
        println!();
        println!("{}", "No content files found.".dimmed());
    } else {
        println!();
        println!("{}", "All files synced successfully.".green());
    }
}

/// Print a progress note for a watch pass that published or failed anything.
pub fn print_pass(pass: u64, report: &SyncReport) {
    let published = report.published();
    let failed = report.failed();
    if published == 0 && failed == 0 {
        return;
    }

    let time = chrono::Local::now().format("%H:%M:%S");
    if failed > 0 {
        println!("Pass {pass}: synced {published} file(s) at {time}, {failed} failed");
    } else {
        println!("Pass {pass}: synced {published} file(s) at {time}");
    }
    for outcome in report.files.iter().filter(|f| !f.succeeded()) {
        println!("  - {}", describe(outcome));
    }
}

fn failed_count(failed: usize) -> String {
    if failed > 0 {
        failed.to_string().red().to_string()
    } else {
        failed.to_string()
    }
}

fn describe(outcome: &FileOutcome) -> String {
    match &outcome.status {
        FileStatus::Failed(reason) => format!("{} ({reason})", outcome.path.display()),
        _ => outcome.path.display().to_string(),
    }
}
