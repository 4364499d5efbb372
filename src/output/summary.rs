//! Console summary of a collection run

use crate::collector::CollectionReport;
use std::fmt::Write;

/// Formats a run report for the terminal
///
/// Lists the counters of the run followed by every unique address, sorted.
pub fn format_summary(report: &CollectionReport) -> String {
    let stats = &report.stats;
    let result = &report.result;
    let mut out = String::new();

    let _ = writeln!(out, "=== Collection Summary ===\n");

    let _ = writeln!(out, "Query: {}", report.query);
    let status = if report.was_interrupted() {
        "interrupted"
    } else {
        "completed"
    };
    let _ = writeln!(
        out,
        "Status: {} after {:.1}s",
        status,
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "Pages:");
    let _ = writeln!(out, "  URLs considered: {}", stats.urls_seen);
    let _ = writeln!(out, "  Pages fetched: {}", stats.pages_fetched);
    if stats.skipped_budget > 0 {
        let _ = writeln!(out, "  Skipped (page budget): {}", stats.skipped_budget);
    }
    if stats.skipped_robots > 0 {
        let _ = writeln!(out, "  Skipped (robots.txt): {}", stats.skipped_robots);
    }
    if stats.skipped_invalid > 0 {
        let _ = writeln!(out, "  Skipped (invalid URL): {}", stats.skipped_invalid);
    }
    let _ = writeln!(out);

    if stats.failures() > 0 || stats.rate_limited > 0 {
        let _ = writeln!(out, "Failures:");
        let _ = writeln!(out, "  Network: {}", stats.network_errors);
        let _ = writeln!(out, "  HTTP: {}", stats.http_errors);
        let _ = writeln!(out, "  Unparseable: {}", stats.parse_errors);
        if stats.rate_limited > 0 {
            let _ = writeln!(out, "  Rate limited (429): {}", stats.rate_limited);
        }
        let _ = writeln!(out);
    }

    let unique = result.unique_emails();
    let _ = writeln!(out, "Results:");
    let _ = writeln!(out, "  URLs with emails: {}", result.url_count());
    let _ = writeln!(out, "  Total records: {}", result.len());
    let _ = writeln!(out, "  Unique emails: {}", unique.len());

    if !unique.is_empty() {
        let _ = writeln!(out, "\nUnique emails found:");
        for email in unique {
            let _ = writeln!(out, "  - {}", email);
        }
    }

    out
}

/// Prints the run summary to stdout
pub fn print_summary(report: &CollectionReport) {
    print!("{}", format_summary(report));
}
