use serde::Serialize;

use super::{SzzAttribution, SzzOutcome, SzzSummary};
use crate::error::Result;
use crate::report_helpers;

const LINE_WIDTH: usize = 48;

pub fn print_report(outcome: &SzzOutcome) {
    print_summary(&outcome.summary);
    if outcome.attributions.is_empty() {
        println!();
        println!("No bug-introducing commits found.");
        return;
    }

    let max_path_len = report_helpers::max_str_width(
        outcome.attributions.iter().map(|a| a.file_path.as_str()),
        4,
    );
    // 1 + 8 + 2 + 8 + 2 + 10 + 2 + path + 2 + line
    let header_width = max_path_len + LINE_WIDTH + 35;
    let separator = report_helpers::separator(header_width.max(78));

    println!();
    println!("{separator}");
    println!(
        " {:<8}  {:<8}  {:<10}  {:<width$}  Blamed line",
        "Fix",
        "Intro",
        "Introduced",
        "File",
        width = max_path_len
    );
    println!("{separator}");
    for a in &outcome.attributions {
        println!(
            " {:<8}  {:<8}  {:<10}  {:<width$}  {}",
            report_helpers::short_hash(&a.bug_fix_commit),
            report_helpers::short_hash(&a.bug_introducing_commit),
            report_helpers::format_date(a.bug_introducing_timestamp),
            a.file_path,
            report_helpers::truncate(a.blamed_line.trim(), LINE_WIDTH),
            width = max_path_len
        );
    }
    println!("{separator}");
}

fn print_summary(s: &SzzSummary) {
    println!("SZZ attribution");
    println!("  commits scanned      {:>8}", s.commits_scanned);
    println!("  bug-fix commits      {:>8}", s.bug_fix_commits);
    println!("  root commits skipped {:>8}", s.skipped_roots);
    println!("  merges skipped       {:>8}", s.skipped_merges);
    println!("  failed diffs         {:>8}", s.failed_diffs);
    println!("  failed blames        {:>8}", s.failed_blames);
    println!("  duplicates dropped   {:>8}", s.duplicates_dropped);
    println!("  attributions         {:>8}", s.attributions);
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: &'a SzzSummary,
    attributions: &'a [SzzAttribution],
}

pub fn print_json(outcome: &SzzOutcome) -> Result<()> {
    report_helpers::print_json_stdout(&JsonOutput {
        summary: &outcome.summary,
        attributions: &outcome.attributions,
    })
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
