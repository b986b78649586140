use super::{FaultRun, FaultRunSummary};
use crate::error::Result;
use crate::report_helpers;

pub fn print_report(run: &FaultRun) {
    if run.projects.is_empty() {
        println!("No projects found.");
        print_unusable(run.unusable_reports);
        return;
    }

    let max_name_len =
        report_helpers::max_str_width(run.projects.iter().map(|p| p.project.as_str()), 7);
    // 1 + name + 2 + 5 * (8 + 1) + 6
    let header_width = max_name_len + 54;
    let separator = report_helpers::separator(header_width.max(78));

    println!("Fault correlation (bug-introducing commits until each reported commit)");
    println!("{separator}");
    println!(
        " {:<width$}  {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Project",
        "Reports",
        "Written",
        "Already",
        "NoAnc",
        "Skipped",
        "Faults",
        width = max_name_len
    );
    println!("{separator}");

    for p in &run.projects {
        println!(
            " {:<width$}  {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
            p.project,
            p.reports,
            p.annotated,
            p.already_annotated,
            p.missing_ancestry,
            p.skipped,
            faults_label(p),
            width = max_name_len
        );
    }
    println!("{separator}");

    let failed: Vec<&FaultRunSummary> = run.projects.iter().filter(|p| p.error.is_some()).collect();
    if !failed.is_empty() {
        println!();
        println!("Projects not processed:");
        for p in failed {
            println!("  {}: {}", p.project, p.error.as_deref().unwrap_or_default());
        }
    }
    print_unusable(run.unusable_reports);
    println!();
    println!("NoAnc = report commit missing from the repository history (missing upstream data).");
    println!("Skipped = report could not be written back (recoverable error).");
}

fn faults_label(p: &FaultRunSummary) -> String {
    p.szz
        .as_ref()
        .map_or_else(|| "-".to_string(), |s| s.attributions.to_string())
}

fn print_unusable(count: usize) {
    if count > 0 {
        println!("{count} report(s) lacked a project name or commit hash and were ignored.");
    }
}

pub fn print_json(run: &FaultRun) -> Result<()> {
    report_helpers::print_json_stdout(run)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
