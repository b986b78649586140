use super::{Correlation, CorrelationRun};
use crate::error::Result;
use crate::report_helpers;

fn cell(c: Option<&Correlation>) -> String {
    report_helpers::format_opt(c.map(|c| c.rho))
}

pub fn print_report(run: &CorrelationRun) {
    if run.projects.is_empty() {
        println!("No annotated reports found.");
        print_unannotated(run.unannotated_reports);
        return;
    }

    let max_name_len =
        report_helpers::max_str_width(run.projects.iter().map(|p| p.project.as_str()), 7);
    let header_width = max_name_len + 60;
    let separator = report_helpers::separator(header_width.max(78));

    println!("Spearman correlation: bug-introducing commits vs data clumps");
    println!("{separator}");
    println!(
        " {:<width$}  {:>6} {:>8} {:>8} {:>8} {:>8}  Strength (total)",
        "Project",
        "Points",
        "Total",
        "F2F",
        "P2P",
        "P2F",
        width = max_name_len
    );
    println!("{separator}");

    for p in &run.projects {
        println!(
            " {:<width$}  {:>6} {:>8} {:>8} {:>8} {:>8}  {}",
            p.project,
            p.points,
            cell(p.total.as_ref()),
            cell(p.fields_to_fields.as_ref()),
            cell(p.parameters_to_parameters.as_ref()),
            cell(p.parameters_to_fields.as_ref()),
            p.total.as_ref().map_or_else(|| "undefined".to_string(), Correlation::label),
            width = max_name_len
        );
    }
    println!("{separator}");
    match &run.global_total {
        Some(c) => println!("All projects (total): rho = {:.2}, {}", c.rho, c.label()),
        None => println!("All projects (total): undefined"),
    }
    print_unannotated(run.unannotated_reports);
    println!();
    println!("- = fewer than two reports or no variation in one of the series.");
}

fn print_unannotated(count: usize) {
    if count > 0 {
        println!("{count} report(s) without a fault annotation were ignored.");
    }
}

pub fn print_json(run: &CorrelationRun) -> Result<()> {
    report_helpers::print_json_stdout(run)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
