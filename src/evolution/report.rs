use super::{EvolutionCategory, ProjectEvolution};
use crate::error::Result;
use crate::report_helpers;

pub fn print_report(projects: &[ProjectEvolution]) {
    if projects.is_empty() {
        println!("No project folders found.");
        return;
    }

    let max_name_len =
        report_helpers::max_str_width(projects.iter().map(|p| p.project.as_str()), 7);
    // 1 + name + 2 + 9 + 1 + 6 + 5 * 8
    let header_width = max_name_len + 59;
    let separator = report_helpers::separator(header_width.max(78));

    println!("Data clump evolution (percentage of keys per category)");
    println!("{separator}");
    println!(
        " {:<width$}  {:>9} {:>6} {:>7} {:>7} {:>7} {:>7} {:>7}",
        "Project",
        "Snapshots",
        "Keys",
        "A",
        "B",
        "C",
        "D",
        "E",
        width = max_name_len
    );
    println!("{separator}");

    for p in projects {
        let d = &p.distribution;
        println!(
            " {:<width$}  {:>9} {:>6} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2}",
            p.project,
            p.snapshots,
            d.total_keys,
            d.a,
            d.b,
            d.c,
            d.d,
            d.e,
            width = max_name_len
        );
    }
    println!("{separator}");
    println!();
    for category in EvolutionCategory::ALL {
        println!("  {category}: {}", category.description());
    }

    let excluded: usize = projects.iter().map(|p| p.excluded).sum();
    if excluded > 0 {
        println!();
        println!("{excluded} report(s) lacked project metadata and were excluded.");
    }
}

pub fn print_json(projects: &[ProjectEvolution]) -> Result<()> {
    report_helpers::print_json_stdout(&projects)
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
