use std::fmt::Write;

use comfy_table::Cell;

use crate::report::JobReport;

use super::styling::{bright, bright_green, bright_yellow, cyan, dim};
use super::tables::{create_table, cyan_header, diagnostic_kind_cell};

/// Prints a human-readable summary of the discovered jobs to stdout.
///
/// Displays:
/// - Overview: repository, workflows directory, workflow and job counts
/// - Jobs: every resolved `(workflow, job)` pair, sorted
/// - Warnings: conditions that dropped or degraded part of the result
pub fn print_summary(report: &JobReport) {
    println!("{}", render_summary(report));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

fn render_summary(report: &JobReport) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📊", "Overview");

    let _ = writeln!(
        output,
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Repository:"),
        cyan(report.repo_root.display()),
        dim("Workflows directory:"),
        cyan(report.workflows_dir.display()),
        dim("Workflow files:"),
        bright_yellow(report.total_workflows),
        dim("Top-level workflows:"),
        bright_yellow(report.top_level_workflows.len()),
        dim("Reusable workflows:"),
        bright_yellow(report.reusable_workflows.len()),
        dim("Jobs discovered:"),
        bright_green(report.jobs.len()),
    );

    if report.jobs.is_empty() {
        let _ = writeln!(output, "{}", bright_yellow("No jobs found."));
    } else {
        add_section_header(&mut output, "📋", "Jobs");

        let mut jobs_table = create_table();
        jobs_table.set_header(cyan_header(&["Workflow", "Job"]));
        for job in &report.jobs {
            jobs_table.add_row(vec![Cell::new(&job.workflow_name), Cell::new(&job.job_name)]);
        }
        let _ = writeln!(output, "{jobs_table}\n");
    }

    if !report.diagnostics.is_empty() {
        add_section_header(&mut output, "⚠️", "Warnings");

        let mut warnings_table = create_table();
        warnings_table.set_header(cyan_header(&["Kind", "Details"]));
        for diagnostic in &report.diagnostics {
            warnings_table.add_row(vec![
                diagnostic_kind_cell(diagnostic),
                Cell::new(diagnostic.to_string()),
            ]);
        }
        let _ = writeln!(output, "{warnings_table}");
    }

    output
}
