use std::io::Write;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::report::JobReport;

/// Writes a job report in one of the machine-readable formats.
///
/// - JSON: the full report, including diagnostics
/// - CSV: one `Workflow,Job` row per resolved job
/// - Names: distinct job names, one per line, e.g. for required checks
pub fn export_report(
    report: &JobReport,
    format: OutputFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> Result<()> {
    match format {
        OutputFormat::Summary => {
            // Summary format is handled separately in cli.rs
            unreachable!("Summary format should be handled in CLI")
        }
        OutputFormat::Json => export_json(report, pretty, output),
        OutputFormat::Csv => export_csv(report, output),
        OutputFormat::Names => export_names(report, output),
    }
}

fn export_json(report: &JobReport, pretty: bool, output: &mut dyn Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    writeln!(output, "{json}")?;
    Ok(())
}

fn export_csv(report: &JobReport, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "Workflow,Job")?;
    for job in &report.jobs {
        writeln!(
            output,
            "{},{}",
            csv_field(&job.workflow_name),
            csv_field(&job.job_name)
        )?;
    }
    Ok(())
}

fn export_names(report: &JobReport, output: &mut dyn Write) -> Result<()> {
    for name in report.job_names() {
        writeln!(output, "{name}")?;
    }
    Ok(())
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
