use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, OutputFormat};
use crate::output::{self, PhaseProgress};
use crate::workflows;

#[derive(Parser)]
#[command(name = "ghjobs")]
#[command(
    author,
    version,
    about = "List the GitHub Actions jobs that actually run, expanding local reusable workflows",
    long_about = None
)]
pub struct Cli {
    /// Repository root containing .github/workflows
    #[arg(short, long, env = "GHJOBS_REPO_ROOT", default_value = ".")]
    repo_root: PathBuf,

    /// Print only the distinct job names, one per line
    #[arg(short = 'n', long, default_value_t = false)]
    only_names: bool,

    /// Output format (defaults to the configured format, then summary)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(short, long, default_value_t = false)]
    pretty: bool,

    /// Configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Maximum depth of nested reusable-workflow calls to follow
    #[arg(long)]
    max_depth: Option<usize>,
}

impl Cli {
    /// Whether banner and progress output should be suppressed.
    pub fn is_quiet(&self) -> bool {
        self.only_names
    }

    fn output_format(&self, config: &Config) -> OutputFormat {
        if self.only_names {
            OutputFormat::Names
        } else {
            self.format.unwrap_or(config.output.format)
        }
    }

    pub fn execute(&self) -> Result<()> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(max_depth) = self.max_depth {
            anyhow::ensure!(max_depth > 0, "--max-depth must be at least 1");
            config.workflows.max_depth = max_depth;
        }

        let repo_root = self
            .repo_root
            .canonicalize()
            .unwrap_or_else(|_| self.repo_root.clone());
        let format = self.output_format(&config);
        let pretty = self.pretty || config.output.pretty;

        info!(
            "Searching for workflow files in: {}",
            repo_root.join(&config.workflows.directory).display()
        );

        let progress = (!self.is_quiet())
            .then(|| PhaseProgress::start(&repo_root.join(&config.workflows.directory)));

        let report = workflows::run(&repo_root, &config.workflows);

        if let Some(progress) = progress {
            progress.finish(report.jobs.len(), report.top_level_workflows.len());
        }

        if format == OutputFormat::Summary {
            if let Some(output_path) = &self.output {
                anyhow::bail!(
                    "--output requires a machine-readable format, got summary for {}",
                    output_path.display()
                );
            }
            output::print_summary(&report);
            return Ok(());
        }

        match &self.output {
            Some(output_path) => {
                let file = File::create(output_path).with_context(|| {
                    format!("Failed to create output file: {}", output_path.display())
                })?;
                write_export(&report, format, pretty, BufWriter::new(file), output_path)?;
                info!("Jobs written to: {}", output_path.display());
            }
            None => {
                let stdout = io::stdout();
                write_export(&report, format, pretty, stdout.lock(), Path::new("<stdout>"))?;
            }
        }

        Ok(())
    }
}

fn write_export(
    report: &crate::report::JobReport,
    format: OutputFormat,
    pretty: bool,
    mut writer: impl Write,
    destination: &Path,
) -> Result<()> {
    output::export_report(report, format, pretty, &mut writer)
        .with_context(|| format!("Failed to write jobs to {}", destination.display()))?;
    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", destination.display()))
}
