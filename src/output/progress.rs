use std::path::Path;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::styling::{bright, bright_green, bright_yellow};

/// Spinner shown on stderr while workflows are being resolved
pub struct PhaseProgress {
    pb: ProgressBar,
}

impl PhaseProgress {
    pub fn start(workflows_dir: &Path) -> Self {
        eprintln!("{}  {}", bright("⚙️"), bright("Phases").underlined());
        let pb = create_spinner(
            bright_yellow(format!(
                "Resolving workflow jobs in {}",
                workflows_dir.display()
            ))
            .to_string(),
        );
        Self { pb }
    }

    pub fn finish(self, job_count: usize, workflow_count: usize) {
        self.pb.finish_with_message(
            bright_green(format!(
                "Resolved {job_count} jobs from {workflow_count} top-level workflows ✓"
            ))
            .to_string(),
        );
        eprintln!();
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_draw_target(ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::default_spinner().template("  {msg} {spinner}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
