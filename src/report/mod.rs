mod json;
mod terminal;

use crate::scan::{FileScanResult, SearchMode};
use crate::target::TargetSpec;
use miette::Result;
use std::path::PathBuf;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Rendering options shared by both formats.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Include per-line hits, not just per-file counts.
    pub with_lines: bool,

    /// Cap the number of files shown (terminal format only).
    pub limit: Option<usize>,

    /// Write to this file instead of stdout (JSON format only).
    pub output: Option<PathBuf>,

    /// Disable ANSI colors.
    pub no_color: bool,
}

/// Facade dispatching to the concrete renderer.
///
/// Results arrive unordered from the orchestrator; ordering (by path) is
/// applied here, where presentation concerns live.
pub struct Reporter {
    format: ReportFormat,
    options: ReportOptions,
}

impl Reporter {
    pub fn new(format: ReportFormat, options: ReportOptions) -> Self {
        Self { format, options }
    }

    pub fn report(
        &self,
        target: &TargetSpec,
        mode: SearchMode,
        members: &[String],
        results: &[FileScanResult],
    ) -> Result<()> {
        let mut sorted: Vec<&FileScanResult> = results.iter().collect();
        sorted.sort_by(|a, b| a.path.cmp(&b.path));

        match self.format {
            ReportFormat::Terminal => TerminalReporter::new(&self.options).report(mode, &sorted),
            ReportFormat::Json => {
                JsonReporter::new(&self.options).report(target, mode, members, &sorted)
            }
        }
    }
}
