//! Parallel scan dispatch.
//!
//! One task per candidate file, all tasks independent: shared state is the
//! read-only scanner and the results rayon folds together. A file that
//! cannot be read or parsed contributes zero matches and a diagnostics
//! tally entry; it never aborts the run.

use super::{
    Capabilities, EngineChoice, FallbackScanner, PatternScanner, ScanOptions, ScanOutcome,
    Scanner, StructuralScanner,
};
use crate::error::FindUsagesError;
use crate::scan::FileScanResult;
use crate::target::TargetSpec;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Aggregate outcome of a scan run.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Files with at least one surviving hit. Unordered; sorting is the
    /// presentation layer's concern.
    pub results: Vec<FileScanResult>,

    /// Candidate files actually scanned (target file excluded).
    pub scanned: usize,

    /// Files skipped on read failure. Diagnostic only.
    pub unreadable: usize,
}

impl ScanSummary {
    pub fn total_matches(&self) -> usize {
        self.results.iter().map(|r| r.total_matches).sum()
    }
}

enum FileOutcome {
    Hit(FileScanResult),
    Clean,
    Unreadable,
}

pub struct ScanOrchestrator {
    scanner: Box<dyn Scanner + Send>,
    capabilities: Capabilities,
}

impl ScanOrchestrator {
    /// Build an orchestrator for one run.
    ///
    /// Fails only when `engine` mandates structural matching and the
    /// capability is absent; `Auto` degrades to the pattern engine instead.
    pub fn new(
        target: &TargetSpec,
        options: &ScanOptions,
        engine: EngineChoice,
        capabilities: Capabilities,
    ) -> Result<Self, FindUsagesError> {
        let pattern = PatternScanner::new(target, options);

        let scanner: Box<dyn Scanner + Send> = match engine {
            EngineChoice::Pattern => Box::new(pattern),
            EngineChoice::Structural => {
                if !capabilities.structural {
                    return Err(FindUsagesError::StructuralUnavailable);
                }
                Box::new(StructuralScanner::new(target, options))
            }
            EngineChoice::Auto => {
                if capabilities.structural {
                    Box::new(FallbackScanner::new(
                        StructuralScanner::new(target, options),
                        pattern,
                    ))
                } else {
                    Box::new(pattern)
                }
            }
        };

        Ok(Self {
            scanner,
            capabilities,
        })
    }

    /// Scan every candidate file, excluding the target file itself.
    ///
    /// `files` is expected to be pre-filtered (ignore rules, extensions) by
    /// the caller; the orchestrator does not interpret ignore syntax.
    pub fn scan_files(&self, files: &[PathBuf], target_path: &Path) -> ScanSummary {
        let target_canonical = target_path
            .canonicalize()
            .unwrap_or_else(|_| target_path.to_path_buf());

        let candidates: Vec<&PathBuf> = files
            .iter()
            .filter(|path| {
                let canonical = path
                    .canonicalize()
                    .unwrap_or_else(|_| path.to_path_buf());
                canonical != target_canonical
            })
            .collect();

        info!("scanning {} candidate files", candidates.len());

        let progress = if self.capabilities.progress {
            let bar = ProgressBar::new(candidates.len() as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(bar)
        } else {
            None
        };

        let outcomes: Vec<FileOutcome> = candidates
            .par_iter()
            .map(|path| {
                let outcome = self.scan_one(path);
                if let Some(bar) = &progress {
                    bar.inc(1);
                }
                outcome
            })
            .collect();

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        let mut summary = ScanSummary::default();
        for outcome in outcomes {
            match outcome {
                FileOutcome::Hit(result) => {
                    summary.scanned += 1;
                    summary.results.push(result);
                }
                FileOutcome::Clean => summary.scanned += 1,
                FileOutcome::Unreadable => summary.unreadable += 1,
            }
        }

        info!(
            "{} files with usages, {} unreadable",
            summary.results.len(),
            summary.unreadable
        );

        summary
    }

    fn scan_one(&self, path: &Path) -> FileOutcome {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("skipping unreadable file {}: {}", path.display(), e);
                return FileOutcome::Unreadable;
            }
        };

        match self.scanner.scan(path, &contents) {
            ScanOutcome::Scanned(Some(result)) => FileOutcome::Hit(result),
            ScanOutcome::Scanned(None) => FileOutcome::Clean,
            // Only reachable under a mandated structural engine; a file the
            // grammar cannot handle counts as no usage.
            ScanOutcome::Unsupported => FileOutcome::Clean,
        }
    }
}
