//! Candidate file enumeration.
//!
//! The scan engine takes an already-filtered file list; this module is the
//! collaborator that produces it. Ignore rules (`.gitignore`, global
//! excludes, the usual junk directories) are applied here and only here —
//! the engine never interprets ignore syntax.

use crate::config::Config;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Source language of a candidate file, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Kotlin,
    Java,
}

impl FileType {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "kt" | "kts" => Some(FileType::Kotlin),
            "java" => Some(FileType::Java),
            _ => None,
        }
    }
}

/// Finds Kotlin/Java source files under a root, honoring ignore rules.
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// All candidate files under `root`, pre-filtered by extension, ignore
    /// files, and the config's exclude globs.
    pub fn find_files(&self, root: &Path) -> Vec<PathBuf> {
        debug!("scanning for candidate files in {}", root.display());

        let walker = WalkBuilder::new(root)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .ignore(true)
            .parents(true)
            .follow_links(self.config.follow_symlinks)
            .build();

        let files: Vec<PathBuf> = walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();

                if self.config.should_exclude(path) {
                    trace!("excluding {}", path.display());
                    return None;
                }

                if !self.has_candidate_extension(path) {
                    return None;
                }

                trace!("found {}", path.display());
                Some(path.to_path_buf())
            })
            .collect();

        debug!("found {} candidate files", files.len());
        files
    }

    fn has_candidate_extension(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        self.config
            .extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.') == ext)
    }
}
