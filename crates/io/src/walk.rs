//! Corpus discovery and loading.
//!
//! [`CorpusWalker`] finds candidate files; [`load_corpus`] turns a file list
//! into a [`LoadedCorpus`]. The two steps are separate so the index build can
//! be fed synthetic file lists in tests.

use std::path::{Path, PathBuf};

use astroreport_recon::model::Observation;
use regex::Regex;

use crate::error::IoError;
use crate::mpc::parse_line;

#[derive(Debug, Clone)]
pub struct CorpusWalker {
    root: PathBuf,
    name_pattern: Regex,
}

impl CorpusWalker {
    /// `pattern` is matched anywhere in the file name (not anchored).
    pub fn new(root: impl Into<PathBuf>, pattern: &str) -> Result<Self, IoError> {
        let name_pattern = Regex::new(pattern).map_err(|e| IoError::Pattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            root: root.into(),
            name_pattern,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Regular files under the root whose name matches, in sorted path order.
    pub fn walk(&self) -> Result<Vec<PathBuf>, IoError> {
        if !self.root.is_dir() {
            return Err(IoError::NotADirectory {
                path: self.root.clone(),
            });
        }

        let walk_err = |message: String| IoError::Walk {
            path: self.root.clone(),
            message,
        };

        let root_text = self
            .root
            .to_str()
            .ok_or_else(|| walk_err("path is not valid UTF-8".into()))?;
        let pattern = format!("{}/**/*", glob::Pattern::escape(root_text));
        let entries = glob::glob(&pattern).map_err(|e| walk_err(e.to_string()))?;

        let mut matched = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("skipping {}: {}", e.path().display(), e.error());
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            if self.name_pattern.is_match(&name) {
                matched.push(path);
            } else {
                tracing::warn!(
                    "skipping {} (name does not match '{}')",
                    path.display(),
                    self.name_pattern.as_str()
                );
            }
        }

        matched.sort();
        tracing::debug!("{}: {} candidate files", self.root.display(), matched.len());
        Ok(matched)
    }
}

/// Everything read out of a set of files.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    pub observations: Vec<Observation>,
    pub files: usize,
    pub skipped_lines: usize,
}

/// Read and parse every file in order. Each observation's origin is
/// `path:line`. Malformed lines are logged and skipped; an unreadable file
/// stops the load.
pub fn load_corpus(paths: &[PathBuf]) -> Result<LoadedCorpus, IoError> {
    let mut corpus = LoadedCorpus::default();
    for path in paths {
        let bytes = std::fs::read(path).map_err(|source| IoError::Read {
            path: path.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        corpus.files += 1;

        for (i, line) in text.lines().enumerate() {
            let origin = format!("{}:{}", path.display(), i + 1);
            match parse_line(line) {
                Ok(Some(obs)) => corpus.observations.push(obs.with_origin(origin)),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("{origin}: {e}; skipping line: {}", line.trim_end());
                    corpus.skipped_lines += 1;
                }
            }
        }
    }
    tracing::debug!(
        "loaded {} observations from {} files ({} lines skipped)",
        corpus.observations.len(),
        corpus.files,
        corpus.skipped_lines
    );
    Ok(corpus)
}
