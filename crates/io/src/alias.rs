//! Alias index: which provisional designations name the same object.
//!
//! File format: one object per line, its designations separated by
//! whitespace. Blank lines and `#` comments are ignored. A name that shows
//! up on several lines joins those lines into one object.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use astroreport_recon::identity::IdentityResolver;

use crate::error::IoError;

#[derive(Debug, Default, Clone)]
pub struct AliasIndex {
    groups: HashMap<String, usize>,
    next_group: usize,
}

impl AliasIndex {
    pub fn load(path: &Path) -> Result<Self, IoError> {
        let text = std::fs::read_to_string(path).map_err(|source| IoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let index = Self::parse(&text);
        tracing::info!(
            "loaded alias index {} ({} names, {} objects)",
            path.display(),
            index.len(),
            index.object_count()
        );
        Ok(index)
    }

    pub fn parse(text: &str) -> Self {
        let mut index = Self::default();
        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("");
            let names: Vec<&str> = line.split_whitespace().collect();
            if !names.is_empty() {
                index.add_group(&names);
            }
        }
        index
    }

    fn add_group(&mut self, names: &[&str]) {
        let known: BTreeSet<usize> = names
            .iter()
            .filter_map(|n| self.groups.get(*n).copied())
            .collect();

        let group = match known.first() {
            Some(&g) => g,
            None => {
                self.next_group += 1;
                self.next_group
            }
        };

        if known.len() > 1 {
            for g in self.groups.values_mut() {
                if known.contains(g) {
                    *g = group;
                }
            }
        }

        for name in names {
            self.groups.insert((*name).to_string(), group);
        }
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn object_count(&self) -> usize {
        self.groups.values().collect::<BTreeSet<_>>().len()
    }
}

impl IdentityResolver for AliasIndex {
    fn is_same(&self, label_a: &str, label_b: &str) -> bool {
        if label_a == label_b {
            return true;
        }
        matches!(
            (self.groups.get(label_a), self.groups.get(label_b)),
            (Some(a), Some(b)) if a == b
        )
    }
}
