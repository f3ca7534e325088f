// Copyright 2023 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Rewriting translation ids across directory trees.
//!
//! Rewriting happens in two steps. [`plan_rewrites`] reads and
//! rewrites every bundle in memory, and [`apply_rewrites`] writes the
//! changed ones. A broken file anywhere under the roots thus stops
//! the run before anything is written.

use std::fmt::{self, Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, info};
use regex::Regex;
use walkdir::WalkDir;

use crate::idmap::IdMap;
use crate::xtb::rewrite_bundle;

/// Which files under a root are translation bundles.
#[derive(Debug, Clone)]
pub struct BundleFilter {
    extension: String,
    exclude: Option<Regex>,
}

impl BundleFilter {
    /// Match files ending in `.{extension}` whose name does not match
    /// `exclude`.
    pub fn new(extension: &str, exclude: Option<Regex>) -> Self {
        Self {
            extension: format!(".{}", extension.trim_start_matches('.')),
            exclude,
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.extension)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.is_match(file_name))
    }
}

impl Default for BundleFilter {
    fn default() -> Self {
        Self::new("xtb", Regex::new("locale_settings").ok())
    }
}

/// Find all bundles below `root`, sorted by path.
pub fn find_bundles(root: &Path, filter: &BundleFilter) -> anyhow::Result<Vec<PathBuf>> {
    let mut bundles = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Could not walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) if filter.matches(name) => bundles.push(entry.into_path()),
            _ => debug!("Skipping {}", entry.path().display()),
        }
    }
    Ok(bundles)
}

/// New content for a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub path: PathBuf,
    pub content: String,
    pub replaced: Vec<(u64, u64)>,
}

/// What a rewrite run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteSummary {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub ids_replaced: usize,
}

impl Display for RewriteSummary {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{} ids replaced in {} of {} files",
            self.ids_replaced, self.files_rewritten, self.files_scanned
        )
    }
}

/// Rewrite every bundle under `roots` in memory.
///
/// Bundles without any id from `map` produce no [`PendingWrite`].
pub fn plan_rewrites(
    roots: &[PathBuf],
    filter: &BundleFilter,
    map: &IdMap,
) -> anyhow::Result<(Vec<PendingWrite>, RewriteSummary)> {
    let mut writes = Vec::new();
    let mut summary = RewriteSummary::default();
    for root in roots {
        for path in find_bundles(root, filter)? {
            info!("Processing file \"{}\"...", path.display());
            summary.files_scanned += 1;
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            let rewritten = rewrite_bundle(&content, map)
                .with_context(|| format!("Could not parse {}", path.display()))?;
            if let Some((content, replaced)) = rewritten {
                summary.files_rewritten += 1;
                summary.ids_replaced += replaced.len();
                writes.push(PendingWrite {
                    path,
                    content,
                    replaced,
                });
            }
        }
        info!("Ids updated in {}", root.display());
    }
    Ok((writes, summary))
}

pub fn apply_rewrites(writes: &[PendingWrite]) -> anyhow::Result<()> {
    for write in writes {
        fs::write(&write.path, &write.content)
            .with_context(|| format!("Could not write {}", write.path.display()))?;
    }
    Ok(())
}

/// Rewrite every bundle under `roots`, unless `dry_run` is set.
pub fn rewrite_trees(
    roots: &[PathBuf],
    filter: &BundleFilter,
    map: &IdMap,
    dry_run: bool,
) -> anyhow::Result<RewriteSummary> {
    let (writes, summary) = plan_rewrites(roots, filter, map)?;
    if dry_run {
        for write in &writes {
            info!(
                "Would rewrite {} ({} ids)",
                write.path.display(),
                write.replaced.len()
            );
        }
    } else {
        apply_rewrites(&writes)?;
    }
    Ok(summary)
}
