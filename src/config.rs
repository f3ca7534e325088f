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

//! Configuration file.
//!
//! Every setting has a default, so the tool works without a config
//! file. Relative paths are resolved against the directory holding
//! the config file.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;

use crate::brand::{BrandRule, BrandTable};
use crate::rewrite::BundleFilter;

/// Parameters for rebranding.
///
/// ## Example
///
/// ```toml
/// grd-files = ["chrome/app/chromium_strings.grd"]
/// translation-dirs = ["chrome/app/resources"]
/// known-duplicates = ["Brave"]
///
/// [[brands]]
/// marker = "Brave Software"
/// alternates = ["Google"]
///
/// [[brands]]
/// marker = "Brave"
/// alternates = ["Chrome", "Google Chrome", "Chromium"]
///
/// [strings]
/// file = "chrome/android/java/strings/strings.xml"
/// grd = "chrome/android/java/strings/android_chrome_strings.grd"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Brand rules, first match wins.
    pub brands: Vec<BrandRule>,
    /// Rebranded texts whose id collisions are expected.
    pub known_duplicates: BTreeSet<String>,
    /// Extension of translation bundles.
    pub extension: String,
    /// Regular expression for bundle file names to leave alone.
    pub exclude: String,
    pub grd_files: Vec<PathBuf>,
    pub translation_dirs: Vec<PathBuf>,
    pub strings: StringsConfig,
}

/// Settings for syncing an Android `strings.xml` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringsConfig {
    pub file: Option<PathBuf>,
    pub grd: Option<PathBuf>,
    /// Strings which are not used at the moment.
    pub skip: BTreeSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            brands: BrandTable::default().rules().to_vec(),
            known_duplicates: BTreeSet::new(),
            extension: String::from("xtb"),
            exclude: String::from("locale_settings"),
            grd_files: Vec::new(),
            translation_dirs: Vec::new(),
            strings: StringsConfig::default(),
        }
    }
}

impl Default for StringsConfig {
    fn default() -> Self {
        let skip = [
            "brave_settings_title",
            "brave_shields_down",
            "brave_shields_up",
            "brave_shields_ads_trackers",
            "brave_shields_block_phishing_switch",
            "brave_shields_fingerprints_blocked",
            "send_metrics_title",
        ];
        Self {
            file: None,
            grd: None,
            skip: skip.into_iter().map(String::from).collect(),
        }
    }
}

impl Config {
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Invalid configuration")
    }

    /// Load the config file at `path` and resolve its relative paths.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let mut config =
            Self::parse(&content).with_context(|| format!("Could not load {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |path: &mut PathBuf| *path = base.join(&*path);
        self.grd_files.iter_mut().for_each(resolve);
        self.translation_dirs.iter_mut().for_each(resolve);
        self.strings.file.iter_mut().for_each(resolve);
        self.strings.grd.iter_mut().for_each(resolve);
    }

    pub fn brand_table(&self) -> BrandTable {
        BrandTable::new(self.brands.clone())
    }

    pub fn bundle_filter(&self) -> anyhow::Result<BundleFilter> {
        let exclude = if self.exclude.is_empty() {
            None
        } else {
            let regex = Regex::new(&self.exclude)
                .with_context(|| format!("Invalid exclude pattern {:?}", self.exclude))?;
            Some(regex)
        };
        Ok(BundleFilter::new(&self.extension, exclude))
    }
}
