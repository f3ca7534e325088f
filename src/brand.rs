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

//! Brand substitution rules.
//!
//! A rule names the marker found in rebranded text and the upstream
//! tokens it replaced. Substituting each alternate back into the text
//! gives the strings upstream translations were keyed on.

use serde::Deserialize;

/// One marker and the tokens it stands in for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BrandRule {
    pub marker: String,
    pub alternates: Vec<String>,
}

impl BrandRule {
    pub fn new(marker: &str, alternates: &[&str]) -> Self {
        Self {
            marker: String::from(marker),
            alternates: alternates.iter().map(|s| String::from(*s)).collect(),
        }
    }

    /// Upstream variants of `text`, one per alternate.
    ///
    /// Every occurrence of the marker is replaced. Alternates equal to
    /// the marker are skipped since they would map a string onto
    /// itself.
    pub fn variants(&self, text: &str) -> Vec<String> {
        self.alternates
            .iter()
            .filter(|alternate| **alternate != self.marker)
            .map(|alternate| text.replace(&self.marker, alternate))
            .collect()
    }
}

/// Ordered list of rules. The first rule whose marker occurs in a
/// text is the one applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandTable {
    rules: Vec<BrandRule>,
}

impl BrandTable {
    pub fn new(rules: Vec<BrandRule>) -> Self {
        Self { rules }
    }

    /// Find the rule for `text`, if any marker occurs in it.
    ///
    /// ```
    /// use grit_rebrand::brand::BrandTable;
    ///
    /// let table = BrandTable::default();
    /// let rule = table.rule_for("Brave Software Inc.").unwrap();
    /// assert_eq!(rule.marker, "Brave Software");
    /// assert!(table.rule_for("Settings").is_none());
    /// ```
    pub fn rule_for(&self, text: &str) -> Option<&BrandRule> {
        self.rules
            .iter()
            .find(|rule| !rule.marker.is_empty() && text.contains(&rule.marker))
    }

    pub fn rules(&self) -> &[BrandRule] {
        &self.rules
    }
}

impl Default for BrandTable {
    fn default() -> Self {
        Self::new(vec![
            BrandRule::new("Brave Software", &["Google"]),
            BrandRule::new("Brave", &["Chrome", "Google Chrome", "Chromium"]),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variants_replace_every_marker() {
        let rule = BrandRule::new("Brave", &["Chrome", "Chromium"]);
        assert_eq!(
            rule.variants("Brave helps Brave users"),
            vec!["Chrome helps Chrome users", "Chromium helps Chromium users"]
        );
    }

    #[test]
    fn test_variants_skip_identity() {
        let rule = BrandRule::new("Brave", &["Brave", "Chrome"]);
        assert_eq!(rule.variants("Brave"), vec!["Chrome"]);
    }

    #[test]
    fn test_company_rule_shadows_brand_rule() {
        let table = BrandTable::default();
        let rule = table.rule_for("Copyright Brave Software Inc.").unwrap();
        assert_eq!(rule.variants("Brave Software Inc."), vec!["Google Inc."]);

        let rule = table.rule_for("Brave is fast").unwrap();
        assert_eq!(
            rule.variants("Brave is fast"),
            vec!["Chrome is fast", "Google Chrome is fast", "Chromium is fast"]
        );
    }

    #[test]
    fn test_no_rule_without_marker() {
        let table = BrandTable::default();
        assert_eq!(table.rule_for("Open a new tab"), None);
        // Matching is case sensitive.
        assert_eq!(table.rule_for("brave new world"), None);
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let table = BrandTable::new(vec![BrandRule::new("", &["Chrome"])]);
        assert_eq!(table.rule_for("anything"), None);
    }
}
