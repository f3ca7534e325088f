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

//! Mapping from upstream translation ids to rebranded ones.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::Context;
use log::debug;
use serde::Serialize;

use crate::brand::BrandTable;
use crate::error::{RebrandError, Result};
use crate::fingerprint::fingerprint;
use crate::grd::{read_messages, GrdMessage};

/// Where an upstream id should point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remap {
    pub target: u64,
    /// The rebranded text `target` is the fingerprint of.
    pub text: String,
}

/// Finished id map, read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdMap {
    entries: BTreeMap<u64, Remap>,
}

impl IdMap {
    pub fn get(&self, source: u64) -> Option<u64> {
        self.entries.get(&source).map(|remap| remap.target)
    }

    pub fn remap(&self, source: u64) -> Option<&Remap> {
        self.entries.get(&source)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(source, target)` pairs in ascending source order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.entries
            .iter()
            .map(|(source, remap)| (*source, remap.target))
    }

    /// Sources which are also the target of some entry.
    ///
    /// Rewriting with a map that has such ids is not idempotent: a
    /// second run would move the already rewritten translations again.
    pub fn unstable_ids(&self) -> Vec<u64> {
        let targets = self
            .entries
            .values()
            .map(|remap| remap.target)
            .collect::<BTreeSet<_>>();
        self.entries
            .keys()
            .copied()
            .filter(|source| targets.contains(source))
            .collect()
    }
}

/// Collects id remappings from rebranded messages.
///
/// Entries are only ever added. A second message producing the same
/// upstream id with a different target is a collision and aborts the
/// build, unless one of the two rebranded texts is a known duplicate.
/// In that case the first entry is kept.
#[derive(Debug)]
pub struct IdMapBuilder<'a> {
    brands: &'a BrandTable,
    known_duplicates: &'a BTreeSet<String>,
    map: IdMap,
}

impl<'a> IdMapBuilder<'a> {
    pub fn new(brands: &'a BrandTable, known_duplicates: &'a BTreeSet<String>) -> Self {
        Self {
            brands,
            known_duplicates,
            map: IdMap::default(),
        }
    }

    /// Add the remappings for a single message.
    ///
    /// Messages without a brand marker are skipped. Returns the number
    /// of entries added.
    pub fn add_message(&mut self, message: &GrdMessage) -> Result<usize> {
        let text = message.display_text();
        let Some(rule) = self.brands.rule_for(&text) else {
            return Ok(0);
        };

        let target = fingerprint(&text);
        debug!("{target} - {text}");
        let mut added = 0;
        for variant in rule.variants(&text) {
            let source = fingerprint(&variant);
            debug!("{source} - {variant}");
            if self.insert(source, target, &text)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn add_messages(&mut self, messages: &[GrdMessage]) -> Result<usize> {
        let mut added = 0;
        for message in messages {
            added += self.add_message(message)?;
        }
        Ok(added)
    }

    /// Read the `.grd` file at `path` and add all of its messages.
    pub fn add_grd_file(&mut self, path: &Path) -> anyhow::Result<usize> {
        let messages = read_messages(path)?;
        let added = self
            .add_messages(&messages)
            .with_context(|| format!("Could not build ids from {}", path.display()))?;
        Ok(added)
    }

    fn insert(&mut self, source: u64, target: u64, text: &str) -> Result<bool> {
        match self.map.entries.get(&source) {
            None => {
                self.map.entries.insert(
                    source,
                    Remap {
                        target,
                        text: String::from(text),
                    },
                );
                Ok(true)
            }
            Some(existing) if existing.target == target => Ok(false),
            Some(existing)
                if self.known_duplicates.contains(text)
                    || self.known_duplicates.contains(&existing.text) =>
            {
                debug!(
                    "Keeping {source} -> {} for known duplicate {text:?}",
                    existing.target
                );
                Ok(false)
            }
            Some(existing) => Err(RebrandError::Collision {
                id: source,
                existing: existing.text.clone(),
                conflicting: String::from(text),
            }),
        }
    }

    pub fn build(self) -> IdMap {
        self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brand::BrandRule;
    use crate::grd::Placeholder;
    use pretty_assertions::assert_eq;

    fn message(name: &str, text: &str) -> GrdMessage {
        GrdMessage {
            name: String::from(name),
            text: String::from(text),
            placeholders: Vec::new(),
        }
    }

    #[test]
    fn test_skip_messages_without_marker() -> anyhow::Result<()> {
        let brands = BrandTable::default();
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        assert_eq!(builder.add_message(&message("IDS_TAB", "Open a new tab"))?, 0);
        assert!(builder.build().is_empty());
        Ok(())
    }

    #[test]
    fn test_maps_every_alternate_to_rebranded_id() -> anyhow::Result<()> {
        let brands = BrandTable::default();
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        let added = builder.add_message(&message("IDS_FAST", "  Brave is a fast browser\n"))?;
        assert_eq!(added, 3);

        let map = builder.build();
        let target = fingerprint("Brave is a fast browser");
        assert_eq!(target, 1993207185674016388);
        assert_eq!(
            map.iter().collect::<BTreeMap<_, _>>(),
            BTreeMap::from([
                (fingerprint("Chrome is a fast browser"), target),
                (fingerprint("Google Chrome is a fast browser"), target),
                (fingerprint("Chromium is a fast browser"), target),
            ])
        );
        assert_eq!(map.get(8726558809514789157), Some(target));
        assert_eq!(map.get(target), None);
        assert_eq!(
            map.remap(6288167287569502767).map(|r| r.text.as_str()),
            Some("Brave is a fast browser")
        );
        assert!(map.unstable_ids().is_empty());
        Ok(())
    }

    #[test]
    fn test_company_rule() -> anyhow::Result<()> {
        let brands = BrandTable::default();
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        builder.add_message(&message(
            "IDS_COPYRIGHT",
            "Copyright 2018 Brave Software Inc. All rights reserved.",
        ))?;
        let map = builder.build();
        assert_eq!(
            map.iter().collect::<Vec<_>>(),
            vec![(637533148618006607, 7486461649611739353)]
        );
        Ok(())
    }

    #[test]
    fn test_placeholders_are_part_of_the_text() -> anyhow::Result<()> {
        let brands = BrandTable::default();
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        builder.add_message(&GrdMessage {
            name: String::from("IDS_WELCOME"),
            text: String::from("Welcome to Brave"),
            placeholders: vec![Placeholder {
                name: String::from("version"),
                tail: String::from("!"),
            }],
        })?;
        let map = builder.build();
        assert_eq!(map.get(6549317090629789767), Some(2327559531712227547));
        assert_eq!(map.get(4539198826510016821), Some(2327559531712227547));
        assert_eq!(map.get(4470824917335391386), Some(2327559531712227547));
        Ok(())
    }

    #[test]
    fn test_same_message_twice_is_not_a_collision() -> anyhow::Result<()> {
        let brands = BrandTable::default();
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        let msg = message("IDS_FAST", "Brave is a fast browser");
        assert_eq!(builder.add_messages(&[msg.clone(), msg])?, 3);
        Ok(())
    }

    // Two different rebranded texts which reduce to the same upstream
    // string: "Brave" -> "Chrome" and "Chrome" is left as is.
    fn colliding_messages() -> Vec<GrdMessage> {
        vec![
            message("IDS_A", "Brave and Chrome"),
            message("IDS_B", "Chrome and Brave"),
        ]
    }

    fn swap_table() -> BrandTable {
        BrandTable::new(vec![BrandRule::new("Brave", &["Chrome"])])
    }

    #[test]
    fn test_collision_is_fatal() {
        let brands = swap_table();
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        let err = builder.add_messages(&colliding_messages()).unwrap_err();
        match err {
            RebrandError::Collision {
                id,
                existing,
                conflicting,
            } => {
                assert_eq!(id, fingerprint("Chrome and Chrome"));
                assert_eq!(existing, "Brave and Chrome");
                assert_eq!(conflicting, "Chrome and Brave");
            }
            err => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_known_duplicate_first_wins() -> anyhow::Result<()> {
        let brands = swap_table();
        let known = BTreeSet::from([String::from("Chrome and Brave")]);
        let mut builder = IdMapBuilder::new(&brands, &known);
        assert_eq!(builder.add_messages(&colliding_messages())?, 1);
        let map = builder.build();
        assert_eq!(
            map.get(fingerprint("Chrome and Chrome")),
            Some(fingerprint("Brave and Chrome"))
        );
        Ok(())
    }

    #[test]
    fn test_unstable_ids() -> anyhow::Result<()> {
        let brands = BrandTable::new(vec![BrandRule::new("Brave Brave", &["Brave"])]);
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        builder.add_messages(&[
            message("IDS_A", "Brave Brave"),
            message("IDS_B", "Brave Brave Brave"),
        ])?;
        let map = builder.build();
        // "Brave Brave" is the target of IDS_A and the upstream text of
        // IDS_B at the same time.
        assert_eq!(map.unstable_ids(), vec![fingerprint("Brave Brave")]);
        Ok(())
    }

    #[test]
    fn test_serialize_map() -> anyhow::Result<()> {
        let brands = BrandTable::default();
        let known = BTreeSet::new();
        let mut builder = IdMapBuilder::new(&brands, &known);
        builder.add_message(&message(
            "IDS_COPYRIGHT",
            "Copyright 2018 Brave Software Inc. All rights reserved.",
        ))?;
        let json = serde_json::to_value(builder.build())?;
        assert_eq!(
            json,
            serde_json::json!({
                "637533148618006607": {
                    "target": 7486461649611739353u64,
                    "text": "Copyright 2018 Brave Software Inc. All rights reserved.",
                }
            })
        );
        Ok(())
    }
}
