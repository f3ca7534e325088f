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

//! Keep Android `strings.xml` values in line with a `.grd` file.
//!
//! Every `<string name="foo">` corresponds to the message
//! `IDS_FOO`. When the trimmed texts differ, the value from the
//! `.grd` file wins.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::Context;
use log::info;

use crate::document::Document;
use crate::error::{RebrandError, Result};
use crate::grd::{read_messages, GrdMessage};

/// A string whose value was replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringUpdate {
    pub name: String,
    pub value: String,
}

/// Name of the message backing the Android string `name`.
pub fn message_name(name: &str) -> String {
    format!("IDS_{}", name.to_uppercase())
}

/// Update the string resource in `content` from `messages`.
///
/// Returns the new content and the updated strings, or `None` if all
/// strings already match. Strings named in `skip` are left alone.
pub fn sync_strings(
    content: &str,
    messages: &[GrdMessage],
    skip: &BTreeSet<String>,
) -> Result<Option<(String, Vec<StringUpdate>)>> {
    let mut by_name = HashMap::new();
    for message in messages {
        by_name.entry(message.name.as_str()).or_insert(message);
    }

    let mut doc = Document::parse(content)?;
    let mut edits = Vec::new();
    for element in doc.children_named(doc.root(), "string") {
        let name = doc.required_attribute(element, "name")?;
        if skip.contains(&name) {
            continue;
        }
        let wanted = message_name(&name);
        let message = by_name
            .get(wanted.as_str())
            .ok_or_else(|| RebrandError::LookupMiss {
                string: name.clone(),
                message: wanted,
            })?;
        let value = message.text.trim();
        if doc.text(element)?.trim() != value {
            edits.push((
                element,
                StringUpdate {
                    name,
                    value: String::from(value),
                },
            ));
        }
    }

    if edits.is_empty() {
        return Ok(None);
    }
    // Later elements first, so the earlier handles stay valid.
    for (element, update) in edits.iter().rev() {
        doc.set_text(*element, &update.value)?;
    }
    let updates = edits.into_iter().map(|(_, update)| update).collect();
    Ok(Some((doc.to_xml()?, updates)))
}

/// Sync the `strings.xml` file at `strings_path` from the `.grd` file
/// at `grd_path`, writing it back unless `dry_run` is set.
pub fn sync_strings_file(
    strings_path: &Path,
    grd_path: &Path,
    skip: &BTreeSet<String>,
    dry_run: bool,
) -> anyhow::Result<Vec<StringUpdate>> {
    let messages = read_messages(grd_path)?;
    let content = fs::read_to_string(strings_path)
        .with_context(|| format!("Could not read {}", strings_path.display()))?;
    let synced = sync_strings(&content, &messages, skip)
        .with_context(|| format!("Could not sync {}", strings_path.display()))?;

    let Some((content, updates)) = synced else {
        return Ok(Vec::new());
    };
    for update in &updates {
        info!(
            "String \"{}\" updated with value \"{}\"",
            update.name, update.value
        );
    }
    if !dry_run {
        fs::write(strings_path, content)
            .with_context(|| format!("Could not write {}", strings_path.display()))?;
    }
    Ok(updates)
}
