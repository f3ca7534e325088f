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

//! Translation bundles (`.xtb` files).

use log::debug;

use crate::document::{Document, Element};
use crate::error::{RebrandError, Result};
use crate::fingerprint::FINGERPRINT_MASK;
use crate::idmap::IdMap;

/// Prolog written in front of every rewritten bundle.
pub const PREAMBLE: &str = "<?xml version=\"1.0\" ?>\n<!DOCTYPE translationbundle>\n";

/// A `<translation>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub id: u64,
    /// The raw markup of the translation, placeholders included.
    pub text: String,
}

/// A parsed translation bundle.
///
/// Translations are the `<translation>` children of the root element.
/// Everything else in the file is carried along untouched.
#[derive(Debug)]
pub struct TranslationBundle<'a> {
    doc: Document<'a>,
    entries: Vec<(Element, u64)>,
}

impl<'a> TranslationBundle<'a> {
    pub fn parse(content: &'a str) -> Result<Self> {
        let doc = Document::parse(content)?;
        let entries = doc
            .children_named(doc.root(), "translation")
            .into_iter()
            .map(|element| Ok((element, parse_id(&doc.required_attribute(element, "id")?)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { doc, entries })
    }

    /// The ids of all translations, in file order.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.entries.iter().map(|(_, id)| *id)
    }

    /// All translations, in file order.
    pub fn translations(&self) -> Result<Vec<Translation>> {
        self.entries
            .iter()
            .map(|(element, id)| {
                Ok(Translation {
                    id: *id,
                    text: self.doc.inner_xml(*element)?,
                })
            })
            .collect()
    }

    /// Rewrite every id found in `map`.
    ///
    /// Returns the `(old, new)` pairs which were replaced. The bundle
    /// only needs to be written back if this is non-empty.
    pub fn remap(&mut self, map: &IdMap) -> Result<Vec<(u64, u64)>> {
        let mut replaced = Vec::new();
        for (element, id) in &mut self.entries {
            if let Some(target) = map.get(*id) {
                debug!("Replacing \"{id}\" with \"{target}\"");
                self.doc
                    .set_attribute(*element, "id", &target.to_string())?;
                replaced.push((*id, target));
                *id = target;
            }
        }
        Ok(replaced)
    }

    /// Serialize the bundle with the standard [`PREAMBLE`].
    pub fn to_xml(&self) -> Result<String> {
        self.doc.to_xml_with_preamble(PREAMBLE)
    }
}

fn parse_id(id: &str) -> Result<u64> {
    match id.parse::<u64>() {
        Ok(id) if id & !FINGERPRINT_MASK == 0 => Ok(id),
        _ => Err(RebrandError::Malformed(format!(
            "invalid translation id {id:?}"
        ))),
    }
}

/// Rewrite the ids of the bundle in `content`.
///
/// Returns the new file content together with the replaced ids, or
/// `None` if no id was found in `map`.
pub fn rewrite_bundle(content: &str, map: &IdMap) -> Result<Option<(String, Vec<(u64, u64)>)>> {
    let mut bundle = TranslationBundle::parse(content)?;
    let replaced = bundle.remap(map)?;
    if replaced.is_empty() {
        return Ok(None);
    }
    Ok(Some((bundle.to_xml()?, replaced)))
}
