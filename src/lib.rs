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

//! Helpers for rebranding the string resources of a Chromium fork.
//!
//! Translations in `.xtb` files are keyed by a fingerprint of the
//! English text. Renaming the product changes that text, and with it
//! every id. The functions here compute the old and new ids from the
//! rebranded `.grd` files and move existing translations over to the
//! new ids, so they are not lost when the product name changes:
//!
//! 1. [`IdMapBuilder`] reads the `.grd` messages containing a brand
//!    marker and maps the ids of the upstream texts to the ids of the
//!    rebranded texts.
//! 2. [`rewrite_trees`] applies that [`IdMap`] to every translation
//!    bundle below one or more directories.
//!
//! [`strings::sync_strings_file`] additionally keeps an Android
//! `strings.xml` file in line with its `.grd` file.

pub mod brand;
pub mod config;
pub mod document;
pub mod error;
pub mod fingerprint;
pub mod grd;
pub mod idmap;
pub mod rewrite;
pub mod strings;
pub mod xtb;

use std::path::PathBuf;

pub use crate::error::{RebrandError, Result};
pub use crate::idmap::{IdMap, IdMapBuilder};
pub use crate::rewrite::{rewrite_trees, RewriteSummary};

use crate::config::Config;
use log::info;

/// Build one id map from all `grd_files`, in order.
pub fn build_id_map(grd_files: &[PathBuf], config: &Config) -> anyhow::Result<IdMap> {
    let brands = config.brand_table();
    let mut builder = IdMapBuilder::new(&brands, &config.known_duplicates);
    for path in grd_files {
        let added = builder.add_grd_file(path)?;
        info!("Found {added} ids to replace in {}", path.display());
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::fingerprint;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn grd(messages: &[(&str, &str)]) -> String {
        let mut content = String::from("<grit><release seq=\"1\"><messages>\n");
        for (name, text) in messages {
            content.push_str(&format!("<message name=\"{name}\">{text}</message>\n"));
        }
        content.push_str("</messages></release></grit>\n");
        content
    }

    #[test]
    fn test_build_id_map_from_several_files() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let first = tmpdir.path().join("first.grd");
        let second = tmpdir.path().join("second.grd");
        fs::write(&first, grd(&[("IDS_A", "Brave"), ("IDS_B", "Tabs")]))?;
        fs::write(&second, grd(&[("IDS_C", "Brave Software")]))?;

        let map = build_id_map(&[first, second], &Config::default())?;
        assert_eq!(map.len(), 4);
        assert_eq!(map.get(fingerprint("Chromium")), Some(fingerprint("Brave")));
        assert_eq!(
            map.get(fingerprint("Google")),
            Some(fingerprint("Brave Software"))
        );
        Ok(())
    }

    #[test]
    fn test_collision_aborts_build() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let grd_path = tmpdir.path().join("strings.grd");
        fs::write(
            &grd_path,
            grd(&[("IDS_A", "Brave and Chrome"), ("IDS_B", "Chrome and Brave")]),
        )?;
        let config = Config::parse("[[brands]]\nmarker = \"Brave\"\nalternates = [\"Chrome\"]\n")?;

        let err = build_id_map(&[grd_path], &config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RebrandError>(),
            Some(RebrandError::Collision { .. })
        ));
        Ok(())
    }
}
