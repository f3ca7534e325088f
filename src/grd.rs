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

//! Messages from grit resource definition (`.grd`) files.

use std::fs;
use std::path::Path;

use anyhow::Context;

use crate::document::Document;
use crate::error::{RebrandError, Result};

/// A `<ph>` placeholder and the text following it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub tail: String,
}

/// A `<message>` from the `<messages>` section of a `.grd` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrdMessage {
    pub name: String,
    /// Text before the first child element.
    pub text: String,
    pub placeholders: Vec<Placeholder>,
}

impl GrdMessage {
    /// The text translation ids are computed from.
    ///
    /// Each placeholder contributes its name in upper case followed by
    /// its tail. Surrounding whitespace is removed.
    ///
    /// ```
    /// use grit_rebrand::grd::{GrdMessage, Placeholder};
    ///
    /// let message = GrdMessage {
    ///     name: "IDS_WELCOME".into(),
    ///     text: "\n  Welcome to Brave ".into(),
    ///     placeholders: vec![Placeholder { name: "version".into(), tail: "!\n".into() }],
    /// };
    /// assert_eq!(message.display_text(), "Welcome to Brave VERSION!");
    /// ```
    pub fn display_text(&self) -> String {
        let mut text = self.text.clone();
        for placeholder in &self.placeholders {
            text.push_str(&placeholder.name.to_uppercase());
            text.push_str(&placeholder.tail);
        }
        String::from(text.trim())
    }
}

/// Parse the messages of a `.grd` document.
///
/// Messages are read from the first `<release>` below the root and
/// its first `<messages>` child. Only direct children are considered,
/// so messages nested in `<if>` blocks are not included.
pub fn parse_messages(content: &str) -> Result<Vec<GrdMessage>> {
    let doc = Document::parse(content)?;
    let release = doc
        .child(doc.root(), "release")
        .ok_or_else(|| RebrandError::Malformed(String::from("missing <release> element")))?;
    let messages = doc
        .child(release, "messages")
        .ok_or_else(|| RebrandError::Malformed(String::from("missing <messages> element")))?;

    doc.children_named(messages, "message")
        .into_iter()
        .map(|message| {
            let placeholders = doc
                .children_named(message, "ph")
                .into_iter()
                .map(|ph| {
                    Ok(Placeholder {
                        name: doc.required_attribute(ph, "name")?,
                        tail: doc.tail(ph)?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(GrdMessage {
                name: doc.required_attribute(message, "name")?,
                text: doc.text(message)?,
                placeholders,
            })
        })
        .collect()
}

/// Read and parse the messages of the `.grd` file at `path`.
pub fn read_messages(path: &Path) -> anyhow::Result<Vec<GrdMessage>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let messages =
        parse_messages(&content).with_context(|| format!("Could not parse {}", path.display()))?;
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GRD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<grit latest_public_release="0" current_release="1">
  <outputs>
    <output filename="generated_resources.h" type="rc_header" />
  </outputs>
  <release seq="1">
    <messages fallback_to_english="true">
      <message name="IDS_PLAIN" desc="No brand here">
        Open a new tab
      </message>
      <message name="IDS_WELCOME" desc="Greeting">
        Welcome to Brave <ph name="version">$1<ex>1.0</ex></ph>, enjoy &amp; browse!
      </message>
      <if expr="is_android">
        <message name="IDS_NESTED" desc="Skipped">Brave nested</message>
      </if>
      <message name="IDS_LEADING_PH" desc="Starts with a placeholder"><ph name="count" /> Brave tabs</message>
    </messages>
  </release>
</grit>
"#;

    #[test]
    fn test_parse_messages() -> anyhow::Result<()> {
        let messages = parse_messages(GRD)?;
        assert_eq!(
            messages
                .iter()
                .map(|msg| msg.name.as_str())
                .collect::<Vec<_>>(),
            &["IDS_PLAIN", "IDS_WELCOME", "IDS_LEADING_PH"]
        );
        assert_eq!(messages[0].display_text(), "Open a new tab");
        assert_eq!(
            messages[1].placeholders,
            vec![Placeholder {
                name: String::from("version"),
                tail: String::from(", enjoy & browse!\n      "),
            }]
        );
        assert_eq!(
            messages[1].display_text(),
            "Welcome to Brave VERSION, enjoy & browse!"
        );
        assert_eq!(messages[2].text, "");
        assert_eq!(messages[2].display_text(), "COUNT Brave tabs");
        Ok(())
    }

    #[test]
    fn test_missing_release() {
        let err = parse_messages("<grit><messages/></grit>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_missing_messages() {
        let err = parse_messages("<grit><release/></grit>").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_message_without_name() {
        let err = parse_messages(
            "<grit><release><messages><message>Brave</message></messages></release></grit>",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RebrandError::MissingAttribute {
                attribute: "name",
                ..
            }
        ));
    }

    #[test]
    fn test_placeholder_without_name() {
        let err = parse_messages(
            "<grit><release><messages><message name=\"A\">Brave <ph/></message></messages></release></grit>",
        )
        .unwrap_err();
        assert!(matches!(err, RebrandError::MissingAttribute { ref element, .. } if element == "ph"));
    }

    #[test]
    fn test_read_messages_reports_path() -> anyhow::Result<()> {
        let tmpdir = tempfile::tempdir()?;
        let path = tmpdir.path().join("broken.grd");
        fs::write(&path, "<grit><release>")?;
        let err = read_messages(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.grd"));
        assert!(err
            .downcast_ref::<RebrandError>()
            .is_some_and(RebrandError::is_malformed));
        Ok(())
    }
}
