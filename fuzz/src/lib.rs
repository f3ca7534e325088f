use arbitrary::Arbitrary;
use grit_rebrand::brand::{BrandRule, BrandTable};
use grit_rebrand::fingerprint::fingerprint;
use grit_rebrand::grd::GrdMessage;
use grit_rebrand::{IdMap, IdMapBuilder};
use quick_xml::escape::escape;
use std::collections::BTreeSet;

/// Wrapper struct for generating arbitrary `.grd` messages.
#[derive(Arbitrary, Debug)]
pub struct Message {
    pub name: String,
    pub text: String,
}

impl From<Message> for GrdMessage {
    fn from(other: Message) -> GrdMessage {
        GrdMessage {
            name: other.name,
            text: other.text,
            placeholders: Vec::new(),
        }
    }
}

/// Generate a random id map for fuzzing.
///
/// Collisions are expected with random input and simply end the
/// map early.
pub fn create_map(messages: Vec<Message>) -> IdMap {
    let brands = BrandTable::new(vec![BrandRule::new("Brave", &["Chrome", "Chromium"])]);
    let known = BTreeSet::new();
    let mut builder = IdMapBuilder::new(&brands, &known);
    for message in messages {
        if builder.add_message(&message.into()).is_err() {
            break;
        }
    }
    builder.build()
}

/// Build a translation bundle with the ids of `texts`.
pub fn create_bundle(texts: &[(String, String)]) -> String {
    let mut content = String::from("<translationbundle lang=\"xx\">\n");
    for (source, translation) in texts {
        content.push_str(&format!(
            "<translation id=\"{}\">{}</translation>\n",
            fingerprint(source),
            escape(translation)
        ));
    }
    content.push_str("</translationbundle>\n");
    content
}
