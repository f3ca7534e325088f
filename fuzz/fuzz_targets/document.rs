#![no_main]

use grit_rebrand::document::Document;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|text: String| {
    let Ok(doc) = Document::parse(&text) else {
        return;
    };
    let xml = doc.to_xml().expect("Failed to write parsed document");
    // Writing must be stable: a second round trip changes nothing.
    let reparsed = Document::parse(&xml).expect("Failed to parse written document");
    assert_eq!(reparsed.to_xml().expect("Failed to write document"), xml);
});
