#![no_main]

use grit_rebrand::xtb::{rewrite_bundle, TranslationBundle};
use grit_rebrand_fuzz::{create_bundle, create_map, Message};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|input: (Vec<Message>, Vec<(String, String)>)| {
    let (messages, texts) = input;
    let map = create_map(messages);
    let content = create_bundle(&texts);

    let before = TranslationBundle::parse(&content).expect("Failed to parse bundle");
    let old_ids = before.ids().collect::<Vec<_>>();
    let Some((rewritten, replaced)) =
        rewrite_bundle(&content, &map).expect("Failed to rewrite bundle")
    else {
        assert!(old_ids.iter().all(|id| map.get(*id).is_none()));
        return;
    };

    let after = TranslationBundle::parse(&rewritten).expect("Failed to parse rewritten bundle");
    let expected = old_ids
        .iter()
        .map(|id| map.get(*id).unwrap_or(*id))
        .collect::<Vec<_>>();
    assert_eq!(after.ids().collect::<Vec<_>>(), expected);
    assert_eq!(
        replaced.len(),
        old_ids.iter().filter(|id| map.get(**id).is_some()).count()
    );
});
