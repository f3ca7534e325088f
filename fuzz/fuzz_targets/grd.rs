#![no_main]

use grit_rebrand::grd::parse_messages;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|text: String| {
    if let Ok(messages) = parse_messages(&text) {
        for message in messages {
            let _ = message.display_text();
        }
    }
});
