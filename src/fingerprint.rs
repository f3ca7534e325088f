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

//! Message fingerprints as used for grit translation ids.

use md5::{Digest, Md5};

/// Fingerprints are non-negative 63-bit values.
pub const FINGERPRINT_MASK: u64 = 0x7fff_ffff_ffff_ffff;

/// Compute the translation id of `text`.
///
/// This is the first half of the MD5 digest of the UTF-8 bytes, read
/// as a big-endian integer and masked to 63 bits. It matches the ids
/// grit writes into `.xtb` files for messages without a meaning.
///
/// # Examples
///
/// ```
/// use grit_rebrand::fingerprint::fingerprint;
///
/// assert_eq!(fingerprint("Hello"), 800120468867715734);
/// ```
pub fn fingerprint(text: &str) -> u64 {
    let digest = Md5::digest(text.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head) & FINGERPRINT_MASK
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fingerprint_empty() {
        assert_eq!(fingerprint(""), 6061155539545534980);
    }

    #[test]
    fn test_fingerprint_known_ids() {
        assert_eq!(fingerprint("Brave"), 939305735877869636);
        assert_eq!(fingerprint("Chrome"), 1759842336958782510);
        assert_eq!(
            fingerprint("Welcome to BraveVERSION!"),
            2327559531712227547
        );
    }

    #[test]
    fn test_fingerprint_fits_in_63_bits() {
        for text in ["", "a", "Brave", "Google Chrome", "日本語"] {
            assert_eq!(fingerprint(text) & !FINGERPRINT_MASK, 0);
        }
    }
}
