// SPDX-FileCopyrightText: 2026 Ollashim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Length-based token estimation.
//!
//! The backend does not report usage in a form the shim forwards, so token
//! counts are approximated as one token per four characters. This is an
//! estimate, not a tokenizer count; swapping in a real tokenizer would change
//! the usage numbers callers observe.

/// Characters per estimated token.
const CHARS_PER_TOKEN: usize = 4;

/// Returns `max(1, chars / 4)` where `chars` counts Unicode scalar values.
pub fn estimate_tokens(text: &str) -> u32 {
    let tokens = text.chars().count() / CHARS_PER_TOKEN;
    u32::try_from(tokens).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_text_is_one_token() {
        assert_eq!(estimate_tokens(""), 1);
    }

    #[test]
    fn hello_world_is_two_tokens() {
        assert_eq!(estimate_tokens("Hello World"), 2);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 8 characters, 16 bytes.
        assert_eq!(estimate_tokens("ññññññññ"), 2);
    }

    proptest! {
        #[test]
        fn estimate_matches_floor_division(s in ".{0,256}") {
            let len = s.chars().count();
            prop_assert_eq!(estimate_tokens(&s) as usize, std::cmp::max(1, len / 4));
        }

        #[test]
        fn estimate_is_never_zero(s in ".*") {
            prop_assert!(estimate_tokens(&s) >= 1);
        }
    }
}
