use super::message::Message;

/// Estimate token count from text using the chars/4 heuristic.
///
/// Uses ceiling division to avoid underestimating by a fraction. The scheme
/// is deterministic and monotonic with text length, which is all the trimmer
/// relies on; swap this function to change the estimation scheme without
/// touching eviction policy.
pub fn estimate_tokens(text: &str) -> u64 {
    let chars = text.chars().count() as u64;
    chars.div_ceil(4)
}

/// Estimate total tokens for a message history.
///
/// Sums `estimate_tokens` over message contents. No per-message framing
/// overhead is added: the trimming ceiling is defined over content alone.
pub fn estimate_history_tokens(messages: &[Message]) -> u64 {
    messages
        .iter()
        .map(|msg| estimate_tokens(&msg.content))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::Role;

    // ── estimate_tokens ─────────────────────────────────────────────────────

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn single_char_returns_one() {
        assert_eq!(estimate_tokens("a"), 1);
    }

    #[test]
    fn four_chars_returns_one() {
        assert_eq!(estimate_tokens("abcd"), 1);
    }

    #[test]
    fn five_chars_returns_two() {
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn multibyte_unicode_counts_chars_not_bytes() {
        // 4 unicode characters, each multi-byte
        let text = "\u{1F600}\u{1F601}\u{1F602}\u{1F603}";
        assert_eq!(text.chars().count(), 4);
        assert_eq!(estimate_tokens(text), 1);
    }

    #[test]
    fn longer_text_estimate() {
        // "Hello, world!" is 13 chars => ceil(13/4) = 4
        assert_eq!(estimate_tokens("Hello, world!"), 4);
    }

    #[test]
    fn monotonic_with_length() {
        let short = "a".repeat(10);
        let long = "a".repeat(100);
        assert!(estimate_tokens(&long) > estimate_tokens(&short));
    }

    // ── estimate_history_tokens ─────────────────────────────────────────────

    #[test]
    fn empty_history_returns_zero() {
        assert_eq!(estimate_history_tokens(&[]), 0);
    }

    #[test]
    fn history_sums_content_only() {
        let messages = vec![
            Message::new(Role::System, "abcd"),     // 1
            Message::new(Role::User, "abcdefgh"),   // 2
            Message::new(Role::Assistant, "abcde"), // 2
        ];
        assert_eq!(estimate_history_tokens(&messages), 5);
    }
}
