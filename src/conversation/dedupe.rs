use std::collections::HashSet;

/// Collapse exact repeated sentences inside a single response.
///
/// Splits on the terminators `.`, `!`, `?` (a run of terminators ends one
/// segment, so ellipses stay intact; trailing content without a terminator is
/// the final segment), drops segments whose whitespace-trimmed text exactly
/// matches an earlier one, and rejoins survivors with a single space. This is
/// heuristic cleanup for models that stutter, not semantic deduplication:
/// comparison is case-sensitive and near-duplicates with different
/// punctuation are left alone. Never fails; unparseable text passes through.
pub fn dedupe_sentences(text: &str) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept: Vec<&str> = Vec::new();

    for segment in split_sentences(text) {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed) {
            kept.push(trimmed);
        }
    }

    kept.join(" ")
}

/// Borrowing sentence split: each slice ends after the last terminator of a
/// terminator run, except a possible unterminated final slice.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut prev_was_terminator = false;

    for (idx, ch) in text.char_indices() {
        let is_terminator = matches!(ch, '.' | '!' | '?');
        if prev_was_terminator && !is_terminator {
            segments.push(&text[start..idx]);
            start = idx;
        }
        prev_was_terminator = is_terminator;
    }
    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_exact_duplicate_sentence() {
        assert_eq!(dedupe_sentences("A. A. B."), "A. B.");
    }

    #[test]
    fn preserves_first_occurrence_order() {
        assert_eq!(
            dedupe_sentences("One. Two! One. Three? Two!"),
            "One. Two! Three?"
        );
    }

    #[test]
    fn idempotent() {
        let once = dedupe_sentences("A. A. B. B. C.");
        assert_eq!(dedupe_sentences(&once), once);
    }

    #[test]
    fn text_without_terminator_is_kept_whole() {
        assert_eq!(dedupe_sentences("no terminator here"), "no terminator here");
    }

    #[test]
    fn trailing_unterminated_segment_survives() {
        assert_eq!(
            dedupe_sentences("All done. {{end_conversation}}"),
            "All done. {{end_conversation}}"
        );
    }

    #[test]
    fn case_sensitive_comparison() {
        assert_eq!(dedupe_sentences("Hello. hello."), "Hello. hello.");
    }

    #[test]
    fn different_punctuation_not_merged() {
        assert_eq!(dedupe_sentences("Wait! Wait."), "Wait! Wait.");
    }

    #[test]
    fn terminator_runs_stay_attached() {
        assert_eq!(dedupe_sentences("Well... maybe. Well..."), "Well... maybe.");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(dedupe_sentences(""), "");
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert_eq!(dedupe_sentences("   \n  "), "");
    }

    #[test]
    fn duplicates_across_newlines_collapse() {
        assert_eq!(
            dedupe_sentences("I agree.\nI agree.\nLet us continue."),
            "I agree. Let us continue."
        );
    }

    #[test]
    fn multibyte_text_splits_cleanly() {
        assert_eq!(
            dedupe_sentences("Caf\u{e9} closed. Caf\u{e9} closed. Shame!"),
            "Caf\u{e9} closed. Shame!"
        );
    }
}
