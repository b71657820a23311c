use super::message::PersonaHistory;
use super::tokens::estimate_history_tokens;

/// What a trimming pass did to a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrimOutcome {
    /// Conversational entries evicted, oldest first.
    pub evicted: usize,
    /// Still over budget after eviction: the system message alone exceeds
    /// the ceiling. The history passes through unchanged beyond the eviction
    /// and the backend gets to accept or reject it.
    pub over_budget: bool,
}

/// Evict oldest non-system entries until the history fits `max_tokens`.
///
/// The system message (element 0) is never evicted. FIFO eviction keeps the
/// most recent turns. Runs once per turn on the speaking persona's history;
/// the listener's mirror is trimmed lazily on its own turn. Never fails.
pub fn trim_to_budget(history: &mut PersonaHistory, max_tokens: u64) -> TrimOutcome {
    let mut evicted = 0;
    while estimate_history_tokens(history.messages()) > max_tokens {
        if history.evict_oldest().is_none() {
            break;
        }
        evicted += 1;
    }

    let over_budget = estimate_history_tokens(history.messages()) > max_tokens;
    TrimOutcome {
        evicted,
        over_budget,
    }
}
