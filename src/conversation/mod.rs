pub mod dedupe;
pub mod engine;
pub mod message;
pub mod tokens;
pub mod transcript;
pub mod trim;

pub use dedupe::dedupe_sentences;
pub use engine::{Conversation, END_MARKER, Persona, StopCause, TokenBudget, TurnRecord};
pub use message::{Message, PersonaConfig, PersonaHistory, Role};
pub use tokens::{estimate_history_tokens, estimate_tokens};
pub use transcript::{RunMetadata, Transcript, TranscriptEntry, write_log};
pub use trim::{TrimOutcome, trim_to_budget};
