use super::dedupe::dedupe_sentences;
use super::message::{Message, PersonaConfig, PersonaHistory, Role};
use super::transcript::{Transcript, TranscriptEntry};
use super::trim::trim_to_budget;
use crate::error::ProviderError;
use crate::providers::{BackendOptions, Provider};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Literal sentinel a model appends to its response to end the conversation.
pub const END_MARKER: &str = "{{end_conversation}}";

/// Tagged identity of the two conversational participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    One,
    Two,
}

impl Persona {
    pub fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// 1-based number used in transcript labels.
    pub fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Token ceiling applied to the speaking persona's history before each
/// backend call. Disabled budgeting sends histories untrimmed.
#[derive(Debug, Clone, Copy)]
pub struct TokenBudget {
    pub enabled: bool,
    pub max_tokens: u64,
}

/// Why a run loop returned without a provider error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopCause {
    /// A response ended with the stop marker.
    Marker,
    /// The configured exchange count was reached.
    Limit,
    /// Cancellation was observed between turns.
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineState {
    Speaking(Persona),
    Stopped,
}

/// One completed turn, as handed to run-loop observers.
#[derive(Debug, Clone)]
pub struct TurnRecord {
    pub persona: Persona,
    pub model: String,
    /// Deduplicated response text.
    pub response: String,
    /// The transcript form: `"<MODEL> (AI <n>):\n<response>"`.
    pub formatted: String,
}

struct PersonaSide {
    config: PersonaConfig,
    history: PersonaHistory,
}

/// The turn engine: alternates two personas, mirrors every utterance into
/// both histories, trims the speaker's context to budget, filters repeated
/// sentences out of each response, and accumulates the outward transcript.
///
/// One turn executes fully before the next begins; the provider call is the
/// only suspension point, so no two backend calls are ever in flight for the
/// same conversation.
pub struct Conversation {
    provider: Arc<dyn Provider>,
    sides: [PersonaSide; 2],
    budget: TokenBudget,
    options: BackendOptions,
    transcript: Transcript,
    state: EngineState,
    current_message: String,
    exchanges: u64,
}

impl Conversation {
    /// Seed both histories with their system prompts. Persona one speaks
    /// first, responding to `initial_message`.
    pub fn new(
        provider: Arc<dyn Provider>,
        configs: [PersonaConfig; 2],
        budget: TokenBudget,
        options: BackendOptions,
        initial_message: impl Into<String>,
    ) -> Self {
        let [one, two] = configs;
        let sides = [
            PersonaSide {
                history: PersonaHistory::seeded(&one.system_prompt),
                config: one,
            },
            PersonaSide {
                history: PersonaHistory::seeded(&two.system_prompt),
                config: two,
            },
        ];
        Self {
            provider,
            sides,
            budget,
            options,
            transcript: Transcript::default(),
            state: EngineState::Speaking(Persona::One),
            current_message: initial_message.into(),
            exchanges: 0,
        }
    }

    /// Execute a single turn. Returns `Ok(None)` once stopped.
    ///
    /// A provider failure propagates without being retried; every turn
    /// completed before it remains in the transcript.
    pub async fn step(&mut self) -> Result<Option<TurnRecord>, ProviderError> {
        let EngineState::Speaking(persona) = self.state else {
            return Ok(None);
        };
        let incoming = std::mem::take(&mut self.current_message);

        // Mirror the incoming message into both histories at the moment it
        // is consumed: the speaker reads it as user input, the other side
        // keeps it as its own assistant entry (at the first turn, the
        // external initial message plays that part). One mirrored pair per
        // turn is what keeps the two histories pairwise symmetric.
        self.sides[persona.index()]
            .history
            .push(Role::User, incoming.clone());
        self.sides[persona.other().index()]
            .history
            .push(Role::Assistant, incoming);

        if self.budget.enabled {
            let outcome = trim_to_budget(
                &mut self.sides[persona.index()].history,
                self.budget.max_tokens,
            );
            if outcome.over_budget {
                tracing::warn!(
                    persona = persona.number(),
                    max_tokens = self.budget.max_tokens,
                    "system prompt alone exceeds the token budget; sending oversized history"
                );
            } else if outcome.evicted > 0 {
                tracing::debug!(
                    persona = persona.number(),
                    evicted = outcome.evicted,
                    "evicted oldest turns to fit token budget"
                );
            }
        }

        let (model, raw) = {
            let side = &self.sides[persona.index()];
            let raw = self
                .provider
                .chat(&side.config.model, side.history.messages(), &self.options)
                .await?;
            (side.config.model.clone(), raw)
        };

        let response = dedupe_sentences(&raw);
        let formatted = format!(
            "{} (AI {}):\n{}",
            model.to_uppercase(),
            persona.number(),
            response
        );
        self.transcript.push(TranscriptEntry::assistant(formatted.clone()));

        // The response is not written into any history here: it becomes the
        // next turn's incoming message and is mirrored when that turn
        // consumes it.
        self.exchanges += 1;
        self.current_message = response.clone();
        self.state = if response.trim().ends_with(END_MARKER) {
            tracing::info!(persona = persona.number(), "stop marker received");
            EngineState::Stopped
        } else {
            EngineState::Speaking(persona.other())
        };

        Ok(Some(TurnRecord {
            persona,
            model,
            response,
            formatted,
        }))
    }

    /// Loop `step` until the stop marker fires, `num_exchanges` turns have
    /// completed (`0` meaning unbounded), or `cancel` is observed between
    /// turns. An in-flight backend call always runs to completion or failure
    /// before cancellation is honored.
    pub async fn run<F>(
        &mut self,
        num_exchanges: u64,
        cancel: &CancellationToken,
        mut on_turn: F,
    ) -> Result<StopCause, ProviderError>
    where
        F: FnMut(&TurnRecord),
    {
        let mut completed = 0;
        while num_exchanges == 0 || completed < num_exchanges {
            if cancel.is_cancelled() {
                return Ok(StopCause::Cancelled);
            }
            match self.step().await? {
                Some(record) => {
                    on_turn(&record);
                    completed += 1;
                }
                None => return Ok(StopCause::Marker),
            }
            if self.is_stopped() {
                return Ok(StopCause::Marker);
            }
        }
        Ok(StopCause::Limit)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Turns completed so far.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }

    pub fn is_stopped(&self) -> bool {
        self.state == EngineState::Stopped
    }

    /// The persona that will speak next, while the conversation is live.
    pub fn current_speaker(&self) -> Option<Persona> {
        match self.state {
            EngineState::Speaking(persona) => Some(persona),
            EngineState::Stopped => None,
        }
    }

    /// A persona's full message history, system message first.
    pub fn history(&self, persona: Persona) -> &[Message] {
        self.sides[persona.index()].history.messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_other_alternates() {
        assert_eq!(Persona::One.other(), Persona::Two);
        assert_eq!(Persona::Two.other(), Persona::One);
        assert_eq!(Persona::One.other().other(), Persona::One);
    }

    #[test]
    fn persona_numbers_are_one_based() {
        assert_eq!(Persona::One.number(), 1);
        assert_eq!(Persona::Two.number(), 2);
    }
}
