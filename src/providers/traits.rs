use crate::conversation::Message;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Free-form backend tuning parameters (temperature, top_p, ...) forwarded
/// verbatim to the model server under its `options` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendOptions(pub serde_json::Map<String, serde_json::Value>);

impl BackendOptions {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A model-serving backend that completes a persona's full message history.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send the ordered `messages` to `model` and return the raw response
    /// text. An empty-but-successful completion is `Ok("")`; the error
    /// variants are reserved for transport, HTTP, and decode failures.
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: &BackendOptions,
    ) -> Result<String, ProviderError>;

    /// Model names the backend currently serves.
    async fn list_models(&self) -> Result<Vec<String>, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_are_empty() {
        assert!(BackendOptions::default().is_empty());
    }

    #[test]
    fn options_deserialize_from_free_form_table() {
        let options: BackendOptions =
            serde_json::from_str(r#"{"temperature": 0.8, "top_p": 0.9}"#).unwrap();
        assert!(!options.is_empty());
        assert_eq!(options.0["temperature"], serde_json::json!(0.8));
    }
}
