use crate::conversation::Message;
use crate::error::ProviderError;
use crate::providers::traits::{BackendOptions, Provider};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Client for an Ollama-compatible model server.
pub struct OllamaProvider {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(300)) // Ollama runs locally, may be slow
                .connect_timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        options: &BackendOptions,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/api/chat", self.base_url);
        let request = ChatRequest {
            model,
            messages,
            stream: false,
            options: (!options.is_empty()).then_some(&options.0),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(parsed.message.content)
    }

    async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Role;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn history() -> Vec<Message> {
        vec![
            Message::new(Role::System, "You are terse."),
            Message::new(Role::User, "hello"),
        ]
    }

    #[test]
    fn strips_trailing_slash() {
        let provider = OllamaProvider::new("http://localhost:11434/");
        assert_eq!(provider.endpoint(), "http://localhost:11434");
    }

    #[test]
    fn request_omits_empty_options() {
        let messages = history();
        let request = ChatRequest {
            model: "llama3",
            messages: &messages,
            stream: false,
            options: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("options"));
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("\"stream\":false"));
    }

    #[test]
    fn request_serializes_options_verbatim() {
        let messages = history();
        let mut map = serde_json::Map::new();
        map.insert("temperature".into(), serde_json::json!(0.8));
        let request = ChatRequest {
            model: "llama3",
            messages: &messages,
            stream: false,
            options: Some(&map),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"temperature\":0.8"));
    }

    #[tokio::test]
    async fn chat_returns_response_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3",
                "stream": false,
                "messages": [
                    {"role": "system", "content": "You are terse."},
                    {"role": "user", "content": "hello"},
                ],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"role": "assistant", "content": "hi there"},
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri());
        let content = provider
            .chat("llama3", &history(), &BackendOptions::default())
            .await
            .unwrap();

        assert_eq!(content, "hi there");
    }

    #[tokio::test]
    async fn empty_content_is_success_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "message": {"role": "assistant", "content": ""},
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri());
        let content = provider
            .chat("llama3", &history(), &BackendOptions::default())
            .await
            .unwrap();

        assert_eq!(content, "");
    }

    #[tokio::test]
    async fn non_success_status_surfaces_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri());
        let err = provider
            .chat("llama3", &history(), &BackendOptions::default())
            .await
            .unwrap_err();

        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("expected status error, got {other}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri());
        let err = provider
            .chat("llama3", &history(), &BackendOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn list_models_parses_tags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [
                    {"name": "llama3:latest", "size": 4_000_000_000_u64},
                    {"name": "mistral:7b"},
                ],
            })))
            .mount(&server)
            .await;

        let provider = OllamaProvider::new(&server.uri());
        let models = provider.list_models().await.unwrap();

        assert_eq!(models, vec!["llama3:latest", "mistral:7b"]);
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error() {
        // Port 1 is never listening.
        let provider = OllamaProvider::new("http://127.0.0.1:1");
        let err = provider
            .chat("llama3", &history(), &BackendOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Transport { .. }));
    }
}
