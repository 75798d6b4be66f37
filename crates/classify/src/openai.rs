use async_trait::async_trait;
use reqwest::Client;
use reshito_core::{ClassifierConfig, Secret};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::classifier::{ClassifyError, Classifier};
use crate::extract::extract_json_object;
use crate::prompt::{build_prompt, PromptMessage};

/// OpenAI chat-completions classifier.
pub struct OpenAiClassifier {
    client: Client,
    api_key: Secret,
    base_url: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(config: &ClassifierConfig) -> Result<Self, ClassifyError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClassifyError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        })
    }

    /// Raw text of the first completion choice.
    async fn complete(&self, messages: Vec<PromptMessage>) -> Result<String, ClassifyError> {
        let body = ChatRequest { model: &self.model, messages };

        debug!(model = %self.model, "Sending request to ChatCompletion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClassifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "ChatCompletion request rejected");
            return Err(ClassifyError::Upstream { status: status.as_u16(), body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::Format(e.to_string()))?;

        let choice = chat.choices.into_iter().next().ok_or(ClassifyError::EmptyResponse)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<PromptMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, text: &str) -> Result<Map<String, Value>, ClassifyError> {
        let completion = self.complete(build_prompt(text)).await?;
        extract_json_object(&completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PROMPT_EXAMPLE;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone)]
    struct Fake {
        status: StatusCode,
        body: String,
        seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
    }

    async fn completions(
        State(fake): State<Fake>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, [(&'static str, &'static str); 1], String) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        fake.seen.lock().unwrap().push((auth, body));
        (fake.status, [("content-type", "application/json")], fake.body.clone())
    }

    async fn spawn(status: StatusCode, body: String) -> (String, Arc<Mutex<Vec<(Option<String>, Value)>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let fake = Fake { status, body, seen: seen.clone() };
        let app = Router::new().route("/v1/chat/completions", post(completions)).with_state(fake);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1"), seen)
    }

    fn classifier(base_url: String) -> OpenAiClassifier {
        OpenAiClassifier::new(&ClassifierConfig {
            api_key: Secret::new("sk-test"),
            base_url,
            model: "gpt-3.5-turbo".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn completion(text: &str) -> String {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": text}, "finish_reason": "stop"}]
        })
        .to_string()
    }

    #[tokio::test]
    async fn sends_three_role_messages_with_bearer_key() {
        let (base, seen) = spawn(StatusCode::OK, completion(r#"{"tax": 8}"#)).await;
        let obj = classifier(base).classify("レシート本文").await.unwrap();
        assert_eq!(Value::Object(obj), json!({"tax": 8}));

        let seen = seen.lock().unwrap();
        let (auth, body) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer sk-test"));
        assert_eq!(body["model"], "gpt-3.5-turbo");
        let roles: Vec<&str> = body["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["system", "assistant", "user"]);
        assert!(body["messages"][1]["content"].as_str().unwrap().ends_with("レシート本文"));
        assert!(body["messages"][2]["content"].as_str().unwrap().ends_with(PROMPT_EXAMPLE));
    }

    #[tokio::test]
    async fn example_block_round_trips_unchanged() {
        let (base, _) = spawn(StatusCode::OK, completion(PROMPT_EXAMPLE)).await;
        let obj = classifier(base).classify("店名 ...").await.unwrap();
        let expected: Value = serde_json::from_str(PROMPT_EXAMPLE).unwrap();
        assert_eq!(Value::Object(obj), expected);
    }

    #[tokio::test]
    async fn zero_choices_is_empty_response() {
        let (base, _) = spawn(StatusCode::OK, json!({"choices": []}).to_string()).await;
        assert_eq!(
            classifier(base).classify("x").await.unwrap_err(),
            ClassifyError::EmptyResponse
        );
    }

    #[tokio::test]
    async fn prose_only_reply_has_no_delimiter() {
        let (base, _) = spawn(StatusCode::OK, completion("Sorry, I cannot read that.")).await;
        assert_eq!(
            classifier(base).classify("x").await.unwrap_err(),
            ClassifyError::DelimiterNotFound
        );
    }

    #[tokio::test]
    async fn null_content_has_no_delimiter() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": null}}]});
        let (base, _) = spawn(StatusCode::OK, body.to_string()).await;
        assert_eq!(
            classifier(base).classify("x").await.unwrap_err(),
            ClassifyError::DelimiterNotFound
        );
    }

    #[tokio::test]
    async fn malformed_object_is_parse_error() {
        let (base, _) = spawn(StatusCode::OK, completion("{\"tax\": }")).await;
        assert!(matches!(
            classifier(base).classify("x").await.unwrap_err(),
            ClassifyError::Parse(_)
        ));
    }

    #[tokio::test]
    async fn rejected_key_is_upstream() {
        let body = json!({"error": {"message": "Incorrect API key provided"}}).to_string();
        let (base, _) = spawn(StatusCode::UNAUTHORIZED, body).await;
        match classifier(base).classify("x").await.unwrap_err() {
            ClassifyError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn garbage_body_is_format_error() {
        let (base, _) = spawn(StatusCode::OK, "not json".to_string()).await;
        assert!(matches!(
            classifier(base).classify("x").await.unwrap_err(),
            ClassifyError::Format(_)
        ));
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        assert!(matches!(
            classifier(format!("http://{addr}/v1")).classify("x").await.unwrap_err(),
            ClassifyError::Transport(_)
        ));
    }
}
