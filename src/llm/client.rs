use crate::llm::config::LlmConfig;
use crate::llm::prompts::SYSTEM_PROMPT;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

/// Shown whenever the server answers with something other than a chat completion.
pub const NO_VALID_RESPONSE: &str = "No valid response.";

/// Errors that can occur while constructing the client
#[derive(Debug, Error)]
pub enum LlmClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Outcome of a single chat-completion round-trip.
///
/// Transport and payload problems are ordinary values here: an interactive
/// session shows them to the user and carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The assistant's reply text
    Reply(String),
    /// Connection, DNS, timeout, or non-2xx status
    NetworkFailure(String),
    /// A 2xx response without `choices[0].message.content`
    MalformedResponse(String),
}

impl fmt::Display for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Reply(text) => f.write_str(text),
            Completion::NetworkFailure(detail) => write!(f, "Network or request error: {}", detail),
            Completion::MalformedResponse(_) => f.write_str(NO_VALID_RESPONSE),
        }
    }
}

/// Anything that can turn a user prompt into a completion
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Completion;
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-style chat-completions endpoint (LM Studio, llama.cpp server, ...)
#[derive(Clone)]
pub struct LlmClient {
    http: Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a new client from configuration
    pub fn new(config: LlmConfig) -> Result<Self, LlmClientError> {
        config.validate().map_err(LlmClientError::Config)?;

        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Build the request body for a prompt
    pub fn request_body<'a>(&'a self, prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stream: false,
        }
    }

    async fn send(&self, prompt: &str) -> Result<String, reqwest::Error> {
        let body = self.request_body(prompt);

        debug!(
            "Sending chat completion: url={}, model={}, prompt_chars={}",
            self.config.api_url,
            self.config.model,
            prompt.chars().count()
        );
        if self.config.debug {
            debug!("Prompt:\n{}", prompt);
        }

        self.http
            .post(&self.config.api_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(&self, prompt: &str) -> Completion {
        let completion = match self.send(prompt).await {
            Ok(body) => parse_completion(&body),
            Err(e) => Completion::NetworkFailure(e.to_string()),
        };

        match &completion {
            Completion::Reply(text) => debug!("Received response: {} chars", text.chars().count()),
            Completion::NetworkFailure(detail) => warn!("Chat completion failed: {}", detail),
            Completion::MalformedResponse(detail) => warn!("Unexpected completion payload: {}", detail),
        }

        completion
    }
}

/// Extract the first choice's message content from a response body.
pub fn parse_completion(body: &str) -> Completion {
    let response: ChatResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return Completion::MalformedResponse(format!("invalid JSON: {}", e)),
    };

    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(Completion::Reply)
        .unwrap_or_else(|| {
            Completion::MalformedResponse("missing choices[0].message.content".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed_response() {
        let body = r#"{"choices":[{"message":{"content":"Great resume!"}}]}"#;
        let completion = parse_completion(body);

        assert_eq!(completion, Completion::Reply("Great resume!".to_string()));
        assert_eq!(completion.to_string(), "Great resume!");
    }

    #[test]
    fn test_parse_uses_first_choice() {
        let body = json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "first"}, "finish_reason": "stop"},
                {"index": 1, "message": {"role": "assistant", "content": "second"}}
            ],
            "usage": {"prompt_tokens": 10, "completion_tokens": 2}
        })
        .to_string();

        assert_eq!(parse_completion(&body), Completion::Reply("first".to_string()));
    }

    #[test]
    fn test_parse_empty_choices_is_sentinel() {
        let completion = parse_completion(r#"{"choices":[]}"#);

        assert!(matches!(completion, Completion::MalformedResponse(_)));
        assert_eq!(completion.to_string(), "No valid response.");
    }

    #[test]
    fn test_parse_shape_deviations_are_malformed() {
        for body in [
            "{}",
            r#"{"choices":[{}]}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"error":"model not loaded"}"#,
            "<html>Bad Gateway</html>",
        ] {
            let completion = parse_completion(body);
            assert!(
                matches!(completion, Completion::MalformedResponse(_)),
                "expected malformed for {body}"
            );
            assert_eq!(completion.to_string(), NO_VALID_RESPONSE);
        }
    }

    #[test]
    fn test_network_failure_display() {
        let completion = Completion::NetworkFailure("connection refused".to_string());
        assert_eq!(completion.to_string(), "Network or request error: connection refused");
    }

    #[test]
    fn test_request_body_wire_shape() {
        let client = LlmClient::new(LlmConfig::default()).unwrap();
        let body = serde_json::to_value(client.request_body("Analyze this")).unwrap();

        assert_eq!(
            body,
            json!({
                "model": "mistral-nemo-instruct-2407",
                "messages": [
                    {"role": "system", "content": "You are a seasoned career advisor and resume expert."},
                    {"role": "user", "content": "Analyze this"}
                ],
                "temperature": 0.7,
                "max_tokens": 1000,
                "stream": false
            })
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = LlmConfig {
            temperature: 2.0,
            ..Default::default()
        };

        assert!(matches!(LlmClient::new(config), Err(LlmClientError::Config(_))));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_failure() {
        // Bind then drop a listener so the port is known to be closed.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let config = LlmConfig {
            api_url: format!("http://127.0.0.1:{}/v1/chat/completions", port),
            ..Default::default()
        };
        let client = LlmClient::new(config).unwrap();

        let completion = client.complete("hello").await;

        assert!(matches!(completion, Completion::NetworkFailure(_)));
        assert!(completion.to_string().starts_with("Network or request error: "));
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        use tokio::io::AsyncReadExt;

        let mut received = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            received.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&received);
            if let Some((head, body)) = text.split_once("\r\n\r\n") {
                let length = head
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);
                if body.len() >= length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        String::from_utf8_lossy(&received).to_string()
    }

    async fn serve_once(raw_response: String) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::AsyncWriteExt;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/chat/completions", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            socket.write_all(raw_response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_round_trip_against_local_server() {
        let payload = r#"{"choices":[{"message":{"role":"assistant","content":"Great resume!"}}]}"#;
        let (url, server) = serve_once(format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            payload.len(),
            payload
        ))
        .await;

        let client = LlmClient::new(LlmConfig {
            api_url: url,
            ..Default::default()
        })
        .unwrap();

        let completion = client.complete("Analyze this resume").await;
        assert_eq!(completion, Completion::Reply("Great resume!".to_string()));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions"));
        assert!(request.to_lowercase().contains("content-type: application/json"));
        assert!(request.contains(r#""stream":false"#));
        assert!(request.contains(r#""content":"Analyze this resume""#));
    }

    #[tokio::test]
    async fn test_error_status_is_network_failure() {
        let (url, _server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\ncontent-length: 0\r\nconnection: close\r\n\r\n".to_string(),
        )
        .await;

        let client = LlmClient::new(LlmConfig {
            api_url: url,
            ..Default::default()
        })
        .unwrap();

        match client.complete("hello").await {
            Completion::NetworkFailure(detail) => assert!(detail.contains("503")),
            other => panic!("expected network failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_success_body_is_malformed() {
        let (url, _server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: 2\r\nconnection: close\r\n\r\nok".to_string(),
        )
        .await;

        let client = LlmClient::new(LlmConfig {
            api_url: url,
            ..Default::default()
        })
        .unwrap();

        let completion = client.complete("hello").await;
        assert!(matches!(completion, Completion::MalformedResponse(_)));
        assert_eq!(completion.to_string(), "No valid response.");
    }
}
