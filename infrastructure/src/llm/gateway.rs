//! LM Studio (OpenAI-compatible) LLM Gateway implementation

use crate::llm::protocol::{ChatMessage, ChatRequest, ChatResponse, ModelsResponse};
use async_trait::async_trait;
use rag_application::ports::llm_gateway::{GatewayError, LlmGateway, ModelInfo};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";
pub const DEFAULT_API_KEY: &str = "lm-studio";
pub const DEFAULT_MODEL: &str = "qwen2.5-7b-instruct";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// One failed completion attempt
struct AttemptFailure {
    error: GatewayError,
    retryable: bool,
}

impl AttemptFailure {
    fn fatal(error: GatewayError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }
}

impl From<reqwest::Error> for AttemptFailure {
    fn from(err: reqwest::Error) -> Self {
        let error = map_reqwest_error(err);
        let retryable = matches!(error, GatewayError::ConnectionError(_));
        Self { error, retryable }
    }
}

/// LLM Gateway for a local LM Studio server or any OpenAI-compatible endpoint
#[derive(Clone)]
pub struct LmStudioGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_retries: u32,
    retry_delay: Duration,
}

impl LmStudioGateway {
    /// Create a gateway. `timeout` bounds every HTTP request.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Retries after the first attempt for connection failures and 5xx replies
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Delay before the first retry; doubled for each one after it
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Gateway with the LM Studio defaults
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_API_KEY, DEFAULT_MODEL, Duration::from_secs(60))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn try_complete(&self, url: &str, request: &ChatRequest) -> Result<String, AttemptFailure> {
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptFailure {
                error: GatewayError::RequestFailed(format!(
                    "Chat completion failed: {} - {}",
                    status, body
                )),
                retryable: status.is_server_error(),
            });
        }

        let body = response.text().await?;
        let chat: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| AttemptFailure::fatal(GatewayError::InvalidResponse(e.to_string())))?;

        chat.first_content().map(str::to_string).ok_or_else(|| {
            AttemptFailure::fatal(GatewayError::InvalidResponse(
                "response has no choices".to_string(),
            ))
        })
    }

    async fn fetch_models(&self) -> Result<Vec<String>, GatewayError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "Failed to fetch models: {}",
                response.status()
            )));
        }

        let models: ModelsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(models.data.into_iter().map(|m| m.id).collect())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() {
        GatewayError::ConnectionError(err.to_string())
    } else {
        GatewayError::RequestFailed(err.to_string())
    }
}

#[async_trait]
impl LlmGateway for LmStudioGateway {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String, GatewayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest::new(&self.model, vec![ChatMessage::user(prompt)])
            .with_temperature(temperature);

        let mut attempt = 0;
        loop {
            debug!("POST {} (model {}, temperature {})", url, self.model, temperature);
            match self.try_complete(&url, &request).await {
                Ok(text) => return Ok(text),
                Err(failure) if failure.retryable && attempt < self.max_retries => {
                    let delay = self.retry_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!(
                        "Completion failed ({}), retry {}/{} in {:?}",
                        failure.error, attempt, self.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn model_info(&self) -> ModelInfo {
        let api_available = match self.fetch_models().await {
            Ok(models) => {
                if !models.iter().any(|m| m == &self.model) {
                    debug!("Model {} not listed by the server ({:?})", self.model, models);
                }
                true
            }
            Err(e) => {
                warn!("LLM endpoint {} unavailable: {}", self.base_url, e);
                false
            }
        };

        ModelInfo {
            model: self.model.clone(),
            api_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> LmStudioGateway {
        LmStudioGateway::new(server.uri(), "test-key", "test-model", Duration::from_secs(5))
            .with_retry_delay(Duration::from_millis(10))
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "temperature": 0.5,
                "messages": [{"role": "user", "content": "hello"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Hi there")))
            .expect(1)
            .mount(&server)
            .await;

        let text = gateway(&server).complete("hello", 0.5).await.unwrap();
        assert_eq!(text, "Hi there");
    }

    #[tokio::test]
    async fn test_complete_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .mount(&server)
            .await;

        let err = gateway(&server).complete("hello", 0.0).await.unwrap_err();
        match err {
            GatewayError::RequestFailed(msg) => assert!(msg.contains("model crashed")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_complete_retries_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("loading model"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ready now")))
            .expect(1)
            .mount(&server)
            .await;

        let text = gateway(&server).complete("hello", 0.0).await.unwrap();
        assert_eq!(text, "ready now");
    }

    #[tokio::test]
    async fn test_complete_gives_up_after_max_retries() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(502))
            .expect(3)
            .mount(&server)
            .await;

        let err = gateway(&server)
            .with_max_retries(2)
            .complete("hello", 0.0)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_complete_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let err = gateway(&server).complete("hello", 0.0).await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed(msg) if msg.contains("bad request")));
    }

    #[tokio::test]
    async fn test_complete_timeout_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(Duration::from_millis(500)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = LmStudioGateway::new(server.uri(), "k", "m", Duration::from_millis(100))
            .with_retry_delay(Duration::from_millis(10));
        assert_eq!(gateway.complete("hello", 0.0).await, Err(GatewayError::Timeout));
    }

    #[tokio::test]
    async fn test_complete_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        assert!(matches!(
            gateway(&server).complete("hello", 0.0).await,
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_complete_no_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        assert!(matches!(
            gateway(&server).complete("hello", 0.0).await,
            Err(GatewayError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_model_info_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{"id": "test-model", "object": "model"}]
            })))
            .mount(&server)
            .await;

        let info = gateway(&server).model_info().await;
        assert_eq!(info.model, "test-model");
        assert!(info.api_available);
    }

    #[tokio::test]
    async fn test_model_info_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(!gateway(&server).model_info().await.api_available);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let gateway = LmStudioGateway::new("http://127.0.0.1:9", "k", "m", Duration::from_secs(2))
            .with_max_retries(1)
            .with_retry_delay(Duration::from_millis(10));

        assert!(!gateway.model_info().await.api_available);
        assert!(matches!(
            gateway.complete("hello", 0.0).await,
            Err(GatewayError::ConnectionError(_))
        ));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let gateway = LmStudioGateway::new("http://localhost:1234/v1/", "k", "m", Duration::from_secs(1));
        assert_eq!(gateway.base_url(), "http://localhost:1234/v1");
    }
}
