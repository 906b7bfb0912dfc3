//! CoreNLP server client
//!
//! Talks to a running `StanfordCoreNLPServer`. Starting and stopping the
//! server is left to the operator.

use super::models::CoreNlpDocument;
use crate::adapters::NerBackend;
use crate::config::CoreNlpConfig;
use crate::detection::label_map::{LabelTable, CORENLP_LABELS};
use crate::domain::{BackendError, NerScrubError, Result, TaggedToken};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Response};
use secrecy::ExposeSecret;
use std::time::Duration;
use url::Url;

/// Annotation properties sent with every request
///
/// Fine-grained NER is switched off so locations come back as `LOCATION`
/// rather than `CITY`, `COUNTRY` and so on.
const ANNOTATION_PROPERTIES: &str = r#"{"annotators":"tokenize,ssplit,ner","outputFormat":"json","ner.applyFineGrained":"false"}"#;

/// Backend that tags text with a CoreNLP server
///
/// # Example
///
/// ```no_run
/// use nerscrub::adapters::corenlp::CoreNlpBackend;
/// use nerscrub::adapters::NerBackend;
/// use nerscrub::config::CoreNlpConfig;
///
/// # async fn example() -> nerscrub::domain::Result<()> {
/// let backend = CoreNlpBackend::new(CoreNlpConfig::default())?;
/// let tokens = backend.tag("Jane works at Acme.").await?;
/// # Ok(())
/// # }
/// ```
pub struct CoreNlpBackend {
    endpoint: Url,
    client: Client,
    config: CoreNlpConfig,
}

impl std::fmt::Debug for CoreNlpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreNlpBackend")
            .field("endpoint", &self.endpoint.as_str())
            .field("username", &self.config.username)
            .finish()
    }
}

impl CoreNlpBackend {
    /// Create a backend for the configured server
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the URL is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: CoreNlpConfig) -> Result<Self> {
        let mut endpoint = Url::parse(&config.url).map_err(|e| {
            NerScrubError::Configuration(format!("Invalid corenlp.url '{}': {e}", config.url))
        })?;
        endpoint
            .query_pairs_mut()
            .append_pair("properties", ANNOTATION_PROPERTIES);

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)))
            .build()
            .map_err(|e| {
                NerScrubError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        tracing::debug!(url = %config.url, "Created CoreNLP backend");

        Ok(Self {
            endpoint,
            client,
            config,
        })
    }

    /// Annotate `text` and return the raw document
    pub async fn annotate(&self, text: &str) -> Result<CoreNlpDocument> {
        self.retry_request(|| async {
            let mut request = self
                .client
                .post(self.endpoint.clone())
                .header("Content-Type", "text/plain; charset=utf-8")
                .body(text.to_string());

            if let Some(ref username) = self.config.username {
                let password = self
                    .config
                    .password
                    .as_ref()
                    .map(|p| p.expose_secret().as_ref().to_string());
                request = request.basic_auth(username, password);
            }

            let response = request.send().await.map_err(map_transport_error)?;
            let response = check_status(response).await?;

            let body = response.text().await.map_err(map_transport_error)?;
            serde_json::from_str::<CoreNlpDocument>(&body).map_err(|e| {
                NerScrubError::from(BackendError::InvalidResponse(format!(
                    "CoreNLP returned invalid JSON: {e}"
                )))
            })
        })
        .await
    }

    /// Check the server's readiness endpoint
    pub async fn health_check(&self) -> Result<()> {
        let ready = self
            .endpoint
            .join("ready")
            .map_err(|e| NerScrubError::Configuration(format!("Invalid corenlp.url: {e}")))?;

        let response = self
            .client
            .get(ready)
            .send()
            .await
            .map_err(map_transport_error)?;
        check_status(response).await?;
        Ok(())
    }

    /// Retry a request with exponential backoff
    ///
    /// Only transport failures, timeouts and 5xx answers are retried.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let max_retries = retry.max_retries.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;
                    let retryable = matches!(e, NerScrubError::Backend(ref b) if b.is_retryable());
                    if !retryable || attempt >= max_retries {
                        return Err(e);
                    }

                    let delay_ms = (retry.initial_delay_ms as f64
                        * retry.backoff_multiplier.powi(attempt as i32 - 1))
                        as u64;
                    let delay_ms = delay_ms.min(retry.max_delay_ms);

                    tracing::warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        delay_ms = delay_ms,
                        error = %e,
                        "Retrying CoreNLP request after error"
                    );

                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> NerScrubError {
    if e.is_timeout() {
        BackendError::Timeout(e.to_string()).into()
    } else {
        BackendError::ConnectionFailed(e.to_string()).into()
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.unwrap_or_default();
    let status = status.as_u16();
    let err = if status >= 500 {
        BackendError::ServerError { status, message }
    } else {
        BackendError::ClientError { status, message }
    };
    Err(err.into())
}

#[async_trait]
impl NerBackend for CoreNlpBackend {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedToken>> {
        let document = self.annotate(text).await?;
        document.into_tagged_tokens(text)
    }

    fn name(&self) -> &'static str {
        "corenlp"
    }

    fn label_table(&self) -> LabelTable {
        CORENLP_LABELS
    }

    fn is_available(&self) -> bool {
        // remote server; reachability is checked per request
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_carries_properties() {
        let backend = CoreNlpBackend::new(CoreNlpConfig::default()).unwrap();
        let query: Vec<(String, String)> = backend
            .endpoint
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(query.len(), 1);
        assert_eq!(query[0].0, "properties");
        assert!(query[0].1.contains("tokenize,ssplit,ner"));
        assert!(query[0].1.contains("\"outputFormat\":\"json\""));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = CoreNlpConfig {
            url: "::nope".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            CoreNlpBackend::new(config),
            Err(NerScrubError::Configuration(_))
        ));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = CoreNlpConfig {
            username: Some("nlp".to_string()),
            password: Some(crate::config::secret_string("topsecret".to_string())),
            ..Default::default()
        };
        let backend = CoreNlpBackend::new(config).unwrap();
        assert!(!format!("{backend:?}").contains("topsecret"));
    }
}
