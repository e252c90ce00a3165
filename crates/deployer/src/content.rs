use crate::ContentGenerator;
use async_trait::async_trait;
use blog_builder_core::config::ContentServiceConfig;
use blog_builder_core::{BlogContent, Error, GenerationRequest, Result};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use std::time::Duration;

/// Content service reached over HTTP.
///
/// Sends the generation request as JSON and expects a [`BlogContent`] bundle
/// back. The API key, when configured, is sent as a bearer token.
pub struct HttpContentGenerator {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

/// Wire format of the request body
#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    #[serde(flatten)]
    request: &'a GenerationRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

impl HttpContentGenerator {
    pub fn new(config: &ContentServiceConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| Error::ConfigParse(format!("Invalid content.api_key: {}", e)))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Content(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ContentGenerator for HttpContentGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<BlogContent> {
        let body = RequestBody {
            request,
            model: self.model.as_deref(),
        };
        log::debug!("requesting content from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Content(format!("Request to {} failed: {}", self.endpoint, e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Content(format!(
                "{} returned {}: {}",
                self.endpoint,
                status,
                text.trim()
            )));
        }

        let content: BlogContent = response
            .json()
            .await
            .map_err(|e| Error::Content(format!("Malformed content bundle: {}", e)))?;

        Ok(apply_request_overrides(content, request))
    }
}

/// Explicit choices in the request beat what the service picked
pub fn apply_request_overrides(mut content: BlogContent, request: &GenerationRequest) -> BlogContent {
    let given = |v: &Option<String>| v.as_ref().filter(|s| !s.trim().is_empty()).cloned();

    if let Some(author) = given(&request.author) {
        content.author = author;
    }
    if let Some(template) = given(&request.template) {
        content.theme = template;
    }
    if let Some(style) = given(&request.style) {
        content.style = style;
    }
    content
}
