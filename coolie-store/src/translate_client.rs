//! Delegated translation over HTTP.
//!
//! Speaks the LibreTranslate request shape: `POST {q, source, target, format}`
//! answered with `{translatedText}`. Every request is bounded by the client
//! timeout and is never retried.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use coolie_core::{TranslationError, Translator};

use crate::app_config::TranslationConfig;
use crate::error::StoreError;

#[derive(Debug, Serialize)]
struct TranslateBody<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateReply {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
}

pub struct HttpTranslator {
    client: Client,
    url: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpTranslator {
    pub fn new(config: &TranslationConfig) -> Result<Self, StoreError> {
        if config.timeout_seconds == 0 {
            return Err(StoreError::Config(
                "translation.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Self::with_timeout(
            &config.url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn with_timeout(
        url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key,
            timeout,
        })
    }

    fn describe(&self, err: reqwest::Error) -> TranslationError {
        if err.is_timeout() {
            TranslationError::Service(format!(
                "translation request timed out after {:?}",
                self.timeout
            ))
        } else {
            TranslationError::Service(format!("translation request failed: {}", err))
        }
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let body = TranslateBody {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        debug!("Translating {} chars {} -> {} via {}", text.len(), source, target, self.url);

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.describe(e))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorReply>(&raw)
                .map(|e| e.error)
                .unwrap_or(raw);
            warn!("Translation backend returned {}: {}", status, message);
            return Err(TranslationError::Service(format!(
                "translation backend returned {}: {}",
                status, message
            )));
        }

        let reply: TranslateReply = response.json().await.map_err(|e| self.describe(e))?;
        Ok(reply.translated_text)
    }

    fn provider(&self) -> &'static str {
        "http"
    }
}
