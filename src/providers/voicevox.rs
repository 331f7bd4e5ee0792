use anyhow::{Result, Context};
use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::SpeechProvider;

/// VoiceVox client for interacting with a local VoiceVox engine.
///
/// Synthesis is a two-step protocol: `audio_query` turns text into a
/// structured synthesis spec, and `synthesis` renders that spec to WAV
/// bytes. Both steps address the speaker by id through query parameters.
#[derive(Debug)]
pub struct VoiceVox {
    /// Base URL of the engine API
    base_url: Url,
    /// HTTP client for making requests
    client: Client,
    /// Engine speaker (voice) id
    speaker_id: u32,
}

impl VoiceVox {
    /// Create a new VoiceVox client for the given endpoint and speaker
    pub fn new(endpoint: impl Into<String>, speaker_id: u32, timeout_secs: u64) -> Result<Self> {
        let endpoint = endpoint.into();
        let mut base_url = Url::parse(&endpoint)
            .with_context(|| format!("Invalid speech engine endpoint: {}", endpoint))?;

        // Url::join drops the last path segment unless the base ends in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            speaker_id,
        })
    }

    /// Base URL this client talks to
    pub fn endpoint(&self) -> &str {
        self.base_url.as_str()
    }

    /// Speaker id used for both synthesis steps
    pub fn speaker_id(&self) -> u32 {
        self.speaker_id
    }

    fn api_url(&self, path: &str) -> Result<Url, ProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid API path {}: {}", path, e)))
    }

    /// Build the synthesis spec for one line of text
    async fn audio_query(&self, text: &str) -> Result<Value, ProviderError> {
        let url = self.api_url("audio_query")?;
        let speaker = self.speaker_id.to_string();

        let response = self.client.post(url)
            .query(&[("text", text), ("speaker", speaker.as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("audio_query request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("VoiceVox audio_query error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.json::<Value>().await
            .map_err(|e| ProviderError::ParseError(format!("audio_query response: {}", e)))
    }

    /// Render a synthesis spec to WAV bytes
    async fn synthesis(&self, query: &Value) -> Result<Bytes, ProviderError> {
        let url = self.api_url("synthesis")?;
        let speaker = self.speaker_id.to_string();

        let response = self.client.post(url)
            .query(&[("speaker", speaker.as_str())])
            .json(query)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("synthesis request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("VoiceVox synthesis error ({}): {}", status, message);
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        response.bytes().await
            .map_err(|e| ProviderError::ParseError(format!("synthesis response body: {}", e)))
    }

    /// Get the engine version string
    pub async fn version(&self) -> Result<String, ProviderError> {
        let url = self.api_url("version")?;

        let response = self.client.get(url)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("version request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: "version endpoint returned an error".to_string(),
            });
        }

        response.text().await
            .map_err(|e| ProviderError::ParseError(format!("version response: {}", e)))
    }
}

#[async_trait]
impl SpeechProvider for VoiceVox {
    async fn synthesize(&self, text: &str) -> Result<Bytes, ProviderError> {
        let query = self.audio_query(text).await?;
        self.synthesis(&query).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Connected to VoiceVox engine {} at {}", version.trim(), self.base_url);
        Ok(())
    }
}
