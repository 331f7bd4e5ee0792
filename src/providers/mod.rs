/*!
 * Provider implementations for speech synthesis engines.
 *
 * This module contains client implementations for text-to-speech backends:
 * - VoiceVox: local VoiceVox engine over HTTP
 * - Mock: deterministic in-memory provider for tests and benches
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all speech synthesis providers
///
/// This trait defines the narrow interface the timeline renderer depends
/// on, allowing engine clients to be swapped for stubs in tests.
#[async_trait]
pub trait SpeechProvider: Send + Sync + Debug {
    /// Render one line of text to audio
    ///
    /// # Arguments
    /// * `text` - The utterance to synthesize
    ///
    /// # Returns
    /// * `Result<Bytes, ProviderError>` - Raw audio bytes (a WAV container) or an error
    async fn synthesize(&self, text: &str) -> Result<Bytes, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the engine is reachable, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

pub mod voicevox;
pub mod mock;
