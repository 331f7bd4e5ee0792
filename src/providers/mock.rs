/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock speech providers that simulate different behaviors:
 * - `MockSpeech::with_durations()` - Always succeeds, yielding WAVs of the given lengths
 * - `MockSpeech::intermittent()` - Fails every Nth request
 * - `MockSpeech::failing()` - Always fails with an error
 *
 * Successful calls return genuine WAV containers (silence at 24 kHz mono),
 * so the real duration probe measures exactly the requested lengths.
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::SpeechProvider;

/// Engine output sample rate the mock mimics
const SAMPLE_RATE: u32 = 24_000;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Simulates a slow engine (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock speech provider for testing timeline behavior
#[derive(Debug)]
pub struct MockSpeech {
    /// Behavior mode
    behavior: MockBehavior,
    /// Clip durations handed out per request, cycled when exhausted
    durations: Vec<f64>,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
}

impl MockSpeech {
    /// Create a mock provider with the specified behavior and durations
    pub fn new(behavior: MockBehavior, durations: Vec<f64>) -> Self {
        Self {
            behavior,
            durations,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock that yields clips of the given durations
    pub fn with_durations(durations: Vec<f64>) -> Self {
        Self::new(MockBehavior::Working, durations)
    }

    /// Create a mock that fails every Nth request
    pub fn intermittent(fail_every: usize, durations: Vec<f64>) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every }, durations)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, Vec::new())
    }

    /// Number of synthesize calls observed so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Build an in-memory WAV of silence with the given duration
    pub fn wav_bytes(duration_secs: f64) -> Bytes {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .expect("in-memory WAV writer");
            let frames = (duration_secs * SAMPLE_RATE as f64).round() as u32;
            for _ in 0..frames {
                writer.write_sample(0i16).expect("WAV sample write");
            }
            writer.finalize().expect("WAV finalize");
        }

        Bytes::from(cursor.into_inner())
    }

    fn duration_for(&self, request_index: usize) -> f64 {
        if self.durations.is_empty() {
            1.0
        } else {
            self.durations[request_index % self.durations.len()]
        }
    }
}

#[async_trait]
impl SpeechProvider for MockSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Bytes, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Failing => {
                return Err(ProviderError::RequestFailed(
                    "mock provider is configured to fail".to_string(),
                ));
            }
            MockBehavior::Intermittent { fail_every } if fail_every > 0 && count % fail_every == 0 => {
                return Err(ProviderError::ApiError {
                    status_code: 500,
                    message: format!("mock failure on request {}", count),
                });
            }
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            }
            _ => {}
        }

        Ok(Self::wav_bytes(self.duration_for(count - 1)))
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "mock engine is unreachable".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
