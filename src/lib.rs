/*!
 * # voxweave
 *
 * A Rust library for turning a plain-text script into a narrated video.
 *
 * ## Features
 *
 * - Synthesize speech per script line via a VoiceVox-compatible engine
 * - Derive subtitle timing deterministically from measured clip durations
 * - Concatenate narration audio losslessly
 * - Loop a background clip (or synthesize a solid-color one) to cover the narration
 * - Burn subtitles into the final video with configurable styling
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `script_reader`: Script file reading and line extraction
 * - `timeline`: Narration timeline construction (the timing core)
 * - `subtitle_processor`: Subtitle cue handling and SRT rendering
 * - `loop_plan`: Background clip loop planning
 * - `media_composer`: ffmpeg/ffprobe collaborators and audio probing
 * - `app_controller`: Main application controller
 * - `providers`: Speech engine clients:
 *   - `providers::voicevox`: VoiceVox HTTP client
 *   - `providers::mock`: Deterministic provider for tests
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod loop_plan;
pub mod media_composer;
pub mod providers;
pub mod script_reader;
pub mod subtitle_processor;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use loop_plan::LoopPlan;
pub use subtitle_processor::{SubtitleEntry, SubtitleTrack};
pub use timeline::{AudioSegment, Timeline, TimelineBuilder, LINE_GAP_SECS};
pub use errors::{AppError, MediaError, ProviderError};
