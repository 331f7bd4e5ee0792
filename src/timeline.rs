use anyhow::{Result, Context};
use log::{warn, debug};
use std::path::{Path, PathBuf};

use crate::media_composer;
use crate::providers::SpeechProvider;
use crate::script_reader::ScriptLine;
use crate::subtitle_processor::{SubtitleEntry, SubtitleTrack};

// @module: Narration timeline construction

/// Fixed silence inserted between consecutive utterances, in seconds.
pub const LINE_GAP_SECS: f64 = 0.05;

/// One rendered utterance: the source text, its persisted audio clip and
/// the clip's measured duration.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    // @field: Source line text
    pub text: String,

    // @field: Path to the rendered audio clip
    pub audio_path: PathBuf,

    // @field: Measured clip duration in seconds
    pub duration_secs: f64,
}

/// Accumulator that turns per-line durations into a gapless cue sequence.
///
/// The single `current_time` cursor is the only mutable state: each pushed
/// line starts exactly at the cursor, ends after its measured duration, and
/// advances the cursor by the duration plus [`LINE_GAP_SECS`]. The cursor
/// never moves backwards, so cues can never overlap.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    current_time: f64,
    segments: Vec<AudioSegment>,
    cues: Vec<SubtitleEntry>,
}

impl TimelineBuilder {
    /// Create a builder with the cursor at t=0
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one synthesized line to the timeline.
    ///
    /// The cue's display index is the count of cues emitted so far plus
    /// one, so skipped lines never leave holes in the numbering.
    pub fn push_line(&mut self, text: &str, audio_path: PathBuf, duration_secs: f64) {
        let start = self.current_time;
        let end = start + duration_secs;

        self.cues.push(SubtitleEntry::new(
            self.cues.len() + 1,
            start,
            end,
            text.to_string(),
        ));
        self.segments.push(AudioSegment {
            text: text.to_string(),
            audio_path,
            duration_secs,
        });

        self.current_time = end + LINE_GAP_SECS;
    }

    /// Current cursor position: where the next cue would start
    pub fn cursor(&self) -> f64 {
        self.current_time
    }

    /// Number of cues emitted so far
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether any cue has been emitted
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Consume the builder, yielding the finished timeline
    pub fn finish(self) -> Timeline {
        Timeline {
            segments: self.segments,
            cues: self.cues,
        }
    }
}

/// Finished narration timeline: audio segments and subtitle cues in
/// identical order, so concatenating the segments stays in sync with the
/// cue timing.
#[derive(Debug)]
pub struct Timeline {
    /// Rendered audio clips in playback order
    pub segments: Vec<AudioSegment>,

    /// Subtitle cues, ordered and densely numbered
    pub cues: Vec<SubtitleEntry>,
}

impl Timeline {
    /// Whether the timeline holds no cues at all
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// End time of the last cue in seconds, or 0.0 for an empty timeline
    pub fn narration_end(&self) -> f64 {
        self.cues.last().map(|cue| cue.end_secs).unwrap_or(0.0)
    }

    /// Copy the cues into a writable subtitle track
    pub fn subtitle_track(&self) -> SubtitleTrack {
        SubtitleTrack {
            entries: self.cues.clone(),
        }
    }
}

/// Render every script line through the speech provider and build the
/// narration timeline.
///
/// Lines are processed strictly in order because each cue's start depends
/// on the previous cue's end. A line whose synthesis or duration probe
/// fails is skipped: it contributes no segment and no cue, and the cursor
/// does not advance. Skips are logged and absorbed, never surfaced as a
/// run failure, so the displayed text may have gaps when the engine
/// misbehaves. `on_progress` is invoked with the number of lines handled
/// after each line, successful or not.
pub async fn render_narration<F>(
    lines: &[ScriptLine],
    provider: &dyn SpeechProvider,
    workdir: &Path,
    mut on_progress: F,
) -> Result<Timeline>
where
    F: FnMut(usize),
{
    let mut builder = TimelineBuilder::new();

    for (processed, line) in lines.iter().enumerate() {
        debug!("Synthesizing line {}/{}: {}", line.ordinal, lines.len(), line.text);

        let audio = match provider.synthesize(&line.text).await {
            Ok(audio) => audio,
            Err(e) => {
                warn!("Skipping line {} (synthesis failed): {}", line.ordinal, e);
                on_progress(processed + 1);
                continue;
            }
        };

        let audio_path = workdir.join(format!("audio_{:03}.wav", line.ordinal - 1));
        std::fs::write(&audio_path, &audio)
            .with_context(|| format!("Failed to write audio clip: {:?}", audio_path))?;

        let duration_secs = match media_composer::wav_duration_seconds(&audio_path) {
            Ok(duration) => duration,
            Err(e) => {
                warn!("Skipping line {} (duration probe failed): {}", line.ordinal, e);
                on_progress(processed + 1);
                continue;
            }
        };

        builder.push_line(&line.text, audio_path, duration_secs);
        on_progress(processed + 1);
    }

    Ok(builder.finish())
}
