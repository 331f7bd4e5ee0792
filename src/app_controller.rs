use anyhow::{Result, Context, anyhow};
use log::{warn, info};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::loop_plan::LoopPlan;
use crate::media_composer::{self, MediaComposer};
use crate::providers::SpeechProvider;
use crate::providers::voicevox::VoiceVox;
use crate::script_reader;
use crate::timeline;

// @module: Application controller for narration rendering

/// Main application controller for script-to-video generation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the full pipeline: script in, narrated video out.
    ///
    /// Any stage failure aborts the run; whatever was already produced in
    /// the working directory is left on disk for diagnosis.
    pub async fn run(
        &self,
        script_path: PathBuf,
        output_path: PathBuf,
        background: Option<PathBuf>,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        let provider = VoiceVox::new(
            &self.config.speech.endpoint,
            self.config.speech.speaker_id,
            self.config.speech.timeout_secs,
        )?;

        // Infrastructure checks come first so a dead engine or missing
        // ffmpeg aborts before any synthesis work
        provider.test_connection().await
            .context("Speech engine is unreachable, start it and try again")?;
        MediaComposer::check_available().await
            .context("ffmpeg/ffprobe are required for media composition")?;

        if let Some(clip) = &background {
            if !FileManager::file_exists(clip) {
                return Err(anyhow!("Background video does not exist: {:?}", clip));
            }
        }

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            FileManager::ensure_dir(parent)?;
        }

        let lines = script_reader::read_script(&script_path)?;
        if lines.is_empty() {
            return Err(anyhow!("Script contains no non-blank lines: {:?}", script_path));
        }
        info!("Read {} script lines from {:?}", lines.len(), script_path);

        // The working directory is deliberately not cleaned up, partial
        // artifacts are the only trace of what a failed run did
        let workdir = tempfile::Builder::new()
            .prefix("voxweave-")
            .tempdir()
            .context("Failed to create working directory")?
            .into_path();
        info!("Working directory: {:?}", workdir);

        let progress_bar = ProgressBar::new(lines.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Synthesizing");

        let pb = progress_bar.clone();
        let timeline = timeline::render_narration(&lines, &provider, &workdir, move |done| {
            pb.set_position(done as u64);
        }).await?;
        progress_bar.finish_and_clear();

        if timeline.is_empty() {
            return Err(anyhow!("No script line could be synthesized, nothing to compose"));
        }

        let skipped = lines.len() - timeline.cues.len();
        if skipped > 0 {
            warn!("{} of {} lines were skipped, the narration will have gaps", skipped, lines.len());
        }

        let subtitle_path = workdir.join("subtitles.srt");
        timeline.subtitle_track().write_to_srt(&subtitle_path)?;
        info!("Subtitle artifact: {:?}", subtitle_path);

        let composer = MediaComposer::new(self.config.video.clone());
        let audio_path = composer.concat_audio(&timeline.segments, &workdir).await?;

        let video_path = match &background {
            Some(clip) => {
                // Cover the concatenated narration with whole loops of the clip
                let target_duration = media_composer::wav_duration_seconds(&audio_path)?;
                let source_duration = MediaComposer::probe_media_duration(clip).await?;
                let plan = LoopPlan::plan(source_duration, target_duration)?;
                info!(
                    "Background clip {:.2}s looped {} times to cover {:.2}s",
                    plan.source_duration, plan.repeat_count, plan.target_duration
                );
                composer.loop_video(clip, &plan, &workdir).await?
            }
            None => {
                let target_duration = timeline.narration_end() + self.config.video.trailing_pad_secs;
                composer.solid_background(target_duration, &workdir).await?
            }
        };

        composer.compose(&video_path, &audio_path, &subtitle_path, &output_path).await?;

        info!(
            "Success: {} ({} cues, {})",
            output_path.display(),
            timeline.cues.len(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
