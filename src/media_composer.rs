use log::{error, debug};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::VideoConfig;
use crate::errors::MediaError;
use crate::loop_plan::LoopPlan;
use crate::timeline::AudioSegment;

// @module: External media tooling (ffmpeg/ffprobe) and audio probing

/// Timeout for lossless copy operations (concat, loop)
const COPY_TIMEOUT_SECS: u64 = 120;

/// Timeout for encoding operations (solid background, final mux)
const ENCODE_TIMEOUT_SECS: u64 = 600;

/// Timeout for probes and availability checks
const PROBE_TIMEOUT_SECS: u64 = 30;

/// Measure a WAV file's duration from its frame count and sample rate
pub fn wav_duration_seconds<P: AsRef<Path>>(path: P) -> Result<f64, MediaError> {
    let reader = hound::WavReader::open(path.as_ref())
        .map_err(|e| MediaError::ProbeFailed(format!("{:?}: {}", path.as_ref(), e)))?;

    let spec = reader.spec();
    // duration() is the frame count, already divided by the channel count
    let frames = reader.duration();
    Ok(frames as f64 / spec.sample_rate as f64)
}

/// Render the concat demuxer list for an ordered set of files
pub fn concat_list_content<P: AsRef<Path>>(paths: &[P]) -> String {
    let mut content = String::new();
    for path in paths {
        content.push_str(&format!("file '{}'\n", escape_concat_path(path.as_ref())));
    }
    content
}

/// Render the concat demuxer list that repeats one file a fixed number of times
pub fn loop_list_content(path: &Path, repeat_count: u32) -> String {
    let escaped = escape_concat_path(path);
    let mut content = String::new();
    for _ in 0..repeat_count {
        content.push_str(&format!("file '{}'\n", escaped));
    }
    content
}

// Single quotes inside a quoted concat entry must be closed, escaped and reopened
fn escape_concat_path(path: &Path) -> String {
    path.to_string_lossy().replace('\'', r"'\''")
}

/// Filter ffmpeg stderr to only show meaningful error lines, stripping the
/// version banner, build configuration, and stream metadata noise.
pub fn filter_ffmpeg_stderr(stderr: &str) -> String {
    let dominated_prefixes = [
        "ffmpeg version",
        "ffprobe version",
        "  built with",
        "  configuration:",
        "  lib",
        "Input #",
        "  Metadata:",
        "  Duration:",
        "  Stream #",
        "      Metadata:",
        "Output #",
        "Stream mapping:",
        "Press [q]",
    ];

    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return false;
            }
            !dominated_prefixes.iter().any(|p| line.starts_with(p))
        })
        .collect();

    if meaningful.is_empty() {
        "no diagnostic output".to_string()
    } else {
        meaningful.join("\n")
    }
}

/// Driver for the external ffmpeg/ffprobe collaborators.
///
/// Every operation shells out, waits with a timeout, and surfaces failures
/// with filtered stderr. Output files land in the caller's working
/// directory and are left in place whatever happens.
pub struct MediaComposer {
    video: VideoConfig,
}

impl MediaComposer {
    /// Create a composer with the given video rendering settings
    pub fn new(video: VideoConfig) -> Self {
        Self { video }
    }

    /// Verify that ffmpeg and ffprobe can be launched at all
    pub async fn check_available() -> Result<(), MediaError> {
        for tool in ["ffmpeg", "ffprobe"] {
            let output = Command::new(tool)
                .arg("-version")
                .output()
                .await
                .map_err(|e| MediaError::ToolMissing(format!("{}: {}", tool, e)))?;

            if !output.status.success() {
                return Err(MediaError::ToolMissing(format!(
                    "{} exited with {}", tool, output.status
                )));
            }
        }
        Ok(())
    }

    /// Probe a media file's container duration in seconds via ffprobe
    pub async fn probe_media_duration<P: AsRef<Path>>(path: P) -> Result<f64, MediaError> {
        let path = path.as_ref();
        let output = run_tool(
            "ffprobe",
            &[
                "-v", "error",
                "-show_entries", "format=duration",
                "-of", "default=noprint_wrappers=1:nokey=1",
                &path.to_string_lossy(),
            ],
            PROBE_TIMEOUT_SECS,
            "duration probe",
        ).await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.trim().parse::<f64>()
            .map_err(|e| MediaError::ProbeFailed(format!("{:?}: {}", path, e)))
    }

    /// Concatenate the rendered audio clips losslessly, in timeline order
    pub async fn concat_audio(
        &self,
        segments: &[AudioSegment],
        workdir: &Path,
    ) -> Result<PathBuf, MediaError> {
        let list_path = workdir.join("concat_list.txt");
        let output_path = workdir.join("final_audio.wav");

        let paths: Vec<&Path> = segments.iter().map(|s| s.audio_path.as_path()).collect();
        std::fs::write(&list_path, concat_list_content(&paths))?;

        run_tool(
            "ffmpeg",
            &[
                "-y", "-f", "concat", "-safe", "0",
                "-i", &list_path.to_string_lossy(),
                "-c", "copy",
                &output_path.to_string_lossy(),
            ],
            COPY_TIMEOUT_SECS,
            "audio concatenation",
        ).await?;

        Ok(output_path)
    }

    /// Produce a looped copy of the background clip covering the plan's target.
    ///
    /// The source is copied into the working directory first so the concat
    /// list stays valid even if the original moves, then repeated whole by
    /// the concat demuxer. The result is over-long; the final mux trims it.
    pub async fn loop_video(
        &self,
        source: &Path,
        plan: &LoopPlan,
        workdir: &Path,
    ) -> Result<PathBuf, MediaError> {
        let clip_copy = workdir.join("background.mp4");
        std::fs::copy(source, &clip_copy)?;

        let list_path = workdir.join("loop_list.txt");
        std::fs::write(&list_path, loop_list_content(&clip_copy, plan.repeat_count))?;

        debug!(
            "Looping background {:.2}s x{} to cover {:.2}s",
            plan.source_duration, plan.repeat_count, plan.target_duration
        );

        let output_path = workdir.join("looped_background.mp4");
        run_tool(
            "ffmpeg",
            &[
                "-y", "-f", "concat", "-safe", "0",
                "-i", &list_path.to_string_lossy(),
                "-c", "copy",
                &output_path.to_string_lossy(),
            ],
            COPY_TIMEOUT_SECS,
            "background looping",
        ).await?;

        Ok(output_path)
    }

    /// Encode a solid-color clip of the given duration as the background
    pub async fn solid_background(
        &self,
        duration_secs: f64,
        workdir: &Path,
    ) -> Result<PathBuf, MediaError> {
        let output_path = workdir.join("blank.mp4");
        let source = format!(
            "color=c={}:s={}x{}:d={}",
            self.video.background_color, self.video.width, self.video.height, duration_secs
        );

        run_tool(
            "ffmpeg",
            &[
                "-y",
                "-f", "lavfi", "-i", &source,
                "-c:v", "libx264", "-pix_fmt", "yuv420p",
                &output_path.to_string_lossy(),
            ],
            ENCODE_TIMEOUT_SECS,
            "background synthesis",
        ).await?;

        Ok(output_path)
    }

    /// The subtitles filter expression used for the burn-in
    pub fn subtitles_filter(&self, subtitles: &Path) -> String {
        format!(
            "subtitles={}:force_style='FontSize={},Alignment=2,OutlineColour=&H000000&,\
             BorderStyle=3,Outline={},Shadow=0,MarginV={},Bold=1'",
            subtitles.to_string_lossy(),
            self.video.font_size,
            self.video.outline,
            self.video.margin_bottom,
        )
    }

    /// Mux the video and audio streams with subtitles burned in.
    ///
    /// Output is trimmed to the shorter of the two input streams, which
    /// is what cuts the over-provisioned background back to the narration
    /// length.
    pub async fn compose(
        &self,
        video: &Path,
        audio: &Path,
        subtitles: &Path,
        output: &Path,
    ) -> Result<(), MediaError> {
        let filter = self.subtitles_filter(subtitles);

        run_tool(
            "ffmpeg",
            &[
                "-y",
                "-i", &video.to_string_lossy(),
                "-i", &audio.to_string_lossy(),
                "-vf", &filter,
                "-map", "0:v:0", "-map", "1:a:0",
                "-c:v", "libx264", "-c:a", "aac", "-shortest",
                "-vsync", "cfr", "-async", "1",
                &output.to_string_lossy(),
            ],
            ENCODE_TIMEOUT_SECS,
            "final composition",
        ).await?;

        Ok(())
    }
}

/// Run an external tool to completion with a timeout, failing on non-zero exit
async fn run_tool(
    tool: &str,
    args: &[&str],
    timeout_secs: u64,
    action: &str,
) -> Result<std::process::Output, MediaError> {
    let tool_future = Command::new(tool).args(args).output();

    let output = tokio::select! {
        result = tool_future => {
            result.map_err(|e| MediaError::CommandFailed {
                tool: tool.to_string(),
                detail: format!("could not launch for {}: {}", action, e),
            })?
        },
        _ = tokio::time::sleep(Duration::from_secs(timeout_secs)) => {
            return Err(MediaError::CommandFailed {
                tool: tool.to_string(),
                detail: format!("timed out after {}s during {}", timeout_secs, action),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let filtered = filter_ffmpeg_stderr(&stderr);
        error!("{} failed during {}: {}", tool, action, filtered);
        return Err(MediaError::CommandFailed {
            tool: tool.to_string(),
            detail: filtered,
        });
    }

    Ok(output)
}
