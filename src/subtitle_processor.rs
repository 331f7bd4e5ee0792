use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context, anyhow};

// @module: Subtitle cue handling and SRT rendering

// @const: SRT timestamp regex
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2,}):(\d{2}):(\d{2}),(\d{3}) --> (\d{2,}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

// @struct: Single subtitle cue
#[derive(Debug, Clone)]
pub struct SubtitleEntry {
    // @field: Display index, 1-based over emitted cues
    pub seq_num: usize,

    // @field: Start time in seconds
    pub start_secs: f64,

    // @field: End time in seconds
    pub end_secs: f64,

    // @field: Cue text
    pub text: String,
}

impl SubtitleEntry {
    /// Create a new subtitle cue
    pub fn new(seq_num: usize, start_secs: f64, end_secs: f64, text: String) -> Self {
        SubtitleEntry {
            seq_num,
            start_secs,
            end_secs,
            text,
        }
    }

    // @creates: Validated subtitle cue
    // @validates: Time range and non-empty text
    pub fn new_validated(seq_num: usize, start_secs: f64, end_secs: f64, text: String) -> Result<Self> {
        if start_secs < 0.0 {
            return Err(anyhow!("Negative start time {} for cue {}", start_secs, seq_num));
        }

        if end_secs <= start_secs {
            return Err(anyhow!(
                "Invalid time range: end time {} <= start time {}",
                end_secs, start_secs
            ));
        }

        let trimmed_text = text.trim();
        if trimmed_text.is_empty() {
            return Err(anyhow!("Empty cue text for entry {}", seq_num));
        }

        Ok(SubtitleEntry {
            seq_num,
            start_secs,
            end_secs,
            text: trimmed_text.to_string(),
        })
    }

    /// Parse an SRT timestamp to seconds
    pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
        // Parse HH:MM:SS,mmm format
        let parts: Vec<&str> = timestamp.split(&[':', ','][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
        let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
        let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
        let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        let total_ms = hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis;
        Ok(total_ms as f64 / 1000.0)
    }

    /// Convert start time to a formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_secs)
    }

    /// Convert end time to a formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_secs)
    }

    /// Format a time in seconds to SRT format (HH:MM:SS,mmm).
    ///
    /// Whole milliseconds are taken by truncation, not rounding, so the
    /// written timecode never overshoots the measured time.
    pub fn format_timestamp(seconds: f64) -> String {
        let ms = (seconds * 1000.0) as u64;

        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let secs = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Ordered collection of subtitle cues
#[derive(Debug, Default)]
pub struct SubtitleTrack {
    /// Cues in display order
    pub entries: Vec<SubtitleEntry>,
}

impl SubtitleTrack {
    /// Create an empty track
    pub fn new() -> Self {
        SubtitleTrack { entries: Vec::new() }
    }

    /// Write the track to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;

        for entry in &self.entries {
            write!(file, "{}", entry)?;
        }

        Ok(())
    }

    /// Parse SRT content into cues.
    ///
    /// Used to verify generated artifacts round-trip; tolerant of extra
    /// blank lines between blocks.
    pub fn parse_srt_string(content: &str) -> Result<Vec<SubtitleEntry>> {
        let mut entries = Vec::new();
        let mut lines = content.lines().peekable();

        while let Some(line) = lines.next() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let seq_num: usize = line.parse()
                .with_context(|| format!("Invalid cue index line: {}", line))?;

            let timing_line = lines.next()
                .ok_or_else(|| anyhow!("Missing timing line for cue {}", seq_num))?;

            let caps = TIMESTAMP_REGEX.captures(timing_line)
                .ok_or_else(|| anyhow!("Invalid timing line for cue {}: {}", seq_num, timing_line))?;

            let start_secs = SubtitleEntry::parse_timestamp(
                &format!("{}:{}:{},{}", &caps[1], &caps[2], &caps[3], &caps[4]))?;
            let end_secs = SubtitleEntry::parse_timestamp(
                &format!("{}:{}:{},{}", &caps[5], &caps[6], &caps[7], &caps[8]))?;

            let mut text_lines = Vec::new();
            while let Some(next) = lines.peek() {
                if next.trim().is_empty() {
                    break;
                }
                text_lines.push(next.trim_end());
                lines.next();
            }

            if text_lines.is_empty() {
                return Err(anyhow!("Cue {} has no text", seq_num));
            }

            entries.push(SubtitleEntry::new(
                seq_num,
                start_secs,
                end_secs,
                text_lines.join("\n"),
            ));
        }

        Ok(entries)
    }

    /// Parse an SRT file into a track
    pub fn parse_srt_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read subtitle file: {:?}", path.as_ref()))?;

        let entries = Self::parse_srt_string(&content)?;
        Ok(SubtitleTrack { entries })
    }
}
