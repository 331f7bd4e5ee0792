/*!
 * End-to-end narration rendering tests.
 *
 * These drive the real render path — provider call, WAV persistence,
 * duration probe, timeline fold, SRT emission — with the mock engine, so
 * no network or external tool is involved.
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use voxweave::providers::mock::MockSpeech;
use voxweave::subtitle_processor::SubtitleTrack;
use voxweave::timeline::{render_narration, LINE_GAP_SECS};
use crate::common;

const EPSILON: f64 = 1e-9;

/// Test the full render path over known clip durations
#[tokio::test]
async fn test_render_narration_withKnownDurations_shouldProduceExpectedTimeline() {
    let temp_dir = common::create_temp_dir().unwrap();
    let lines = common::script_lines(&["First line.", "Second line.", "Third line."]);
    let provider = MockSpeech::with_durations(vec![1.2, 0.8, 2.0]);

    let timeline = render_narration(&lines, &provider, temp_dir.path(), |_| {})
        .await
        .unwrap();

    assert_eq!(timeline.cues.len(), 3);

    let expected_starts = [0.0, 1.25, 2.10];
    let expected_ends = [1.2, 2.05, 4.10];
    for (i, cue) in timeline.cues.iter().enumerate() {
        assert_eq!(cue.seq_num, i + 1);
        assert!((cue.start_secs - expected_starts[i]).abs() < EPSILON);
        assert!((cue.end_secs - expected_ends[i]).abs() < EPSILON);
    }

    // Audio artifacts are persisted in cue order under the original naming
    for (i, segment) in timeline.segments.iter().enumerate() {
        assert_eq!(
            segment.audio_path.file_name().unwrap().to_string_lossy(),
            format!("audio_{:03}.wav", i)
        );
        assert!(segment.audio_path.exists());
    }
}

/// Test the skip policy: a failing line leaves no hole in timing or numbering
#[tokio::test]
async fn test_render_narration_withFailingLine_shouldSkipAndRenumber() {
    let temp_dir = common::create_temp_dir().unwrap();
    let lines = common::script_lines(&["First line.", "Second line.", "Third line."]);
    // Fails every second request: line 2 of 3 is dropped
    let provider = MockSpeech::intermittent(2, vec![1.0]);

    let timeline = render_narration(&lines, &provider, temp_dir.path(), |_| {})
        .await
        .unwrap();

    assert_eq!(timeline.cues.len(), 2);
    assert_eq!(timeline.cues[0].seq_num, 1);
    assert_eq!(timeline.cues[1].seq_num, 2);
    assert_eq!(timeline.cues[0].text, "First line.");
    assert_eq!(timeline.cues[1].text, "Third line.");

    // Contiguous timing: the cursor did not advance for the missing line
    assert!(timeline.cues[0].start_secs.abs() < EPSILON);
    let expected_start = timeline.cues[0].end_secs + LINE_GAP_SECS;
    assert!((timeline.cues[1].start_secs - expected_start).abs() < EPSILON);

    // The skipped line produced no artifact
    assert!(temp_dir.path().join("audio_000.wav").exists());
    assert!(!temp_dir.path().join("audio_001.wav").exists());
    assert!(temp_dir.path().join("audio_002.wav").exists());
}

/// Test that an engine failing on every line yields an empty timeline
#[tokio::test]
async fn test_render_narration_withAlwaysFailingEngine_shouldYieldEmptyTimeline() {
    let temp_dir = common::create_temp_dir().unwrap();
    let lines = common::script_lines(&["First line.", "Second line."]);
    let provider = MockSpeech::failing();

    let timeline = render_narration(&lines, &provider, temp_dir.path(), |_| {})
        .await
        .unwrap();

    assert!(timeline.is_empty());
    assert_eq!(timeline.narration_end(), 0.0);
}

/// Test progress reporting counts every line, skipped or not
#[tokio::test]
async fn test_render_narration_withProgressCallback_shouldCountAllLines() {
    let temp_dir = common::create_temp_dir().unwrap();
    let lines = common::script_lines(&["One.", "Two.", "Three.", "Four."]);
    let provider = MockSpeech::intermittent(2, vec![0.5]);

    let observed = AtomicUsize::new(0);
    render_narration(&lines, &provider, temp_dir.path(), |done| {
        observed.store(done, Ordering::SeqCst);
    })
    .await
    .unwrap();

    assert_eq!(observed.load(Ordering::SeqCst), 4);
}

/// Test the emitted SRT artifact round-trips through the parser
#[tokio::test]
async fn test_render_narration_withSrtEmission_shouldRoundTrip() {
    let temp_dir = common::create_temp_dir().unwrap();
    let lines = common::script_lines(&["First line.", "Second line."]);
    let provider = MockSpeech::with_durations(vec![1.5, 0.75]);

    let timeline = render_narration(&lines, &provider, temp_dir.path(), |_| {})
        .await
        .unwrap();

    let srt_path = temp_dir.path().join("subtitles.srt");
    timeline.subtitle_track().write_to_srt(&srt_path).unwrap();

    let parsed = SubtitleTrack::parse_srt_file(&srt_path).unwrap();
    assert_eq!(parsed.entries.len(), timeline.cues.len());
    for (cue, parsed_cue) in timeline.cues.iter().zip(parsed.entries.iter()) {
        assert_eq!(cue.seq_num, parsed_cue.seq_num);
        assert_eq!(cue.text, parsed_cue.text);
        // Timecodes truncate to whole milliseconds on the way out
        assert!((cue.start_secs - parsed_cue.start_secs).abs() < 0.002);
        assert!((cue.end_secs - parsed_cue.end_secs).abs() < 0.002);
    }
}
