/*!
 * Tests for subtitle cue handling and SRT rendering
 */

use std::fmt::Write;
use voxweave::subtitle_processor::{SubtitleEntry, SubtitleTrack};
use crate::common;

/// Test the documented timestamp formatting cases
#[test]
fn test_format_timestamp_withKnownValues_shouldFormatExactly() {
    assert_eq!(SubtitleEntry::format_timestamp(125.4), "00:02:05,400");
    assert_eq!(SubtitleEntry::format_timestamp(3661.0), "01:01:01,000");
    assert_eq!(SubtitleEntry::format_timestamp(0.0), "00:00:00,000");
}

/// Test that milliseconds are truncated, never rounded
#[test]
fn test_format_timestamp_withFractionalMillis_shouldTruncate() {
    assert_eq!(SubtitleEntry::format_timestamp(1.9999), "00:00:01,999");
    assert_eq!(SubtitleEntry::format_timestamp(0.0009), "00:00:00,000");
}

/// Test that hours are unbounded
#[test]
fn test_format_timestamp_withOverHundredHours_shouldNotWrap() {
    assert_eq!(SubtitleEntry::format_timestamp(360000.5), "100:00:00,500");
}

/// Test timestamp parsing back to seconds
#[test]
fn test_parse_timestamp_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let secs = SubtitleEntry::parse_timestamp(ts).unwrap();
    assert!((secs - 5025.678).abs() < 1e-9);

    let formatted = SubtitleEntry::format_timestamp(secs);
    assert_eq!(formatted, ts);
}

/// Test parsing rejects malformed timestamps
#[test]
fn test_parse_timestamp_withInvalidInput_shouldReturnError() {
    assert!(SubtitleEntry::parse_timestamp("1:2:3").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:61:00,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("00:00:61,000").is_err());
    assert!(SubtitleEntry::parse_timestamp("not a timestamp").is_err());
}

/// Test subtitle entry display formatting
#[test]
fn test_subtitle_entry_display_withValidEntry_shouldFormatBlock() {
    let entry = SubtitleEntry::new(1, 5.0, 10.0, "Test subtitle".to_string());
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert_eq!(output, "1\n00:00:05,000 --> 00:00:10,000\nTest subtitle\n\n");
}

/// Test validated cue construction rejects bad input
#[test]
fn test_new_validated_withInvalidInput_shouldReturnError() {
    assert!(SubtitleEntry::new_validated(1, 2.0, 2.0, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 3.0, 2.0, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, -0.5, 2.0, "text".to_string()).is_err());
    assert!(SubtitleEntry::new_validated(1, 0.0, 2.0, "   ".to_string()).is_err());
}

/// Test validated cue construction trims text
#[test]
fn test_new_validated_withPaddedText_shouldTrim() {
    let entry = SubtitleEntry::new_validated(1, 0.0, 2.0, "  hello  ".to_string()).unwrap();
    assert_eq!(entry.text, "hello");
}

/// Test parsing a generated SRT string
#[test]
fn test_parse_srt_string_withValidContent_shouldReproduceCues() {
    let content = "1\n00:00:00,000 --> 00:00:01,250\nFirst cue\n\n2\n00:00:01,300 --> 00:00:02,750\nSecond cue\n\n";
    let entries = SubtitleTrack::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq_num, 1);
    assert!((entries[0].end_secs - 1.25).abs() < 1e-9);
    assert_eq!(entries[1].text, "Second cue");
    assert!((entries[1].start_secs - 1.3).abs() < 1e-9);
}

/// Test parsing multi-line cue text
#[test]
fn test_parse_srt_string_withMultiLineText_shouldJoinLines() {
    let content = "1\n00:00:00,000 --> 00:00:02,000\nLine one\nLine two\n\n";
    let entries = SubtitleTrack::parse_srt_string(content).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].text, "Line one\nLine two");
}

/// Test parsing rejects a cue without text
#[test]
fn test_parse_srt_string_withMissingText_shouldReturnError() {
    let content = "1\n00:00:00,000 --> 00:00:02,000\n\n";
    assert!(SubtitleTrack::parse_srt_string(content).is_err());
}

/// Test file round-trip with millisecond-exact times
#[test]
fn test_srt_roundtrip_withExactTimes_shouldReproduceEntries() {
    let temp_dir = common::create_temp_dir().unwrap();
    let srt_path = temp_dir.path().join("subtitles.srt");

    let track = SubtitleTrack {
        entries: vec![
            SubtitleEntry::new(1, 0.0, 1.25, "First cue".to_string()),
            SubtitleEntry::new(2, 1.5, 2.75, "Second cue".to_string()),
        ],
    };
    track.write_to_srt(&srt_path).unwrap();

    let parsed = SubtitleTrack::parse_srt_file(&srt_path).unwrap();
    assert_eq!(parsed.entries.len(), 2);
    for (original, parsed) in track.entries.iter().zip(parsed.entries.iter()) {
        assert_eq!(original.seq_num, parsed.seq_num);
        assert_eq!(original.text, parsed.text);
        assert!((original.start_secs - parsed.start_secs).abs() < 1e-9);
        assert!((original.end_secs - parsed.end_secs).abs() < 1e-9);
    }
}

/// Test file round-trip tolerance for non-millisecond-exact times
#[test]
fn test_srt_roundtrip_withMeasuredTimes_shouldMatchWithinTruncation() {
    let temp_dir = common::create_temp_dir().unwrap();
    let srt_path = temp_dir.path().join("subtitles.srt");

    let track = SubtitleTrack {
        entries: vec![SubtitleEntry::new(1, 1.2, 2.05, "Measured cue".to_string())],
    };
    track.write_to_srt(&srt_path).unwrap();

    let parsed = SubtitleTrack::parse_srt_file(&srt_path).unwrap();
    // Written timecodes truncate to whole milliseconds
    assert!((parsed.entries[0].start_secs - 1.2).abs() < 0.002);
    assert!((parsed.entries[0].end_secs - 2.05).abs() < 0.002);
}
