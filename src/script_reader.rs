use anyhow::{Result, anyhow};
use std::path::Path;

use crate::file_utils::FileManager;

// @module: Script file reading and line extraction

/// A single retained line of the narration script.
///
/// Ordinals are 1-based and assigned after blank-line filtering, so the
/// surviving sequence is always densely numbered.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    // @field: 1-based position among retained lines
    pub ordinal: usize,

    // @field: Exact utterance text, surrounding whitespace trimmed
    pub text: String,
}

/// Parse script content into retained lines.
///
/// One utterance per line; lines that are empty or whitespace-only are
/// discarded before ordinals are assigned and do not consume an index.
pub fn parse_script(content: &str) -> Vec<ScriptLine> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| ScriptLine {
            ordinal: i + 1,
            text: line.to_string(),
        })
        .collect()
}

/// Read a script file and return its retained lines
pub fn read_script<P: AsRef<Path>>(path: P) -> Result<Vec<ScriptLine>> {
    let path = path.as_ref();

    if !FileManager::file_exists(path) {
        return Err(anyhow!("Script file does not exist: {:?}", path));
    }

    let content = FileManager::read_to_string(path)?;
    Ok(parse_script(&content))
}
