use anyhow::{Result, anyhow};

// @module: Background clip loop planning

/// Whole-loop repetition plan for covering a target duration with a
/// fixed-length clip.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopPlan {
    // @field: Duration of the source clip in seconds
    pub source_duration: f64,

    // @field: Duration the looped result must cover, in seconds
    pub target_duration: f64,

    // @field: Number of whole repetitions of the source clip
    pub repeat_count: u32,
}

impl LoopPlan {
    /// Compute the repetition plan for a source clip and target duration.
    ///
    /// `repeat_count` is `floor(target / source) + 1`: one loop more than
    /// strictly necessary, even when the target is an exact multiple of
    /// the source. The looped material is therefore always at least one
    /// clip longer than the target and downstream trimming can cut it to
    /// size without ever running short.
    pub fn plan(source_duration: f64, target_duration: f64) -> Result<Self> {
        if source_duration <= 0.0 {
            return Err(anyhow!(
                "Source clip duration must be positive, got {}",
                source_duration
            ));
        }

        if target_duration < 0.0 {
            return Err(anyhow!(
                "Target duration must be non-negative, got {}",
                target_duration
            ));
        }

        let repeat_count = (target_duration / source_duration).floor() as u32 + 1;

        Ok(LoopPlan {
            source_duration,
            target_duration,
            repeat_count,
        })
    }

    /// Total duration of the looped material in seconds
    pub fn covered_duration(&self) -> f64 {
        self.repeat_count as f64 * self.source_duration
    }
}
