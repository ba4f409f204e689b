//! Chunk count and duration calculation.
//!
//! The plan is an estimate: the encoded size of a chunk is unknown until
//! it is exported, because bitrate and content affect it. The safety
//! factor deliberately over-provisions instead of attempting an exact
//! closed-form split; chunk size is verified after export.

use serde::{Deserialize, Serialize};

/// A computed splitting plan for one media file.
///
/// Derived deterministically from file size, duration, and the byte
/// ceiling. Invariant: `chunk_duration_ms * chunk_count >= duration_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPlan {
    /// Number of chunks to export (>= 1).
    pub chunk_count: u64,
    /// Duration of each chunk in milliseconds (last chunk may be shorter).
    pub chunk_duration_ms: u64,
    /// Byte ceiling each exported chunk should stay under.
    pub max_chunk_bytes: u64,
}

/// One chunk's time range, derived from a [`SplitPlan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpan {
    /// 1-based, contiguous chunk index.
    pub index: u64,
    /// Inclusive start of the range in milliseconds.
    pub start_ms: u64,
    /// Exclusive end of the range in milliseconds.
    pub end_ms: u64,
}

impl SplitPlan {
    /// Time ranges for each chunk, in index order.
    ///
    /// Spans cover `[0, duration_ms)` contiguously with no gaps or
    /// overlaps; the final span is clamped to the total duration.
    pub fn spans(&self, duration_ms: u64) -> Vec<ChunkSpan> {
        (0..self.chunk_count)
            .map(|i| ChunkSpan {
                index: i + 1,
                start_ms: i * self.chunk_duration_ms,
                end_ms: ((i + 1) * self.chunk_duration_ms).min(duration_ms),
            })
            .collect()
    }
}

/// Compute a splitting plan.
///
/// Target chunk duration is derived from the file's average bytes per
/// millisecond, scaled down by `safety_factor`. Degenerate inputs fall
/// back to splitting in half rather than erroring:
/// - zero duration: two equal (empty) halves
/// - computed duration of zero: `duration_ms / 2`
pub fn compute_plan(
    size_bytes: u64,
    duration_ms: u64,
    max_chunk_bytes: u64,
    safety_factor: f64,
) -> SplitPlan {
    if duration_ms == 0 {
        return SplitPlan {
            chunk_count: 2,
            chunk_duration_ms: 0,
            max_chunk_bytes,
        };
    }

    let bytes_per_ms = size_bytes as f64 / duration_ms as f64;
    let mut chunk_duration_ms = if bytes_per_ms > 0.0 {
        ((max_chunk_bytes as f64 / bytes_per_ms) * safety_factor) as u64
    } else {
        duration_ms
    };

    if chunk_duration_ms == 0 {
        chunk_duration_ms = duration_ms / 2;
    }
    if chunk_duration_ms == 0 {
        chunk_duration_ms = 1;
    }

    SplitPlan {
        chunk_count: duration_ms.div_ceil(chunk_duration_ms),
        chunk_duration_ms,
        max_chunk_bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MB: u64 = 1024 * 1024;

    #[test]
    fn plans_three_chunks_for_large_file() {
        // 50 MB over 10 minutes against a 20 MB ceiling.
        let plan = compute_plan(50 * MB, 600_000, 20 * MB, 0.9);

        assert_eq!(plan.chunk_duration_ms, 216_000);
        assert_eq!(plan.chunk_count, 3);
    }

    #[test]
    fn spans_cover_duration_without_gaps_or_overlaps() {
        let duration_ms = 600_000;
        let plan = compute_plan(50 * MB, duration_ms, 20 * MB, 0.9);
        let spans = plan.spans(duration_ms);

        assert_eq!(spans.len(), plan.chunk_count as usize);
        assert_eq!(spans[0].start_ms, 0);
        assert_eq!(spans.last().unwrap().end_ms, duration_ms);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end_ms, pair[1].start_ms);
        }
        for span in &spans {
            assert!(span.start_ms < span.end_ms);
            assert!(span.end_ms <= duration_ms);
        }
    }

    #[test]
    fn indices_are_one_based_and_contiguous() {
        let plan = compute_plan(100 * MB, 3_600_000, 20 * MB, 0.9);
        let spans = plan.spans(3_600_000);

        for (i, span) in spans.iter().enumerate() {
            assert_eq!(span.index, i as u64 + 1);
        }
    }

    #[test]
    fn chunk_count_is_ceiling_of_duration_over_chunk_duration() {
        for (size, duration) in [
            (30 * MB, 180_000),
            (26 * MB, 3_700_001),
            (500 * MB, 7_200_000),
            (21 * MB, 59_999),
        ] {
            let plan = compute_plan(size, duration, 20 * MB, 0.9);
            assert_eq!(
                plan.chunk_count,
                duration.div_ceil(plan.chunk_duration_ms),
                "size={} duration={}",
                size,
                duration
            );
            assert!(plan.chunk_count * plan.chunk_duration_ms >= duration);
        }
    }

    #[test]
    fn zero_duration_falls_back_to_two_halves() {
        let plan = compute_plan(50 * MB, 0, 20 * MB, 0.9);

        assert_eq!(plan.chunk_count, 2);
        assert_eq!(plan.chunk_duration_ms, 0);
    }

    #[test]
    fn tiny_computed_duration_falls_back_to_half() {
        // Absurdly dense file: 20 GiB in one second. The bytes/ms
        // estimate yields a sub-millisecond target, so the plan halves
        // instead.
        let plan = compute_plan(20 * 1024 * MB, 1_000, 20 * MB, 0.9);

        assert_eq!(plan.chunk_duration_ms, 500);
        assert_eq!(plan.chunk_count, 2);
    }
}
