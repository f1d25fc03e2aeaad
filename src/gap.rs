use crate::segment::Segment;

/// Which end of history the continuous series is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollType {
    /// Anchor the most recent contract; older history shifts to meet it.
    #[default]
    Backward,
    /// Anchor the earliest contract; later history shifts to meet it.
    Forward,
}

/// Price discontinuity at each segment boundary: the incoming contract's
/// first reference price minus the outgoing contract's final one. Length is
/// one less than the segment count; no gap exists before the first segment
/// or after the last.
pub fn roll_gaps(last: &[f64], segments: &[Segment]) -> Vec<f64> {
    segments
        .windows(2)
        .map(|w| last[w[1].start] - last[w[0].end - 1])
        .collect()
}

/// Per-segment adjustment scalar from the boundary gaps.
///
/// Backward: suffix sums, so the final segment gets 0 and the adjusted
/// series matches raw prices at the end of history. Forward: negated
/// prefix sums shifted by one, so the first segment gets 0.
pub fn segment_adjustments(gaps: &[f64], roll_type: RollType) -> Vec<f64> {
    let mut adj = vec![0.0; gaps.len() + 1];
    match roll_type {
        RollType::Backward => {
            let mut acc = 0.0;
            for k in (0..gaps.len()).rev() {
                acc += gaps[k];
                adj[k] = acc;
            }
        }
        RollType::Forward => {
            let mut acc = 0.0;
            for (k, gap) in gaps.iter().enumerate() {
                acc += gap;
                adj[k + 1] = -acc;
            }
        }
    }
    adj
}
