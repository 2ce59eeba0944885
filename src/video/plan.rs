use rand::Rng;

/// One extraction from the source video. Its duration matches the cut
/// interval it was planned for, except when the interval outruns the source
/// (see `plan_segments`).
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub source_start: f64,
    pub source_end: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.source_end - self.source_start
    }
}

/// Map consecutive cut times onto randomly placed source ranges.
///
/// Zero- and negative-length intervals (duplicate cut timestamps) are
/// skipped. The start offset is drawn uniformly from
/// `[0, video_duration - wanted]`; when the interval is longer than the whole
/// video the draw degenerates to 0 and the segment end is clamped to the
/// source bounds.
pub fn plan_segments<R: Rng>(cuts: &[f64], video_duration: f64, rng: &mut R) -> Vec<Segment> {
    let mut segments = Vec::new();

    for pair in cuts.windows(2) {
        let wanted = pair[1] - pair[0];
        if wanted <= 0.0 {
            continue;
        }

        let max_start = (video_duration - wanted).max(0.0);
        let start = if max_start > 0.0 {
            rng.random_range(0.0..=max_start)
        } else {
            0.0
        };
        let end = (start + wanted).min(video_duration);

        if end - start + 1e-9 < wanted {
            log::warn!(
                "Interval of {:.2}s exceeds video length {:.2}s, clamping",
                wanted,
                video_duration
            );
        }

        segments.push(Segment {
            source_start: start,
            source_end: end,
        });
    }

    segments
}
