/// Indices of local maxima in `energy` at or above `threshold_ratio` times the
/// global maximum. Endpoints never qualify, and a flat stretch produces no
/// peaks because the comparison against both neighbours is strict.
pub fn detect_peaks(energy: &[f32], threshold_ratio: f32) -> Vec<usize> {
    if energy.len() < 3 {
        return Vec::new();
    }

    let max = energy.iter().copied().fold(f32::MIN, f32::max);
    if !(max > 0.0) {
        return Vec::new();
    }
    let height = max * threshold_ratio;

    let mut peaks = Vec::new();
    for i in 1..energy.len() - 1 {
        if energy[i] > energy[i - 1] && energy[i] > energy[i + 1] && energy[i] >= height {
            peaks.push(i);
        }
    }
    peaks
}

/// The cut-time sequence: peak timestamps bracketed by 0 and the song
/// duration, sorted. Duplicate timestamps are kept; interval construction
/// downstream skips the resulting zero-length spans.
pub fn cut_times(peak_times: &[f64], song_duration: f64) -> Vec<f64> {
    let mut cuts = Vec::with_capacity(peak_times.len() + 2);
    cuts.push(0.0);
    cuts.extend_from_slice(peak_times);
    cuts.push(song_duration);
    cuts.sort_by(|a, b| a.partial_cmp(b).unwrap());
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_curve_has_no_peaks() {
        assert!(detect_peaks(&[], 0.7).is_empty());
    }

    #[test]
    fn flat_curve_has_no_peaks() {
        assert!(detect_peaks(&[1.0; 64], 0.7).is_empty());
    }

    #[test]
    fn silent_curve_has_no_peaks() {
        assert!(detect_peaks(&[0.0; 64], 0.7).is_empty());
    }

    #[test]
    fn endpoints_are_never_peaks() {
        // Largest values sit at the edges
        let peaks = detect_peaks(&[5.0, 1.0, 2.0, 1.0, 5.0], 0.1);
        assert_eq!(peaks, vec![2]);
    }

    #[test]
    fn threshold_filters_small_maxima() {
        // Local maxima at 2 (10.0) and 5 (4.0); only the first clears 70%
        let energy = [0.0, 5.0, 10.0, 1.0, 2.0, 4.0, 0.0];
        assert_eq!(detect_peaks(&energy, 0.7), vec![2]);
        // Lowering the ratio admits the second
        assert_eq!(detect_peaks(&energy, 0.3), vec![2, 5]);
    }

    #[test]
    fn peak_at_exactly_threshold_is_kept() {
        let energy = [0.0, 7.0, 0.0, 10.0, 0.0];
        assert_eq!(detect_peaks(&energy, 0.7), vec![1, 3]);
    }

    #[test]
    fn cuts_bracket_and_sort() {
        let cuts = cut_times(&[6.0, 2.0], 10.0);
        assert_eq!(cuts, vec![0.0, 2.0, 6.0, 10.0]);
    }

    #[test]
    fn cuts_without_peaks_span_whole_song() {
        assert_eq!(cut_times(&[], 10.0), vec![0.0, 10.0]);
    }

    #[test]
    fn duplicate_peak_times_are_preserved() {
        let cuts = cut_times(&[4.0, 4.0], 8.0);
        assert_eq!(cuts, vec![0.0, 4.0, 4.0, 8.0]);
    }
}
