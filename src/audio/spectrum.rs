use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

use super::decode::AudioTrack;

const FFT_SIZE: usize = 2048;
const HOP_SIZE: usize = 512;

/// Summed spectral magnitude inside the bass band, one value per STFT frame.
///
/// Frames are centered on `i * hop`, so `frame_time(i)` maps a frame index
/// back to seconds.
pub struct BassCurve {
    pub energy: Vec<f32>,
    hop: usize,
    sample_rate: u32,
}

impl BassCurve {
    pub fn frame_time(&self, frame: usize) -> f64 {
        frame as f64 * self.hop as f64 / self.sample_rate as f64
    }

    pub fn is_empty(&self) -> bool {
        self.energy.is_empty()
    }
}

/// Compute the bass-energy curve of a track: a magnitude STFT restricted to
/// bins whose center frequency falls in `[low_hz, high_hz]`, summed per frame.
pub fn bass_energy(track: &AudioTrack, low_hz: f32, high_hz: f32) -> BassCurve {
    let samples = &track.samples;
    let sr = track.sample_rate;

    if samples.is_empty() {
        return BassCurve {
            energy: Vec::new(),
            hop: HOP_SIZE,
            sample_rate: sr,
        };
    }

    let freq_resolution = sr as f32 / FFT_SIZE as f32;
    let low_bin = (low_hz / freq_resolution).ceil() as usize;
    let high_bin = ((high_hz / freq_resolution).floor() as usize).min(FFT_SIZE / 2 - 1);

    let total_frames = samples.len() / HOP_SIZE + 1;
    let hann = hann_window(FFT_SIZE);

    let energy: Vec<f32> = (0..total_frames)
        .into_par_iter()
        .map(|frame_idx| {
            let center = frame_idx * HOP_SIZE;
            let start = center.saturating_sub(FFT_SIZE / 2);
            let end = (start + FFT_SIZE).min(samples.len());

            // Edge frames are zero-padded
            let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); FFT_SIZE];
            for i in 0..(end - start) {
                buffer[i] = Complex::new(samples[start + i] * hann[i], 0.0);
            }

            // Per-thread FFT planner (rayon-safe)
            let mut planner = FftPlanner::<f32>::new();
            let fft = planner.plan_fft_forward(FFT_SIZE);
            fft.process(&mut buffer);

            if low_bin > high_bin {
                return 0.0;
            }
            buffer[low_bin..=high_bin].iter().map(|c| c.norm()).sum()
        })
        .collect();

    log::info!(
        "Bass curve: {} frames, band {:.0}-{:.0}Hz (bins {}-{})",
        energy.len(),
        low_hz,
        high_hz,
        low_bin,
        high_bin
    );

    BassCurve {
        energy,
        hop: HOP_SIZE,
        sample_rate: sr,
    }
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_track(freq: f32, secs: f32, sr: u32) -> AudioTrack {
        let n = (secs * sr as f32) as usize;
        let samples = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sr as f32).sin() * 0.8)
            .collect();
        AudioTrack {
            samples,
            sample_rate: sr,
        }
    }

    #[test]
    fn empty_input_yields_empty_curve() {
        let track = AudioTrack {
            samples: Vec::new(),
            sample_rate: 22050,
        };
        let curve = bass_energy(&track, 20.0, 250.0);
        assert!(curve.is_empty());
    }

    #[test]
    fn frame_times_follow_hop() {
        let track = sine_track(110.0, 1.0, 22050);
        let curve = bass_energy(&track, 20.0, 250.0);
        assert!((curve.frame_time(0) - 0.0).abs() < 1e-9);
        let expected = 43.0 * HOP_SIZE as f64 / 22050.0;
        assert!((curve.frame_time(43) - expected).abs() < 1e-9);
    }

    #[test]
    fn bass_tone_registers_energy() {
        let track = sine_track(110.0, 1.0, 22050);
        let curve = bass_energy(&track, 20.0, 250.0);
        let max = curve.energy.iter().copied().fold(0.0f32, f32::max);
        assert!(max > 1.0, "110Hz tone should land in the bass band, max={max}");
    }

    #[test]
    fn treble_tone_stays_quiet() {
        let bass = bass_energy(&sine_track(110.0, 1.0, 22050), 20.0, 250.0);
        let treble = bass_energy(&sine_track(5000.0, 1.0, 22050), 20.0, 250.0);
        let bass_max = bass.energy.iter().copied().fold(0.0f32, f32::max);
        let treble_max = treble.energy.iter().copied().fold(0.0f32, f32::max);
        assert!(
            bass_max > treble_max * 10.0,
            "band restriction failed: bass={bass_max}, treble={treble_max}"
        );
    }

    #[test]
    fn frame_count_covers_whole_track() {
        let track = sine_track(110.0, 1.0, 22050);
        let curve = bass_energy(&track, 20.0, 250.0);
        assert_eq!(curve.energy.len(), track.samples.len() / HOP_SIZE + 1);
        let last = curve.energy.len() - 1;
        assert!(curve.frame_time(last) >= track.duration() - HOP_SIZE as f64 / 22050.0);
    }
}
