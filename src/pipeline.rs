use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;

use crate::audio::{decode, peaks, spectrum};
use crate::video::{ffmpeg, plan, probe};

/// Everything one run needs. Consumed by the worker, so a second run cannot
/// share state with the first.
#[derive(Debug)]
pub struct Job {
    pub audio: PathBuf,
    pub video: PathBuf,
    pub output: PathBuf,
    pub threshold: f32,
    pub bass_low_hz: f32,
    pub bass_high_hz: f32,
    pub codec: String,
    pub crf: u32,
    pub audio_bitrate: String,
    pub song_gain: f32,
    pub video_gain: f32,
    pub seed: Option<u64>,
    pub keep_temp: bool,
}

/// One-way status events for the presentation thread. Emitted in a fixed
/// stage order, terminated by `Completed` or a single `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    Analyzing,
    DetectingPeaks,
    LoadingVideo { total_clips: usize },
    ClipDone { done: usize, total: usize },
    Concatenating,
    MergingAudio,
    Saving,
    Completed,
    Failed(String),
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Progress::Analyzing => write!(f, "Calculating STFT..."),
            Progress::DetectingPeaks => write!(f, "Detecting peak points..."),
            Progress::LoadingVideo { .. } => write!(f, "Loading video..."),
            Progress::ClipDone { done, total } => {
                write!(f, "{}/{} clips processed...", done, total)
            }
            Progress::Concatenating => write!(f, "Concatenating clips..."),
            Progress::MergingAudio => write!(f, "Merging audio..."),
            Progress::Saving => write!(f, "Saving video..."),
            Progress::Completed => write!(f, "Process completed!"),
            Progress::Failed(msg) => write!(f, "An error occurred: {}", msg),
        }
    }
}

/// Worker-thread entry point: any pipeline error becomes one terminal
/// `Failed` event. Send failures are ignored, the receiver may be gone.
pub fn worker(job: Job, progress: Sender<Progress>) {
    if let Err(err) = run(&job, &progress) {
        let _ = progress.send(Progress::Failed(format!("{err:#}")));
    }
}

pub fn run(job: &Job, progress: &Sender<Progress>) -> Result<()> {
    let _ = progress.send(Progress::Analyzing);
    let track = decode::decode_audio(&job.audio)?;
    let song_duration = track.duration();
    let curve = spectrum::bass_energy(&track, job.bass_low_hz, job.bass_high_hz);
    if curve.is_empty() {
        anyhow::bail!("Audio track is empty: {}", job.audio.display());
    }

    let _ = progress.send(Progress::DetectingPeaks);
    let peak_times: Vec<f64> = peaks::detect_peaks(&curve.energy, job.threshold)
        .into_iter()
        .map(|i| curve.frame_time(i))
        .collect();
    let cuts = peaks::cut_times(&peak_times, song_duration);
    log::info!(
        "Detected {} peaks over {:.1}s of audio",
        peak_times.len(),
        song_duration
    );

    let total_clips = cuts.windows(2).filter(|w| w[1] - w[0] > 0.0).count();
    let _ = progress.send(Progress::LoadingVideo { total_clips });
    let meta = probe::probe_video(&job.video)?;
    log::info!(
        "Video: {:.1}s @ {:.2}fps, {}x{}",
        meta.duration,
        meta.frame_rate,
        meta.width,
        meta.height
    );

    let mut rng = match job.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let segments = plan::plan_segments(&cuts, meta.duration, &mut rng);

    let parts_dir = std::env::temp_dir().join(format!("basscut_{}", std::process::id()));
    std::fs::create_dir_all(&parts_dir)
        .with_context(|| format!("Failed to create work dir: {}", parts_dir.display()))?;

    let settings = ffmpeg::EncodeSettings {
        codec: job.codec.clone(),
        crf: job.crf,
        audio_bitrate: job.audio_bitrate.clone(),
        frame_rate: meta.frame_rate,
    };

    let mut parts = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        let part = parts_dir.join(format!("part_{i:04}.mp4"));
        ffmpeg::extract(&job.video, segment, &settings, &part).with_context(|| {
            format!(
                "Failed to extract clip {} ({:.2}s-{:.2}s)",
                i + 1,
                segment.source_start,
                segment.source_end
            )
        })?;
        parts.push(part);
        let _ = progress.send(Progress::ClipDone {
            done: i + 1,
            total: segments.len(),
        });
    }

    let _ = progress.send(Progress::Concatenating);
    let concat_path = parts_dir.join("concat.mp4");
    ffmpeg::concat(&parts, &concat_path).context("Failed to concatenate clips")?;

    let _ = progress.send(Progress::MergingAudio);
    let concat_meta =
        probe::probe_video(&concat_path).context("Failed to probe concatenated video")?;
    if !concat_meta.has_audio {
        log::warn!("Source video has no audio stream, mixing the song alone");
    }

    let _ = progress.send(Progress::Saving);
    ffmpeg::mix_audio(
        &concat_path,
        &job.audio,
        &job.output,
        concat_meta.has_audio,
        job.video_gain,
        job.song_gain,
        &job.audio_bitrate,
    )
    .context("Failed to write output video")?;

    if job.keep_temp {
        log::info!("Keeping intermediate clips in {}", parts_dir.display());
    } else {
        let _ = std::fs::remove_dir_all(&parts_dir);
    }

    let _ = progress.send(Progress::Completed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_messages_match_the_reporting_contract() {
        assert_eq!(Progress::Analyzing.to_string(), "Calculating STFT...");
        assert_eq!(Progress::DetectingPeaks.to_string(), "Detecting peak points...");
        assert_eq!(
            Progress::LoadingVideo { total_clips: 4 }.to_string(),
            "Loading video..."
        );
        assert_eq!(
            Progress::ClipDone { done: 3, total: 12 }.to_string(),
            "3/12 clips processed..."
        );
        assert_eq!(Progress::Concatenating.to_string(), "Concatenating clips...");
        assert_eq!(Progress::MergingAudio.to_string(), "Merging audio...");
        assert_eq!(Progress::Saving.to_string(), "Saving video...");
        assert_eq!(Progress::Completed.to_string(), "Process completed!");
        assert_eq!(
            Progress::Failed("boom".into()).to_string(),
            "An error occurred: boom"
        );
    }

    #[test]
    fn worker_reports_one_failure_event() {
        let job = Job {
            audio: PathBuf::from("/no/such/song.mp3"),
            video: PathBuf::from("/no/such/clip.mp4"),
            output: PathBuf::from("/tmp/out.mp4"),
            threshold: 0.7,
            bass_low_hz: 20.0,
            bass_high_hz: 250.0,
            codec: "libx264".into(),
            crf: 18,
            audio_bitrate: "192k".into(),
            song_gain: 0.5,
            video_gain: 0.5,
            seed: Some(1),
            keep_temp: false,
        };

        let (tx, rx) = std::sync::mpsc::channel();
        worker(job, tx);

        let events: Vec<Progress> = rx.iter().collect();
        let failures = events
            .iter()
            .filter(|e| matches!(e, Progress::Failed(_)))
            .count();
        assert_eq!(failures, 1);
        assert!(matches!(events.last(), Some(Progress::Failed(_))));
        assert_eq!(events[0], Progress::Analyzing);
    }
}
