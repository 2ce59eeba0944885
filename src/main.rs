mod audio;
mod cli;
mod config;
mod pipeline;
mod video;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::mpsc;
use std::thread;

use cli::Cli;
use pipeline::{Job, Progress};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect basscut.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("basscut.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("basscut").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("basscut").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.threshold == 0.7 { cli.threshold = cfg.analysis.threshold; }
            if cli.bass_low == 20.0 { cli.bass_low = cfg.analysis.bass_low_hz; }
            if cli.bass_high == 250.0 { cli.bass_high = cfg.analysis.bass_high_hz; }
            if cli.codec == "libx264" { cli.codec = cfg.output.codec; }
            if cli.crf == 18 { cli.crf = cfg.output.crf; }
            if cli.audio_bitrate == "192k" { cli.audio_bitrate = cfg.output.audio_bitrate; }
            if cli.song_gain == 0.5 { cli.song_gain = cfg.mix.song_gain; }
            if cli.video_gain == 0.5 { cli.video_gain = cfg.mix.video_gain; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    for input in [&cli.audio, &cli.video] {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
    }
    if !(0.0..=1.0).contains(&cli.threshold) {
        anyhow::bail!("Threshold must be between 0.0 and 1.0");
    }
    if cli.bass_low >= cli.bass_high {
        anyhow::bail!(
            "Bass band is empty: {:.0}Hz >= {:.0}Hz",
            cli.bass_low,
            cli.bass_high
        );
    }

    log::info!("basscut - bass-synced video cutter");
    log::info!("Audio: {}", cli.audio.display());
    log::info!("Video: {}", cli.video.display());
    log::info!("Output: {}", cli.output.display());
    log::info!(
        "Band: {:.0}-{:.0}Hz, threshold {:.0}%",
        cli.bass_low,
        cli.bass_high,
        cli.threshold * 100.0
    );

    let output = cli.output.clone();
    let job = Job {
        audio: cli.audio,
        video: cli.video,
        output: cli.output,
        threshold: cli.threshold,
        bass_low_hz: cli.bass_low,
        bass_high_hz: cli.bass_high,
        codec: cli.codec,
        crf: cli.crf,
        audio_bitrate: cli.audio_bitrate,
        song_gain: cli.song_gain,
        video_gain: cli.video_gain,
        seed: cli.seed,
        keep_temp: cli.keep_temp,
    };

    let (tx, rx) = mpsc::channel();
    let worker = thread::spawn(move || pipeline::worker(job, tx));

    let mut bar: Option<ProgressBar> = None;
    let mut failure: Option<String> = None;
    for event in rx {
        match event {
            Progress::LoadingVideo { total_clips } => {
                log::info!("{}", Progress::LoadingVideo { total_clips });
                let pb = ProgressBar::new(total_clips as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} clips ({eta} remaining)")
                        .unwrap()
                        .progress_chars("=>-"),
                );
                bar = Some(pb);
            }
            Progress::ClipDone { done, .. } => {
                if let Some(ref pb) = bar {
                    pb.set_position(done as u64);
                }
            }
            Progress::Concatenating => {
                if let Some(pb) = bar.take() {
                    pb.finish();
                }
                log::info!("{}", Progress::Concatenating);
            }
            Progress::Failed(msg) => {
                if let Some(pb) = bar.take() {
                    pb.abandon();
                }
                failure = Some(msg);
            }
            other => log::info!("{}", other),
        }
    }

    if worker.join().is_err() {
        anyhow::bail!("Worker thread panicked");
    }
    if let Some(msg) = failure {
        anyhow::bail!("{}", msg);
    }

    log::info!("Done! Output: {}", output.display());
    Ok(())
}
