use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "basscut", about = "Cuts a video to the bass peaks of a song")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub audio: PathBuf,

    /// Source video file
    pub video: PathBuf,

    /// Output video file
    #[arg(short, long, default_value = "output.mp4")]
    pub output: PathBuf,

    /// Peak threshold as a fraction of the bass-energy maximum (0.0-1.0)
    #[arg(long, default_value_t = 0.7)]
    pub threshold: f32,

    /// Lower edge of the bass band in Hz
    #[arg(long, default_value_t = 20.0)]
    pub bass_low: f32,

    /// Upper edge of the bass band in Hz
    #[arg(long, default_value_t = 250.0)]
    pub bass_high: f32,

    /// FFmpeg video codec for segment extraction
    #[arg(long, default_value = "libx264")]
    pub codec: String,

    /// H.264 CRF quality (0-51, lower = better)
    #[arg(long, default_value_t = 18)]
    pub crf: u32,

    /// Output audio bitrate (e.g. 192k)
    #[arg(long, default_value = "192k")]
    pub audio_bitrate: String,

    /// Volume applied to the song before mixing (0.0-1.0)
    #[arg(long, default_value_t = 0.5)]
    pub song_gain: f32,

    /// Volume applied to the video's native audio before mixing (0.0-1.0)
    #[arg(long, default_value_t = 0.5)]
    pub video_gain: f32,

    /// Seed for segment sampling (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Keep the intermediate clip directory instead of removing it
    #[arg(long)]
    pub keep_temp: bool,

    /// Config file path (defaults to basscut.toml / ~/.config/basscut/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
