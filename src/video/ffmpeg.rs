use std::path::Path;

use super::plan::Segment;
use super::{run_tool, VideoError};

/// Encoding knobs shared by every extraction so the parts can be
/// concatenated with stream copy afterwards.
#[derive(Debug, Clone)]
pub struct EncodeSettings {
    pub codec: String,
    pub crf: u32,
    pub audio_bitrate: String,
    pub frame_rate: f64,
}

/// Re-encode one source range into a standalone clip.
pub fn extract(
    source: &Path,
    segment: &Segment,
    settings: &EncodeSettings,
    out: &Path,
) -> Result<(), VideoError> {
    let args: Vec<String> = vec![
        "-y".into(),
        "-ss".into(),
        format!("{:.3}", segment.source_start),
        "-i".into(),
        source.to_string_lossy().into_owned(),
        "-t".into(),
        format!("{:.3}", segment.duration()),
        "-r".into(),
        format!("{:.3}", settings.frame_rate),
        "-c:v".into(),
        settings.codec.clone(),
        "-preset".into(),
        "medium".into(),
        "-crf".into(),
        settings.crf.to_string(),
        "-pix_fmt".into(),
        "yuv420p".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        settings.audio_bitrate.clone(),
        out.to_string_lossy().into_owned(),
    ];

    run_tool("ffmpeg", &args)?;
    Ok(())
}

/// Join uniformly encoded parts with the concat demuxer, stream-copied.
pub fn concat(parts: &[std::path::PathBuf], out: &Path) -> Result<(), VideoError> {
    let list_path = out.with_extension("txt");
    let mut list = String::new();
    for part in parts {
        list.push_str(&format!("file '{}'\n", part.to_string_lossy()));
    }
    std::fs::write(&list_path, &list)?;

    let args: Vec<String> = vec![
        "-y".into(),
        "-f".into(),
        "concat".into(),
        "-safe".into(),
        "0".into(),
        "-i".into(),
        list_path.to_string_lossy().into_owned(),
        "-c".into(),
        "copy".into(),
        out.to_string_lossy().into_owned(),
    ];

    let result = run_tool("ffmpeg", &args);
    let _ = std::fs::remove_file(&list_path);
    result?;
    Ok(())
}

/// Replace the concatenated video's audio with a two-source blend: its native
/// track and the song, each volume-scaled, mixed down to the video's length.
/// A video without a native audio stream gets the song alone.
pub fn mix_audio(
    video: &Path,
    song: &Path,
    out: &Path,
    video_has_audio: bool,
    video_gain: f32,
    song_gain: f32,
    audio_bitrate: &str,
) -> Result<(), VideoError> {
    let filter = if video_has_audio {
        format!(
            "[0:a:0]volume={video_gain}[va];[1:a:0]volume={song_gain}[sa];\
             [va][sa]amix=inputs=2:duration=first:normalize=0[aout]"
        )
    } else {
        format!("[1:a:0]volume={song_gain}[aout]")
    };

    let mut args: Vec<String> = vec![
        "-y".into(),
        "-i".into(),
        video.to_string_lossy().into_owned(),
        "-i".into(),
        song.to_string_lossy().into_owned(),
        "-filter_complex".into(),
        filter,
        "-map".into(),
        "0:v:0".into(),
        "-map".into(),
        "[aout]".into(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
        "-b:a".into(),
        audio_bitrate.into(),
    ];

    if !video_has_audio {
        // amix's duration=first does the trimming when mixing; with the song
        // alone the video stream has to bound the output instead
        args.push("-shortest".into());
    }

    args.push(out.to_string_lossy().into_owned());

    run_tool("ffmpeg", &args)?;
    Ok(())
}
