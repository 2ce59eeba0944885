use serde_json::Value;
use std::path::Path;

use super::{run_tool, VideoError};

#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub duration: f64,
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
    pub has_audio: bool,
}

pub fn probe_video(path: &Path) -> Result<VideoMetadata, VideoError> {
    if !path.exists() {
        return Err(VideoError::NotFound(path.to_path_buf()));
    }

    let args: Vec<String> = [
        "-v",
        "quiet",
        "-print_format",
        "json",
        "-show_format",
        "-show_streams",
    ]
    .iter()
    .map(|s| s.to_string())
    .chain(std::iter::once(path.to_string_lossy().into_owned()))
    .collect();

    let stdout = run_tool("ffprobe", &args)?;

    let json: Value = serde_json::from_slice(&stdout).map_err(|e| VideoError::BadProbe {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let bad = |reason: &str| VideoError::BadProbe {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let streams = json["streams"].as_array().ok_or_else(|| bad("no streams"))?;

    let video_stream = streams
        .iter()
        .find(|s| s["codec_type"].as_str() == Some("video"))
        .ok_or_else(|| VideoError::NoVideoStream(path.to_path_buf()))?;

    let has_audio = streams
        .iter()
        .any(|s| s["codec_type"].as_str() == Some("audio"));

    let duration = json["format"]["duration"]
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| {
            video_stream["duration"]
                .as_str()
                .and_then(|s| s.parse().ok())
        })
        .ok_or_else(|| bad("missing duration"))?;

    // r_frame_rate can be "0/0" on odd containers; fall back to avg_frame_rate
    let frame_rate = video_stream["r_frame_rate"]
        .as_str()
        .and_then(parse_frame_rate)
        .or_else(|| {
            video_stream["avg_frame_rate"]
                .as_str()
                .and_then(parse_frame_rate)
        })
        .ok_or_else(|| bad("missing frame rate"))?;

    Ok(VideoMetadata {
        duration,
        frame_rate,
        width: video_stream["width"].as_u64().unwrap_or(0) as u32,
        height: video_stream["height"].as_u64().unwrap_or(0) as u32,
        has_audio,
    })
}

/// Parse ffprobe's frame rate, either rational ("30000/1001") or decimal.
fn parse_frame_rate(raw: &str) -> Option<f64> {
    let value = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => raw.parse().ok()?,
    };
    (value > 0.0).then_some(value)
}
