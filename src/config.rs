use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub mix: MixConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_bass_low")]
    pub bass_low_hz: f32,
    #[serde(default = "default_bass_high")]
    pub bass_high_hz: f32,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_codec")]
    pub codec: String,
    #[serde(default = "default_crf")]
    pub crf: u32,
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,
}

#[derive(Debug, Deserialize)]
pub struct MixConfig {
    #[serde(default = "default_gain")]
    pub song_gain: f32,
    #[serde(default = "default_gain")]
    pub video_gain: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            bass_low_hz: default_bass_low(),
            bass_high_hz: default_bass_high(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            codec: default_codec(),
            crf: default_crf(),
            audio_bitrate: default_audio_bitrate(),
        }
    }
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            song_gain: default_gain(),
            video_gain: default_gain(),
        }
    }
}

fn default_threshold() -> f32 { 0.7 }
fn default_bass_low() -> f32 { 20.0 }
fn default_bass_high() -> f32 { 250.0 }
fn default_codec() -> String { "libx264".into() }
fn default_crf() -> u32 { 18 }
fn default_audio_bitrate() -> String { "192k".into() }
fn default_gain() -> f32 { 0.5 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: Config = toml::from_str(
            r#"
            [analysis]
            threshold = 0.8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.threshold, 0.8);
        assert_eq!(cfg.analysis.bass_low_hz, 20.0);
        assert_eq!(cfg.analysis.bass_high_hz, 250.0);
        assert_eq!(cfg.output.codec, "libx264");
        assert_eq!(cfg.mix.song_gain, 0.5);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.analysis.threshold, 0.7);
        assert_eq!(cfg.output.crf, 18);
        assert_eq!(cfg.output.audio_bitrate, "192k");
        assert_eq!(cfg.mix.video_gain, 0.5);
    }
}
