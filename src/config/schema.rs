//! Configuration schema definitions

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::engine::MAX_PERIOD;
use crate::mapping::{Mode, PitchClass, Scale};

/// Main configuration for datasound
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSoundConfig {
    /// Scale and chord settings
    #[serde(default)]
    pub music: MusicConfig,

    /// MIDI output settings
    #[serde(default)]
    pub output: OutputConfig,
}

impl DataSoundConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let tonic: PitchClass = self.music.key.parse()?;
        let mode: Mode = self.music.mode.parse()?;
        if self.music.octaves == 0 {
            bail!("Octaves must be at least 1");
        }
        Scale::new(tonic, mode, self.music.octaves)?.check_midi_range()?;
        if self.music.period == 0 || self.music.period > MAX_PERIOD {
            bail!("Chord period must be between 1 and {}", MAX_PERIOD);
        }

        if self.output.tempo < 20.0 || self.output.tempo > 300.0 {
            bail!("Tempo must be between 20 and 300 BPM");
        }
        if self.output.velocity == 0 || self.output.velocity > 127 {
            bail!("Velocity must be between 1 and 127");
        }
        if let Some(instruments) = &self.output.instruments {
            if let Some(bad) = instruments.iter().find(|&&p| p > 127) {
                bail!("Instrument {} is outside the General MIDI range 0-127", bad);
            }
        }

        Ok(())
    }
}

/// Scale and chord settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicConfig {
    /// Tonic (default: C)
    #[serde(default = "default_key")]
    pub key: String,

    /// Mode: major, minor, pentatonic or blues (default: major)
    #[serde(default = "default_mode")]
    pub mode: String,

    /// Octaves spanned by the scale (default: 2)
    #[serde(default = "default_octaves")]
    pub octaves: usize,

    /// Values summarized by each chord (default: 12)
    #[serde(default = "default_period")]
    pub period: usize,

    /// Add a chord track per melody (default: false)
    #[serde(default)]
    pub chords: bool,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            mode: default_mode(),
            octaves: default_octaves(),
            period: default_period(),
            chords: false,
        }
    }
}

fn default_key() -> String { "C".to_string() }
fn default_mode() -> String { "major".to_string() }
fn default_octaves() -> usize { 2 }
fn default_period() -> usize { 12 }

/// MIDI output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Beats per minute (default: 120)
    #[serde(default = "default_tempo")]
    pub tempo: f64,

    /// Note velocity 1-127 (default: 64)
    #[serde(default = "default_velocity")]
    pub velocity: u8,

    /// Title stored in the file (default: untitled)
    #[serde(default = "default_title")]
    pub title: String,

    /// General MIDI program per track (None = piano everywhere)
    #[serde(default)]
    pub instruments: Option<Vec<u8>>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tempo: default_tempo(),
            velocity: default_velocity(),
            title: default_title(),
            instruments: None,
        }
    }
}

fn default_tempo() -> f64 { 120.0 }
fn default_velocity() -> u8 { 64 }
fn default_title() -> String { "untitled".to_string() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_music_config() {
        let yaml = "key: D";
        let config: MusicConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.key, "D");
        assert_eq!(config.mode, "major"); // default
        assert_eq!(config.octaves, 2);
        assert!(!config.chords);
    }

    #[test]
    fn test_output_config() {
        let yaml = r#"
tempo: 90
velocity: 100
instruments: [0, 23]
"#;
        let config: OutputConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tempo, 90.0);
        assert_eq!(config.velocity, 100);
        assert_eq!(config.title, "untitled");
        assert_eq!(config.instruments, Some(vec![0, 23]));
    }

    #[test]
    fn test_config_validation() {
        let config = DataSoundConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_key_and_mode() {
        let mut config = DataSoundConfig::default();
        config.music.key = "X".to_string();
        assert!(config.validate().is_err());

        let mut config = DataSoundConfig::default();
        config.music.mode = "lydian".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lydian"));
    }

    #[test]
    fn test_octaves_must_stay_in_midi_range() {
        let mut config = DataSoundConfig::default();
        config.music.octaves = 6;
        assert!(config.validate().is_ok());

        config.music.octaves = 7;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("octaves"));
        assert!(err.to_string().contains("127"));
    }

    #[test]
    fn test_invalid_ranges() {
        let mut config = DataSoundConfig::default();
        config.music.octaves = 0;
        assert!(config.validate().is_err());

        let mut config = DataSoundConfig::default();
        config.music.period = 0;
        assert!(config.validate().is_err());

        let mut config = DataSoundConfig::default();
        config.music.period = 300_000_000;
        assert!(config.validate().is_err());

        let mut config = DataSoundConfig::default();
        config.music.period = MAX_PERIOD;
        assert!(config.validate().is_ok());

        let mut config = DataSoundConfig::default();
        config.output.tempo = 500.0;
        assert!(config.validate().is_err());

        let mut config = DataSoundConfig::default();
        config.output.instruments = Some(vec![0, 128]);
        assert!(config.validate().is_err());
    }
}
