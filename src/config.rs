use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::color::{Color, Palette};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every tunable of the sky. `SkyConfig::default()` is the stock dusk scene.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SkyConfig {
    pub ambient: AmbientConfig,
    pub star: StarConfig,
    pub debris: DebrisConfig,
    pub spawn: SpawnConfig,
    pub scenery: SceneryConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AmbientConfig {
    pub count: usize,
    /// Radii are drawn from `0.0..max_radius`.
    pub max_radius: f32,
    pub glow: f32,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarConfig {
    pub radius: f32,
    pub spawn_height: f32,
    pub fall_speed: f32,
    /// Horizontal speed is drawn from `-spread / 2..spread / 2`.
    pub horizontal_spread: f32,
    pub friction: f32,
    pub gravity: f32,
    pub shrink: f32,
    pub fragments: usize,
    pub glow: f32,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebrisConfig {
    pub radius: f32,
    pub ttl: u32,
    pub horizontal_spread: f32,
    pub vertical_spread: f32,
    pub friction: f32,
    pub gravity: f32,
    /// Opacity lost per tick for every tick of life left.
    pub fade: f32,
    pub glow: f32,
    pub body: Color,
    pub palette: Palette,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawnConfig {
    pub initial_interval: u64,
    pub min_interval: u64,
    pub max_interval: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneryConfig {
    /// Fraction of the surface height taken by the ground band.
    pub ground_ratio: f32,
    pub ground: Color,
    pub sky_top: Color,
    pub sky_bottom: Color,
    /// Painted back to front.
    pub ranges: Vec<MountainRange>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountainRange {
    pub peaks: usize,
    /// Peak height as a fraction of the surface height.
    pub height_ratio: f32,
    pub color: Color,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 200,
            max_radius: 3.0,
            glow: 20.0,
            palette: Palette::from_rgb(&[
                (0xFF, 0xFF, 0xFF),
                (0xFF, 0xC3, 0x00),
                (0x87, 0xCE, 0xFA),
                (0xFF, 0x69, 0xB4),
            ]),
        }
    }
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            radius: 9.0,
            spawn_height: -100.0,
            fall_speed: 3.0,
            horizontal_spread: 8.0,
            friction: 0.8,
            gravity: 1.0,
            shrink: 3.0,
            fragments: 8,
            glow: 20.0,
            palette: Palette::from_rgb(&[
                (0xFF, 0xD7, 0x00),
                (0xFF, 0x45, 0x00),
                (0x87, 0xCE, 0xFA),
                (0xFF, 0x69, 0xB4),
            ]),
        }
    }
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            ttl: 100,
            horizontal_spread: 10.0,
            vertical_spread: 30.0,
            friction: 0.8,
            gravity: 0.1,
            fade: 0.0001,
            glow: 30.0,
            body: Color::rgb(227, 234, 239),
            palette: Palette::from_rgb(&[
                (0xFF, 0xD7, 0x00),
                (0x00, 0xFF, 0xFF),
                (0xFF, 0x69, 0xB4),
                (0xFF, 0x45, 0x00),
            ]),
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            initial_interval: 75,
            min_interval: 125,
            max_interval: 200,
        }
    }
}

impl Default for SceneryConfig {
    fn default() -> Self {
        Self {
            ground_ratio: 0.09,
            ground: Color::rgb(0x3b, 0x3b, 0x58),
            sky_top: Color::rgb(0xff, 0x7e, 0x5f),
            sky_bottom: Color::rgb(0x55, 0x75, 0xa5),
            ranges: vec![
                MountainRange {
                    peaks: 1,
                    height_ratio: 0.7,
                    color: Color::rgb(0x5e, 0x54, 0x8e),
                },
                MountainRange {
                    peaks: 2,
                    height_ratio: 0.6,
                    color: Color::rgb(0xe5, 0x6b, 0x6f),
                },
                MountainRange {
                    peaks: 3,
                    height_ratio: 0.4,
                    color: Color::rgb(0xff, 0xb3, 0xc6),
                },
            ],
        }
    }
}

impl SkyConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let spawn = &self.spawn;
        if spawn.initial_interval == 0 || spawn.min_interval == 0 {
            return Err(ConfigError::Invalid(
                "spawn intervals must be at least one tick".into(),
            ));
        }
        if spawn.min_interval > spawn.max_interval {
            return Err(ConfigError::Invalid(format!(
                "spawn.min_interval ({}) exceeds spawn.max_interval ({})",
                spawn.min_interval, spawn.max_interval
            )));
        }
        if !(0.0..1.0).contains(&self.scenery.ground_ratio) {
            return Err(ConfigError::Invalid(format!(
                "scenery.ground_ratio must be in [0, 1), got {}",
                self.scenery.ground_ratio
            )));
        }
        if let Some(range) = self.scenery.ranges.iter().find(|range| range.peaks == 0) {
            return Err(ConfigError::Invalid(format!(
                "mountain range at height {} has no peaks",
                range.height_ratio
            )));
        }
        if !(self.star.shrink.is_finite() && self.star.shrink > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "star.shrink must be a positive number, got {}",
                self.star.shrink
            )));
        }
        if !self.star.radius.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "star.radius must be finite, got {}",
                self.star.radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SkyConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(SkyConfig::from_toml("").unwrap(), SkyConfig::default());
    }

    #[test]
    fn bundled_sample_parses() {
        let config = SkyConfig::from_toml(include_str!("../assets/dusk.toml")).unwrap();
        assert_eq!(config.ambient.count, 200);
        assert_eq!(config.scenery.ranges.len(), 3);
    }

    #[test]
    fn overrides_apply_per_field() {
        let config = SkyConfig::from_toml(
            r##"
            [star]
            radius = 12.0
            palette = ["#112233"]

            [spawn]
            min_interval = 10
            max_interval = 20
            "##,
        )
        .unwrap();
        assert_eq!(config.star.radius, 12.0);
        assert_eq!(config.star.palette.colors(), &[Color::rgb(0x11, 0x22, 0x33)]);
        assert_eq!(config.star.friction, 0.8);
        assert_eq!(config.spawn.initial_interval, 75);
        assert_eq!(config.spawn.max_interval, 20);
    }

    #[test]
    fn empty_palette_fails_to_parse() {
        let err = SkyConfig::from_toml("[debris]\npalette = []\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn bad_colour_fails_to_parse() {
        let err = SkyConfig::from_toml("[scenery]\nground = \"3b3b58\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SkyConfig::from_toml("[star]\nsparkle = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn inverted_spawn_range_is_invalid() {
        let err = SkyConfig::from_toml("[spawn]\nmin_interval = 300\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let err = SkyConfig::from_toml("[spawn]\ninitial_interval = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn ground_ratio_must_leave_sky() {
        let err = SkyConfig::from_toml("[scenery]\nground_ratio = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn peakless_range_is_invalid() {
        let err = SkyConfig::from_toml(
            "[[scenery.ranges]]\npeaks = 0\nheight_ratio = 0.5\ncolor = \"#000000\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn star_must_be_able_to_burn_out() {
        for text in [
            "[star]\nshrink = nan\n",
            "[star]\nshrink = 0.0\n",
            "[star]\nshrink = inf\n",
            "[star]\nradius = inf\n",
            "[star]\nradius = nan\n",
        ] {
            let err = SkyConfig::from_toml(text).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "accepted {text:?}");
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SkyConfig::load("does/not/exist.toml").unwrap_err();
        match err {
            ConfigError::Io { path, .. } => assert_eq!(path, "does/not/exist.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
