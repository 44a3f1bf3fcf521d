use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{render::BarChartRenderer, Result, SortAnimError};

pub const DEFAULT_OUTPUT_DIR: &str = "frames";
pub const DEFAULT_PREFIX: &str = "frame";
pub const DEFAULT_FRAME_DURATION_MS: u32 = 500;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub encoder: EncoderConfig,
}

impl AppConfig {
    /// Loads a (possibly partial) JSON configuration file. Missing fields fall
    /// back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.input.validate()?;
        self.encoder.validate()?;
        self.encoder.render.check_bar_count(self.input.len)
    }
}

/// Shape of the randomly generated array that gets sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub len: usize,
    /// Inclusive lower bound.
    pub min: u32,
    /// Exclusive upper bound.
    pub max: u32,
    pub seed: Option<u64>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            len: 10,
            min: 1,
            max: 50,
            seed: None,
        }
    }
}

impl InputConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min >= self.max {
            return Err(SortAnimError::invalid(format!(
                "value range [{}, {}) is empty",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Where and how frames and the final animation are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub output_dir: PathBuf,
    pub prefix: String,
    pub frame_duration_ms: u32,
    pub render: RenderConfig,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            render: RenderConfig::default(),
        }
    }
}

impl EncoderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(SortAnimError::invalid("frame prefix must not be empty"));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(SortAnimError::invalid(format!(
                "frame prefix `{}` must not contain path separators",
                self.prefix
            )));
        }
        if self.frame_duration_ms == 0 {
            return Err(SortAnimError::invalid("frame duration must be positive"));
        }
        self.render.validate()
    }
}

/// How bar heights map to pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarScale {
    /// Each frame is scaled to its own maximum value.
    #[default]
    PerFrame,
    /// Every frame shares the maximum value seen across all snapshots.
    Global,
}

/// Canvas settings for the bar chart renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub scale: BarScale,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            scale: BarScale::PerFrame,
        }
    }
}

impl RenderConfig {
    pub const MIN_WIDTH: u32 = 64;
    pub const MIN_HEIGHT: u32 = 64;

    pub fn validate(&self) -> Result<()> {
        if self.width < Self::MIN_WIDTH || self.height < Self::MIN_HEIGHT {
            return Err(SortAnimError::invalid(format!(
                "canvas {}x{} is smaller than the {}x{} minimum",
                self.width,
                self.height,
                Self::MIN_WIDTH,
                Self::MIN_HEIGHT
            )));
        }
        Ok(())
    }

    /// Most bars the plot can hold while keeping every bar at least one pixel
    /// wide with a one-pixel gap to its neighbour.
    pub fn max_bars(&self) -> usize {
        BarChartRenderer::new(self).plot_area().width() as usize / 2
    }

    pub fn check_bar_count(&self, count: usize) -> Result<()> {
        let max = self.max_bars();
        if count > max {
            return Err(SortAnimError::invalid(format!(
                "{count} values do not fit a {}x{} canvas (at most {max} bars)",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_layout() {
        let config = AppConfig::default();
        assert_eq!(config.input.len, 10);
        assert_eq!((config.input.min, config.input.max), (1, 50));
        assert_eq!(config.encoder.output_dir, PathBuf::from("frames"));
        assert_eq!(config.encoder.prefix, "frame");
        assert_eq!(config.encoder.frame_duration_ms, 500);
        assert_eq!(config.encoder.render.scale, BarScale::PerFrame);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = AppConfig::from_json_str(
            r#"{ "input": { "seed": 7 }, "encoder": { "prefix": "step", "render": { "scale": "global" } } }"#,
        )
        .unwrap();

        assert_eq!(config.input.seed, Some(7));
        assert_eq!(config.input.len, 10);
        assert_eq!(config.encoder.prefix, "step");
        assert_eq!(config.encoder.render.scale, BarScale::Global);
        assert_eq!(config.encoder.render.width, 640);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AppConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SortAnimError::Config(_)));
    }

    #[test]
    fn rejects_unusable_settings() {
        let mut encoder = EncoderConfig::default();
        encoder.prefix.clear();
        assert!(matches!(
            encoder.validate(),
            Err(SortAnimError::InvalidInput(_))
        ));

        let encoder = EncoderConfig {
            frame_duration_ms: 0,
            ..Default::default()
        };
        assert!(encoder.validate().is_err());

        let input = InputConfig {
            min: 5,
            max: 5,
            ..Default::default()
        };
        let err = input.validate().unwrap_err();
        assert!(format!("{err}").contains("[5, 5)"));
    }

    #[test]
    fn reads_config_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "encoder": { "frame_duration_ms": 250 } }"#).unwrap();

        let config = AppConfig::from_json_file(&path).unwrap();
        assert_eq!(config.encoder.frame_duration_ms, 250);
    }

    #[test]
    fn bar_count_is_bounded_by_plot_width() {
        let render = RenderConfig::default();
        // 640px canvas leaves a 544px plot.
        assert_eq!(render.max_bars(), 272);
        assert!(render.check_bar_count(272).is_ok());
        assert!(matches!(
            render.check_bar_count(273),
            Err(SortAnimError::InvalidInput(_))
        ));

        let config = AppConfig {
            input: InputConfig {
                len: 600,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(format!("{err}").contains("600 values"));
    }
}
