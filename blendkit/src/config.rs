//! Runtime configuration for a [`Window`](crate::window::Window).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::primitives::Size;
use crate::theme::Theme;

/// Configuration for a blendkit window.
///
/// Every field has a default, so a config file only needs the keys it
/// wants to override:
///
/// ```ignore
/// let config = UiConfig::from_json_str(r#"{ "border_threshold": 6 }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Width in pixels of the band along a floating frame's edge that
    /// grabs a resize instead of a move.
    pub border_threshold: i32,

    /// Smallest size a floating frame can be dragged down to.
    pub min_frame_size: Size,

    /// Corner radius given to newly inserted views.
    pub default_round_radius: f32,

    /// Outline width used by the stock draw routine.
    pub default_border: f32,

    /// Widget colors and pixel scale.
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            border_threshold: 4,
            min_frame_size: Size::new(32, 32),
            default_round_radius: 5.0,
            default_border: 1.0,
            theme: Theme::default(),
        }
    }
}

impl UiConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: UiConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!("Loaded UI config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Reject values the dispatch engine and geometry generator cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.border_threshold < 0 {
            return Err(ConfigError::Invalid(format!(
                "border_threshold must not be negative (got {})",
                self.border_threshold
            )));
        }
        if self.min_frame_size.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "min_frame_size must be non-empty (got {}x{})",
                self.min_frame_size.width, self.min_frame_size.height
            )));
        }
        if !(self.theme.pixel > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "theme.pixel must be positive (got {})",
                self.theme.pixel
            )));
        }
        if self.default_round_radius < 0.0 || self.default_border < 0.0 {
            return Err(ConfigError::Invalid(
                "default_round_radius and default_border must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = UiConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.border_threshold, 4);
    }

    #[test]
    fn partial_json_overrides_one_field() {
        let config = UiConfig::from_json_str(r#"{ "border_threshold": 6 }"#).unwrap();
        assert_eq!(config.border_threshold, 6);
        assert_eq!(config.min_frame_size, Size::new(32, 32));
    }

    #[test]
    fn invalid_pixel_scale_rejected() {
        let err = UiConfig::from_json_str(r#"{ "theme": { "pixel": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn empty_min_frame_rejected() {
        let json = r#"{ "min_frame_size": { "width": 0, "height": 10 } }"#;
        assert!(matches!(
            UiConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            UiConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "default_round_radius": 8.0 }}"#).unwrap();
        let config = UiConfig::load(file.path()).unwrap();
        assert_eq!(config.default_round_radius, 8.0);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(matches!(
            UiConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
