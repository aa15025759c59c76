//! Kernel tuning knobs.
//!
//! Every field has a default, so a config file only needs the keys it changes:
//!
//! ```json
//! { "drag_threshold": 6.0, "drag_image_delay_ms": 250 }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Pointer travel, in pixels, before a press on a draggable becomes a drag.
    pub drag_threshold: f32,
    /// Hold time before the drag proxy appears without any pointer travel.
    pub drag_image_delay_ms: u64,
    /// Distance, in pixels, from a grid boundary that still grabs the divider.
    pub divider_grab: f32,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 4.0,
            drag_image_delay_ms: 300,
            divider_grab: 4.0,
        }
    }
}

impl KernelConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded kernel config");
        Ok(config)
    }

    #[inline]
    pub fn drag_image_delay(&self) -> Duration {
        Duration::from_millis(self.drag_image_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("drag_threshold", self.drag_threshold),
            ("divider_grab", self.divider_grab),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Invalid(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = KernelConfig::from_json(r#"{ "drag_threshold": 8.5 }"#).unwrap();
        assert_eq!(config.drag_threshold, 8.5);
        assert_eq!(config.drag_image_delay_ms, 300);
        assert_eq!(config.drag_image_delay(), Duration::from_millis(300));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = KernelConfig::from_json(r#"{ "divider_grab": -1 }"#).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = KernelConfig::from_json("{ drag_threshold: }").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "drag_image_delay_ms": 50 }}"#).unwrap();
        let config = KernelConfig::from_path(file.path()).unwrap();
        assert_eq!(config.drag_image_delay_ms, 50);

        let missing = KernelConfig::from_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }
}
