//! Map-level configuration shared by every strategy

use mg_rng::Seed;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, check_positive};

/// Smallest playable area (inside the border) a strategy is given
pub const MIN_INNER_SIZE: i32 = 8;

/// Map dimensions, border thickness, hall width and seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    /// Wall columns kept on the left and right edge
    pub horizontal_border: i32,
    /// Wall rows kept on the top and bottom edge
    pub vertical_border: i32,
    /// Upper bound for dotted-line corridor width
    pub hall_max_width: i32,
    pub seed: Seed,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            height: 100,
            horizontal_border: 0,
            vertical_border: 0,
            hall_max_width: 6,
            seed: Seed::Random,
        }
    }
}

impl MapConfig {
    /// Config with a fixed seed and default borders
    pub fn new(width: i32, height: i32, seed: u32) -> Self {
        Self {
            width,
            height,
            seed: Seed::Fixed(seed),
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    /// Same border thickness on every side
    pub fn with_border(mut self, border: i32) -> Self {
        self.horizontal_border = border;
        self.vertical_border = border;
        self
    }

    /// Size of the area handed to the strategy
    pub fn inner_size(&self) -> (i32, i32) {
        (
            self.width - 2 * self.horizontal_border,
            self.height - 2 * self.vertical_border,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("width", self.width as i64)?;
        check_positive("height", self.height as i64)?;
        check_positive("hall_max_width", self.hall_max_width as i64)?;
        for (border, dimension) in [
            (self.horizontal_border, self.width),
            (self.vertical_border, self.height),
        ] {
            if border < 0 || 2 * border >= dimension {
                return Err(ConfigError::BorderTooThick { border, dimension });
            }
        }
        let (w, h) = self.inner_size();
        if w < MIN_INNER_SIZE || h < MIN_INNER_SIZE {
            return Err(ConfigError::MapTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_INNER_SIZE,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.inner_size(), (100, 100));
    }

    #[test]
    fn test_border_shrinks_inner_area() {
        let config = MapConfig::new(60, 40, 7).with_border(3);
        assert_eq!(config.inner_size(), (54, 34));
        assert_eq!(config.seed, Seed::Fixed(7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            MapConfig::new(0, 10, 1).validate(),
            Err(ConfigError::NotPositive { name: "width", .. })
        ));
        assert!(matches!(
            MapConfig::new(20, 20, 1).with_border(10).validate(),
            Err(ConfigError::BorderTooThick { border: 10, dimension: 20 })
        ));
        assert!(matches!(
            MapConfig::new(20, 20, 1).with_border(7).validate(),
            Err(ConfigError::MapTooSmall { .. })
        ));
        let mut config = MapConfig::new(20, 20, 1);
        config.hall_max_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        let config: MapConfig = serde_json::from_str(r#"{"width": 64, "seed": {"fixed": 9}}"#).unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 100);
        assert_eq!(config.seed, Seed::Fixed(9));
    }
}
