use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;
use crate::surface::Rgba;

/// Tunables for the particle background. Any field left out of a JS options
/// object falls back to its default.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub particle_count: usize,
    pub max_speed: f64,
    pub max_radius: f64,
    pub cell_size: f64,
    pub connection_distance: f64,
    pub line_opacity: f64,
    pub line_width: f64,
    pub particle_color: Rgba,
    pub line_color: Rgba,
    /// Stroke each close pair once instead of once from each end.
    pub draw_pairs_once: bool,
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let (r, g, b) = ACCENT_RGB;
        SceneConfig {
            particle_count: PARTICLE_COUNT,
            max_speed: MAX_SPEED,
            max_radius: MAX_RADIUS,
            cell_size: CELL_SIZE,
            connection_distance: CONNECTION_DISTANCE,
            line_opacity: LINE_OPACITY,
            line_width: LINE_WIDTH,
            particle_color: Rgba::new(r, g, b, PARTICLE_ALPHA),
            line_color: Rgba::new(r, g, b, 1.0),
            draw_pairs_once: false,
            seed: None,
        }
    }
}

impl SceneConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::EmptyPopulation);
        }

        positive("maxSpeed", self.max_speed)?;
        positive("maxRadius", self.max_radius)?;
        positive("cellSize", self.cell_size)?;
        positive("connectionDistance", self.connection_distance)?;
        positive("lineWidth", self.line_width)?;

        unit("lineOpacity", self.line_opacity)?;
        unit("particleColor.a", self.particle_color.a)?;
        unit("lineColor.a", self.line_color.a)?;

        // The 3x3 neighborhood only covers every close pair under this bound.
        if self.cell_size < self.connection_distance {
            return Err(ConfigError::CellTooSmall {
                cell_size: self.cell_size,
                connection_distance: self.connection_distance,
            });
        }
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OpacityRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = SceneConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.particle_count, 180);
        assert_eq!(config.cell_size, 150.0);
        assert_eq!(config.connection_distance, 120.0);
    }

    #[test]
    fn rejects_cell_smaller_than_threshold() {
        let config = SceneConfig {
            cell_size: 100.0,
            ..SceneConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::CellTooSmall {
                cell_size: 100.0,
                connection_distance: 120.0,
            })
        );
    }

    #[test]
    fn rejects_degenerate_values() {
        let empty = SceneConfig {
            particle_count: 0,
            ..SceneConfig::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyPopulation));

        let nan_speed = SceneConfig {
            max_speed: f64::NAN,
            ..SceneConfig::default()
        };
        assert!(matches!(
            nan_speed.validate(),
            Err(ConfigError::NotPositive { name: "maxSpeed", .. })
        ));

        let bright = SceneConfig {
            line_opacity: 1.5,
            ..SceneConfig::default()
        };
        assert!(matches!(
            bright.validate(),
            Err(ConfigError::OpacityRange { name: "lineOpacity", .. })
        ));
    }

    #[test]
    fn equal_cell_and_threshold_is_allowed() {
        let config = SceneConfig {
            cell_size: 120.0,
            ..SceneConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }
}
