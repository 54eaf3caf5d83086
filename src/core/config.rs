//! Board configuration.
//!
//! Every tunable constant of the board lives here: card size, drop band,
//! z-order base, and the timing and motion constants of the shuffle. Hosts
//! build one with `BoardConfig::default()` and the `with_*` builders, or
//! deserialize it.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::geometry::Size;
use crate::shuffle::LoopMotion;

/// Complete board configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Size of a single card in pixels.
    pub card_size: Size,

    /// Height of the drop band at the bottom of the viewport.
    /// A dragged card released inside it rejoins the row.
    pub drop_band_height: f64,

    /// Pointer travel (pixels) past which a press becomes a drag.
    /// 0 means any movement at all.
    pub drag_threshold: f64,

    /// Starting value of the bring-to-front counter. Row cards are
    /// restacked to 1..N, so this keeps raised cards above the row.
    pub initial_top_z: i32,

    /// Length of the gather transition (ms).
    pub gather_duration_ms: f64,

    /// Uniform scale of the gathered pile.
    pub gather_scale: f64,

    /// Maximum absolute tilt (degrees) of a gathered card.
    pub gather_max_tilt_deg: f64,

    /// Length of the smooth transition that flies cards home (ms).
    pub landing_transition_ms: f64,

    /// Delay after landing before cards are attached to the row (ms).
    /// Must exceed `landing_transition_ms`.
    pub settle_duration_ms: f64,

    /// Length of the smooth transition used when the row realigns (ms).
    pub realign_transition_ms: f64,

    /// Constants of the looping motion.
    pub motion: LoopMotion,

    /// RNG seed. `None` seeds from OS entropy.
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            card_size: Size::new(90.0, 140.0),
            drop_band_height: 200.0,
            drag_threshold: 0.0,
            initial_top_z: 100,
            gather_duration_ms: 800.0,
            gather_scale: 0.8,
            gather_max_tilt_deg: 5.0,
            landing_transition_ms: 500.0,
            settle_duration_ms: 550.0,
            realign_transition_ms: 300.0,
            motion: LoopMotion::default(),
            seed: None,
        }
    }
}

impl BoardConfig {
    /// Set the card size.
    #[must_use]
    pub fn with_card_size(mut self, width: f64, height: f64) -> Self {
        self.card_size = Size::new(width, height);
        self
    }

    /// Set the drop band height.
    #[must_use]
    pub fn with_drop_band(mut self, height: f64) -> Self {
        self.drop_band_height = height;
        self
    }

    /// Set the drag threshold.
    #[must_use]
    pub fn with_drag_threshold(mut self, pixels: f64) -> Self {
        self.drag_threshold = pixels;
        self
    }

    /// Set the loop motion constants.
    #[must_use]
    pub fn with_motion(mut self, motion: LoopMotion) -> Self {
        self.motion = motion;
        self
    }

    /// Use a fixed seed for reproducible shuffles.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set gather timing and look.
    #[must_use]
    pub fn with_gather(mut self, duration_ms: f64, scale: f64, max_tilt_deg: f64) -> Self {
        self.gather_duration_ms = duration_ms;
        self.gather_scale = scale;
        self.gather_max_tilt_deg = max_tilt_deg;
        self
    }

    /// Set landing transition and settle delay.
    #[must_use]
    pub fn with_landing(mut self, transition_ms: f64, settle_ms: f64) -> Self {
        self.landing_transition_ms = transition_ms;
        self.settle_duration_ms = settle_ms;
        self
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.card_size.width > 0.0 && self.card_size.height > 0.0) {
            return Err(ConfigError::CardSize {
                width: self.card_size.width,
                height: self.card_size.height,
            });
        }

        let durations = [
            ("gather_duration_ms", self.gather_duration_ms),
            ("landing_transition_ms", self.landing_transition_ms),
            ("settle_duration_ms", self.settle_duration_ms),
            ("realign_transition_ms", self.realign_transition_ms),
        ];
        for (name, value) in durations {
            if !(value >= 0.0) {
                return Err(ConfigError::NegativeDuration { name, value });
            }
        }

        if self.settle_duration_ms <= self.landing_transition_ms {
            return Err(ConfigError::SettleTooShort {
                settle_ms: self.settle_duration_ms,
                transition_ms: self.landing_transition_ms,
            });
        }

        if self.drop_band_height < 0.0 || self.drag_threshold < 0.0 {
            return Err(ConfigError::NegativeDistance);
        }

        if self.motion.time_step <= 0.0 {
            return Err(ConfigError::TimeStep(self.motion.time_step));
        }

        // floor(z + bias) must stay >= 1 for z in [-depth, depth].
        if self.motion.depth_bias - self.motion.radius_z.abs() < 1.0 {
            return Err(ConfigError::DepthBias {
                bias: self.motion.depth_bias,
                depth: self.motion.radius_z,
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
        assert!(BoardConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = BoardConfig::default()
            .with_card_size(60.0, 100.0)
            .with_drop_band(150.0)
            .with_seed(7)
            .with_landing(300.0, 400.0);

        assert_eq!(config.card_size, Size::new(60.0, 100.0));
        assert_eq!(config.drop_band_height, 150.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.settle_duration_ms, 400.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_card_width_rejected() {
        let config = BoardConfig::default().with_card_size(0.0, 140.0);
        assert!(matches!(config.validate(), Err(ConfigError::CardSize { .. })));
    }

    #[test]
    fn test_settle_must_outlast_transition() {
        let config = BoardConfig::default().with_landing(500.0, 500.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::SettleTooShort { .. })
        ));
    }

    #[test]
    fn test_depth_bias_must_keep_z_positive() {
        let mut motion = LoopMotion::default();
        motion.depth_bias = 100.0;
        let config = BoardConfig::default().with_motion(motion);

        assert!(matches!(config.validate(), Err(ConfigError::DepthBias { .. })));
    }

    #[test]
    fn test_nan_duration_rejected() {
        let config = BoardConfig::default().with_gather(f64::NAN, 0.8, 5.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NegativeDuration { name: "gather_duration_ms", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{"drop_band_height": 120.0, "seed": 9}"#).unwrap();

        assert_eq!(config.drop_band_height, 120.0);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.card_size, Size::new(90.0, 140.0));
        assert_eq!(config.motion, LoopMotion::default());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = BoardConfig::default().with_seed(42);
        let json = serde_json::to_string(&config).unwrap();
        let restored: BoardConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
