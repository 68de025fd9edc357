//! Particle field configuration
//!
//! Two presets keyed by device class, plus JSON overrides applied on top of a
//! preset (from the canvas `data-particles` attribute or a CLI config file).

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// Viewports at or below this width (logical pixels) are treated as compact.
pub const COMPACT_BREAKPOINT: f64 = 768.0;
/// Upper bound on particles; the connection pass is quadratic in this.
pub const MAX_PARTICLES: usize = 300;
/// Upper bound on remembered shooting-star positions
pub const MAX_TRAIL_LENGTH: usize = 100;

/// Device class selected from viewport width
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DeviceClass {
    Compact,
    #[default]
    Full,
}

impl DeviceClass {
    pub fn from_viewport_width(width: f64) -> Self {
        if width <= COMPACT_BREAKPOINT {
            DeviceClass::Compact
        } else {
            DeviceClass::Full
        }
    }

    #[inline]
    pub fn is_compact(self) -> bool {
        matches!(self, DeviceClass::Compact)
    }
}

/// Host signals read once when the page starts.
#[derive(Clone, Copy, Debug)]
pub struct StartupSignals {
    pub viewport_width: f64,
    pub prefers_reduced_motion: bool,
}

impl StartupSignals {
    /// Device class to animate with, or None if the background stays static.
    ///
    /// Compact devices always animate with the reduced preset; full-size
    /// devices honour the reduced-motion preference.
    pub fn animation_class(&self) -> Option<DeviceClass> {
        let class = DeviceClass::from_viewport_width(self.viewport_width);
        if class.is_compact() || !self.prefers_reduced_motion {
            Some(class)
        } else {
            None
        }
    }
}

/// Tunables for the particle field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles created on every (re)initialization
    pub particle_count: usize,
    /// Pairs closer than this are joined by a line
    pub connection_distance: f64,
    /// Pointer pulls particles within this radius
    pub attraction_radius: f64,
    /// Max positions remembered by a shooting star
    pub trail_length: usize,
    /// Probability that a new particle starts as a shooting star
    pub shooting_chance: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self::full()
    }
}

impl ParticleConfig {
    pub const fn full() -> Self {
        Self {
            particle_count: 80,
            connection_distance: 120.0,
            attraction_radius: 150.0,
            trail_length: 10,
            shooting_chance: 0.02,
        }
    }

    pub const fn compact() -> Self {
        Self {
            particle_count: 30,
            connection_distance: 80.0,
            attraction_radius: 150.0,
            trail_length: 10,
            shooting_chance: 0.02,
        }
    }

    pub fn for_device(class: DeviceClass) -> Self {
        match class {
            DeviceClass::Compact => Self::compact(),
            DeviceClass::Full => Self::full(),
        }
    }

    /// Apply a partial JSON object on top of `self`.
    ///
    /// Keys missing from `json` keep their current value.
    pub fn merged_with_json(&self, json: &str) -> Result<Self, serde_json::Error> {
        let mut base = serde_json::to_value(self)?;
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        if let (Some(base), Some(overrides)) = (base.as_object_mut(), overrides.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value::<Self>(base)?.validated()
    }

    /// Parse a standalone config; missing keys fall back to the full preset.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json)?.validated()
    }

    /// Clamp counts to `MAX_PARTICLES` / `MAX_TRAIL_LENGTH` and the
    /// shooting chance to [0, 1].
    pub fn clamped(self) -> Self {
        let shooting_chance = if self.shooting_chance.is_nan() {
            0.0
        } else {
            self.shooting_chance.clamp(0.0, 1.0)
        };
        Self {
            particle_count: self.particle_count.min(MAX_PARTICLES),
            trail_length: self.trail_length.min(MAX_TRAIL_LENGTH),
            shooting_chance,
            ..self
        }
    }

    /// Reject negative or non-finite distances, then clamp.
    fn validated(self) -> Result<Self, serde_json::Error> {
        for (name, value) in [
            ("connection_distance", self.connection_distance),
            ("attraction_radius", self.attraction_radius),
            ("shooting_chance", self.shooting_chance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(serde_json::Error::custom(format!(
                    "{} must be a finite non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(self.clamped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_match_device_table() {
        let full = ParticleConfig::for_device(DeviceClass::Full);
        assert_eq!(full.particle_count, 80);
        assert_eq!(full.connection_distance, 120.0);
        assert_eq!(full.attraction_radius, 150.0);

        let compact = ParticleConfig::for_device(DeviceClass::Compact);
        assert_eq!(compact.particle_count, 30);
        assert_eq!(compact.connection_distance, 80.0);
        assert_eq!(compact.attraction_radius, 150.0);
    }

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert_eq!(DeviceClass::from_viewport_width(768.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_viewport_width(320.0), DeviceClass::Compact);
        assert_eq!(DeviceClass::from_viewport_width(768.5), DeviceClass::Full);
        assert_eq!(DeviceClass::from_viewport_width(1920.0), DeviceClass::Full);
    }

    #[test]
    fn test_reduced_motion_only_stops_full_devices() {
        let signals = |viewport_width: f64, prefers_reduced_motion: bool| StartupSignals {
            viewport_width,
            prefers_reduced_motion,
        };
        assert_eq!(signals(1280.0, false).animation_class(), Some(DeviceClass::Full));
        assert_eq!(signals(1280.0, true).animation_class(), None, "desktop honours the preference");
        assert_eq!(signals(400.0, true).animation_class(), Some(DeviceClass::Compact));
    }

    #[test]
    fn test_partial_json_override_keeps_preset() {
        let config = ParticleConfig::compact()
            .merged_with_json(r#"{"particle_count": 12}"#)
            .unwrap();
        assert_eq!(config.particle_count, 12);
        assert_eq!(config.connection_distance, 80.0, "untouched keys keep compact values");
    }

    #[test]
    fn test_from_json_defaults_to_full() {
        let config = ParticleConfig::from_json(r#"{"trail_length": 4}"#).unwrap();
        assert_eq!(config.trail_length, 4);
        assert_eq!(config.particle_count, 80);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(ParticleConfig::full().merged_with_json("{not json").is_err());
        assert!(ParticleConfig::from_json(r#"{"particle_count": "many"}"#).is_err());
    }

    #[test]
    fn test_overrides_are_bounded() {
        let config = ParticleConfig::full()
            .merged_with_json(r#"{"particle_count": 1000000000000000000, "trail_length": 5000}"#)
            .unwrap();
        assert_eq!(config.particle_count, MAX_PARTICLES);
        assert_eq!(config.trail_length, MAX_TRAIL_LENGTH);

        let config = ParticleConfig::from_json(r#"{"shooting_chance": 3.0}"#).unwrap();
        assert_eq!(config.shooting_chance, 1.0);
    }

    #[test]
    fn test_negative_distances_are_rejected() {
        let full = ParticleConfig::full();
        assert!(full.merged_with_json(r#"{"connection_distance": -1}"#).is_err());
        assert!(full.merged_with_json(r#"{"attraction_radius": -150.5}"#).is_err());
        assert!(ParticleConfig::from_json(r#"{"shooting_chance": -0.1}"#).is_err());
        assert!(full.merged_with_json(r#"{"attraction_radius": 0}"#).is_ok());
    }
}
