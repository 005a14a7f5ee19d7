//! Tunables for the hero effects.
//!
//! Defaults reproduce the shipped look; pages can override any subset with a
//! JSON document (see [`HeroConfig::from_json`]).

use serde::Deserialize;

use crate::error::{EffectsError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// Selector of the element hosting both canvases.
    pub hero_selector: String,
    /// Selector (inside the hero) of the content raised above the canvases.
    pub inner_selector: String,
    pub canvas_2d_id: String,
    pub canvas_3d_id: String,
    /// Upper bound applied to `window.devicePixelRatio`.
    pub max_pixel_ratio: f64,
    pub constellation: ConstellationConfig,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            hero_selector: ".hero".to_owned(),
            inner_selector: ".hero-inner".to_owned(),
            canvas_2d_id: "fx2d".to_owned(),
            canvas_3d_id: "fx3d".to_owned(),
            max_pixel_ratio: 1.5,
            constellation: ConstellationConfig::default(),
        }
    }
}

impl HeroConfig {
    /// Parse overrides; missing fields keep their defaults. Values the
    /// simulation cannot run with are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("max_pixel_ratio", self.max_pixel_ratio)?;
        self.constellation.validate()
    }
}

/// Particle field parameters. Distances are CSS pixels, speeds are pixels
/// per frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConstellationConfig {
    pub min_points: usize,
    pub max_points: usize,
    /// Hero area (px²) that earns one point before clamping.
    pub area_per_point: f64,
    /// Spread of the initial velocity, centred on zero.
    pub initial_speed: f64,
    pub link_distance: f64,
    pub pointer_radius: f64,
    pub pointer_pull: f64,
    /// Spread of the per-frame random jitter, centred on zero.
    pub wander: f64,
    pub damping: f64,
    pub max_speed: f64,
    pub wrap_margin: f64,
}

impl Default for ConstellationConfig {
    fn default() -> Self {
        Self {
            min_points: 55,
            max_points: 95,
            area_per_point: 22_000.0,
            initial_speed: 0.22,
            link_distance: 160.0,
            pointer_radius: 180.0,
            pointer_pull: 0.015,
            wander: 0.015,
            damping: 0.985,
            max_speed: 0.55,
            wrap_margin: 20.0,
        }
    }
}

impl ConstellationConfig {
    pub fn validate(&self) -> Result<()> {
        non_negative("constellation.max_speed", self.max_speed)?;
        non_negative("constellation.damping", self.damping)?;
        non_negative("constellation.wrap_margin", self.wrap_margin)?;
        non_negative("constellation.pointer_radius", self.pointer_radius)?;
        non_negative("constellation.link_distance", self.link_distance)?;
        non_negative("constellation.initial_speed", self.initial_speed)?;
        non_negative("constellation.wander", self.wander)?;
        if !self.pointer_pull.is_finite() {
            return Err(EffectsError::Config(
                "constellation.pointer_pull must be finite".to_owned(),
            ));
        }
        if !(self.area_per_point.is_finite() && self.area_per_point > 0.0) {
            return Err(EffectsError::Config(
                "constellation.area_per_point must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// Number of points for a hero of the given CSS size.
    pub fn point_count(&self, width: f64, height: f64) -> usize {
        let by_area = (width * height / self.area_per_point).floor();
        let by_area = if by_area.is_finite() && by_area > 0.0 { by_area as usize } else { 0 };
        by_area.max(self.min_points).min(self.max_points)
    }
}

fn non_negative(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EffectsError::Config(format!("{field} must be a non-negative number, got {value}")))
    }
}
