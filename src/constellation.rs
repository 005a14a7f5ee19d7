//! 2D constellation: drifting points joined by distance-faded lines.
//!
//! [`Constellation`] is the simulation and knows nothing about drawing.
//! [`ConstellationLayer`] pairs it with a [`Painter`] and a palette.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::ConstellationConfig;
use crate::error::Result;
use crate::layer::Layer;
use crate::state::{Pointer, ViewState};
use crate::theme::Theme;

/// One point of the field; position in CSS pixels, velocity in px/frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

/// A pair of points close enough to be joined. `strength` is 1 when the
/// points coincide and falls to 0 at the link distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub a: usize,
    pub b: usize,
    pub strength: f64,
}

#[derive(Debug, Clone)]
pub struct Constellation {
    points: Vec<Particle>,
    config: ConstellationConfig,
}

impl Constellation {
    /// Scatter points uniformly over a `width` x `height` area. The count
    /// scales with the area and is clamped by the config.
    pub fn new<R: Rng>(width: f64, height: f64, config: &ConstellationConfig, rng: &mut R) -> Self {
        let count = config.point_count(width, height);
        let speed = config.initial_speed;
        let points = (0..count)
            .map(|_| Particle {
                x: rng.gen::<f64>() * width,
                y: rng.gen::<f64>() * height,
                vx: (rng.gen::<f64>() - 0.5) * speed,
                vy: (rng.gen::<f64>() - 0.5) * speed,
            })
            .collect();
        Self { points, config: config.clone() }
    }

    pub fn from_points(points: Vec<Particle>, config: &ConstellationConfig) -> Self {
        Self { points, config: config.clone() }
    }

    pub fn points(&self) -> &[Particle] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Advance every point by one frame inside a `width` x `height` field.
    ///
    /// Order per point: pointer attraction, random wander, Euler step,
    /// toroidal wrap, damping, per-axis speed clamp.
    pub fn step<R: Rng>(&mut self, pointer: &Pointer, width: f64, height: f64, rng: &mut R) {
        let cfg = &self.config;
        let margin = cfg.wrap_margin;

        for p in &mut self.points {
            let dx = pointer.x - p.x;
            let dy = pointer.y - p.y;
            let dist = dx.hypot(dy);
            if dist < cfg.pointer_radius && dist > 0.001 {
                let falloff = 1.0 - dist / cfg.pointer_radius;
                p.vx += dx / dist * falloff * cfg.pointer_pull;
                p.vy += dy / dist * falloff * cfg.pointer_pull;
            }

            p.vx += (rng.gen::<f64>() - 0.5) * cfg.wander;
            p.vy += (rng.gen::<f64>() - 0.5) * cfg.wander;

            p.x += p.vx;
            p.y += p.vy;

            p.x = wrap(p.x, width, margin);
            p.y = wrap(p.y, height, margin);

            p.vx = (p.vx * cfg.damping).clamp(-cfg.max_speed, cfg.max_speed);
            p.vy = (p.vy * cfg.damping).clamp(-cfg.max_speed, cfg.max_speed);
        }
    }

    /// Every unordered pair closer than the link distance, each visited once.
    pub fn links(&self) -> impl Iterator<Item = Link> + '_ {
        let max = self.config.link_distance;
        let points = &self.points;
        (0..points.len()).flat_map(move |a| {
            (a + 1..points.len()).filter_map(move |b| {
                let (pa, pb) = (points[a], points[b]);
                let dist = (pa.x - pb.x).hypot(pa.y - pb.y);
                (dist < max).then(|| Link { a, b, strength: 1.0 - dist / max })
            })
        })
    }
}

/// Points past the margin on one side re-enter at the margin on the other.
fn wrap(value: f64, extent: f64, margin: f64) -> f64 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

/// Colors and stroke parameters for one theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstellationPalette {
    pub line: &'static str,
    pub dot: &'static str,
    pub trail: &'static str,
    /// Multiplier applied to a link's strength to get its opacity.
    pub link_alpha: f64,
    pub dot_radius: f64,
}

const DARK_PALETTE: ConstellationPalette = ConstellationPalette {
    line: "rgba(180, 160, 255, 0.40)",
    dot: "rgba(220, 210, 255, 0.85)",
    trail: "rgba(10, 10, 18, 0.18)",
    link_alpha: 0.18,
    dot_radius: 1.6,
};

const LIGHT_PALETTE: ConstellationPalette = ConstellationPalette {
    line: "rgba(120, 95, 210, 0.34)",
    dot: "rgba(70, 50, 150, 0.78)",
    trail: "rgba(245, 242, 255, 0.22)",
    link_alpha: 0.30,
    dot_radius: 1.3,
};

impl ConstellationPalette {
    pub fn for_theme(theme: Theme) -> &'static ConstellationPalette {
        match theme {
            Theme::Dark => &DARK_PALETTE,
            Theme::Light => &LIGHT_PALETTE,
        }
    }
}

/// Drawing surface for the constellation, in CSS pixel coordinates.
pub trait Painter {
    /// Reset the transform to `pixel_ratio`, clear the canvas and paint the
    /// translucent trail tint over `width` x `height`.
    fn begin_frame(&mut self, pixel_ratio: f64, width: f64, height: f64, trail: &str) -> Result<()>;

    fn begin_links(&mut self, color: &str);

    fn link(&mut self, from: (f64, f64), to: (f64, f64), alpha: f64);

    /// Restore full opacity after the link pass.
    fn end_links(&mut self);

    fn begin_dots(&mut self, color: &str);

    fn dot(&mut self, x: f64, y: f64, radius: f64) -> Result<()>;
}

pub struct ConstellationLayer<P, R = SmallRng> {
    painter: P,
    field: Constellation,
    theme: Theme,
    rng: R,
}

impl<P: Painter> ConstellationLayer<P> {
    pub fn new(painter: P, view: &ViewState, config: &ConstellationConfig) -> Self {
        Self::with_rng(painter, view, config, SmallRng::from_entropy())
    }
}

impl<P: Painter, R: Rng> ConstellationLayer<P, R> {
    pub fn with_rng(painter: P, view: &ViewState, config: &ConstellationConfig, mut rng: R) -> Self {
        let field = Constellation::new(view.width, view.height, config, &mut rng);
        Self { painter, field, theme: view.theme, rng }
    }

    pub fn field(&self) -> &Constellation {
        &self.field
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn painter(&self) -> &P {
        &self.painter
    }
}

impl<P: Painter, R: Rng> Layer for ConstellationLayer<P, R> {
    fn name(&self) -> &'static str {
        "constellation"
    }

    fn render(&mut self, view: &ViewState, _timestamp: f64) -> Result<()> {
        let palette = ConstellationPalette::for_theme(self.theme);
        self.painter
            .begin_frame(view.pixel_ratio, view.width, view.height, palette.trail)?;

        self.field
            .step(&view.pointer, view.width, view.height, &mut self.rng);

        let points = self.field.points();
        self.painter.begin_links(palette.line);
        for link in self.field.links() {
            let (a, b) = (points[link.a], points[link.b]);
            self.painter
                .link((a.x, a.y), (b.x, b.y), link.strength * palette.link_alpha);
        }
        self.painter.end_links();

        self.painter.begin_dots(palette.dot);
        for p in points {
            self.painter.dot(p.x, p.y, palette.dot_radius)?;
        }
        Ok(())
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}
