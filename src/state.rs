//! Viewport, pointer and theme state shared by every layer.
//!
//! Only the engine writes to [`ViewState`]; layers receive it by shared
//! reference on every frame.

use crate::theme::Theme;

/// Hero bounding box in client (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeroBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Canvas dimensions: CSS size and backing-store size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub css_width: u32,
    pub css_height: u32,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

/// Pointer position in hero-local pixels and normalized device coordinates
/// (`-1..1`, y up).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
    pub nx: f64,
    pub ny: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    pub pointer: Pointer,
    pub theme: Theme,
    /// False while the document is hidden.
    pub running: bool,
    max_pixel_ratio: f64,
}

impl ViewState {
    pub fn new(device_pixel_ratio: f64, max_pixel_ratio: f64, theme: Theme) -> Self {
        let mut view = Self {
            width: 1.0,
            height: 1.0,
            pixel_ratio: 1.0,
            pointer: Pointer::default(),
            theme,
            running: true,
            max_pixel_ratio,
        };
        view.set_pixel_ratio(device_pixel_ratio);
        view
    }

    /// Store the device pixel ratio, capped. Non-positive or non-finite
    /// ratios fall back to 1.
    pub fn set_pixel_ratio(&mut self, device_pixel_ratio: f64) {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };
        self.pixel_ratio = ratio.min(self.max_pixel_ratio);
    }

    /// Adopt the hero size and return the matching canvas size.
    pub fn fit(&mut self, bounds: HeroBounds) -> SurfaceSize {
        self.width = floor_at_least_one(bounds.width);
        self.height = floor_at_least_one(bounds.height);
        self.surface()
    }

    pub fn surface(&self) -> SurfaceSize {
        SurfaceSize {
            css_width: self.width as u32,
            css_height: self.height as u32,
            pixel_width: (self.width * self.pixel_ratio).floor() as u32,
            pixel_height: (self.height * self.pixel_ratio).floor() as u32,
        }
    }

    /// Track a pointer given in client coordinates. Returns false (and keeps
    /// the previous position) when the point lies outside the hero.
    pub fn track_pointer(&mut self, bounds: HeroBounds, client_x: f64, client_y: f64) -> bool {
        let x = client_x - bounds.left;
        let y = client_y - bounds.top;
        let inside = (0.0..=bounds.width).contains(&x) && (0.0..=bounds.height).contains(&y);
        if !inside || bounds.width <= 0.0 || bounds.height <= 0.0 {
            return false;
        }
        self.pointer = Pointer {
            x,
            y,
            nx: (x / bounds.width) * 2.0 - 1.0,
            ny: -((y / bounds.height) * 2.0 - 1.0),
        };
        true
    }
}

fn floor_at_least_one(value: f64) -> f64 {
    if value.is_finite() {
        value.floor().max(1.0)
    } else {
        1.0
    }
}
