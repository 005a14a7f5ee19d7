//! The renderable-layer capability and the ordered set of live layers.

use tracing::warn;

use crate::error::Result;
use crate::state::ViewState;
use crate::theme::Theme;

/// A visual layer driven by the hero frame loop.
pub trait Layer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Draw one frame. `timestamp` is the raw frame time in milliseconds.
    fn render(&mut self, view: &ViewState, timestamp: f64) -> Result<()>;

    /// Switch palettes. Must not disturb any simulation state.
    fn set_theme(&mut self, theme: Theme);
}

/// Layers in back-to-front draw order.
#[derive(Default)]
pub struct LayerStack {
    layers: Vec<Box<dyn Layer>>,
}

impl LayerStack {
    pub fn push(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    /// Render every layer; a failing layer is logged and skipped for this
    /// frame only.
    pub fn render(&mut self, view: &ViewState, timestamp: f64) {
        for layer in &mut self.layers {
            if let Err(err) = layer.render(view, timestamp) {
                warn!(layer = layer.name(), %err, "layer render failed");
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        for layer in &mut self.layers {
            layer.set_theme(theme);
        }
    }
}
