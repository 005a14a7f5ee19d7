use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::constellation::Painter;
use crate::error::{EffectsError, Result};

/// [`Painter`] over a canvas 2D context.
pub struct CanvasPainter {
    ctx: CanvasRenderingContext2d,
}

impl CanvasPainter {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or(EffectsError::ContextUnavailable("2d"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| EffectsError::ContextUnavailable("2d"))?;
        Ok(Self { ctx })
    }
}

impl Painter for CanvasPainter {
    fn begin_frame(&mut self, pixel_ratio: f64, width: f64, height: f64, trail: &str) -> Result<()> {
        // Draw in CSS pixels; the transform absorbs the pixel ratio.
        self.ctx
            .set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0)?;
        self.ctx.clear_rect(0.0, 0.0, width, height);
        self.ctx.set_fill_style_str(trail);
        self.ctx.fill_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn begin_links(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn link(&mut self, from: (f64, f64), to: (f64, f64), alpha: f64) {
        self.ctx.set_global_alpha(alpha);
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }

    fn end_links(&mut self) {
        self.ctx.set_global_alpha(1.0);
    }

    fn begin_dots(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn dot(&mut self, x: f64, y: f64, radius: f64) -> Result<()> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }
}
