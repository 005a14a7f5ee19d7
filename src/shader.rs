//! Shader sources and per-frame uniforms for the WebGL backdrop.

use crate::state::ViewState;
use crate::theme::Theme;

/// Maps the clip-space triangle to UV `[0, 1]`.
pub const VERTEX_SOURCE: &str = r#"
attribute vec2 aPos;
varying vec2 vUv;
void main() {
  vUv = aPos * 0.5 + 0.5;
  gl_Position = vec4(aPos, 0.0, 1.0);
}
"#;

/// Two octaves of value noise blended between a base and a glow color,
/// warped by the pointer and faded towards the edges.
pub const FRAGMENT_SOURCE: &str = r#"
precision mediump float;
varying vec2 vUv;
uniform vec2 uRes;
uniform float uTime;
uniform vec2 uMouse;
uniform vec3 uBase;
uniform vec3 uGlow;
uniform float uAlpha;

float hash(vec2 p) {
  p = fract(p * vec2(123.34, 345.45));
  p += dot(p, p + 34.345);
  return fract(p.x * p.y);
}

float noise(vec2 p) {
  vec2 i = floor(p);
  vec2 f = fract(p);
  float a = hash(i);
  float b = hash(i + vec2(1.0, 0.0));
  float c = hash(i + vec2(0.0, 1.0));
  float d = hash(i + vec2(1.0, 1.0));
  vec2 u = f * f * (3.0 - 2.0 * f);
  return mix(a, b, u.x) + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}

void main() {
  vec2 uv = vUv;
  vec2 p = (uv - 0.5) * vec2(uRes.x / uRes.y, 1.0);

  float t = uTime * 0.00025;
  float n = noise(p * 2.2 + vec2(t, -t));
  float n2 = noise(p * 4.4 - vec2(t * 1.3, t * 0.7));

  p += uMouse * 0.10 * (n - 0.5);

  float v = 0.55 + 0.35 * sin(3.0 * (p.x + n) + t * 6.0)
                  + 0.25 * cos(3.5 * (p.y + n2) - t * 5.0);
  v = smoothstep(0.0, 1.0, v);

  vec3 col = mix(uBase, uGlow, v * 0.75);

  float edge = smoothstep(1.0, 0.2, length(p));
  col *= edge;

  gl_FragColor = vec4(col, uAlpha);
}
"#;

pub const POSITION_ATTRIBUTE: &str = "aPos";

/// Uniform names, in upload order.
pub mod uniform {
    pub const RESOLUTION: &str = "uRes";
    pub const TIME: &str = "uTime";
    pub const POINTER: &str = "uMouse";
    pub const BASE: &str = "uBase";
    pub const GLOW: &str = "uGlow";
    pub const ALPHA: &str = "uAlpha";
}

/// One triangle that covers all of clip space.
pub const FULLSCREEN_TRIANGLE: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShaderPalette {
    pub base: [f32; 3],
    pub glow: [f32; 3],
    pub alpha: f32,
}

const DARK: ShaderPalette = ShaderPalette {
    base: [0.04, 0.04, 0.06],
    glow: [0.55, 0.42, 0.95],
    alpha: 0.85,
};

// Slightly darker paper than the page so the glow still reads.
const LIGHT: ShaderPalette = ShaderPalette {
    base: [0.92, 0.915, 0.94],
    glow: [0.55, 0.42, 0.95],
    alpha: 0.62,
};

impl ShaderPalette {
    pub fn for_theme(theme: Theme) -> &'static ShaderPalette {
        match theme {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }
}

/// Values uploaded before each draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    /// Backing-store size in device pixels; also the GL viewport.
    pub resolution: [f32; 2],
    /// Raw frame timestamp in milliseconds.
    pub time: f32,
    pub pointer: [f32; 2],
    pub base: [f32; 3],
    pub glow: [f32; 3],
    pub alpha: f32,
}

impl FrameUniforms {
    pub fn capture(view: &ViewState, theme: Theme, timestamp: f64) -> Self {
        let surface = view.surface();
        let palette = ShaderPalette::for_theme(theme);
        Self {
            resolution: [surface.pixel_width as f32, surface.pixel_height as f32],
            time: timestamp as f32,
            pointer: [view.pointer.nx as f32, view.pointer.ny as f32],
            base: palette.base,
            glow: palette.glow,
            alpha: palette.alpha,
        }
    }
}
