use js_sys::{Float32Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlCanvasElement, WebGlRenderingContext as GL, WebGlUniformLocation};

use super::program::link_program;
use crate::error::{EffectsError, Result};
use crate::layer::Layer;
use crate::shader::{self, uniform, FrameUniforms};
use crate::state::ViewState;
use crate::theme::Theme;

struct Uniforms {
    resolution: Option<WebGlUniformLocation>,
    time: Option<WebGlUniformLocation>,
    pointer: Option<WebGlUniformLocation>,
    base: Option<WebGlUniformLocation>,
    glow: Option<WebGlUniformLocation>,
    alpha: Option<WebGlUniformLocation>,
}

/// Full-canvas noise gradient drawn with a single triangle.
///
/// The program and vertex buffer are created once; a theme switch only
/// changes which palette is uploaded on the next frame.
pub struct WebGlBackdrop {
    gl: GL,
    uniforms: Uniforms,
    theme: Theme,
}

impl WebGlBackdrop {
    pub fn new(canvas: HtmlCanvasElement, theme: Theme) -> Result<Self> {
        let gl = context(&canvas)?;

        let program = link_program(&gl, shader::VERTEX_SOURCE, shader::FRAGMENT_SOURCE)?;
        gl.use_program(Some(&program));

        let buffer = gl.create_buffer().ok_or(EffectsError::Resource("vertex buffer"))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&buffer));
        let vertices = Float32Array::from(&shader::FULLSCREEN_TRIANGLE[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);

        let position = gl.get_attrib_location(&program, shader::POSITION_ATTRIBUTE);
        let position =
            u32::try_from(position).map_err(|_| EffectsError::Resource("position attribute"))?;
        gl.enable_vertex_attrib_array(position);
        gl.vertex_attrib_pointer_with_i32(position, 2, GL::FLOAT, false, 0, 0);

        let locate = |name: &str| gl.get_uniform_location(&program, name);
        let uniforms = Uniforms {
            resolution: locate(uniform::RESOLUTION),
            time: locate(uniform::TIME),
            pointer: locate(uniform::POINTER),
            base: locate(uniform::BASE),
            glow: locate(uniform::GLOW),
            alpha: locate(uniform::ALPHA),
        };

        Ok(Self { gl, uniforms, theme })
    }
}

/// WebGL 1 context with alpha, no antialiasing and straight alpha.
fn context(canvas: &HtmlCanvasElement) -> Result<GL> {
    let options = Object::new();
    Reflect::set(&options, &"alpha".into(), &JsValue::TRUE)?;
    Reflect::set(&options, &"antialias".into(), &JsValue::FALSE)?;
    Reflect::set(&options, &"premultipliedAlpha".into(), &JsValue::FALSE)?;

    canvas
        .get_context_with_context_options("webgl", &options)?
        .ok_or(EffectsError::ContextUnavailable("webgl"))?
        .dyn_into::<GL>()
        .map_err(|_| EffectsError::ContextUnavailable("webgl"))
}

impl Layer for WebGlBackdrop {
    fn name(&self) -> &'static str {
        "webgl-backdrop"
    }

    fn render(&mut self, view: &ViewState, timestamp: f64) -> Result<()> {
        let frame = FrameUniforms::capture(view, self.theme, timestamp);
        let u = &self.uniforms;
        let gl = &self.gl;

        gl.viewport(0, 0, frame.resolution[0] as i32, frame.resolution[1] as i32);
        gl.uniform2f(u.resolution.as_ref(), frame.resolution[0], frame.resolution[1]);
        gl.uniform1f(u.time.as_ref(), frame.time);
        gl.uniform2f(u.pointer.as_ref(), frame.pointer[0], frame.pointer[1]);
        gl.uniform3f(u.base.as_ref(), frame.base[0], frame.base[1], frame.base[2]);
        gl.uniform3f(u.glow.as_ref(), frame.glow[0], frame.glow[1], frame.glow[2]);
        gl.uniform1f(u.alpha.as_ref(), frame.alpha);

        gl.draw_arrays(GL::TRIANGLES, 0, 3);
        Ok(())
    }

    fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }
}
