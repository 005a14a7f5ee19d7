//! Animated hero background: a WebGL noise backdrop under a 2D particle
//! constellation, sharing one frame loop.
//!
//! Everything except the `wasm` module is host-independent and can be
//! exercised with plain `cargo test`.

pub mod config;
pub mod constellation;
pub mod engine;
pub mod error;
pub mod layer;
pub mod shader;
pub mod state;
pub mod theme;

pub use config::{ConstellationConfig, HeroConfig};
pub use engine::{Environment, EventSink, EventSource, HeroEngine, HeroRuntime, HostEvent};
pub use error::{EffectsError, Result};
pub use layer::{Layer, LayerStack};
pub use state::{HeroBounds, Pointer, SurfaceSize, ViewState};
pub use theme::Theme;

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::rc::Rc;

    use tracing::{debug, warn};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::config::HeroConfig;
    use crate::constellation::ConstellationLayer;
    use crate::engine::HeroRuntime;
    use crate::error::EffectsError;
    use crate::layer::LayerStack;

    pub mod canvas;
    pub mod dom;
    pub mod program;
    pub mod render;
    pub mod webgl;

    pub use canvas::CanvasPainter;
    pub use dom::DomEnvironment;
    pub use webgl::WebGlBackdrop;

    impl From<JsValue> for EffectsError {
        fn from(value: JsValue) -> Self {
            EffectsError::Host(value.as_string().unwrap_or_else(|| format!("{value:?}")))
        }
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        tracing_wasm::set_as_global_default();

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if document.ready_state() == "loading" {
            let on_ready = Closure::once(move || {
                if let Err(err) = boot() {
                    warn!(%err, "hero effects failed to start");
                }
            });
            document.add_event_listener_with_callback(
                "DOMContentLoaded",
                on_ready.as_ref().unchecked_ref(),
            )?;
            on_ready.forget();
            return Ok(());
        }

        if let Err(err) = boot() {
            warn!(%err, "hero effects failed to start");
        }
        Ok(())
    }

    fn boot() -> Result<(), EffectsError> {
        let env = Rc::new(DomEnvironment::discover(load_config())?);
        let config = env.config().clone();
        let constellation = config.constellation.clone();

        let layers_env = Rc::clone(&env);
        let runtime = HeroRuntime::attach(env, &config, move |view| {
            let mut layers = LayerStack::default();
            if let Some(canvas) = layers_env.canvas_3d() {
                match WebGlBackdrop::new(canvas, view.theme) {
                    Ok(backdrop) => layers.push(Box::new(backdrop)),
                    Err(EffectsError::ContextUnavailable(kind)) => {
                        debug!(kind, "no WebGL; backdrop disabled");
                    }
                    Err(err) => warn!(%err, "WebGL backdrop unavailable"),
                }
            }
            if let Some(canvas) = layers_env.canvas_2d() {
                match CanvasPainter::new(canvas) {
                    Ok(painter) => layers.push(Box::new(ConstellationLayer::new(
                        painter,
                        view,
                        &constellation,
                    ))),
                    Err(err) => debug!(%err, "no 2D context; constellation disabled"),
                }
            }
            layers
        });

        // Listeners own the runtime from here on.
        drop(runtime);
        Ok(())
    }

    /// Overrides from `<script type="application/json" id="hero-fx-config">`.
    fn load_config() -> HeroConfig {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(dom::CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match json {
            Some(json) => HeroConfig::from_json(&json).unwrap_or_else(|err| {
                warn!(%err, "ignoring hero effects config");
                HeroConfig::default()
            }),
            None => HeroConfig::default(),
        }
    }
}
