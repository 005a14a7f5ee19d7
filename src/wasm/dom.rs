//! Browser implementation of [`Environment`].

use tracing::debug;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent,
    MutationObserver, MutationObserverInit, Window,
};

use super::render::FrameScheduler;
use crate::config::HeroConfig;
use crate::engine::{Environment, EventSink, EventSource, HostEvent};
use crate::error::{EffectsError, Result};
use crate::state::{HeroBounds, SurfaceSize};
use crate::theme::{ElementHints, ThemeSignal, OBSERVED_ATTRIBUTES};

pub const CONFIG_ELEMENT_ID: &str = "hero-fx-config";

pub struct DomEnvironment {
    window: Window,
    document: Document,
    hero: Option<HtmlElement>,
    canvas_2d: Option<HtmlCanvasElement>,
    canvas_3d: Option<HtmlCanvasElement>,
    scheduler: FrameScheduler,
    config: HeroConfig,
}

impl DomEnvironment {
    /// Look up the hero and its canvases. Missing elements are tolerated;
    /// only a missing window or document is an error.
    pub fn discover(config: HeroConfig) -> Result<Self> {
        let window = web_sys::window().ok_or(EffectsError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or(EffectsError::Host("no document".into()))?;

        let hero = document
            .query_selector(&config.hero_selector)?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let canvas = |id: &str| {
            document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        };
        let canvas_2d = canvas(&config.canvas_2d_id);
        let canvas_3d = canvas(&config.canvas_3d_id);

        let env = Self {
            window,
            document,
            hero,
            canvas_2d,
            canvas_3d,
            scheduler: FrameScheduler::default(),
            config,
        };
        if env.hero.is_some() && (env.canvas_2d.is_some() || env.canvas_3d.is_some()) {
            env.stack_layers()?;
        }
        Ok(env)
    }

    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    pub fn canvas_2d(&self) -> Option<HtmlCanvasElement> {
        self.hero.as_ref().and(self.canvas_2d.clone())
    }

    pub fn canvas_3d(&self) -> Option<HtmlCanvasElement> {
        self.hero.as_ref().and(self.canvas_3d.clone())
    }

    /// Make the hero a positioning context with the canvases stacked behind
    /// its content: backdrop at z 0, constellation at z 1, content at z 2.
    fn stack_layers(&self) -> Result<()> {
        let Some(hero) = &self.hero else {
            return Ok(());
        };
        let style = hero.style();
        set_if_unset(&style, "position", "relative")?;
        set_if_unset(&style, "overflow", "hidden")?;

        if let Some(inner) = hero
            .query_selector(&self.config.inner_selector)?
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            let style = inner.style();
            set_if_unset(&style, "position", "relative")?;
            style.set_property("z-index", "2")?;
        }

        for (canvas, z_index) in [(&self.canvas_3d, "0"), (&self.canvas_2d, "1")] {
            let Some(canvas) = canvas else { continue };
            let style = canvas.style();
            style.set_property("position", "absolute")?;
            style.set_property("inset", "0")?;
            style.set_property("width", "100%")?;
            style.set_property("height", "100%")?;
            style.set_property("display", "block")?;
            style.set_property("pointer-events", "none")?;
            style.set_property("z-index", z_index)?;
        }
        Ok(())
    }

    fn forward(
        target: &EventTarget,
        kind: &str,
        sink: EventSink,
        map: fn(&Event) -> Option<HostEvent>,
    ) -> Result<()> {
        let closure = Closure::wrap(Box::new(move |event: Event| {
            if let Some(host_event) = map(&event) {
                sink(host_event);
            }
        }) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn observe_theme(&self, sink: EventSink) -> Result<()> {
        let callback = Closure::wrap(Box::new(move |_records: JsValue, _observer: JsValue| {
            sink(HostEvent::ThemeChange);
        }) as Box<dyn FnMut(JsValue, JsValue)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        callback.forget();

        let filter = OBSERVED_ATTRIBUTES
            .iter()
            .map(|name| JsValue::from_str(name))
            .collect::<js_sys::Array>();
        let init = MutationObserverInit::new();
        init.set_attributes(true);
        init.set_attribute_filter(&filter);

        if let Some(root) = self.document.document_element() {
            observer.observe_with_options(&root, &init)?;
        }
        if let Some(body) = self.document.body() {
            observer.observe_with_options(&body, &init)?;
        }
        Ok(())
    }
}

impl Environment for DomEnvironment {
    fn hero_bounds(&self) -> Option<HeroBounds> {
        let rect = self.hero.as_ref()?.get_bounding_client_rect();
        Some(HeroBounds {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        })
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn theme_signal(&self) -> ThemeSignal {
        ThemeSignal {
            root: self
                .document
                .document_element()
                .map(|el| hints(&el))
                .unwrap_or_default(),
            body: self
                .document
                .body()
                .map(|el| hints(&el))
                .unwrap_or_default(),
        }
    }

    fn document_hidden(&self) -> bool {
        self.document.hidden()
    }

    fn now(&self) -> f64 {
        self.window.performance().map(|p| p.now()).unwrap_or(0.0)
    }

    fn resize_surfaces(&self, size: SurfaceSize) {
        let css_width = format!("{}px", size.css_width);
        let css_height = format!("{}px", size.css_height);
        for canvas in [&self.canvas_2d, &self.canvas_3d].into_iter().flatten() {
            canvas.set_width(size.pixel_width);
            canvas.set_height(size.pixel_height);
            let style = canvas.style();
            for (property, value) in [("width", &css_width), ("height", &css_height)] {
                if let Err(err) = style.set_property(property, value) {
                    debug!(property, err = ?err, "canvas css size rejected");
                }
            }
        }
    }

    fn listen(&self, source: EventSource, sink: EventSink) -> Result<()> {
        match source {
            EventSource::WindowResize => {
                Self::forward(&self.window, "resize", sink, |_| Some(HostEvent::Resize))
            }
            EventSource::OrientationChange => Self::forward(
                &self.window,
                "orientationchange",
                sink,
                |_| Some(HostEvent::Resize),
            ),
            EventSource::PointerMove => {
                let Some(hero) = &self.hero else {
                    return Ok(());
                };
                Self::forward(hero, "pointermove", sink, |event| {
                    let event = event.dyn_ref::<MouseEvent>()?;
                    Some(HostEvent::PointerMove {
                        client_x: f64::from(event.client_x()),
                        client_y: f64::from(event.client_y()),
                    })
                })
            }
            EventSource::Visibility => Self::forward(
                &self.document,
                "visibilitychange",
                sink,
                |_| Some(HostEvent::VisibilityChange),
            ),
            EventSource::ThemeMutation => self.observe_theme(sink),
        }
    }

    fn request_frame(&self, sink: &EventSink) -> Result<()> {
        self.scheduler.request(&self.window, sink)
    }
}

fn hints(element: &Element) -> ElementHints {
    ElementHints {
        data_theme: element.get_attribute("data-theme"),
        data_mode: element.get_attribute("data-mode"),
        class_name: element.class_name(),
    }
}

fn set_if_unset(style: &web_sys::CssStyleDeclaration, property: &str, value: &str) -> Result<()> {
    if style.get_property_value(property)?.is_empty() {
        style.set_property(property, value)?;
    }
    Ok(())
}
