//! Orchestration: shared view state, host events and the frame loop.
//!
//! [`HeroEngine`] is the host-independent state machine. [`HeroRuntime`]
//! binds it to an [`Environment`] (the browser in production, a mock in
//! tests), registers listeners and keeps exactly one frame in flight.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::HeroConfig;
use crate::error::Result;
use crate::layer::LayerStack;
use crate::state::{HeroBounds, SurfaceSize, ViewState};
use crate::theme::{self, Theme, ThemeSignal};

/// Something the host reports to the runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Resize,
    PointerMove { client_x: f64, client_y: f64 },
    VisibilityChange,
    /// Class or theme attributes changed on the root or body element.
    ThemeChange,
    /// Animation frame callback with its timestamp in milliseconds.
    Frame(f64),
}

/// Listener registrations the runtime asks the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    WindowResize,
    OrientationChange,
    PointerMove,
    Visibility,
    ThemeMutation,
}

impl EventSource {
    pub const ALL: [EventSource; 5] = [
        EventSource::WindowResize,
        EventSource::OrientationChange,
        EventSource::PointerMove,
        EventSource::Visibility,
        EventSource::ThemeMutation,
    ];
}

pub type EventSink = Rc<dyn Fn(HostEvent)>;

/// Host capabilities the runtime depends on.
pub trait Environment {
    /// Hero bounding box, or `None` when the page has no hero.
    fn hero_bounds(&self) -> Option<HeroBounds>;

    fn device_pixel_ratio(&self) -> f64;

    fn theme_signal(&self) -> ThemeSignal;

    fn document_hidden(&self) -> bool;

    /// Current high-resolution time in milliseconds.
    fn now(&self) -> f64;

    /// Apply a new size to every canvas present.
    fn resize_surfaces(&self, size: SurfaceSize);

    /// Forward events from `source` into `sink` for the rest of the page
    /// lifetime.
    fn listen(&self, source: EventSource, sink: EventSink) -> Result<()>;

    /// Deliver one [`HostEvent::Frame`] to `sink` at the next refresh.
    fn request_frame(&self, sink: &EventSink) -> Result<()>;
}

pub struct HeroEngine {
    view: ViewState,
    layers: LayerStack,
    frame_pending: bool,
}

impl HeroEngine {
    pub fn new(view: ViewState, layers: LayerStack) -> Self {
        Self {
            view,
            layers,
            frame_pending: false,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn layers(&self) -> &LayerStack {
        &self.layers
    }

    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Refit to the hero. Layers keep their state and pick up the new size
    /// on the next frame.
    pub fn resize(&mut self, bounds: HeroBounds, device_pixel_ratio: f64) -> SurfaceSize {
        self.view.set_pixel_ratio(device_pixel_ratio);
        self.view.fit(bounds)
    }

    pub fn track_pointer(&mut self, bounds: HeroBounds, client_x: f64, client_y: f64) -> bool {
        self.view.track_pointer(bounds, client_x, client_y)
    }

    /// Push `theme` to every layer if it differs from the current one.
    pub fn apply_theme(&mut self, theme: Theme) -> bool {
        if theme == self.view.theme {
            return false;
        }
        self.view.theme = theme;
        self.layers.set_theme(theme);
        true
    }

    /// Returns true when the loop has to be restarted by the caller.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.view.running = visible;
        visible && !self.frame_pending
    }

    /// Run one frame. Returns true when the next frame should be requested.
    pub fn frame(&mut self, timestamp: f64) -> bool {
        self.frame_pending = false;
        if !self.view.running {
            return false;
        }
        self.layers.render(&self.view, timestamp);
        self.frame_pending = true;
        true
    }

    fn abandon_frame(&mut self) {
        self.frame_pending = false;
    }
}

pub struct HeroRuntime<E> {
    env: Rc<E>,
    engine: RefCell<HeroEngine>,
    frame_sink: RefCell<Option<EventSink>>,
}

impl<E: Environment + 'static> HeroRuntime<E> {
    /// Boot the effects.
    ///
    /// Without a hero, or when `build_layers` yields nothing, this returns
    /// `None` before touching the host: no listeners, no frame loop.
    pub fn attach<F>(env: Rc<E>, config: &HeroConfig, build_layers: F) -> Option<Rc<Self>>
    where
        F: FnOnce(&ViewState) -> LayerStack,
    {
        let Some(bounds) = env.hero_bounds() else {
            debug!("no hero container; effects stay inert");
            return None;
        };

        let theme = theme::detect(&env.theme_signal());
        let mut view = ViewState::new(env.device_pixel_ratio(), config.max_pixel_ratio, theme);
        let surface = view.fit(bounds);
        view.running = !env.document_hidden();

        let layers = build_layers(&view);
        if layers.is_empty() {
            debug!("no usable canvas in hero; effects stay inert");
            return None;
        }
        info!(
            layers = ?layers.names(),
            %theme,
            width = view.width,
            height = view.height,
            pixel_ratio = view.pixel_ratio,
            "hero effects starting"
        );
        env.resize_surfaces(surface);

        let runtime = Rc::new(Self {
            env,
            engine: RefCell::new(HeroEngine::new(view, layers)),
            frame_sink: RefCell::new(None),
        });

        let sink = runtime.sink();
        *runtime.frame_sink.borrow_mut() = Some(Rc::clone(&sink));
        for source in EventSource::ALL {
            if let Err(err) = runtime.env.listen(source, Rc::clone(&sink)) {
                warn!(?source, %err, "failed to register listener");
            }
        }

        runtime.frame(runtime.env.now());
        Some(runtime)
    }

    pub fn engine(&self) -> Ref<'_, HeroEngine> {
        self.engine.borrow()
    }

    pub fn dispatch(&self, event: HostEvent) {
        match event {
            HostEvent::Resize => {
                if let Some(bounds) = self.env.hero_bounds() {
                    let ratio = self.env.device_pixel_ratio();
                    let surface = self.engine.borrow_mut().resize(bounds, ratio);
                    self.env.resize_surfaces(surface);
                }
            }
            HostEvent::PointerMove { client_x, client_y } => {
                if let Some(bounds) = self.env.hero_bounds() {
                    self.engine
                        .borrow_mut()
                        .track_pointer(bounds, client_x, client_y);
                }
            }
            HostEvent::VisibilityChange => {
                let visible = !self.env.document_hidden();
                let restart = self.engine.borrow_mut().set_visible(visible);
                debug!(visible, restart, "visibility changed");
                if restart {
                    self.frame(self.env.now());
                }
            }
            HostEvent::ThemeChange => {
                let theme = theme::detect(&self.env.theme_signal());
                if self.engine.borrow_mut().apply_theme(theme) {
                    debug!(%theme, "theme changed");
                }
            }
            HostEvent::Frame(timestamp) => self.frame(timestamp),
        }
    }

    fn frame(&self, timestamp: f64) {
        if !self.engine.borrow_mut().frame(timestamp) {
            return;
        }
        let sink = self.frame_sink.borrow().clone();
        if let Some(sink) = sink {
            if let Err(err) = self.env.request_frame(&sink) {
                warn!(%err, "failed to schedule animation frame");
                self.engine.borrow_mut().abandon_frame();
            }
        }
    }

    fn sink(self: &Rc<Self>) -> EventSink {
        let runtime = Rc::clone(self);
        Rc::new(move |event| runtime.dispatch(event))
    }
}
