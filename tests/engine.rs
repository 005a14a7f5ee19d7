use std::cell::{Cell, RefCell};
use std::rc::Rc;

use hero_fx::theme::{ElementHints, ThemeSignal};
use hero_fx::{
    Environment, EventSink, EventSource, HeroBounds, HeroConfig, HeroRuntime, HostEvent, Layer,
    LayerStack, Result, SurfaceSize, Theme, ViewState,
};

#[derive(Default)]
struct MockEnv {
    bounds: Cell<Option<HeroBounds>>,
    pixel_ratio: Cell<f64>,
    hidden: Cell<bool>,
    now: Cell<f64>,
    signal: RefCell<ThemeSignal>,
    listeners: RefCell<Vec<EventSource>>,
    frame_requests: Cell<usize>,
    pending: RefCell<Option<EventSink>>,
    surfaces: RefCell<Vec<SurfaceSize>>,
}

impl MockEnv {
    fn with_hero(width: f64, height: f64) -> Rc<Self> {
        let env = MockEnv::default();
        env.bounds.set(Some(HeroBounds { left: 10.0, top: 20.0, width, height }));
        env.pixel_ratio.set(2.0);
        Rc::new(env)
    }

    /// Fire the outstanding animation frame, if any.
    fn fire_frame(&self, timestamp: f64) -> bool {
        let sink = self.pending.borrow_mut().take();
        match sink {
            Some(sink) => {
                sink(HostEvent::Frame(timestamp));
                true
            }
            None => false,
        }
    }
}

impl Environment for MockEnv {
    fn hero_bounds(&self) -> Option<HeroBounds> {
        self.bounds.get()
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio.get()
    }

    fn theme_signal(&self) -> ThemeSignal {
        self.signal.borrow().clone()
    }

    fn document_hidden(&self) -> bool {
        self.hidden.get()
    }

    fn now(&self) -> f64 {
        self.now.get()
    }

    fn resize_surfaces(&self, size: SurfaceSize) {
        self.surfaces.borrow_mut().push(size);
    }

    fn listen(&self, source: EventSource, _sink: EventSink) -> Result<()> {
        self.listeners.borrow_mut().push(source);
        Ok(())
    }

    fn request_frame(&self, sink: &EventSink) -> Result<()> {
        self.frame_requests.set(self.frame_requests.get() + 1);
        *self.pending.borrow_mut() = Some(Rc::clone(sink));
        Ok(())
    }
}

#[derive(Default)]
struct Journal {
    renders: Vec<(&'static str, f64)>,
    themes: Vec<(&'static str, Theme)>,
    sizes: Vec<(f64, f64)>,
}

struct RecordingLayer {
    name: &'static str,
    journal: Rc<RefCell<Journal>>,
}

impl Layer for RecordingLayer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn render(&mut self, view: &ViewState, timestamp: f64) -> Result<()> {
        let mut journal = self.journal.borrow_mut();
        journal.renders.push((self.name, timestamp));
        journal.sizes.push((view.width, view.height));
        Ok(())
    }

    fn set_theme(&mut self, theme: Theme) {
        self.journal.borrow_mut().themes.push((self.name, theme));
    }
}

fn layers(names: &[&'static str], journal: &Rc<RefCell<Journal>>) -> LayerStack {
    let mut stack = LayerStack::default();
    for &name in names {
        stack.push(Box::new(RecordingLayer {
            name,
            journal: Rc::clone(journal),
        }));
    }
    stack
}

fn attach(
    env: &Rc<MockEnv>,
    names: &'static [&'static str],
) -> (Option<Rc<HeroRuntime<MockEnv>>>, Rc<RefCell<Journal>>) {
    let journal = Rc::new(RefCell::new(Journal::default()));
    let for_build = Rc::clone(&journal);
    let runtime = HeroRuntime::attach(Rc::clone(env), &HeroConfig::default(), move |_| {
        layers(names, &for_build)
    });
    (runtime, journal)
}

#[test]
fn missing_hero_registers_nothing() {
    let env = Rc::new(MockEnv::default());
    let mut built = false;
    let runtime = HeroRuntime::attach(Rc::clone(&env), &HeroConfig::default(), |_| {
        built = true;
        LayerStack::default()
    });

    assert!(runtime.is_none());
    assert!(!built);
    assert!(env.listeners.borrow().is_empty());
    assert_eq!(env.frame_requests.get(), 0);
    assert!(env.surfaces.borrow().is_empty());
}

#[test]
fn no_layers_stays_inert() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (runtime, _) = attach(&env, &[]);

    assert!(runtime.is_none());
    assert!(env.listeners.borrow().is_empty());
    assert_eq!(env.frame_requests.get(), 0);
}

#[test]
fn attach_sizes_surfaces_and_starts_loop() {
    let env = MockEnv::with_hero(800.7, 600.2);
    env.pixel_ratio.set(3.0);
    env.now.set(5.0);
    let (runtime, journal) = attach(&env, &["webgl", "constellation"]);
    let runtime = runtime.expect("runtime");

    assert_eq!(env.listeners.borrow().as_slice(), &EventSource::ALL);
    assert_eq!(
        env.surfaces.borrow().as_slice(),
        &[SurfaceSize { css_width: 800, css_height: 600, pixel_width: 1200, pixel_height: 900 }]
    );
    assert_eq!(runtime.engine().view().pixel_ratio, 1.5);
    assert_eq!(runtime.engine().layers().len(), 2);
    assert!(runtime.engine().frame_pending());
    assert_eq!(journal.borrow().renders, vec![("webgl", 5.0), ("constellation", 5.0)]);
    assert_eq!(env.frame_requests.get(), 1);
}

#[test]
fn each_frame_renders_back_to_front_and_reschedules() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (_runtime, journal) = attach(&env, &["webgl", "constellation"]);

    assert!(env.fire_frame(16.0));
    assert!(env.fire_frame(32.0));

    let journal = journal.borrow();
    let renders = &journal.renders;
    assert_eq!(
        renders[2..],
        [("webgl", 16.0), ("constellation", 16.0), ("webgl", 32.0), ("constellation", 32.0)]
    );
    assert_eq!(env.frame_requests.get(), 3);
}

#[test]
fn only_constellation_still_renders_every_frame() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (_runtime, journal) = attach(&env, &["constellation"]);

    for t in 1..=3 {
        assert!(env.fire_frame(f64::from(t) * 16.0));
    }
    let journal = journal.borrow();
    let renders = &journal.renders;
    assert_eq!(renders.len(), 4);
    assert!(renders.iter().all(|(name, _)| *name == "constellation"));
}

#[test]
fn hidden_tab_stops_and_resumes_without_stacking() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (runtime, journal) = attach(&env, &["constellation"]);
    let runtime = runtime.expect("runtime");

    env.hidden.set(true);
    runtime.dispatch(HostEvent::VisibilityChange);

    // The frame already in flight lands while hidden: no render, no reschedule.
    assert!(env.fire_frame(16.0));
    assert_eq!(journal.borrow().renders.len(), 1);
    assert_eq!(env.frame_requests.get(), 1);
    assert!(!env.fire_frame(32.0));
    assert!(!runtime.engine().frame_pending());

    env.hidden.set(false);
    env.now.set(9_000.0);
    runtime.dispatch(HostEvent::VisibilityChange);
    assert_eq!(journal.borrow().renders.last(), Some(&("constellation", 9_000.0)));
    assert_eq!(env.frame_requests.get(), 2);

    // A second "visible" notification must not start a parallel loop.
    runtime.dispatch(HostEvent::VisibilityChange);
    assert_eq!(env.frame_requests.get(), 2);
    assert_eq!(journal.borrow().renders.len(), 2);
}

#[test]
fn visible_again_before_pending_frame_fires_reuses_it() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (runtime, journal) = attach(&env, &["constellation"]);
    let runtime = runtime.expect("runtime");

    env.hidden.set(true);
    runtime.dispatch(HostEvent::VisibilityChange);
    env.hidden.set(false);
    runtime.dispatch(HostEvent::VisibilityChange);

    assert_eq!(env.frame_requests.get(), 1);
    assert!(env.fire_frame(48.0));
    assert_eq!(journal.borrow().renders.last(), Some(&("constellation", 48.0)));
    assert_eq!(env.frame_requests.get(), 2);
}

#[test]
fn starting_hidden_defers_the_loop() {
    let env = MockEnv::with_hero(800.0, 600.0);
    env.hidden.set(true);
    let (runtime, journal) = attach(&env, &["constellation"]);
    let runtime = runtime.expect("runtime");

    assert!(journal.borrow().renders.is_empty());
    assert_eq!(env.frame_requests.get(), 0);

    env.hidden.set(false);
    runtime.dispatch(HostEvent::VisibilityChange);
    assert_eq!(journal.borrow().renders.len(), 1);
    assert_eq!(env.frame_requests.get(), 1);
}

#[test]
fn pointer_at_hero_center_is_origin() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (runtime, _) = attach(&env, &["constellation"]);
    let runtime = runtime.expect("runtime");

    runtime.dispatch(HostEvent::PointerMove { client_x: 410.0, client_y: 320.0 });
    let engine = runtime.engine();
    let pointer = engine.view().pointer;
    assert_eq!((pointer.x, pointer.y), (400.0, 300.0));
    assert_eq!(pointer.nx, 0.0);
    assert_eq!(pointer.ny, 0.0);
}

#[test]
fn pointer_outside_hero_keeps_last_position() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (runtime, _) = attach(&env, &["constellation"]);
    let runtime = runtime.expect("runtime");

    runtime.dispatch(HostEvent::PointerMove { client_x: 10.0, client_y: 20.0 });
    runtime.dispatch(HostEvent::PointerMove { client_x: 900.0, client_y: 50.0 });

    let pointer = runtime.engine().view().pointer;
    assert_eq!((pointer.x, pointer.y), (0.0, 0.0));
    assert_eq!((pointer.nx, pointer.ny), (-1.0, 1.0));
}

#[test]
fn resize_updates_surfaces_and_next_frame() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (runtime, journal) = attach(&env, &["webgl"]);
    let runtime = runtime.expect("runtime");

    env.bounds.set(Some(HeroBounds { left: 0.0, top: 0.0, width: 1024.0, height: 0.4 }));
    env.pixel_ratio.set(1.0);
    runtime.dispatch(HostEvent::Resize);

    assert_eq!(
        env.surfaces.borrow().last(),
        Some(&SurfaceSize { css_width: 1024, css_height: 1, pixel_width: 1024, pixel_height: 1 })
    );
    env.fire_frame(16.0);
    assert_eq!(journal.borrow().sizes.last(), Some(&(1024.0, 1.0)));
}

#[test]
fn theme_mutation_notifies_each_layer_once() {
    let env = MockEnv::with_hero(800.0, 600.0);
    let (runtime, journal) = attach(&env, &["webgl", "constellation"]);
    let runtime = runtime.expect("runtime");
    assert_eq!(runtime.engine().view().theme, Theme::Dark);

    env.signal.borrow_mut().root = ElementHints {
        class_name: "page light".to_owned(),
        ..ElementHints::default()
    };
    runtime.dispatch(HostEvent::ThemeChange);
    // Unrelated mutation that resolves to the same theme.
    runtime.dispatch(HostEvent::ThemeChange);

    assert_eq!(
        journal.borrow().themes,
        vec![("webgl", Theme::Light), ("constellation", Theme::Light)]
    );
    assert_eq!(runtime.engine().view().theme, Theme::Light);
}
