#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

use hero_fx::wasm::{CanvasPainter, DomEnvironment, WebGlBackdrop};
use hero_fx::constellation::ConstellationLayer;
use hero_fx::{Environment, HeroConfig, HeroRuntime, Layer, LayerStack, Theme};

wasm_bindgen_test_configure!(run_in_browser);

/// Insert a 640x360 hero with both canvases and return it.
fn mount_hero() -> web_sys::HtmlElement {
    let document = web_sys::window().unwrap().document().unwrap();
    if let Some(old) = document.query_selector(".hero").unwrap() {
        old.remove();
    }
    let hero = document.create_element("section").unwrap();
    hero.set_class_name("hero");
    hero.set_inner_html(
        r#"<canvas id="fx3d"></canvas><canvas id="fx2d"></canvas><div class="hero-inner"></div>"#,
    );
    let hero = hero.dyn_into::<web_sys::HtmlElement>().unwrap();
    hero.style().set_property("display", "block").unwrap();
    hero.style().set_property("width", "640px").unwrap();
    hero.style().set_property("height", "360px").unwrap();
    document.body().unwrap().append_child(&hero).unwrap();
    hero
}

#[wasm_bindgen_test]
fn discovers_hero_and_stacks_canvases() {
    let hero = mount_hero();
    let env = DomEnvironment::discover(HeroConfig::default()).unwrap();

    let bounds = env.hero_bounds().expect("hero bounds");
    assert!(bounds.width > 0.0 && bounds.height > 0.0);
    assert_eq!(hero.style().get_property_value("position").unwrap(), "relative");

    let canvas = env.canvas_2d().expect("2d canvas");
    assert_eq!(canvas.style().get_property_value("z-index").unwrap(), "1");
    assert_eq!(canvas.style().get_property_value("pointer-events").unwrap(), "none");
    let canvas = env.canvas_3d().expect("3d canvas");
    assert_eq!(canvas.style().get_property_value("z-index").unwrap(), "0");
}

#[wasm_bindgen_test]
fn attach_sizes_backing_store() {
    mount_hero();
    let env = Rc::new(DomEnvironment::discover(HeroConfig::default()).unwrap());
    let canvas = env.canvas_2d().unwrap();
    let painter_canvas = canvas.clone();

    let runtime = HeroRuntime::attach(Rc::clone(&env), &HeroConfig::default(), move |view| {
        let mut layers = LayerStack::default();
        let painter = CanvasPainter::new(painter_canvas).unwrap();
        let config = HeroConfig::default().constellation;
        layers.push(Box::new(ConstellationLayer::new(painter, view, &config)));
        layers
    })
    .expect("runtime");

    let view = runtime.engine().view().clone();
    assert_eq!(canvas.width(), (view.width * view.pixel_ratio).floor() as u32);
    assert_eq!(canvas.height(), (view.height * view.pixel_ratio).floor() as u32);
}

#[wasm_bindgen_test]
fn backdrop_compiles_and_draws() {
    mount_hero();
    let env = DomEnvironment::discover(HeroConfig::default()).unwrap();
    let canvas = env.canvas_3d().unwrap();

    let mut backdrop = match WebGlBackdrop::new(canvas, Theme::Dark) {
        Ok(backdrop) => backdrop,
        // Headless browsers without a GPU path legitimately refuse WebGL.
        Err(hero_fx::EffectsError::ContextUnavailable(_)) => return,
        Err(err) => panic!("backdrop failed: {err}"),
    };
    let view = hero_fx::ViewState::new(1.0, 1.5, Theme::Dark);
    backdrop.render(&view, 1_000.0).unwrap();
    backdrop.set_theme(Theme::Light);
    backdrop.render(&view, 1_016.0).unwrap();
}
