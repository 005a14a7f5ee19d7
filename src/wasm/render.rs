use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use crate::engine::{EventSink, HostEvent};
use crate::error::Result;

/// Drives the animation loop through `requestAnimationFrame`.
///
/// The frame closure is created on the first request and reused afterwards,
/// so rescheduling from inside a frame allocates nothing. Storing it inside
/// an `Option` lets us create the scheduler before we have a sink to call.
#[derive(Default)]
pub struct FrameScheduler {
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameScheduler {
    pub fn request(&self, window: &Window, sink: &EventSink) -> Result<()> {
        let mut slot = self.callback.borrow_mut();
        let callback = slot.get_or_insert_with(|| {
            let sink = Rc::clone(sink);
            Closure::wrap(Box::new(move |timestamp: f64| sink(HostEvent::Frame(timestamp)))
                as Box<dyn FnMut(f64)>)
        });
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        Ok(())
    }
}
