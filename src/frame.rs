//! Repeating `requestAnimationFrame` task with a cancel handle.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::window;

use crate::error::js_message;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Runs a callback once per display frame until [`FrameLoop::stop`] is called.
///
/// The pending frame id is the single handle for the loop: `start` is a no-op
/// while one is pending and `stop` cancels it before it fires.
pub struct FrameLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    pub fn new<F>(mut on_frame: F) -> Self
    where
        F: FnMut(f64) + 'static,
    {
        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));

        let f = callback.clone();
        let p = pending.clone();
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
            // Cleared by stop() if the loop was cancelled from inside on_frame.
            p.set(Some(-1));
            on_frame(ts);
            if p.get().is_some() {
                p.set(schedule(&f));
            }
        }) as Box<dyn FnMut(f64)>));

        Self { callback, pending }
    }

    pub fn is_running(&self) -> bool {
        self.pending.get().is_some()
    }

    /// Schedule the next frame. Does nothing if the loop is already running.
    pub fn start(&self) {
        if self.is_running() {
            return;
        }
        self.pending.set(schedule(&self.callback));
    }

    /// Cancel the pending frame; takes effect before it fires.
    pub fn stop(&self) {
        let Some(id) = self.pending.take() else {
            return;
        };
        // Negative while the callback itself is running; nothing to cancel.
        if id < 0 {
            return;
        }
        if let Some(w) = window() {
            if let Err(err) = w.cancel_animation_frame(id) {
                log::warn!("cancelAnimationFrame({id}) failed: {}", js_message(&err));
            }
        }
    }

    #[cfg(all(test, target_arch = "wasm32"))]
    pub(crate) fn pending_id(&self) -> Option<i32> {
        self.pending.get()
    }
}

fn schedule(callback: &FrameCallback) -> Option<i32> {
    let w = window()?;
    let cb = callback.borrow();
    let closure = cb.as_ref()?;
    match w.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(err) => {
            log::warn!("requestAnimationFrame failed: {}", js_message(&err));
            None
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn second_start_keeps_the_pending_frame() {
        let frames = FrameLoop::new(|_| {});
        assert!(!frames.is_running());
        frames.start();
        let first = frames.pending_id();
        assert!(first.is_some());
        frames.start();
        assert_eq!(frames.pending_id(), first);
        frames.stop();
    }

    #[wasm_bindgen_test]
    fn stop_clears_the_handle_and_restart_schedules_again() {
        let frames = FrameLoop::new(|_| {});
        frames.start();
        frames.stop();
        assert!(!frames.is_running());
        assert_eq!(frames.pending_id(), None);
        frames.stop();
        frames.start();
        assert!(frames.is_running());
        frames.stop();
    }
}
