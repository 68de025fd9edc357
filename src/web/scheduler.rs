//! `requestAnimationFrame` scheduler

use std::cell::RefCell;
use std::rc::Rc;

use tracing::error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::render::FrameScheduler;

/// Slot holding the frame callback; filled once the shared state exists.
pub type CallbackSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

pub struct RafScheduler {
    window: Window,
    callback: CallbackSlot,
}

impl RafScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            callback: Rc::new(RefCell::new(None)),
        }
    }

    pub fn slot(&self) -> CallbackSlot {
        self.callback.clone()
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) {
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            error!("Frame requested before callback was installed");
            return;
        };
        if let Err(e) = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            error!(?e, "requestAnimationFrame failed");
        }
    }
}
