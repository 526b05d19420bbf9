use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::Window;

use crate::coordinator::{FrameScheduler, FrameTask, FrameToken};
use crate::error::Result;

/// `requestAnimationFrame` scheduler for a single arrow.
///
/// Holds one outstanding task at a time; the coordinator never asks for a
/// second frame before the first has run or been cancelled.
pub struct AnimationFrames {
    window: Window,
    task: Rc<RefCell<Option<FrameTask>>>,
    handle: Rc<Cell<Option<i32>>>,
    // Reused for every frame so nothing is leaked per request.
    callback: Closure<dyn FnMut()>,
}

impl AnimationFrames {
    pub fn new(window: Window) -> Self {
        let task: Rc<RefCell<Option<FrameTask>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let callback = {
            let task = Rc::clone(&task);
            let handle = Rc::clone(&handle);
            Closure::wrap(Box::new(move || {
                handle.set(None);
                let next = task.borrow_mut().take();
                if let Some(run) = next {
                    run();
                }
            }) as Box<dyn FnMut()>)
        };
        Self { window, task, handle, callback }
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self, task: FrameTask) -> Result<FrameToken> {
        *self.task.borrow_mut() = Some(task);
        match self
            .window
            .request_animation_frame(self.callback.as_ref().unchecked_ref())
        {
            Ok(id) => {
                self.handle.set(Some(id));
                Ok(FrameToken(id))
            }
            Err(err) => {
                self.task.borrow_mut().take();
                Err(err.into())
            }
        }
    }

    fn cancel_frame(&self, token: FrameToken) {
        let _ = self.window.cancel_animation_frame(token.0);
        self.handle.set(None);
        self.task.borrow_mut().take();
    }
}

impl Drop for AnimationFrames {
    fn drop(&mut self) {
        // the callback dies with us, so the browser must not call it later
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}
