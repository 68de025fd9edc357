//! Animation controller: renderer + frame loop + scheduler
//!
//! Every host signal (frame callback, visibility, pointer, resize) arrives as
//! a method call. The browser glue and the CLI both drive this type.

use tracing::debug;

use super::frame_loop::{FrameLoop, FrameScheduler, LoopState};
use super::renderer::{FrameStats, Renderer};
use super::surface::Surface;
use crate::core::Point;

pub struct Backdrop<S: Surface, F: FrameScheduler> {
    renderer: Renderer<S>,
    frame_loop: FrameLoop,
    scheduler: F,
}

impl<S: Surface, F: FrameScheduler> Backdrop<S, F> {
    pub fn new(renderer: Renderer<S>, scheduler: F) -> Self {
        Self {
            renderer,
            frame_loop: FrameLoop::new(),
            scheduler,
        }
    }

    pub fn start(&mut self, visible: bool) {
        self.frame_loop.start(visible, &mut self.scheduler);
    }

    pub fn stop(&mut self) {
        self.frame_loop.stop();
    }

    /// Scheduled frame callback fired. Returns stats if a frame was drawn.
    pub fn on_frame(&mut self) -> Option<FrameStats> {
        self.frame_loop
            .on_frame(&mut self.scheduler)
            .then(|| self.renderer.render_frame())
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.frame_loop.set_visible(visible, &mut self.scheduler);
    }

    pub fn pointer_moved(&mut self, at: Point) {
        self.renderer.set_pointer(Some(at));
    }

    pub fn pointer_left(&mut self) {
        self.renderer.set_pointer(None);
    }

    /// Host resized the surface; particles are regenerated for the new size.
    pub fn resize(&mut self) {
        debug!("Resize requested");
        self.renderer.resize();
    }

    pub fn state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<S> {
        &mut self.renderer
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}
