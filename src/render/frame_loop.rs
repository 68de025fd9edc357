//! Self-rescheduling frame loop with a visibility pause
//!
//! The loop never owns a timer. It asks a `FrameScheduler` for "one callback
//! before the next repaint" and, when that callback fires, decides whether to
//! render and whether to ask again. At most one request is ever outstanding.

use tracing::{debug, info};

/// Host primitive that invokes the frame callback once, before the next repaint
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Lifecycle of the animation chain
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
    PausedByVisibility,
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    state: LoopState,
    /// A frame callback has been requested and not yet delivered
    pending: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames rendered since creation
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Begin the chain. `visible` is the host's visibility right now.
    pub fn start<F: FrameScheduler + ?Sized>(&mut self, visible: bool, scheduler: &mut F) {
        if self.state != LoopState::Stopped {
            return;
        }
        if visible {
            self.state = LoopState::Running;
            self.request(scheduler);
        } else {
            self.state = LoopState::PausedByVisibility;
        }
        info!(state = ?self.state, "Frame loop started");
    }

    /// Stop for good; an outstanding callback will be ignored when it fires.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    /// Host visibility changed. Repeats of the same value are no-ops.
    pub fn set_visible<F: FrameScheduler + ?Sized>(&mut self, visible: bool, scheduler: &mut F) {
        match (self.state, visible) {
            (LoopState::Running, false) => {
                self.state = LoopState::PausedByVisibility;
                debug!("Frame loop paused (hidden)");
            }
            (LoopState::PausedByVisibility, true) => {
                self.state = LoopState::Running;
                // The chain may still be alive if hide/show happened within one frame.
                if !self.pending {
                    self.request(scheduler);
                }
                debug!(pending = self.pending, "Frame loop resumed (visible)");
            }
            _ => {}
        }
    }

    /// The scheduled callback fired. Returns true if the caller should render.
    pub fn on_frame<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) -> bool {
        self.pending = false;
        if self.state != LoopState::Running {
            return false;
        }
        self.frames += 1;
        self.request(scheduler);
        true
    }

    fn request<F: FrameScheduler + ?Sized>(&mut self, scheduler: &mut F) {
        if !self.pending {
            self.pending = true;
            scheduler.request_frame();
        }
    }
}

/// Scheduler that just counts requests; the host polls `take()` on its own tick.
#[derive(Debug, Default)]
pub struct QueuedScheduler {
    queued: u32,
    total: u64,
}

impl QueuedScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one queued request, if any.
    pub fn take(&mut self) -> bool {
        if self.queued == 0 {
            return false;
        }
        self.queued -= 1;
        true
    }

    /// Requests currently waiting to be delivered
    pub fn queued(&self) -> u32 {
        self.queued
    }

    /// Requests ever made
    pub fn total(&self) -> u64 {
        self.total
    }
}

impl FrameScheduler for QueuedScheduler {
    fn request_frame(&mut self) {
        self.queued += 1;
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deliver one queued callback, like the host would before a repaint.
    fn pump(frame_loop: &mut FrameLoop, sched: &mut QueuedScheduler) -> Option<bool> {
        sched.take().then(|| frame_loop.on_frame(sched))
    }

    #[test]
    fn test_start_visible_schedules_once() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(true, &mut sched);
        fl.start(true, &mut sched);
        assert_eq!(fl.state(), LoopState::Running);
        assert_eq!(sched.total(), 1);
    }

    #[test]
    fn test_start_hidden_waits_for_visibility() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(false, &mut sched);
        assert_eq!(fl.state(), LoopState::PausedByVisibility);
        assert_eq!(sched.total(), 0);

        fl.set_visible(true, &mut sched);
        assert_eq!(fl.state(), LoopState::Running);
        assert_eq!(sched.total(), 1);
    }

    #[test]
    fn test_chain_reschedules_each_frame() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(true, &mut sched);
        for _ in 0..5 {
            assert_eq!(pump(&mut fl, &mut sched), Some(true));
            assert_eq!(sched.queued(), 1, "exactly one request in flight");
        }
        assert_eq!(fl.frames(), 5);
        assert_eq!(sched.total(), 6);
    }

    #[test]
    fn test_hidden_stops_rescheduling() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(true, &mut sched);
        pump(&mut fl, &mut sched);

        fl.set_visible(false, &mut sched);
        assert_eq!(pump(&mut fl, &mut sched), Some(false), "pending callback renders nothing");
        assert_eq!(pump(&mut fl, &mut sched), None, "chain ended");
        assert_eq!(fl.state(), LoopState::PausedByVisibility);
    }

    #[test]
    fn test_duplicate_hidden_events_are_noops() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(true, &mut sched);
        pump(&mut fl, &mut sched);
        let before = sched.total();

        fl.set_visible(false, &mut sched);
        fl.set_visible(false, &mut sched);
        fl.set_visible(false, &mut sched);
        assert_eq!(sched.total(), before);
        assert_eq!(fl.state(), LoopState::PausedByVisibility);
    }

    #[test]
    fn test_resume_exactly_once() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(true, &mut sched);
        pump(&mut fl, &mut sched);
        fl.set_visible(false, &mut sched);
        pump(&mut fl, &mut sched);
        let before = sched.total();

        fl.set_visible(true, &mut sched);
        fl.set_visible(true, &mut sched);
        fl.set_visible(true, &mut sched);
        assert_eq!(sched.total(), before + 1, "repeated show events schedule one chain");
        assert_eq!(sched.queued(), 1);
    }

    #[test]
    fn test_quick_hide_show_keeps_single_chain() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(true, &mut sched);

        // Hide and show again before the pending callback fires
        fl.set_visible(false, &mut sched);
        fl.set_visible(true, &mut sched);
        assert_eq!(sched.total(), 1, "outstanding request is reused");

        assert_eq!(pump(&mut fl, &mut sched), Some(true));
        assert_eq!(sched.queued(), 1);
    }

    #[test]
    fn test_stop_ignores_outstanding_callback() {
        let mut fl = FrameLoop::new();
        let mut sched = QueuedScheduler::new();
        fl.start(true, &mut sched);
        fl.stop();
        assert_eq!(pump(&mut fl, &mut sched), Some(false));
        assert_eq!(sched.queued(), 0);

        fl.set_visible(true, &mut sched);
        assert_eq!(fl.state(), LoopState::Stopped, "visibility never restarts a stopped loop");
    }
}
