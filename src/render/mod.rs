//! Particle backdrop rendering
//!
//! Draws the simulation onto any `Surface` and drives it from a
//! host-provided frame scheduler.

mod controller;
mod frame_loop;
mod renderer;
mod surface;

pub use controller::Backdrop;
pub use frame_loop::{FrameLoop, FrameScheduler, LoopState, QueuedScheduler};
pub use renderer::{FrameStats, Renderer};
pub use surface::{DrawCommand, Glow, RecordingSurface, Surface};
