//! Particle backdrop - animated hero background for a marketing site
//!
//! Drifting particles linked by faint lines when close, pulled toward the
//! pointer, with the occasional shooting particle dragging an amber trail.
//!
//! - `core`: particle physics and the simulation, no host dependencies
//! - `render`: drawing onto a `Surface` and the visibility-aware frame loop
//! - `effects`: the smaller page decorations as pure functions
//! - `web` (wasm only): canvas, requestAnimationFrame and DOM wiring

pub mod core;
pub mod effects;
pub mod render;
pub mod theme;

#[cfg(all(target_arch = "wasm32", feature = "wasm"))]
mod web;
