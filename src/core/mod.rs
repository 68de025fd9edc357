//! Platform-agnostic core module - shared between the WASM build and the CLI

pub mod config;
pub mod particle;
pub mod simulation;

pub use config::{
    DeviceClass, ParticleConfig, StartupSignals, COMPACT_BREAKPOINT, MAX_PARTICLES,
    MAX_TRAIL_LENGTH,
};
pub use particle::{Motion, Particle, Point, Size};
pub use simulation::{connection_opacity, Connection, Simulation, MAX_CONNECTION_OPACITY};
