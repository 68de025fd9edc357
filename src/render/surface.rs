//! Drawing surface abstraction
//!
//! - Surface: what the renderer needs from a 2D immediate-mode canvas
//! - RecordingSurface: in-memory surface that logs draw calls (CLI + tests)

use crate::core::{Point, Size};
use crate::theme::Rgba;

/// Soft shadow drawn behind a filled shape
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub blur: f64,
    pub color: Rgba,
}

/// 2D drawing target in logical (CSS) pixels
pub trait Surface {
    /// Displayed size in logical pixels, as laid out by the host right now.
    /// Must not echo back a size applied by an earlier `configure`.
    fn logical_size(&self) -> Size;

    /// Physical pixels per logical pixel
    fn pixel_ratio(&self) -> f64;

    /// Width of the hosting viewport, checked every frame for compact mode
    fn viewport_width(&self) -> f64;

    /// Resize the backing store to `physical` pixels and set (not multiply)
    /// the transform to a uniform `scale`.
    fn configure(&mut self, physical: (u32, u32), scale: f64);

    fn clear(&mut self, area: Size);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Option<Glow>);

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64);
}

// ============================================================================
// RecordingSurface
// ============================================================================

/// A draw call captured by `RecordingSurface`
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Configure { physical: (u32, u32), scale: f64 },
    Clear(Size),
    Circle { center: Point, radius: f64, color: Rgba, glow: Option<Glow> },
    Line { from: Point, to: Point, color: Rgba, width: f64 },
}

/// Headless surface with a fixed size; keeps the commands of the last frame.
#[derive(Debug)]
pub struct RecordingSurface {
    size: Size,
    pixel_ratio: f64,
    viewport_width: f64,
    physical: (u32, u32),
    scale: f64,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(size: Size, pixel_ratio: f64) -> Self {
        Self {
            size,
            pixel_ratio,
            viewport_width: size.width,
            physical: (0, 0),
            scale: 1.0,
            commands: Vec::new(),
        }
    }

    /// Simulate the host resizing the element.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport_width = width;
    }

    /// Backing store size from the last `configure`
    pub fn physical_size(&self) -> (u32, u32) {
        self.physical
    }

    /// Current transform scale
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> + '_ {
        self.commands.iter().filter(|c| matches!(c, DrawCommand::Line { .. }))
    }
}

impl Surface for RecordingSurface {
    fn logical_size(&self) -> Size {
        self.size
    }

    fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    fn configure(&mut self, physical: (u32, u32), scale: f64) {
        self.physical = physical;
        self.scale = scale;
        self.commands.push(DrawCommand::Configure { physical, scale });
    }

    fn clear(&mut self, area: Size) {
        // A clear starts a new frame; drop the previous one.
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(area));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Option<Glow>) {
        self.commands.push(DrawCommand::Circle { center, radius, color, glow });
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
    }
}
