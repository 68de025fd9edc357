//! Cyan/amber palette for the particle backdrop

use std::fmt;

/// Straight (non-premultiplied) color with a float alpha, as canvas expects
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with a different alpha
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string for canvas fill/stroke/shadow styles
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

pub mod colors {
    use super::Rgba;

    // === Particles ===
    pub const CYAN: Rgba = Rgba::new(0, 212, 255, 1.0);   // #00D4FF - drifting particles, links
    pub const AMBER: Rgba = Rgba::new(255, 184, 0, 1.0);  // #FFB800 - shooting stars

    pub const SHOOTING_BODY: Rgba = AMBER.with_alpha(0.8);
    pub const SHOOTING_GLOW: Rgba = AMBER.with_alpha(0.6);
    pub const DRIFTING_GLOW: Rgba = CYAN.with_alpha(0.5);

    /// Drifting body alpha flickers in [MIN, MIN + SPAN) every frame
    pub const DRIFTING_ALPHA_MIN: f64 = 0.4;
    pub const DRIFTING_ALPHA_SPAN: f64 = 0.3;

    // === Page chrome ===
    pub const COUNTER_OVER_LIMIT: &str = "#FF6B6B";
}

/// Shadow blur radii for the glow pass
pub mod glow {
    pub const SHOOTING_BLUR: f64 = 20.0;
    pub const DRIFTING_BLUR: f64 = 10.0;
}
