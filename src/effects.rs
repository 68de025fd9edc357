//! Page effect arithmetic
//!
//! Pure functions behind the non-canvas page glue (navbar, progress bar,
//! counters, hover tilt, parallax, magnetic buttons, form counter). The DOM
//! wiring in `web::page` only reads inputs and writes the results.

/// Navbar gets the `scrolled` class past this offset
pub const NAVBAR_SCROLL_THRESHOLD: f64 = 100.0;
/// Contact message length above which the counter turns red
pub const MESSAGE_SOFT_LIMIT: usize = 1000;
/// Counter animation length and per-step interval, milliseconds
pub const COUNTER_DURATION_MS: f64 = 2000.0;
pub const COUNTER_STEP_MS: f64 = 16.0;
/// Gap between successive service cards fading in
pub const REVEAL_STAGGER_MS: i32 = 100;
/// A ripple span is removed after its CSS animation ends
pub const RIPPLE_LIFETIME_MS: i32 = 600;

pub fn navbar_scrolled(scroll_y: f64) -> bool {
    scroll_y > NAVBAR_SCROLL_THRESHOLD
}

/// Percentage of the page scrolled, 0 when the page does not scroll.
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, client_height: f64) -> f64 {
    let scrollable = scroll_height - client_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}

pub fn message_over_limit(len: usize) -> bool {
    len > MESSAGE_SOFT_LIMIT
}

pub fn section_announcement(section_id: Option<&str>) -> String {
    let name = section_id.filter(|id| !id.is_empty()).unwrap_or("section");
    format!("Entered {} section", name)
}

/// Fade-in delay of the `index`th card in a staggered reveal
pub fn reveal_delay_ms(index: usize) -> i32 {
    i32::try_from(index)
        .unwrap_or(i32::MAX)
        .saturating_mul(REVEAL_STAGGER_MS)
}

// ============================================================================
// Stat counters
// ============================================================================

/// Count-up animation for a stat like "150+"
#[derive(Clone, Debug, PartialEq)]
pub struct StatCounter {
    label: String,
    target: u64,
    plus: bool,
    increment: f64,
    current: f64,
}

impl StatCounter {
    /// Digits in `text` form the target; a '+' anywhere is kept as a suffix.
    /// Returns None if the text holds no digits.
    pub fn parse(text: &str) -> Option<Self> {
        let digits: String = text.chars().filter(char::is_ascii_digit).collect();
        let target: u64 = digits.parse().ok()?;
        Some(Self {
            label: text.to_string(),
            target,
            plus: text.contains('+'),
            increment: target as f64 / (COUNTER_DURATION_MS / COUNTER_STEP_MS),
            current: 0.0,
        })
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Advance one step. Returns the text to show and whether the count is done.
    pub fn tick(&mut self) -> (String, bool) {
        self.current += self.increment;
        if self.current < self.target as f64 {
            let suffix = if self.plus { "+" } else { "" };
            (format!("{}{}", self.current.floor() as u64, suffix), false)
        } else {
            (self.label.clone(), true)
        }
    }
}

// ============================================================================
// Pointer-driven transforms
// ============================================================================

/// Card tilt in degrees `(rotate_x, rotate_y)` for a pointer at (x, y) inside a w x h card
pub fn card_tilt(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    let rotate_x = (y - height / 2.0) / 20.0;
    let rotate_y = (width / 2.0 - x) / 20.0;
    (rotate_x, rotate_y)
}

/// Pixel offset of the `index`th gradient orb for a pointer at normalized (nx, ny)
pub fn orb_offset(index: usize, nx: f64, ny: f64) -> (f64, f64) {
    let speed = (index + 1) as f64 * 20.0;
    ((nx - 0.5) * speed, (ny - 0.5) * speed)
}

/// Button translation for a pointer (dx, dy) away from its center, or None beyond reach
pub fn magnetic_pull(dx: f64, dy: f64) -> Option<(f64, f64)> {
    const REACH: f64 = 100.0;
    const STRENGTH: f64 = 0.3;

    let distance = (dx * dx + dy * dy).sqrt();
    if distance >= REACH {
        return None;
    }
    let pull = 1.0 - distance / REACH;
    Some((dx * pull * STRENGTH, dy * pull * STRENGTH))
}

/// Square ripple span placed inside a clicked button, in button-local pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    pub size: f64,
    pub left: f64,
    pub top: f64,
}

/// Ripple covering the button's longer side, centered on the click.
pub fn ripple_at(
    click_x: f64,
    click_y: f64,
    rect_left: f64,
    rect_top: f64,
    width: f64,
    height: f64,
) -> Ripple {
    let size = width.max(height);
    Ripple {
        size,
        left: click_x - rect_left - size / 2.0,
        top: click_y - rect_top - size / 2.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navbar_threshold() {
        assert!(!navbar_scrolled(0.0));
        assert!(!navbar_scrolled(100.0));
        assert!(navbar_scrolled(100.5));
    }

    #[test]
    fn test_scroll_progress() {
        assert_eq!(scroll_progress(0.0, 2000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(scroll_progress(1000.0, 2000.0, 1000.0), 100.0);
        assert_eq!(scroll_progress(300.0, 800.0, 800.0), 0.0, "short page never divides by zero");
    }

    #[test]
    fn test_counter_counts_up_and_restores_text() {
        let mut counter = StatCounter::parse("125+").unwrap();
        assert_eq!(counter.target(), 125);

        // 125 / 125 steps = 1 per tick
        assert_eq!(counter.tick(), ("1+".to_string(), false));
        assert_eq!(counter.tick(), ("2+".to_string(), false));

        let mut last = (String::new(), false);
        for _ in 0..200 {
            last = counter.tick();
            if last.1 {
                break;
            }
        }
        assert_eq!(last, ("125+".to_string(), true));
    }

    #[test]
    fn test_counter_without_plus() {
        let mut counter = StatCounter::parse("98%").unwrap();
        let (text, done) = counter.tick();
        assert!(!done);
        assert!(!text.contains('+'));
        assert_eq!(counter.target(), 98);
    }

    #[test]
    fn test_counter_rejects_text_without_digits() {
        assert!(StatCounter::parse("n/a").is_none());
        assert!(StatCounter::parse("").is_none());
    }

    #[test]
    fn test_zero_target_finishes_immediately() {
        let mut counter = StatCounter::parse("0").unwrap();
        assert_eq!(counter.tick(), ("0".to_string(), true));
    }

    #[test]
    fn test_card_tilt() {
        assert_eq!(card_tilt(100.0, 50.0, 200.0, 100.0), (0.0, 0.0));
        assert_eq!(card_tilt(0.0, 0.0, 200.0, 100.0), (-2.5, 5.0));
    }

    #[test]
    fn test_orb_offset_scales_with_index() {
        assert_eq!(orb_offset(0, 0.5, 0.5), (0.0, 0.0));
        assert_eq!(orb_offset(0, 1.0, 0.0), (10.0, -10.0));
        assert_eq!(orb_offset(2, 1.0, 1.0), (30.0, 30.0));
    }

    #[test]
    fn test_magnetic_pull() {
        assert_eq!(magnetic_pull(0.0, 0.0), Some((0.0, 0.0)));
        let (x, y) = magnetic_pull(50.0, 0.0).unwrap();
        assert!((x - 7.5).abs() < 1e-12);
        assert_eq!(y, 0.0);
        assert_eq!(magnetic_pull(100.0, 0.0), None);
        assert_eq!(magnetic_pull(80.0, 80.0), None);
    }

    #[test]
    fn test_message_limit_and_announcement() {
        assert!(!message_over_limit(1000));
        assert!(message_over_limit(1001));
        assert_eq!(section_announcement(Some("services")), "Entered services section");
        assert_eq!(section_announcement(None), "Entered section section");
        assert_eq!(section_announcement(Some("")), "Entered section section");
    }

    #[test]
    fn test_reveal_delay_staggers_by_index() {
        assert_eq!(reveal_delay_ms(0), 0);
        assert_eq!(reveal_delay_ms(1), 100);
        assert_eq!(reveal_delay_ms(5), 500);
        assert_eq!(reveal_delay_ms(usize::MAX), i32::MAX, "saturates instead of wrapping");
    }

    #[test]
    fn test_ripple_centered_on_click() {
        // 200x50 button at (100, 300), clicked at its center
        let ripple = ripple_at(200.0, 325.0, 100.0, 300.0, 200.0, 50.0);
        assert_eq!(ripple, Ripple { size: 200.0, left: 0.0, top: -75.0 });

        // Tall button: the height wins
        let ripple = ripple_at(10.0, 10.0, 0.0, 0.0, 40.0, 120.0);
        assert_eq!(ripple.size, 120.0);
        assert_eq!((ripple.left, ripple.top), (-50.0, -50.0));
    }
}
