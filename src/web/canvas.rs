//! `Surface` over an HTML canvas 2D context

use std::f64::consts::TAU;

use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::{viewport_width, warn_on_err};
use crate::core::{Point, Size};
use crate::render::{Glow, Surface};
use crate::theme::Rgba;

pub struct CanvasSurface {
    window: Window,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { window, canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    /// Layout size from the page stylesheet. The inline size pinned by the
    /// previous `configure` is dropped first so it cannot be measured back.
    fn logical_size(&self) -> Size {
        let style = self.canvas.style();
        warn_on_err(style.remove_property("width"), "canvas css width");
        warn_on_err(style.remove_property("height"), "canvas css height");

        let rect = self.canvas.get_bounding_client_rect();
        Size::new(rect.width(), rect.height())
    }

    fn pixel_ratio(&self) -> f64 {
        self.window.device_pixel_ratio()
    }

    fn viewport_width(&self) -> f64 {
        viewport_width(&self.window)
    }

    fn configure(&mut self, physical: (u32, u32), scale: f64) {
        // Assigning width/height resets the context, transform included.
        self.canvas.set_width(physical.0);
        self.canvas.set_height(physical.1);

        let style = self.canvas.style();
        warn_on_err(
            style.set_property("width", &format!("{}px", physical.0 as f64 / scale)),
            "canvas css width",
        );
        warn_on_err(
            style.set_property("height", &format!("{}px", physical.1 as f64 / scale)),
            "canvas css height",
        );

        if let Err(e) = self.ctx.set_transform(scale, 0.0, 0.0, scale, 0.0, 0.0) {
            warn!(?e, scale, "Failed to set canvas transform");
        }
    }

    fn clear(&mut self, area: Size) {
        self.ctx.clear_rect(0.0, 0.0, area.width, area.height);
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Option<Glow>) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        warn_on_err(self.ctx.arc(center.x, center.y, radius, 0.0, TAU), "arc");
        self.ctx.close_path();
        self.ctx.fill();

        if let Some(glow) = glow {
            self.ctx.set_shadow_blur(glow.blur);
            self.ctx.set_shadow_color(&glow.color.to_css());
            self.ctx.fill();
            self.ctx.set_shadow_blur(0.0);
        }
    }

    fn stroke_line(&mut self, from: Point, to: Point, color: Rgba, width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }
}
