//! Mount the particle backdrop on `#particle-canvas`

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlCanvasElement, MouseEvent, Window};

use super::canvas::CanvasSurface;
use super::scheduler::RafScheduler;
use super::{listen, viewport_width};
use crate::core::{ParticleConfig, Point, Simulation, StartupSignals};
use crate::render::{Backdrop, Renderer};

const CANVAS_ID: &str = "particle-canvas";
/// Optional JSON overrides for `ParticleConfig`
const CONFIG_ATTRIBUTE: &str = "data-particles";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

type SharedBackdrop = Rc<RefCell<Backdrop<CanvasSurface, RafScheduler>>>;

fn prefers_reduced_motion(window: &Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

pub fn mount(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(canvas) = document.get_element_by_id(CANVAS_ID) else {
        debug!(id = CANVAS_ID, "No particle canvas on this page");
        return Ok(());
    };
    let canvas: HtmlCanvasElement = canvas.dyn_into()?;

    let signals = StartupSignals {
        viewport_width: viewport_width(window),
        prefers_reduced_motion: prefers_reduced_motion(window),
    };
    let Some(class) = signals.animation_class() else {
        info!("Reduced motion preferred, particle backdrop disabled");
        return Ok(());
    };

    let mut config = ParticleConfig::for_device(class);
    if let Some(json) = canvas.get_attribute(CONFIG_ATTRIBUTE) {
        match config.merged_with_json(&json) {
            Ok(merged) => config = merged,
            Err(e) => warn!(error = %e, "Ignoring invalid {}", CONFIG_ATTRIBUTE),
        }
    }
    info!(?class, particles = config.particle_count, "Starting particle backdrop");

    let surface = CanvasSurface::new(window.clone(), canvas.clone())?;
    let scheduler = RafScheduler::new(window.clone());
    let slot = scheduler.slot();
    let renderer = Renderer::new(surface, Simulation::new(config));
    let shared: SharedBackdrop = Rc::new(RefCell::new(Backdrop::new(renderer, scheduler)));

    let frame_shared = shared.clone();
    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_shared.borrow_mut().on_frame();
    }) as Box<dyn FnMut()>));

    let resize_shared = shared.clone();
    listen(window, "resize", move |_: Event| {
        resize_shared.borrow_mut().resize();
    })?;

    let move_shared = shared.clone();
    let move_canvas = canvas.clone();
    listen(&canvas, "mousemove", move |e: MouseEvent| {
        let rect = move_canvas.get_bounding_client_rect();
        let at = Point::new(
            e.client_x() as f64 - rect.left(),
            e.client_y() as f64 - rect.top(),
        );
        move_shared.borrow_mut().pointer_moved(at);
    })?;

    let leave_shared = shared.clone();
    listen(&canvas, "mouseleave", move |_: Event| {
        leave_shared.borrow_mut().pointer_left();
    })?;

    let visibility_shared = shared.clone();
    let visibility_document = document.clone();
    listen(document, "visibilitychange", move |_: Event| {
        let visible = !visibility_document.hidden();
        visibility_shared.borrow_mut().set_visible(visible);
    })?;

    shared.borrow_mut().start(!document.hidden());
    Ok(())
}
