//! Browser entry point and DOM helpers
//!
//! Mounts the particle backdrop and installs the page effects once the
//! document has loaded.

mod backdrop;
mod canvas;
mod page;
mod scheduler;

use tracing::{error, warn};
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, EventTarget, HtmlElement, Window};

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    // Initialize tracing for browser console
    tracing_wasm::set_as_global_default();

    let Some(window) = web_sys::window() else {
        error!("No window, nothing to mount");
        return;
    };
    let Some(document) = window.document() else {
        error!("No document, nothing to mount");
        return;
    };

    if document.ready_state() == "loading" {
        let (w, d) = (window.clone(), document.clone());
        if let Err(e) = listen(&document, "DOMContentLoaded", move |_: Event| boot(&w, &d)) {
            error!(?e, "Failed to wait for DOMContentLoaded");
        }
    } else {
        boot(&window, &document);
    }
}

fn boot(window: &Window, document: &Document) {
    if let Err(e) = backdrop::mount(window, document) {
        error!(?e, "Particle backdrop failed to start");
    }
    page::install(window, document);
}

/// Attach `handler` to `event` on `target` for the lifetime of the page.
pub(crate) fn listen<E, H>(target: &EventTarget, event: &str, handler: H) -> Result<(), JsValue>
where
    E: FromWasmAbi + 'static,
    H: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Log a failed DOM call without interrupting the caller.
pub(crate) fn warn_on_err<T>(result: Result<T, JsValue>, what: &str) {
    if let Err(e) = result {
        warn!(?e, what, "DOM call failed");
    }
}

pub(crate) fn set_style(el: &HtmlElement, property: &str, value: &str) {
    warn_on_err(el.style().set_property(property, value), property);
}

/// `innerWidth`, or infinity (full-size) if the host will not say.
pub(crate) fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(f64::INFINITY)
}

pub(crate) fn viewport_height(window: &Window) -> f64 {
    window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

/// All elements matching `selector` that are `HtmlElement`s
pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}
