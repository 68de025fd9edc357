//! Page glue: navigation, scroll effects, hover decorations, contact form
//!
//! Each effect is optional; a page without the matching elements skips it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Array;
use tracing::{debug, error, info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, FormData, HtmlButtonElement, HtmlElement, HtmlFormElement,
    HtmlTextAreaElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MouseEvent, Request, RequestInit, Response,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use super::{listen, query_all, set_style, viewport_height, viewport_width, warn_on_err};
use crate::effects::{
    card_tilt, magnetic_pull, message_over_limit, navbar_scrolled, orb_offset, reveal_delay_ms,
    ripple_at, scroll_progress, section_announcement, StatCounter, RIPPLE_LIFETIME_MS,
};
use crate::theme::colors;

const PROGRESS_BAR_CSS: &str = "position: fixed; top: 0; left: 0; height: 3px; \
    background: linear-gradient(90deg, #00d4ff, #0066ff); width: 0%; z-index: 9999; \
    transition: width 0.1s ease;";
const VISUALLY_HIDDEN_CSS: &str =
    "position: absolute; left: -10000px; width: 1px; height: 1px; overflow: hidden;";
const BUTTONS: &str = ".btn-primary, .btn-secondary";
const ANIMATED: &str = ".service-card, .section-header, .cta-content";
const RIPPLE_CSS: &str = "
    .btn-primary, .btn-secondary { position: relative; overflow: hidden; }
    .ripple {
        position: absolute;
        border-radius: 50%;
        background: rgba(255, 255, 255, 0.3);
        transform: scale(0);
        animation: ripple-animation 0.6s ease-out;
        pointer-events: none;
    }
    @keyframes ripple-animation { to { transform: scale(4); opacity: 0; } }
";

pub fn install(window: &Window, document: &Document) {
    let effects: [(&str, Result<(), JsValue>); 10] = [
        ("mobile menu", mobile_menu(document)),
        ("scroll chrome", scroll_chrome(window, document)),
        ("fade-ins", animate_in(window, document)),
        ("stat counters", stat_counters(window, document)),
        ("service cards", service_cards(document)),
        ("ripples", ripples(window, document)),
        ("gradient orbs", gradient_orbs(window, document)),
        ("magnetic buttons", magnetic_buttons(document)),
        ("section announcer", section_announcer(document)),
        ("contact form", contact_form(window, document)),
    ];
    for (name, result) in effects {
        match result {
            Ok(()) => debug!(effect = name, "Page effect installed"),
            Err(e) => warn!(effect = name, ?e, "Page effect not installed"),
        }
    }
}

/// Observe `targets`, calling `handler` for every reported entry.
fn observe<H>(
    threshold: f64,
    root_margin: Option<&str>,
    targets: &[Element],
    mut handler: H,
) -> Result<(), JsValue>
where
    H: FnMut(IntersectionObserverEntry) + 'static,
{
    let callback = Closure::wrap(Box::new(move |entries: Array, _: IntersectionObserver| {
        for entry in entries.iter() {
            if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                handler(entry);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    if let Some(margin) = root_margin {
        options.set_root_margin(margin);
    }
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for target in targets {
        observer.observe(target);
    }
    Ok(())
}

/// Run `f` once after `delay_ms`.
fn after<F: FnOnce() + 'static>(window: &Window, delay_ms: i32, f: F) {
    let callback = Closure::once_into_js(f);
    warn_on_err(
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms,
        ),
        "timeout",
    );
}

fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(document.create_element(tag)?.dyn_into::<HtmlElement>()?)
}

// ============================================================================
// Navigation & scroll
// ============================================================================

fn mobile_menu(document: &Document) -> Result<(), JsValue> {
    let (Some(toggle), Some(links)) = (
        document.query_selector(".mobile-menu-toggle")?,
        document.query_selector(".nav-links")?,
    ) else {
        return Ok(());
    };

    let (t, l) = (toggle.clone(), links.clone());
    listen(&toggle, "click", move |_: Event| {
        warn_on_err(t.class_list().toggle("active"), "menu toggle");
        warn_on_err(l.class_list().toggle("active"), "menu links");
    })?;

    for link in query_all(document, ".nav-links a")? {
        let (t, l) = (toggle.clone(), links.clone());
        listen(&link, "click", move |_: Event| {
            warn_on_err(t.class_list().remove_1("active"), "menu toggle");
            warn_on_err(l.class_list().remove_1("active"), "menu links");
        })?;
    }
    Ok(())
}

/// Navbar `scrolled` class and the top progress bar
fn scroll_chrome(window: &Window, document: &Document) -> Result<(), JsValue> {
    let navbar = document.query_selector(".navbar")?;

    let bar = create_html(document, "div")?;
    bar.style().set_css_text(PROGRESS_BAR_CSS);
    if let Some(body) = document.body() {
        body.append_child(&bar)?;
    }

    let (win, doc) = (window.clone(), document.clone());
    listen(window, "scroll", move |_: Event| {
        let y = win.scroll_y().unwrap_or(0.0);

        if let Some(navbar) = &navbar {
            let classes = navbar.class_list();
            let result = if navbar_scrolled(y) {
                classes.add_1("scrolled")
            } else {
                classes.remove_1("scrolled")
            };
            warn_on_err(result, "navbar class");
        }

        if let Some(root) = doc.document_element() {
            let progress =
                scroll_progress(y, root.scroll_height() as f64, root.client_height() as f64);
            set_style(&bar, "width", &format!("{}%", progress));
        }
    })
}

// ============================================================================
// Fade-ins
// ============================================================================

/// Add `animate-in` as elements scroll into view. The first card to appear
/// reveals all service cards one after another.
fn animate_in(window: &Window, document: &Document) -> Result<(), JsValue> {
    let targets: Vec<Element> = query_all(document, ANIMATED)?
        .into_iter()
        .map(Element::from)
        .collect();
    if targets.is_empty() {
        return Ok(());
    }
    let cards = query_all(document, ".service-card")?;
    let window = window.clone();
    let mut cards_revealed = false;

    observe(0.1, Some("0px 0px -50px 0px"), &targets, move |entry| {
        if !entry.is_intersecting() {
            return;
        }
        let target = entry.target();
        warn_on_err(target.class_list().add_1("animate-in"), "animate-in class");

        if cards_revealed || !target.class_list().contains("service-card") {
            return;
        }
        cards_revealed = true;
        for (index, card) in cards.iter().enumerate() {
            let card = card.clone();
            after(&window, reveal_delay_ms(index), move || {
                set_style(&card, "opacity", "1");
                set_style(&card, "transform", "translateY(0)");
            });
        }
    })
}

// ============================================================================
// Stat counters
// ============================================================================

fn stat_counters(window: &Window, document: &Document) -> Result<(), JsValue> {
    let Some(hero) = document.query_selector(".hero-stats")? else {
        return Ok(());
    };
    let stats = query_all(document, ".stat-number")?;
    let started = Rc::new(Cell::new(false));
    let window = window.clone();

    observe(0.5, None, &[hero], move |entry| {
        if !entry.is_intersecting() || started.replace(true) {
            return;
        }
        for stat in &stats {
            let Some(counter) = stat.text_content().and_then(|t| StatCounter::parse(&t)) else {
                continue;
            };
            run_counter(&window, stat.clone(), counter);
        }
    })
}

/// Drive one counter from requestAnimationFrame until it reports done.
fn run_counter(window: &Window, el: HtmlElement, mut counter: StatCounter) {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let win = window.clone();

    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let (text, done) = counter.tick();
        el.set_text_content(Some(&text));
        if done {
            // Drop the closure; the chain ends here.
            let _ = next.borrow_mut().take();
            return;
        }
        if let Some(cb) = next.borrow().as_ref() {
            let requested = win.request_animation_frame(cb.as_ref().unchecked_ref());
            warn_on_err(requested, "counter frame");
        }
    }) as Box<dyn FnMut()>));

    if let Some(cb) = slot.borrow().as_ref() {
        let requested = window.request_animation_frame(cb.as_ref().unchecked_ref());
        warn_on_err(requested, "counter frame");
    }
}

// ============================================================================
// Hover decorations
// ============================================================================

fn service_cards(document: &Document) -> Result<(), JsValue> {
    for card in query_all(document, ".service-card")? {
        warn_on_err(card.set_attribute("tabindex", "0"), "card tabindex");

        let c = card.clone();
        listen(&card, "mouseenter", move |_: Event| {
            set_style(&c, "transform", "translateY(-8px)");
        })?;

        let c = card.clone();
        listen(&card, "mousemove", move |e: MouseEvent| {
            let rect = c.get_bounding_client_rect();
            let (rotate_x, rotate_y) = card_tilt(
                e.client_x() as f64 - rect.left(),
                e.client_y() as f64 - rect.top(),
                rect.width(),
                rect.height(),
            );
            set_style(
                &c,
                "transform",
                &format!(
                    "translateY(-8px) perspective(1000px) rotateX({}deg) rotateY({}deg)",
                    rotate_x, rotate_y
                ),
            );
        })?;

        let c = card.clone();
        listen(&card, "mouseleave", move |_: Event| {
            set_style(&c, "transform", "translateY(0) perspective(1000px) rotateX(0) rotateY(0)");
        })?;

        // Keyboard activation
        let c = card.clone();
        listen(&card, "keypress", move |e: KeyboardEvent| {
            if matches!(e.key().as_str(), "Enter" | " ") {
                c.click();
            }
        })?;
    }
    Ok(())
}

fn gradient_orbs(window: &Window, document: &Document) -> Result<(), JsValue> {
    let orbs = query_all(document, ".gradient-orb")?;
    if orbs.is_empty() {
        return Ok(());
    }

    let win = window.clone();
    listen(document, "mousemove", move |e: MouseEvent| {
        let (width, height) = (viewport_width(&win), viewport_height(&win));
        if !(width.is_finite() && width > 0.0 && height > 0.0) {
            return;
        }
        let nx = e.client_x() as f64 / width;
        let ny = e.client_y() as f64 / height;
        for (index, orb) in orbs.iter().enumerate() {
            let (x, y) = orb_offset(index, nx, ny);
            set_style(orb, "transform", &format!("translate({}px, {}px)", x, y));
        }
    })
}

fn magnetic_buttons(document: &Document) -> Result<(), JsValue> {
    for button in query_all(document, BUTTONS)? {
        let b = button.clone();
        listen(&button, "mousemove", move |e: MouseEvent| {
            let rect = b.get_bounding_client_rect();
            let dx = e.client_x() as f64 - rect.left() - rect.width() / 2.0;
            let dy = e.client_y() as f64 - rect.top() - rect.height() / 2.0;
            if let Some((x, y)) = magnetic_pull(dx, dy) {
                set_style(&b, "transform", &format!("translate({}px, {}px)", x, y));
            }
        })?;

        let b = button.clone();
        listen(&button, "mouseleave", move |_: Event| {
            set_style(&b, "transform", "translate(0, 0)");
        })?;
    }
    Ok(())
}

/// Expanding circle from the click point, removed once its animation ends
fn ripples(window: &Window, document: &Document) -> Result<(), JsValue> {
    let buttons = query_all(document, BUTTONS)?;
    if buttons.is_empty() {
        return Ok(());
    }

    let style = document.create_element("style")?;
    style.set_text_content(Some(RIPPLE_CSS));
    if let Some(head) = document.head() {
        head.append_child(&style)?;
    }

    for button in buttons {
        let (b, doc, win) = (button.clone(), document.clone(), window.clone());
        listen(&button, "click", move |e: MouseEvent| {
            let rect = b.get_bounding_client_rect();
            let ripple = ripple_at(
                e.client_x() as f64,
                e.client_y() as f64,
                rect.left(),
                rect.top(),
                rect.width(),
                rect.height(),
            );

            let span = match create_html(&doc, "span") {
                Ok(span) => span,
                Err(e) => {
                    warn!(?e, "Failed to create ripple");
                    return;
                }
            };
            let size = format!("{}px", ripple.size);
            set_style(&span, "width", &size);
            set_style(&span, "height", &size);
            set_style(&span, "left", &format!("{}px", ripple.left));
            set_style(&span, "top", &format!("{}px", ripple.top));
            warn_on_err(span.class_list().add_1("ripple"), "ripple class");
            warn_on_err(b.append_child(&span), "ripple span");

            after(&win, RIPPLE_LIFETIME_MS, move || span.remove());
        })?;
    }
    Ok(())
}

// ============================================================================
// Accessibility
// ============================================================================

/// Polite live region announcing the section scrolled into view
fn section_announcer(document: &Document) -> Result<(), JsValue> {
    let sections: Vec<Element> = query_all(document, "section[id]")?
        .into_iter()
        .map(Element::from)
        .collect();
    if sections.is_empty() {
        return Ok(());
    }

    let announcer = create_html(document, "div")?;
    announcer.set_attribute("role", "status")?;
    announcer.set_attribute("aria-live", "polite")?;
    announcer.set_attribute("aria-atomic", "true")?;
    announcer.style().set_css_text(VISUALLY_HIDDEN_CSS);
    if let Some(body) = document.body() {
        body.append_child(&announcer)?;
    }

    observe(0.5, None, &sections, move |entry| {
        if entry.is_intersecting() {
            let id = entry.target().get_attribute("id");
            announcer.set_text_content(Some(&section_announcement(id.as_deref())));
        }
    })
}

// ============================================================================
// Contact form
// ============================================================================

fn contact_form(window: &Window, document: &Document) -> Result<(), JsValue> {
    if let (Some(textarea), Some(count)) = (
        document.get_element_by_id("message"),
        document.get_element_by_id("char-count"),
    ) {
        let textarea: HtmlTextAreaElement = textarea.dyn_into()?;
        let count: HtmlElement = count.dyn_into()?;
        let input = textarea.clone();
        listen(&textarea, "input", move |_: Event| {
            // UTF-16 length, same as the browser's own maxlength counting
            let len = input.value().encode_utf16().count();
            count.set_text_content(Some(&len.to_string()));
            let color = if message_over_limit(len) { colors::COUNTER_OVER_LIMIT } else { "" };
            set_style(&count, "color", color);
        })?;
    }

    let Some(form) = document.get_element_by_id("contact-form") else {
        return Ok(());
    };
    let form: HtmlFormElement = form.dyn_into()?;
    let success = document
        .get_element_by_id("form-success")
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());
    let failure = document
        .get_element_by_id("form-error")
        .and_then(|e| e.dyn_into::<HtmlElement>().ok());

    let (win, submitted) = (window.clone(), form.clone());
    listen(&form, "submit", move |e: Event| {
        e.prevent_default();
        let (window, form) = (win.clone(), submitted.clone());
        let (success, failure) = (success.clone(), failure.clone());
        wasm_bindgen_futures::spawn_local(async move {
            submit_contact(window, form, success, failure).await;
        });
    })
}

async fn submit_contact(
    window: Window,
    form: HtmlFormElement,
    success: Option<HtmlElement>,
    failure: Option<HtmlElement>,
) {
    let button = form
        .query_selector(".submit-btn")
        .ok()
        .flatten()
        .and_then(|b| b.dyn_into::<HtmlButtonElement>().ok());
    let label = button.as_ref().map(|b| b.inner_html());
    if let Some(button) = &button {
        button.set_disabled(true);
        button.set_inner_html("Sending...");
    }

    match post_form(&window, &form).await {
        Ok(true) => {
            info!("Contact form sent");
            set_style(&form, "display", "none");
            if let Some(success) = &success {
                reveal(success);
            }
            form.reset();
        }
        Ok(false) => {
            warn!("Contact form rejected by server");
            if let Some(failure) = &failure {
                reveal(failure);
            }
        }
        Err(e) => {
            error!(?e, "Contact form request failed");
            if let Some(failure) = &failure {
                reveal(failure);
            }
        }
    }

    if let (Some(button), Some(label)) = (&button, label) {
        button.set_disabled(false);
        button.set_inner_html(&label);
    }
}

/// POST the form to its `action`. Ok(false) means the server answered non-2xx.
async fn post_form(window: &Window, form: &HtmlFormElement) -> Result<bool, JsValue> {
    let body = FormData::new_with_form(form)?;
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&body);

    let request = Request::new_with_str_and_init(&form.action(), &init)?;
    request.headers().set("Accept", "application/json")?;

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    Ok(response.ok())
}

fn reveal(el: &HtmlElement) {
    set_style(el, "display", "block");
    warn_on_err(el.class_list().add_1("show"), "show class");

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Center);
    el.scroll_into_view_with_scroll_into_view_options(&options);
}
