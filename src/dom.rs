//! Small DOM helpers shared by the page controllers.
//!
//! Lookups return `Option` so a missing element simply switches a feature
//! off instead of failing.

use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlElement, NodeList, Window};

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

fn node_list_elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// First element under `root` matching `selector`.
pub fn qs(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

/// First element under `root` matching `selector`, cast to `T`.
pub fn qs_as<T: JsCast>(root: &Element, selector: &str) -> Option<T> {
    qs(root, selector)?.dyn_into::<T>().ok()
}

/// All elements under `root` matching `selector`.
pub fn qsa(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(node_list_elements)
        .unwrap_or_default()
}

/// First element in the document matching `selector`.
pub fn doc_qs(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

/// First element in the document matching `selector`, cast to `T`.
pub fn doc_qs_as<T: JsCast>(selector: &str) -> Option<T> {
    doc_qs(selector)?.dyn_into::<T>().ok()
}

/// All elements in the document matching `selector`.
pub fn doc_qsa(selector: &str) -> Vec<Element> {
    document()
        .and_then(|doc| doc.query_selector_all(selector).ok())
        .map(node_list_elements)
        .unwrap_or_default()
}

/// Element an event was dispatched to.
pub fn event_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

/// Whether a media query currently matches.
pub fn media_matches(query: &str) -> bool {
    window()
        .and_then(|w| w.match_media(query).ok().flatten())
        .is_some_and(|mql| mql.matches())
}

/// Viewport height in CSS pixels.
pub fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}

/// Set or clear a class.
pub fn set_class(el: &Element, class: &str, on: bool) {
    let classes = el.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(e) = result {
        log::debug!("Failed to toggle class '{class}': {}", js_error_text(&e));
    }
}

pub fn set_attr(el: &Element, name: &str, value: &str) {
    if let Err(e) = el.set_attribute(name, value) {
        log::debug!("Failed to set attribute '{name}': {}", js_error_text(&e));
    }
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = el.style().set_property(property, value) {
        log::debug!("Failed to set style '{property}': {}", js_error_text(&e));
    }
}

/// Readable text for a thrown JS value.
pub fn js_error_text(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{value:?}")
}

/// Timer delay in the `u32` milliseconds gloo expects.
pub fn millis(delay: Duration) -> u32 {
    u32::try_from(delay.as_millis()).unwrap_or(u32::MAX)
}

/// Run `callback` once after `delay`. Dropping the handle cancels it.
pub fn timeout(delay: Duration, callback: impl FnOnce() + 'static) -> Timeout {
    Timeout::new(millis(delay), callback)
}

/// Event handler that holds its owner weakly.
///
/// Controllers own their listeners; a strong reference from the handler
/// back to the controller would keep both alive forever.
pub fn weak_handler<T: 'static>(
    this: &Rc<T>,
    handler: impl Fn(&Rc<T>, &Event) + 'static,
) -> impl FnMut(&Event) + 'static {
    let weak = Rc::downgrade(this);
    move |event: &Event| {
        if let Some(this) = weak.upgrade() {
            handler(&this, event);
        }
    }
}

/// One-shot callback that holds its owner weakly.
pub fn weak_callback<T: 'static>(
    this: &Rc<T>,
    callback: impl FnOnce(&Rc<T>) + 'static,
) -> impl FnOnce() + 'static {
    let weak = Rc::downgrade(this);
    move || {
        if let Some(this) = weak.upgrade() {
            callback(&this);
        }
    }
}
