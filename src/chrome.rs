//! Navigation drawer, header height, scroll reveal and text touch-ups.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use lexie_core::chrome::{
    HEADER_HEIGHT_VAR, NAV_SELECTOR, NavDrawer, NavParts, WIDOW_SELECTOR, header_height_value,
    prevent_widow, should_reveal,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, KeyboardEvent, Node};

use crate::dom::{self, weak_handler};

const OPEN_CLASS: &str = "is-open";
const VISIBLE_CLASS: &str = "is-visible";

pub struct SiteChrome {
    nav: Option<NavParts<Element>>,
    header: Option<Element>,
    drawer: RefCell<NavDrawer>,
    pending_reveal: RefCell<Vec<Element>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl SiteChrome {
    pub fn attach() -> Rc<Self> {
        let nav = NavParts::find(dom::doc_qs(NAV_SELECTOR), |nav, selector| {
            dom::qs(nav, selector)
        });
        if nav.is_none() {
            log::debug!("No complete nav; syncing header height only");
        }
        let pending_reveal = dom::doc_qsa(".reveal")
            .into_iter()
            .filter(|el| !el.class_list().contains(VISIBLE_CLASS))
            .collect();

        let chrome = Rc::new(Self {
            nav,
            header: dom::doc_qs(".site-header"),
            drawer: RefCell::new(NavDrawer::default()),
            pending_reveal: RefCell::new(pending_reveal),
            listeners: RefCell::new(Vec::new()),
        });

        chrome.sync_header_height();
        prevent_widows();
        set_year();
        chrome.reveal_visible();
        chrome.bind();
        chrome
    }

    pub fn has_nav(&self) -> bool {
        self.nav.is_some()
    }

    fn bind(self: &Rc<Self>) {
        let mut listeners = Vec::new();

        if let Some(window) = dom::window() {
            listeners.push(EventListener::new(
                &window,
                "resize",
                weak_handler(self, |this, _| {
                    this.sync_header_height();
                    this.reveal_visible();
                }),
            ));
            listeners.push(EventListener::new(
                &window,
                "scroll",
                weak_handler(self, |this, _| this.reveal_visible()),
            ));
        }

        if let (Some(parts), Some(doc)) = (&self.nav, dom::document()) {
            listeners.push(EventListener::new(
                &parts.toggle,
                "click",
                weak_handler(self, |this, _| {
                    this.drawer.borrow_mut().toggle();
                    this.apply_drawer();
                }),
            ));

            for link in dom::qsa(&parts.links, "a") {
                listeners.push(EventListener::new(
                    &link,
                    "click",
                    weak_handler(self, |this, _| {
                        if this.drawer.borrow_mut().close() {
                            this.apply_drawer();
                        }
                    }),
                ));
            }

            listeners.push(EventListener::new(
                &doc,
                "click",
                weak_handler(self, |this, event| this.on_document_click(event)),
            ));
            listeners.push(EventListener::new(
                &doc,
                "keydown",
                weak_handler(self, |this, event| {
                    let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                        return;
                    };
                    if this.drawer.borrow_mut().on_key(&key) {
                        this.apply_drawer();
                    }
                }),
            ));
        }

        *self.listeners.borrow_mut() = listeners;
    }

    fn on_document_click(&self, event: &Event) {
        let Some(parts) = &self.nav else {
            return;
        };
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside = parts.nav.contains(target.as_ref());
        if self.drawer.borrow_mut().on_document_click(inside) {
            self.apply_drawer();
        }
    }

    fn apply_drawer(&self) {
        let drawer = *self.drawer.borrow();
        if let Some(parts) = &self.nav {
            dom::set_class(&parts.nav, OPEN_CLASS, drawer.is_open());
            dom::set_attr(&parts.toggle, "aria-expanded", drawer.aria_expanded());
        }
    }

    fn sync_header_height(&self) {
        let Some(header) = &self.header else {
            return;
        };
        let height = header.get_bounding_client_rect().height();
        let root = dom::document()
            .and_then(|doc| doc.document_element())
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(root) = root {
            dom::set_style(&root, HEADER_HEIGHT_VAR, &header_height_value(height));
        }
    }

    /// Reveal elements that entered the viewport. Revealed ones stay so.
    fn reveal_visible(&self) {
        let viewport = dom::viewport_height();
        self.pending_reveal.borrow_mut().retain(|el| {
            let top = el.get_bounding_client_rect().top();
            if should_reveal(top, viewport) {
                dom::set_class(el, VISIBLE_CLASS, true);
                false
            } else {
                true
            }
        });
    }
}

/// Keep the last word of short text blocks on the previous line.
///
/// Elements with child elements are skipped so links and markup survive.
fn prevent_widows() {
    for el in dom::doc_qsa(WIDOW_SELECTOR) {
        if el.child_element_count() > 0 {
            continue;
        }
        let Some(text) = el.text_content() else {
            continue;
        };
        let glued = prevent_widow(&text);
        if glued != text {
            el.set_text_content(Some(&glued));
        }
    }
}

fn set_year() {
    let year = js_sys::Date::new_0().get_full_year().to_string();
    for el in dom::doc_qsa("[data-year]") {
        el.set_text_content(Some(&year));
    }
}
