//! FAQ accordion blocks.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use lexie_core::chrome::Accordion;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::dom::{self, weak_handler};

struct FaqItem {
    item: Element,
    question: Element,
    panel: HtmlElement,
}

pub struct Faq {
    items: Vec<FaqItem>,
    accordion: RefCell<Accordion>,
    listeners: RefCell<Vec<EventListener>>,
}

impl Faq {
    pub fn attach_all() -> Vec<Rc<Self>> {
        dom::doc_qsa("[data-faq]")
            .iter()
            .filter_map(Self::attach)
            .collect()
    }

    fn attach(root: &Element) -> Option<Rc<Self>> {
        let items: Vec<FaqItem> = dom::qsa(root, "[data-faq-item]")
            .into_iter()
            .filter_map(|item| {
                let question = dom::qs(&item, ".faq__q")?;
                let panel = dom::qs(&item, "[data-faq-panel]")?
                    .dyn_into::<HtmlElement>()
                    .ok()?;
                Some(FaqItem {
                    item,
                    question,
                    panel,
                })
            })
            .collect();
        if items.is_empty() {
            return None;
        }

        let faq = Rc::new(Self {
            accordion: RefCell::new(Accordion::new(items.len())),
            items,
            listeners: RefCell::new(Vec::new()),
        });
        faq.bind();
        faq.render();
        Some(faq)
    }

    fn bind(self: &Rc<Self>) {
        let mut listeners: Vec<EventListener> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                EventListener::new(
                    &entry.question,
                    "click",
                    weak_handler(self, move |this, _| {
                        if this.accordion.borrow_mut().click(index) {
                            this.render();
                        }
                    }),
                )
            })
            .collect();

        if let Some(window) = dom::window() {
            listeners.push(EventListener::new(
                &window,
                "resize",
                weak_handler(self, |this, _| this.render()),
            ));
        }
        *self.listeners.borrow_mut() = listeners;
    }

    fn render(&self) {
        let accordion = self.accordion.borrow();
        for (index, entry) in self.items.iter().enumerate() {
            let open = accordion.is_open(index);
            dom::set_class(&entry.item, "is-open", open);
            dom::set_attr(&entry.question, "aria-expanded", if open { "true" } else { "false" });
            let height = if open {
                format!("{}px", entry.panel.scroll_height())
            } else {
                "0px".to_string()
            };
            dom::set_style(&entry.panel, "max-height", &height);
        }
    }
}
