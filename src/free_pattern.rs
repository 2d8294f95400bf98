//! "I want this pattern" modal.
//!
//! One overlay per page, appended to `<body>` the first time a slide's
//! call-to-action is clicked and reused afterwards.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use lexie_core::constants::{FIELD_RESTORE_DELAY, MODAL_AUTO_CLOSE, MODAL_FADE};
use lexie_core::form::{FormEndpoint, SubmitError, SubmitStatus};
use lexie_core::modal::{ModalState, PatternChoice, RequestOutcome};
use lexie_core::SiteConfig;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, HtmlElement, HtmlFormElement, HtmlImageElement, KeyboardEvent};

use crate::dom::{self, js_error_text, timeout, weak_callback, weak_handler};
use crate::form_fields::{FieldInputs, MessageSwap, send_no_cors, set_status};

const MODAL_ID: &str = "freePatternModal";

const MODAL_HTML: &str = r#"
  <div class="modal__backdrop" data-close></div>
  <div class="modal__dialog" role="dialog" aria-modal="true" aria-label="Free pattern">
    <button class="modal__close" type="button" aria-label="Close" data-close>×</button>
    <div class="modal__grid">
      <div>
        <h3>I want this free pattern</h3>
        <p class="muted">Leave your details and I'll get back to you with a date ✉️</p>
        <form class="form" id="freePatternForm" novalidate>
          <div class="form__row">
            <label class="form__label" for="fp_name">Full name</label>
            <input class="form__input" id="fp_name" name="entry.1453391056" required autocomplete="name" />
          </div>
          <div class="form__row">
            <label class="form__label" for="fp_phone">Phone</label>
            <input class="form__input" id="fp_phone" name="entry.107571005" required autocomplete="tel" />
          </div>
          <div class="form__row">
            <label class="form__label" for="fp_msg">Message</label>
            <textarea class="form__textarea" id="fp_msg" name="entry.839337160" rows="5" required></textarea>
          </div>
          <p class="form__status" id="fp_status" aria-live="polite"></p>
          <button class="btn btn--primary" type="submit">Send</button>
        </form>
      </div>
      <div>
        <div class="freePreview"><img id="fp_img" alt="" /></div>
        <p class="muted">The message includes a link to the chosen pattern.</p>
      </div>
    </div>
  </div>
"#;

fn missing(what: &str) -> JsValue {
    JsValue::from_str(&format!("modal markup has no {what}"))
}

pub struct FreePatternModal {
    overlay: HtmlElement,
    form: HtmlFormElement,
    fields: FieldInputs,
    image: HtmlImageElement,
    status: Element,
    endpoint: Result<FormEndpoint, SubmitError>,
    state: RefCell<ModalState>,
    swap: RefCell<Option<MessageSwap>>,
    restore_timer: RefCell<Option<Timeout>>,
    auto_close_timer: RefCell<Option<Timeout>>,
    release_timer: RefCell<Option<Timeout>>,
    focus_timer: RefCell<Option<Timeout>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl FreePatternModal {
    /// Create the overlay, append it to the body and wire it up.
    pub fn build(config: &SiteConfig) -> Result<Rc<Self>, JsValue> {
        let doc = dom::document().ok_or_else(|| missing("document"))?;
        let body = doc.body().ok_or_else(|| missing("body"))?;

        let overlay: HtmlElement = doc.create_element("div")?.dyn_into()?;
        overlay.set_class_name("modal");
        overlay.set_id(MODAL_ID);
        overlay.set_attribute("aria-hidden", "true")?;
        overlay.set_inner_html(MODAL_HTML);
        body.append_child(&overlay)?;

        let form: HtmlFormElement =
            dom::qs_as(&overlay, "#freePatternForm").ok_or_else(|| missing("form"))?;
        let fields = FieldInputs::find(&overlay, "#fp_name", "#fp_phone", "#fp_msg")
            .ok_or_else(|| missing("fields"))?;
        let image: HtmlImageElement =
            dom::qs_as(&overlay, "#fp_img").ok_or_else(|| missing("preview image"))?;
        let status = dom::qs(&overlay, "#fp_status").ok_or_else(|| missing("status line"))?;

        let shared_action = dom::doc_qs("[data-gform-action]")
            .and_then(|el| el.get_attribute("data-gform-action"));
        let endpoint = FormEndpoint::resolve(shared_action.as_deref(), Some(&config.form_action));
        if let Ok(endpoint) = &endpoint {
            form.set_action(endpoint.as_str());
        }

        let modal = Rc::new(Self {
            overlay,
            form,
            fields,
            image,
            status,
            endpoint,
            state: RefCell::new(ModalState::new()),
            swap: RefCell::new(None),
            restore_timer: RefCell::new(None),
            auto_close_timer: RefCell::new(None),
            release_timer: RefCell::new(None),
            focus_timer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });
        modal.bind(&doc);
        log::debug!("Free-pattern modal built");
        Ok(modal)
    }

    fn bind(self: &Rc<Self>, doc: &web_sys::Document) {
        let mut listeners = self.fields.clear_on_input();

        for closer in dom::qsa(&self.overlay, "[data-close]") {
            listeners.push(EventListener::new(
                &closer,
                "click",
                weak_handler(self, |this, _| this.close()),
            ));
        }

        listeners.push(EventListener::new(
            doc,
            "keydown",
            weak_handler(self, |this, event| {
                let is_escape = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|e| e.key() == "Escape");
                if is_escape && this.state.borrow().is_open() {
                    this.close();
                }
            }),
        ));

        listeners.push(EventListener::new_with_options(
            &self.form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            weak_handler(self, |this, event| this.on_submit(event)),
        ));

        *self.listeners.borrow_mut() = listeners;
    }

    /// Show the modal for one pattern, discarding any earlier request.
    pub fn open(self: &Rc<Self>, image_url: &str, alt: &str) {
        self.auto_close_timer.borrow_mut().take();
        self.release_timer.borrow_mut().take();

        let content = self
            .state
            .borrow_mut()
            .open(PatternChoice::new(image_url, alt));

        self.form.reset();
        set_status(Some(&self.status), content.status.text());
        self.image.set_src(&content.image_src);
        self.image.set_alt(&content.image_alt);
        self.fields.message.set_value(&content.message);

        dom::set_attr(&self.overlay, "aria-hidden", "false");
        if let Some(body) = dom::body() {
            dom::set_style(&body, "overflow", "hidden");
        }

        let name = self.fields.name.clone();
        *self.focus_timer.borrow_mut() = Some(timeout(Duration::ZERO, move || {
            if let Err(e) = name.focus() {
                log::debug!("Could not focus the name field: {}", js_error_text(&e));
            }
        }));
        log::debug!("Free-pattern modal opened for {image_url}");
    }

    /// Hide the modal now and release body scrolling after the fade.
    pub fn close(self: &Rc<Self>) {
        let Some(token) = self.state.borrow_mut().close() else {
            return;
        };
        dom::set_attr(&self.overlay, "aria-hidden", "true");

        let release = weak_callback(self, move |this| {
            if !this.state.borrow_mut().release_scroll(token) {
                return;
            }
            if let Some(body) = dom::body() {
                dom::set_style(&body, "overflow", "");
            }
        });
        *self.release_timer.borrow_mut() = Some(timeout(MODAL_FADE, release));
    }

    fn restore_message(&self) {
        self.restore_timer.borrow_mut().take();
        if let Some(swap) = self.swap.borrow_mut().take() {
            swap.restore();
        }
    }

    fn on_submit(self: &Rc<Self>, event: &Event) {
        event.prevent_default();
        set_status(Some(&self.status), "");

        let endpoint = match &self.endpoint {
            Ok(endpoint) => endpoint.clone(),
            Err(e) => {
                set_status(Some(&self.status), &e.to_string());
                return;
            }
        };

        let fields = self.fields.values();
        if !self.fields.apply_report(&fields.validate()) {
            return;
        }

        self.restore_message();
        let composed = {
            let mut state = self.state.borrow_mut();
            state.lifecycle_mut().begin();
            state.hidden_message(&fields.message)
        };
        set_status(Some(&self.status), SubmitStatus::Sending.text());

        match MessageSwap::apply(&self.form, &self.fields.message, &composed) {
            Ok(swap) => *self.swap.borrow_mut() = Some(swap),
            Err(e) => {
                self.finish(Err(e));
                return;
            }
        }

        let this = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let result = send_no_cors(&endpoint, &this.form).await;
            this.finish(result);
        });
    }

    fn finish(self: &Rc<Self>, result: Result<(), SubmitError>) {
        let restore = weak_callback(self, |this| {
            if let Some(swap) = this.swap.borrow_mut().take() {
                swap.restore();
            }
        });
        *self.restore_timer.borrow_mut() = Some(timeout(FIELD_RESTORE_DELAY, restore));

        let outcome = self.state.borrow_mut().finish_request(result.is_ok());
        match (outcome, result) {
            (RequestOutcome::Succeeded, _) => {
                log::info!("Free-pattern request sent");
                set_status(Some(&self.status), SubmitStatus::Success.text());
                self.form.reset();

                let close = weak_callback(self, |this| {
                    this.close();
                    set_status(Some(&this.status), "");
                });
                *self.auto_close_timer.borrow_mut() = Some(timeout(MODAL_AUTO_CLOSE, close));
            }
            (RequestOutcome::Failed, result) => {
                if let Err(e) = result {
                    log::error!("Free-pattern request failed: {e}");
                }
                set_status(Some(&self.status), SubmitStatus::Error.text());
            }
            (RequestOutcome::Superseded, _) => {
                log::debug!("Free-pattern request finished after the modal was reopened");
            }
        }
    }
}
