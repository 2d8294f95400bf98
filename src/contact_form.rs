//! Main contact form.
//!
//! With a result frame on the page the browser submits natively into the
//! frame and its `load` event signals success. Without one the form is
//! posted with `fetch`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use lexie_core::constants::{FIELD_RESTORE_DELAY, SUCCESS_FALLBACK};
use lexie_core::form::{AttemptId, FormEndpoint, SubmissionLifecycle, SubmitError, SubmitStatus};
use lexie_core::message::compose_with_uploads;
use web_sys::{Element, Event, HtmlFormElement, HtmlIFrameElement, HtmlInputElement};

use crate::context::SiteContext;
use crate::dom::{self, timeout, weak_callback, weak_handler};
use crate::form_fields::{FieldInputs, MessageSwap, send_no_cors, set_status};
use crate::uploads::UploadCollector;

const FORM_SELECTOR: &str = "#contactForm";
const FRAME_SELECTOR: &str = "#gformIframe";
const UPLOAD_CTX_SELECTOR: &str = "#lexieUploadCtx";

pub struct ContactForm {
    form: HtmlFormElement,
    fields: FieldInputs,
    status: Option<Element>,
    frame: Option<HtmlIFrameElement>,
    url_field: Option<HtmlInputElement>,
    endpoint: Result<FormEndpoint, SubmitError>,
    uploads: Option<Rc<UploadCollector>>,
    lifecycle: RefCell<SubmissionLifecycle>,
    swap: RefCell<Option<MessageSwap>>,
    restore_timer: RefCell<Option<Timeout>>,
    fallback_timer: RefCell<Option<Timeout>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl ContactForm {
    /// Wire the contact form, if the page has one.
    pub fn attach(ctx: &Rc<SiteContext>) -> Option<Rc<Self>> {
        let form: HtmlFormElement = dom::doc_qs_as(FORM_SELECTOR)?;
        let fields = FieldInputs::find(&form, "#name", "#mobile", "#msg")?;
        let status = dom::qs(&form, ".form__status");

        let endpoint = FormEndpoint::resolve(
            form.get_attribute("data-gform-action").as_deref(),
            Some(&ctx.config().form_action),
        );
        match &endpoint {
            Ok(endpoint) => form.set_action(endpoint.as_str()),
            Err(e) => {
                log::warn!("Contact form disabled: {e}");
                set_status(status.as_ref(), &e.to_string());
            }
        }

        let frame: Option<HtmlIFrameElement> = dom::doc_qs_as(FRAME_SELECTOR);
        if let Some(frame) = &frame {
            let name = frame.name();
            if !name.is_empty() && !form.has_attribute("target") {
                form.set_target(&name);
            }
        }

        let uploads = dom::doc_qs(UPLOAD_CTX_SELECTOR).map(|ctx_el| {
            let ctx = Rc::clone(ctx);
            wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = ctx.upload_widget().ensure().await {
                    log::warn!("{e}");
                }
            });
            UploadCollector::attach(ctx_el)
        });

        let contact = Rc::new(Self {
            url_field: dom::qs_as(&form, "#uploadUrls"),
            form,
            fields,
            status,
            frame,
            endpoint,
            uploads,
            lifecycle: RefCell::new(SubmissionLifecycle::new()),
            swap: RefCell::new(None),
            restore_timer: RefCell::new(None),
            fallback_timer: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });
        contact.bind();
        log::debug!("Contact form attached");
        Some(contact)
    }

    fn bind(self: &Rc<Self>) {
        let mut listeners = self.fields.clear_on_input();

        listeners.push(EventListener::new_with_options(
            &self.form,
            "submit",
            EventListenerOptions::enable_prevent_default(),
            weak_handler(self, |this, event| this.on_submit(event)),
        ));

        if let Some(frame) = &self.frame {
            listeners.push(EventListener::new(
                frame,
                "load",
                weak_handler(self, |this, _| {
                    if this.lifecycle.borrow_mut().confirm_success() {
                        this.on_success();
                    }
                }),
            ));
        }

        *self.listeners.borrow_mut() = listeners;
    }

    fn status(&self, text: &str) {
        set_status(self.status.as_ref(), text);
    }

    fn restore_message(&self) {
        self.restore_timer.borrow_mut().take();
        if let Some(swap) = self.swap.borrow_mut().take() {
            swap.restore();
        }
    }

    fn collected_urls(&self) -> Vec<String> {
        let Some(uploads) = &self.uploads else {
            return Vec::new();
        };
        if let Err(e) = uploads.sync() {
            log::debug!("Using event-collected uploads: {e}");
        }
        uploads.urls()
    }

    fn on_submit(self: &Rc<Self>, event: &Event) {
        self.status("");

        let endpoint = match &self.endpoint {
            Ok(endpoint) => endpoint.clone(),
            Err(e) => {
                event.prevent_default();
                self.status(&e.to_string());
                return;
            }
        };

        let fields = self.fields.values();
        if !self.fields.apply_report(&fields.validate()) {
            event.prevent_default();
            return;
        }

        let attempt = self.lifecycle.borrow_mut().begin();
        self.status(SubmitStatus::Sending.text());

        let urls = self.collected_urls();
        if let Some(url_field) = &self.url_field {
            url_field.set_value(&urls.join("\n"));
        }

        self.restore_message();
        let composed = compose_with_uploads(&fields.message, &urls);
        match MessageSwap::apply(&self.form, &self.fields.message, &composed) {
            Ok(swap) => *self.swap.borrow_mut() = Some(swap),
            Err(e) => {
                event.prevent_default();
                self.on_failure(e);
                return;
            }
        }
        let restore = weak_callback(self, |this| {
            if let Some(swap) = this.swap.borrow_mut().take() {
                swap.restore();
            }
        });
        *self.restore_timer.borrow_mut() = Some(timeout(FIELD_RESTORE_DELAY, restore));

        if self.frame.is_some() {
            // The native submission continues into the frame.
            self.arm_fallback(attempt);
            return;
        }

        event.prevent_default();
        let this = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            match send_no_cors(&endpoint, &this.form).await {
                Ok(()) => {
                    if this.lifecycle.borrow_mut().confirm_success() {
                        this.on_success();
                    }
                }
                Err(e) => this.on_failure(e),
            }
        });
    }

    fn arm_fallback(self: &Rc<Self>, attempt: AttemptId) {
        let fallback = weak_callback(self, move |this| {
            if this.lifecycle.borrow_mut().confirm_fallback(attempt) {
                log::debug!("Result frame stayed silent; assuming the submission went through");
                this.on_success();
            }
        });
        *self.fallback_timer.borrow_mut() = Some(timeout(SUCCESS_FALLBACK, fallback));
    }

    fn on_success(&self) {
        self.fallback_timer.borrow_mut().take();
        log::info!("Contact form sent");
        self.status(SubmitStatus::Success.text());
        self.form.reset();
        if let Some(uploads) = &self.uploads {
            if let Err(e) = uploads.sync() {
                log::debug!("Upload resync after reset failed: {e}");
            }
        }
    }

    fn on_failure(&self, error: SubmitError) {
        if self.lifecycle.borrow_mut().fail() {
            log::error!("Contact form failed: {error}");
            self.status(SubmitStatus::Error.text());
        }
    }
}
