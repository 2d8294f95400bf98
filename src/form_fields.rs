//! Pieces shared by the contact form and the free-pattern form.

use gloo_events::EventListener;
use gloo_net::http::Request;
use lexie_core::form::{FormEndpoint, SubmitError};
use lexie_core::validation::{ContactFields, Field, ValidationReport};
use wasm_bindgen::JsCast;
use web_sys::{Element, FormData, HtmlFormElement, HtmlInputElement, HtmlTextAreaElement, RequestMode};

use crate::dom::{self, js_error_text};

/// The three validated inputs of a form.
#[derive(Clone)]
pub struct FieldInputs {
    pub name: HtmlInputElement,
    pub phone: HtmlInputElement,
    pub message: HtmlTextAreaElement,
}

impl FieldInputs {
    /// Look the inputs up by selector. All three must exist.
    pub fn find(root: &Element, name: &str, phone: &str, message: &str) -> Option<Self> {
        Some(Self {
            name: dom::qs_as(root, name)?,
            phone: dom::qs_as(root, phone)?,
            message: dom::qs_as(root, message)?,
        })
    }

    pub fn values(&self) -> ContactFields {
        ContactFields {
            name: self.name.value(),
            phone: self.phone.value(),
            message: self.message.value(),
        }
    }

    fn set_validity(&self, field: Field, text: &str) {
        match field {
            Field::Name => self.name.set_custom_validity(text),
            Field::Phone => self.phone.set_custom_validity(text),
            Field::Message => self.message.set_custom_validity(text),
        }
    }

    fn report_validity(&self, field: Field) -> bool {
        match field {
            Field::Name => self.name.report_validity(),
            Field::Phone => self.phone.report_validity(),
            Field::Message => self.message.report_validity(),
        }
    }

    /// Put each field's message in place and show the first one.
    /// Returns whether the form may be submitted.
    pub fn apply_report(&self, report: &ValidationReport) -> bool {
        for &field in Field::all() {
            let text = report.error(field).map(|e| e.to_string()).unwrap_or_default();
            self.set_validity(field, &text);
        }
        if let Some(&first) = Field::all().iter().find(|&&f| report.error(f).is_some()) {
            self.report_validity(first);
        }
        report.is_valid()
    }

    /// Typing into a field clears its error.
    pub fn clear_on_input(&self) -> Vec<EventListener> {
        let name = self.name.clone();
        let phone = self.phone.clone();
        let message = self.message.clone();
        vec![
            EventListener::new(&self.name, "input", move |_| name.set_custom_validity("")),
            EventListener::new(&self.phone, "input", move |_| phone.set_custom_validity("")),
            EventListener::new(&self.message, "input", move |_| message.set_custom_validity("")),
        ]
    }
}

/// Submitted message temporarily carried by a hidden field.
///
/// The visible textarea loses its `name` so only the composed text is sent;
/// [`restore`](Self::restore) puts things back.
pub struct MessageSwap {
    visible: HtmlTextAreaElement,
    hidden: HtmlTextAreaElement,
    name: Option<String>,
}

impl MessageSwap {
    pub fn apply(
        form: &HtmlFormElement,
        visible: &HtmlTextAreaElement,
        composed: &str,
    ) -> Result<Self, SubmitError> {
        let doc = dom::document().ok_or_else(|| SubmitError::body("no document"))?;
        let hidden: HtmlTextAreaElement = doc
            .create_element("textarea")
            .map_err(|e| SubmitError::body(js_error_text(&e)))?
            .dyn_into()
            .map_err(|_| SubmitError::body("textarea has an unexpected type"))?;
        dom::set_style(&hidden, "display", "none");

        let name = visible.get_attribute("name");
        if let Some(name) = &name {
            hidden.set_name(name);
            if let Err(e) = visible.remove_attribute("name") {
                log::debug!("Failed to detach message name: {}", js_error_text(&e));
            }
        }
        hidden.set_value(composed);
        form.append_child(&hidden)
            .map_err(|e| SubmitError::body(js_error_text(&e)))?;

        Ok(Self {
            visible: visible.clone(),
            hidden,
            name,
        })
    }

    pub fn restore(self) {
        self.hidden.remove();
        if let Some(name) = &self.name {
            dom::set_attr(&self.visible, "name", name);
        }
    }
}

/// Post a form's fields to the backend in `no-cors` mode.
///
/// The response is opaque, so success only means the request went out.
pub async fn send_no_cors(endpoint: &FormEndpoint, form: &HtmlFormElement) -> Result<(), SubmitError> {
    let data = FormData::new_with_form(form).map_err(|e| SubmitError::body(js_error_text(&e)))?;
    Request::post(endpoint.as_str())
        .mode(RequestMode::NoCors)
        .body(data)
        .map_err(|e| SubmitError::body(e.to_string()))?
        .send()
        .await
        .map_err(|e| SubmitError::network(e.to_string()))?;
    Ok(())
}

/// Replace a status line's text.
pub fn set_status(status: Option<&Element>, text: &str) {
    if let Some(el) = status {
        el.set_text_content(Some(text));
    }
}
