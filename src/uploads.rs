//! Upload widget loading and file URL collection.

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use gloo_events::EventListener;
use js_sys::{Function, Promise, Reflect};
use lexie_core::upload::{
    EVENT_CHANGE, EVENT_UPLOAD_REMOVE, EVENT_UPLOAD_SUCCESS, UploadCollection, UploadError,
    UploadEvent, WIDGET_ELEMENTS,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{CustomEvent, Element, Event};

use crate::dom::{self, js_error_text, weak_handler};

#[wasm_bindgen(inline_js = "export function import_module(url) { return import(url); }")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn import_module(url: &str) -> Result<Promise, JsValue>;
}

/// Loads the widget's custom elements at most once per page.
///
/// Every caller awaits a clone of the same promise, so concurrent forms
/// never import the module twice.
pub struct UploadWidgetLoader {
    url: String,
    promise: OnceCell<Promise>,
}

impl UploadWidgetLoader {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            promise: OnceCell::new(),
        }
    }

    /// Whether any widget element is on the page.
    pub fn is_wanted() -> bool {
        WIDGET_ELEMENTS.iter().any(|tag| dom::doc_qs(tag).is_some())
    }

    pub async fn ensure(&self) -> Result<(), UploadError> {
        let promise = self
            .promise
            .get_or_init(|| {
                let url = self.url.clone();
                future_to_promise(async move {
                    load_components(&url)
                        .await
                        .map(|()| JsValue::UNDEFINED)
                        .map_err(|e| JsValue::from_str(&e.to_string()))
                })
            })
            .clone();

        JsFuture::from(promise)
            .await
            .map(|_| ())
            .map_err(|e| UploadError::LoadFailed(js_error_text(&e)))
    }
}

fn load_failed(e: JsValue) -> UploadError {
    UploadError::LoadFailed(js_error_text(&e))
}

async fn load_components(url: &str) -> Result<(), UploadError> {
    if !UploadWidgetLoader::is_wanted() {
        log::debug!("No upload widget on this page");
        return Ok(());
    }
    let registry = dom::window()
        .ok_or_else(|| UploadError::LoadFailed("no window".to_string()))?
        .custom_elements();
    let provider = WIDGET_ELEMENTS[0];

    if !registry.get(provider).is_undefined() {
        log::debug!("Upload widget already registered");
        return Ok(());
    }

    log::info!("Loading upload widget from {url}");
    let module = JsFuture::from(import_module(url).map_err(load_failed)?)
        .await
        .map_err(load_failed)?;

    let define: Function = Reflect::get(&module, &JsValue::from_str("defineComponents"))
        .map_err(load_failed)?
        .dyn_into()
        .map_err(|_| UploadError::LoadFailed("module has no defineComponents".to_string()))?;
    define.call1(&JsValue::NULL, &module).map_err(load_failed)?;

    JsFuture::from(registry.when_defined(provider).map_err(load_failed)?)
        .await
        .map_err(load_failed)?;
    Ok(())
}

/// Collects uploaded file URLs from the widget's context element.
pub struct UploadCollector {
    ctx_el: Element,
    collection: RefCell<UploadCollection>,
    listeners: RefCell<Vec<EventListener>>,
}

impl UploadCollector {
    pub fn attach(ctx_el: Element) -> Rc<Self> {
        let collector = Rc::new(Self {
            ctx_el,
            collection: RefCell::new(UploadCollection::new()),
            listeners: RefCell::new(Vec::new()),
        });

        let listeners = [EVENT_UPLOAD_SUCCESS, EVENT_UPLOAD_REMOVE, EVENT_CHANGE]
            .into_iter()
            .map(|name| {
                EventListener::new(
                    &collector.ctx_el,
                    name,
                    weak_handler(&collector, |this, event| this.on_event(event)),
                )
            })
            .collect();
        *collector.listeners.borrow_mut() = listeners;
        collector
    }

    fn on_event(&self, event: &Event) {
        let detail = event
            .dyn_ref::<CustomEvent>()
            .map(CustomEvent::detail)
            .filter(|d| !d.is_undefined() && !d.is_null());
        let json = match detail.map(|d| js_sys::JSON::stringify(&d)).transpose() {
            Ok(json) => json.map(String::from),
            Err(e) => {
                log::warn!("Unreadable upload event detail: {}", js_error_text(&e));
                return;
            }
        };

        match UploadEvent::from_dom(&event.type_(), json.as_deref()) {
            Ok(Some(upload_event)) => {
                let mut collection = self.collection.borrow_mut();
                collection.apply(&upload_event);
                log::debug!("Upload collection now holds {} file(s)", collection.len());
            }
            Ok(None) => {}
            Err(e) => log::warn!("{e}"),
        }
    }

    /// Rebuild the collection from the widget API.
    pub fn sync(&self) -> Result<(), UploadError> {
        let state = self.output_state()?;
        let json = js_sys::JSON::stringify(&state)
            .map(String::from)
            .map_err(|e| UploadError::ApiUnavailable(js_error_text(&e)))?;
        let state: serde_json::Value = serde_json::from_str(&json)?;
        if !self.collection.borrow_mut().sync_from_state(&state) {
            log::debug!("Upload widget state carried no file list");
        }
        Ok(())
    }

    fn output_state(&self) -> Result<JsValue, UploadError> {
        let unavailable = |e: JsValue| UploadError::ApiUnavailable(js_error_text(&e));
        let api = call_method(&self.ctx_el, "getAPI").map_err(unavailable)?;
        call_method(&api, "getOutputCollectionState").map_err(unavailable)
    }

    pub fn urls(&self) -> Vec<String> {
        self.collection.borrow().urls()
    }
}

fn call_method(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into()
        .map_err(|_| JsValue::from_str(&format!("{name} is not a function")))?;
    method.call0(target)
}
