use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use js_sys::Promise;
use lexie_core::config::{CONFIG_ELEMENT_ID, ConfigError, SiteConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use crate::carousel::CarouselController;
use crate::chrome::SiteChrome;
use crate::contact_form::ContactForm;
use crate::context::SiteContext;
use crate::dom;
use crate::faq::Faq;
use crate::gallery;

/// Controllers kept alive for the lifetime of the page.
struct Page {
    chrome: Rc<SiteChrome>,
    faqs: Vec<Rc<Faq>>,
    carousels: Vec<Rc<CarouselController>>,
    contact: Option<Rc<ContactForm>>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (SiteConfig::default(), Some(e)),
    };

    if let Err(e) = console_log::init_with_level(config.log_level.to_level()) {
        web_sys::console::warn_1(&format!("Logger already initialised: {e}").into());
    }
    if let Some(e) = config_error {
        log::warn!("Ignoring site configuration: {e}");
    }
    log::info!("Lexie site starting");

    wasm_bindgen_futures::spawn_local(async move {
        dom_ready().await;
        boot(config).await;
    });
}

/// Read the inline configuration block, if the page has one.
fn load_config() -> Result<SiteConfig, ConfigError> {
    let json = dom::document()
        .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content())
        .filter(|text| !text.trim().is_empty());
    match json {
        Some(json) => SiteConfig::from_json(&json),
        None => Ok(SiteConfig::default()),
    }
}

/// Resolve once the document has been parsed.
async fn dom_ready() {
    let Some(doc) = dom::document() else {
        return;
    };
    if doc.ready_state() != "loading" {
        return;
    }
    let ready = Promise::new(&mut |resolve, _reject| {
        EventListener::once(&doc, "DOMContentLoaded", move |_| {
            if let Err(e) = resolve.call0(&JsValue::NULL) {
                log::debug!("DOM ready callback failed: {}", dom::js_error_text(&e));
            }
        })
        .forget();
    });
    if let Err(e) = JsFuture::from(ready).await {
        log::warn!("Waiting for the DOM failed: {}", dom::js_error_text(&e));
    }
}

async fn boot(config: SiteConfig) {
    let ctx = SiteContext::new(config);

    let chrome = SiteChrome::attach();
    let faqs = Faq::attach_all();
    gallery::render_featured(ctx.config()).await;
    let carousels = CarouselController::attach_all(&ctx);
    let contact = ContactForm::attach(&ctx);

    let page = Page {
        chrome,
        faqs,
        carousels,
        contact,
    };
    log::info!(
        "Page ready: nav {}, {} FAQ block(s), {} carousel(s), contact form {}",
        if page.chrome.has_nav() { "on" } else { "off" },
        page.faqs.len(),
        page.carousels.len(),
        if page.contact.is_some() { "on" } else { "off" },
    );
    PAGE.with(|slot| *slot.borrow_mut() = Some(page));
}
