//! Featured-work slides loaded from the portfolio catalog.

use gloo_net::http::Request;
use lexie_core::catalog::{Catalog, CatalogError, EMPTY_TEXT, ERROR_TEXT, Slide};
use lexie_core::SiteConfig;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlImageElement};

use crate::dom::{self, js_error_text};

const TRACK_SELECTOR: &str = "#featuredTrack";
const CTA_LABEL: &str = "I want this pattern";

async fn fetch_catalog(url: &str) -> Result<(Catalog, String), CatalogError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| CatalogError::fetch(e.to_string()))?;
    if !response.ok() {
        return Err(CatalogError::Status {
            status: response.status(),
        });
    }
    let base = response.url();
    let body = response
        .text()
        .await
        .map_err(|e| CatalogError::fetch(e.to_string()))?;
    Ok((Catalog::from_json(&body)?, base))
}

fn slide_element(doc: &Document, slide: &Slide) -> Result<Element, JsValue> {
    let figure = doc.create_element("figure")?;
    figure.set_class_name("slide");
    figure.set_attribute("data-id", &slide.id)?;

    let image: HtmlImageElement = doc.create_element("img")?.dyn_into()?;
    image.set_src(&slide.src);
    image.set_alt(&slide.alt);
    image.set_attribute("loading", "eager")?;
    image.set_attribute("decoding", "async")?;
    image.set_draggable(false);
    figure.append_child(&image)?;

    if slide.promotional {
        figure.set_attribute("data-free", "1")?;
        let cta = doc.create_element("button")?;
        cta.set_attribute("type", "button")?;
        cta.set_class_name("slide__cta");
        cta.set_text_content(Some(CTA_LABEL));
        figure.append_child(&cta)?;
    }
    Ok(figure)
}

fn show_fallback(doc: &Document, track: &HtmlElement, text: &str) {
    track.set_inner_html("");
    match doc.create_element("p") {
        Ok(p) => {
            p.set_class_name("muted");
            p.set_text_content(Some(text));
            if let Err(e) = track.append_child(&p) {
                log::warn!("Failed to show gallery fallback: {}", js_error_text(&e));
            }
        }
        Err(e) => log::warn!("Failed to show gallery fallback: {}", js_error_text(&e)),
    }
}

/// Fill `#featuredTrack` with featured slides, or a fallback text.
///
/// Runs before the carousels are attached so they see the final slides.
pub async fn render_featured(config: &SiteConfig) {
    let (Some(doc), Some(track)) = (dom::document(), dom::doc_qs_as::<HtmlElement>(TRACK_SELECTOR))
    else {
        return;
    };

    let slides = match fetch_catalog(&config.data_url).await {
        Ok((catalog, base)) => catalog.featured_slides(Some(&base), config.featured_limit),
        Err(e) => {
            log::error!("Failed to load {}: {e}", config.data_url);
            show_fallback(&doc, &track, ERROR_TEXT);
            return;
        }
    };
    if slides.is_empty() {
        log::warn!("Catalog has no featured items");
        show_fallback(&doc, &track, EMPTY_TEXT);
        return;
    }

    track.set_inner_html("");
    for slide in &slides {
        let appended = slide_element(&doc, slide).and_then(|el| track.append_child(&el));
        if let Err(e) = appended {
            log::warn!("Skipping slide {}: {}", slide.id, js_error_text(&e));
        }
    }
    log::info!("Rendered {} featured slide(s)", slides.len());
}
