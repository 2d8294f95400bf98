//! Page-wide shared services.

use std::cell::RefCell;
use std::rc::Rc;

use lexie_core::SiteConfig;

use crate::dom::js_error_text;
use crate::free_pattern::FreePatternModal;
use crate::uploads::UploadWidgetLoader;

/// Things every controller may need, created once at boot.
pub struct SiteContext {
    config: SiteConfig,
    upload_widget: UploadWidgetLoader,
    free_pattern_modal: RefCell<Option<Rc<FreePatternModal>>>,
}

impl SiteContext {
    pub fn new(config: SiteConfig) -> Rc<Self> {
        let upload_widget = UploadWidgetLoader::new(config.upload_widget_url.clone());
        Rc::new(Self {
            config,
            upload_widget,
            free_pattern_modal: RefCell::new(None),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn upload_widget(&self) -> &UploadWidgetLoader {
        &self.upload_widget
    }

    /// The shared free-pattern modal, built on first use.
    pub fn free_pattern_modal(&self) -> Option<Rc<FreePatternModal>> {
        if let Some(modal) = self.free_pattern_modal.borrow().as_ref() {
            return Some(Rc::clone(modal));
        }
        match FreePatternModal::build(&self.config) {
            Ok(modal) => {
                *self.free_pattern_modal.borrow_mut() = Some(Rc::clone(&modal));
                Some(modal)
            }
            Err(e) => {
                log::error!("Failed to build the free-pattern modal: {}", js_error_text(&e));
                None
            }
        }
    }
}
