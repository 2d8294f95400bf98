//! Lexie - browser behaviour for a tattoo studio website.
//!
//! Compiled to WebAssembly and loaded by the static pages. The behaviour
//! itself lives in [`lexie_core`]; the modules here bind it to the DOM:
//! the hero carousel, the contact and free-pattern forms, the upload widget,
//! the FAQ accordion and the navigation chrome.

pub use lexie_core;

#[cfg(target_arch = "wasm32")]
mod carousel;
#[cfg(target_arch = "wasm32")]
mod chrome;
#[cfg(target_arch = "wasm32")]
mod contact_form;
#[cfg(target_arch = "wasm32")]
mod context;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod faq;
#[cfg(target_arch = "wasm32")]
mod form_fields;
#[cfg(target_arch = "wasm32")]
mod free_pattern;
#[cfg(target_arch = "wasm32")]
mod gallery;
#[cfg(target_arch = "wasm32")]
mod uploads;

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
