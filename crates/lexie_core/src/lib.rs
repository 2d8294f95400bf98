//! lexie_core - behaviour of the studio website, independent of the DOM.
//!
//! Every interactive surface of the site (carousel, forms, free-pattern modal,
//! navigation chrome, FAQ) is modelled here as plain data plus small state
//! machines. The `lexie` crate feeds browser events into these types and
//! applies the resulting decisions to the page.

pub mod carousel;
pub mod catalog;
pub mod chrome;
pub mod config;
pub mod constants;
pub mod form;
pub mod message;
pub mod modal;
pub mod upload;
pub mod validation;

pub use carousel::{
    ArmingState, AutoplayState, Carousel, LoopPlan, ScrollBehavior, ScrollGate, Span,
    TrackSurface,
};
pub use catalog::{Catalog, CatalogError, Slide};
pub use config::{ConfigError, LogLevel, SiteConfig};
pub use form::{FormEndpoint, SubmissionLifecycle, SubmitError, SubmitStatus};
pub use modal::{ModalState, PatternChoice};
pub use upload::{UploadCollection, UploadError, UploadEvent};
pub use validation::{ContactFields, Field, FieldError, ValidationReport};
