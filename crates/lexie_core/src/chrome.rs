//! Site chrome: navigation drawer, FAQ accordion, scroll reveal and small
//! text tweaks.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::REVEAL_THRESHOLD_PX;

/// Elements whose last word must not wrap alone.
pub const WIDOW_SELECTOR: &str = "p, h1, h2, h3, h4, li, .hero__kicker, .muted";

/// CSS custom property holding the measured header height.
pub const HEADER_HEIGHT_VAR: &str = "--header-h";

static LAST_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+(\S+)\s*$").expect("widow pattern is valid"));

/// Glue the last word to the previous one with a non-breaking space.
/// Trailing whitespace is dropped; single words are left alone.
pub fn prevent_widow(text: &str) -> String {
    LAST_WORD_RE.replace(text, "\u{00A0}$1").into_owned()
}

/// Whether an element whose top edge is at `top` should be revealed.
pub fn should_reveal(top: f64, viewport_height: f64) -> bool {
    top < viewport_height - REVEAL_THRESHOLD_PX
}

/// Value for [`HEADER_HEIGHT_VAR`], rounded up to whole pixels.
pub fn header_height_value(height: f64) -> String {
    format!("{}px", height.max(0.0).ceil() as u32)
}

/// Navigation root that owns the drawer.
pub const NAV_SELECTOR: &str = ".nav[data-nav]";
/// Drawer toggle button, inside the nav.
pub const NAV_TOGGLE_SELECTOR: &str = ".nav__toggle";
/// Link list shown by the drawer, inside the nav.
pub const NAV_LINKS_SELECTOR: &str = ".nav__links";

/// The elements the drawer needs, all present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavParts<E> {
    pub nav: E,
    pub toggle: E,
    pub links: E,
}

impl<E> NavParts<E> {
    /// Look up the toggle and link list inside `nav`.
    ///
    /// `None` when any part is missing; the page then only gets the header
    /// height sync.
    pub fn find(nav: Option<E>, lookup: impl Fn(&E, &str) -> Option<E>) -> Option<Self> {
        let nav = nav?;
        let toggle = lookup(&nav, NAV_TOGGLE_SELECTOR)?;
        let links = lookup(&nav, NAV_LINKS_SELECTOR)?;
        Some(Self { nav, toggle, links })
    }
}

/// Mobile navigation drawer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavDrawer {
    open: bool,
}

impl NavDrawer {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip the drawer. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Close the drawer. Returns `true` if it was open.
    pub fn close(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }

    /// Document click; clicks inside the nav are the nav's own business.
    pub fn on_document_click(&mut self, inside_nav: bool) -> bool {
        !inside_nav && self.close()
    }

    pub fn on_key(&mut self, key: &str) -> bool {
        key == "Escape" && self.close()
    }

    /// `aria-expanded` value for the toggle button.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open { "true" } else { "false" }
    }
}

/// FAQ accordion where exactly one item is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    /// Create an accordion with the first item open.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            open: (len > 0).then_some(0),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Item `index` was clicked. Returns `true` if the open item changed;
    /// clicking the open item keeps it open.
    pub fn click(&mut self, index: usize) -> bool {
        if index >= self.len || self.is_open(index) {
            return false;
        }
        self.open = Some(index);
        true
    }
}
