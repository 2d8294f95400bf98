//! DOM side of the hero carousel.
//!
//! [`DomTrack`] exposes a `[data-track]` element as a [`TrackSurface`];
//! [`CarouselController`] turns browser events and timers into calls on
//! the core [`Carousel`] and its autoplay and arming state.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_render::{AnimationFrame, request_animation_frame};
use gloo_timers::callback::{Interval, Timeout};
use js_sys::Reflect;
use lexie_core::carousel::{
    ArmToken, ArmingState, AutoplayState, Carousel, LoopPlan, ScrollBehavior, ScrollDecision,
    Span, TrackSurface, parse_interval,
};
use lexie_core::constants::{ARM_DWELL, ARM_SETTLE, USER_HOLD};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Event, HtmlElement, HtmlImageElement, ScrollToOptions};
use web_time::Instant;

use crate::context::SiteContext;
use crate::dom::{self, js_error_text, millis, timeout, weak_callback, weak_handler};

const SLIDE_SELECTOR: &str = ".slide";
const ARMED_CLASS: &str = "is-armed";

fn is_flagged(el: &Element, attr: &str) -> bool {
    el.get_attribute(attr).as_deref() == Some("1")
}

/// A `[data-track]` element measured through the DOM.
pub struct DomTrack {
    track: HtmlElement,
}

impl DomTrack {
    pub fn new(track: HtmlElement) -> Self {
        Self { track }
    }

    /// Every slide in DOM order, clones included.
    pub fn slides(&self) -> Vec<HtmlElement> {
        dom::qsa(&self.track, SLIDE_SELECTOR)
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect()
    }
}

impl TrackSurface for DomTrack {
    fn track_span(&self) -> Span {
        let rect = self.track.get_bounding_client_rect();
        Span::new(rect.left(), rect.width())
    }

    fn slide_spans(&self) -> Vec<Span> {
        self.slides()
            .iter()
            .map(|slide| {
                let rect = slide.get_bounding_client_rect();
                Span::new(rect.left(), rect.width())
            })
            .collect()
    }

    fn slide_offsets(&self) -> Vec<f64> {
        self.slides()
            .iter()
            .map(|slide| f64::from(slide.offset_left()))
            .collect()
    }

    fn scroll_left(&self) -> f64 {
        Reflect::get(&self.track, &JsValue::from_str("scrollLeft"))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0)
    }

    fn set_scroll_left(&self, value: f64) {
        if let Err(e) = Reflect::set(
            &self.track,
            &JsValue::from_str("scrollLeft"),
            &JsValue::from_f64(value),
        ) {
            log::debug!("Failed to set scrollLeft: {}", js_error_text(&e));
        }
    }

    fn scroll_by(&self, delta: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_left(delta);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Auto,
        });
        self.track.scroll_by_with_scroll_to_options(&options);
    }
}

/// Pad the track with clones so it can wrap around.
///
/// Already padded tracks report their plan without cloning again.
fn pad_for_loop(track: &HtmlElement) -> Option<LoopPlan> {
    let slides = dom::qsa(track, SLIDE_SELECTOR);
    if is_flagged(track, "data-loop-init") {
        let originals = slides.iter().filter(|s| !is_flagged(s, "data-clone")).count();
        return LoopPlan::new(originals);
    }

    let plan = LoopPlan::new(slides.len())?;
    let clone_of = |index: usize| -> Option<Element> {
        let node = slides[index].clone_node_with_deep(true).ok()?;
        let clone = node.dyn_into::<Element>().ok()?;
        dom::set_attr(&clone, "data-clone", "1");
        dom::set_attr(&clone, "aria-hidden", "true");
        Some(clone)
    };

    for index in plan.tail_sources().rev() {
        if let Some(clone) = clone_of(index) {
            if let Err(e) = track.prepend_with_node_1(&clone) {
                log::warn!("Failed to prepend loop clone: {}", js_error_text(&e));
            }
        }
    }
    for index in plan.head_sources() {
        if let Some(clone) = clone_of(index) {
            if let Err(e) = track.append_child(&clone) {
                log::warn!("Failed to append loop clone: {}", js_error_text(&e));
            }
        }
    }

    dom::set_attr(track, "data-loop-init", "1");
    log::debug!(
        "Carousel padded with {} clone(s) per end around {} slide(s)",
        plan.clones(),
        plan.originals()
    );
    Some(plan)
}

pub struct CarouselController {
    root: Element,
    track: HtmlElement,
    ctx: Rc<SiteContext>,
    behavior: ScrollBehavior,
    carousel: RefCell<Carousel<DomTrack>>,
    autoplay: RefCell<AutoplayState>,
    arming: RefCell<ArmingState>,
    ticker: RefCell<Option<Interval>>,
    hold_timer: RefCell<Option<Timeout>>,
    loop_timer: RefCell<Option<Timeout>>,
    settle_timer: RefCell<Option<Timeout>>,
    dwell_timer: RefCell<Option<Timeout>>,
    frame: RefCell<Option<AnimationFrame>>,
    listeners: RefCell<Vec<EventListener>>,
}

impl CarouselController {
    /// Wire every `[data-carousel]` on the page.
    pub fn attach_all(ctx: &Rc<SiteContext>) -> Vec<Rc<Self>> {
        dom::doc_qsa("[data-carousel]")
            .into_iter()
            .filter_map(|root| Self::attach(root, ctx))
            .collect()
    }

    /// Wire one carousel. Returns `None` when it has no track or was
    /// already wired.
    pub fn attach(root: Element, ctx: &Rc<SiteContext>) -> Option<Rc<Self>> {
        let track: HtmlElement = dom::qs_as(&root, "[data-track]")?;
        if is_flagged(&track, "data-carousel-init") {
            return None;
        }
        dom::set_attr(&track, "data-carousel-init", "1");

        let plan = pad_for_loop(&track);
        let behavior = ScrollBehavior::for_preferences(
            dom::media_matches("(prefers-reduced-motion: reduce)"),
            dom::media_matches("(pointer: coarse)"),
        );
        let interval = parse_interval(
            root.get_attribute("data-autoplay").as_deref(),
            ctx.config().autoplay_default(),
        );

        let controller = Rc::new(Self {
            carousel: RefCell::new(Carousel::with_loop(DomTrack::new(track.clone()), plan)),
            root,
            track,
            ctx: Rc::clone(ctx),
            behavior,
            autoplay: RefCell::new(AutoplayState::new(interval)),
            arming: RefCell::new(ArmingState::new()),
            ticker: RefCell::new(None),
            hold_timer: RefCell::new(None),
            loop_timer: RefCell::new(None),
            settle_timer: RefCell::new(None),
            dwell_timer: RefCell::new(None),
            frame: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
        });
        controller.bind();
        if plan.is_some() {
            controller.settle_layout();
        }
        controller.begin_arming();
        controller.start();
        log::debug!("Carousel attached (autoplay: {interval:?})");
        Some(controller)
    }

    fn bind(self: &Rc<Self>) {
        let prevent = EventListenerOptions::enable_prevent_default();
        let mut listeners = Vec::new();

        for name in ["contextmenu", "dragstart"] {
            listeners.push(EventListener::new_with_options(
                &self.track,
                name,
                prevent,
                |event: &Event| {
                    if dom::event_element(event).is_some_and(|el| el.tag_name() == "IMG") {
                        event.prevent_default();
                    }
                },
            ));
        }

        listeners.push(EventListener::new(
            &self.track,
            "scroll",
            weak_handler(self, |this, _| this.on_scroll()),
        ));

        let pause_inputs: [(&str, fn(&mut AutoplayState)); 4] = [
            ("mouseenter", |a| a.set_hovered(true)),
            ("mouseleave", |a| a.set_hovered(false)),
            ("focusin", |a| a.set_focused(true)),
            ("focusout", |a| a.set_focused(false)),
        ];
        for (name, apply) in pause_inputs {
            listeners.push(EventListener::new(
                &self.root,
                name,
                weak_handler(self, move |this, _| apply(&mut this.autoplay.borrow_mut())),
            ));
        }

        for name in ["pointerdown", "touchstart", "wheel"] {
            listeners.push(EventListener::new(
                &self.track,
                name,
                weak_handler(self, |this, _| this.hold_for_user()),
            ));
        }

        listeners.push(EventListener::new(
            &self.track,
            "click",
            weak_handler(self, |this, event| this.on_click(event)),
        ));

        *self.listeners.borrow_mut() = listeners;
    }

    /// After two frames of layout, jump to the first real slide and center.
    fn settle_layout(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let first = request_animation_frame(move |_| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            let weak = Rc::downgrade(&this);
            let second = request_animation_frame(move |_| {
                if let Some(this) = weak.upgrade() {
                    let mut carousel = this.carousel.borrow_mut();
                    carousel.jump_to_first_real();
                    let idx = carousel.centered_index();
                    carousel.center_to_index(idx, ScrollBehavior::Instant, Instant::now());
                }
            });
            *this.frame.borrow_mut() = Some(second);
        });
        *self.frame.borrow_mut() = Some(first);
    }

    /// (Re)start autoplay. The previous ticker is always dropped first.
    pub fn start(self: &Rc<Self>) {
        self.stop();
        let Some(interval) = self.autoplay.borrow().interval() else {
            return;
        };
        let weak = Rc::downgrade(self);
        let ticker = Interval::new(millis(interval), move || {
            if let Some(this) = weak.upgrade() {
                this.tick();
            }
        });
        *self.ticker.borrow_mut() = Some(ticker);
    }

    pub fn stop(&self) {
        self.ticker.borrow_mut().take();
    }

    fn tick(&self) {
        if !self.autoplay.borrow().should_advance() {
            return;
        }
        let now = Instant::now();
        let mut carousel = self.carousel.borrow_mut();
        carousel.normalize_now(now);
        carousel.advance(self.behavior, now);
    }

    fn hold_for_user(self: &Rc<Self>) {
        let token = self.autoplay.borrow_mut().hold_for_user();
        let release = weak_callback(self, move |this| {
            this.autoplay.borrow_mut().release_hold(token);
        });
        *self.hold_timer.borrow_mut() = Some(timeout(USER_HOLD, release));
    }

    fn on_scroll(self: &Rc<Self>) {
        self.restart_arming();

        let decision = self.carousel.borrow_mut().on_scroll(Instant::now());
        if let ScrollDecision::Debounce(delay) = decision {
            let settle = weak_callback(self, |this| this.normalize_loop());
            *self.loop_timer.borrow_mut() = Some(timeout(delay, settle));
        }
    }

    fn normalize_loop(self: &Rc<Self>) {
        let teleport = self.carousel.borrow_mut().settle(Instant::now());
        if teleport.is_none() {
            return;
        }
        let weak = Rc::downgrade(self);
        let release = request_animation_frame(move |_| {
            if let Some(this) = weak.upgrade() {
                this.carousel.borrow_mut().release_lock();
            }
        });
        *self.frame.borrow_mut() = Some(release);
    }

    fn restart_arming(self: &Rc<Self>) {
        let (_, token) = self.arming.borrow_mut().on_scroll();
        self.dwell_timer.borrow_mut().take();
        for slide in dom::qsa(&self.track, ".is-armed") {
            dom::set_class(&slide, ARMED_CLASS, false);
        }
        self.schedule_settle(token);
    }

    /// Arm the slide the track opens on, which may never scroll.
    fn begin_arming(self: &Rc<Self>) {
        let token = self.arming.borrow_mut().start();
        self.schedule_settle(token);
    }

    fn schedule_settle(self: &Rc<Self>, token: ArmToken) {
        let settled = weak_callback(self, move |this| this.on_settled(token));
        *self.settle_timer.borrow_mut() = Some(timeout(ARM_SETTLE, settled));
    }

    fn on_settled(self: &Rc<Self>, token: ArmToken) {
        let Some(dwell) = self.arming.borrow_mut().on_settled(token) else {
            return;
        };
        let arm = weak_callback(self, move |this| this.arm_centered(dwell));
        *self.dwell_timer.borrow_mut() = Some(timeout(ARM_DWELL, arm));
    }

    fn arm_centered(&self, token: ArmToken) {
        let (centered, slides) = {
            let carousel = self.carousel.borrow();
            (carousel.centered_index(), carousel.surface().slides())
        };
        let promotional = slides
            .get(centered)
            .is_some_and(|slide| is_flagged(slide, "data-free"));

        let armed = self
            .arming
            .borrow_mut()
            .on_dwell(token, centered, promotional);
        if let Some(slide) = armed.and_then(|idx| slides.get(idx)) {
            dom::set_class(slide, ARMED_CLASS, true);
            log::debug!("Armed slide {centered}");
        }
    }

    fn on_click(&self, event: &Event) {
        let Some(target) = dom::event_element(event) else {
            return;
        };
        let Some(slide) = target
            .closest(".slide__cta")
            .ok()
            .flatten()
            .and_then(|cta| cta.closest(SLIDE_SELECTOR).ok().flatten())
        else {
            return;
        };
        if !is_flagged(&slide, "data-free") {
            return;
        }
        let Some(image) = dom::qs_as::<HtmlImageElement>(&slide, "img") else {
            return;
        };

        if let Some(modal) = self.ctx.free_pattern_modal() {
            modal.open(&image.src(), &image.alt());
        }
    }
}
