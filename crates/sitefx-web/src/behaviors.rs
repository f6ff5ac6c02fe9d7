#![forbid(unsafe_code)]

//! One binding per page behavior.
//!
//! Each binding owns the DOM references, thresholds and listener handles it
//! needs and nothing else. `bind` returns `None` when the markup the behavior
//! relies on is absent, in which case the behavior is simply not active.

use std::cell::Cell;
use std::rc::Rc;

use sitefx_core::config::{
    AnchorConfig, BackToTopConfig, CounterConfig, HeaderConfig, LazyImageConfig, LoadedConfig,
    MenuConfig, ParallaxConfig, ProgressConfig, RevealConfig,
};
use sitefx_core::{
    AnchorAction, BackToTop, Banner, CounterTween, HeaderStyle, MenuToggle, MenuTransition,
    Parallax, ProgressBar, RevealDecision, RevealWatch, parse_count_target, plan_anchor_scroll,
};
use tracing::{debug, trace};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlImageElement, Node};

use crate::dom::{
    Listener, Observer, Page, observe_when_parsed, set_class, set_style,
    supports_native_lazy_loading,
};

/// A bound behavior. Dropping it detaches every listener it owns.
pub(crate) trait Behavior {
    fn name(&self) -> &'static str;
}

fn skipped(behavior: &'static str, reason: &'static str) {
    debug!(target: "sitefx::bind", behavior, reason, "behavior not bound");
}

// ---------------------------------------------------------------------------
// Reveal on visibility
// ---------------------------------------------------------------------------

pub(crate) struct Reveal {
    _observer: Observer,
    _ready: Option<Listener>,
}

impl Reveal {
    pub fn bind(page: &Page, config: &RevealConfig) -> Option<Self> {
        let watch = RevealWatch::new(config);
        let threshold = watch.threshold();
        let root_margin = watch.root_margin().to_string();
        let delay_attribute = config.delay_attribute.clone();
        let animated_class = config.animated_class.clone();
        let timer_page = page.clone();
        let observer = Observer::new(
            threshold,
            Some(root_margin.as_str()),
            move |entry, observer| {
                let element = entry.target();
                let delay = element.get_attribute(&delay_attribute);
                let RevealDecision::Schedule { delay_ms } =
                    watch.on_visibility(entry.is_intersecting(), delay.as_deref())
                else {
                    return;
                };
                observer.unobserve(&element);
                let class = animated_class.clone();
                timer_page.after_delay(delay_ms, move || set_class(&element, &class, true));
            },
        );
        let Some(observer) = observer else {
            skipped("reveal", "IntersectionObserver construction failed");
            return None;
        };
        let ready =
            observe_when_parsed(page, observer.handle(), config.selector.clone(), "reveal");
        Some(Self {
            _observer: observer,
            _ready: ready,
        })
    }
}

impl Behavior for Reveal {
    fn name(&self) -> &'static str {
        "reveal"
    }
}

// ---------------------------------------------------------------------------
// Mobile menu
// ---------------------------------------------------------------------------

pub(crate) struct MobileMenu {
    _button_click: Listener,
    _outside_click: Listener,
    _link_clicks: Vec<Listener>,
}

impl MobileMenu {
    pub fn bind(page: &Page, config: &MenuConfig) -> Option<Self> {
        let (Some(button), Some(menu)) = (
            page.document.get_element_by_id(&config.button_id),
            page.document.get_element_by_id(&config.menu_id),
        ) else {
            skipped("mobile_menu", "button or menu missing");
            return None;
        };
        let state = Rc::new(Cell::new(MenuToggle::new()));
        let apply = {
            let button = button.clone();
            let menu = menu.clone();
            let class = config.active_class.clone();
            Rc::new(move |transition: MenuTransition| {
                if transition.changed {
                    set_class(&button, &class, transition.open);
                    set_class(&menu, &class, transition.open);
                }
            })
        };

        let button_click = {
            let state = Rc::clone(&state);
            let apply = Rc::clone(&apply);
            Listener::new(button.as_ref(), "click", move |event: Event| {
                let mut toggle = state.get();
                let transition = toggle.on_button_click();
                state.set(toggle);
                if transition.stop_propagation {
                    event.stop_propagation();
                }
                apply(transition);
            })?
        };

        let outside_click = {
            let state = Rc::clone(&state);
            let apply = Rc::clone(&apply);
            let button = button.clone();
            let menu = menu.clone();
            Listener::new(page.document.as_ref(), "click", move |event: Event| {
                let target = event.target();
                let inside_menu = target
                    .as_ref()
                    .and_then(|t| t.dyn_ref::<Node>())
                    .is_some_and(|node| menu.contains(Some(node)));
                let on_button = target.as_ref().is_some_and(|t| {
                    let t: &JsValue = t.as_ref();
                    let b: &JsValue = button.as_ref();
                    t == b
                });
                let mut toggle = state.get();
                let transition = toggle.on_document_click(inside_menu, on_button);
                state.set(toggle);
                apply(transition);
            })?
        };

        let link_clicks = page
            .query_all(&config.link_selector)
            .iter()
            .filter_map(|link| {
                let state = Rc::clone(&state);
                let apply = Rc::clone(&apply);
                Listener::new(link.as_ref(), "click", move |_| {
                    let mut toggle = state.get();
                    let transition = toggle.on_link_click();
                    state.set(toggle);
                    apply(transition);
                })
            })
            .collect::<Vec<_>>();
        trace!(
            target: "sitefx::menu",
            links = link_clicks.len(),
            "mobile menu bound"
        );

        Some(Self {
            _button_click: button_click,
            _outside_click: outside_click,
            _link_clicks: link_clicks,
        })
    }
}

impl Behavior for MobileMenu {
    fn name(&self) -> &'static str {
        "mobile_menu"
    }
}

// ---------------------------------------------------------------------------
// Header scroll style
// ---------------------------------------------------------------------------

pub(crate) struct HeaderScroll {
    _scroll: Listener,
}

impl HeaderScroll {
    pub fn bind(page: &Page, config: &HeaderConfig) -> Option<Self> {
        let Some(navbar) = page.document.get_element_by_id(&config.navbar_id) else {
            skipped("header", "navbar missing");
            return None;
        };
        let header = HeaderStyle::new(config);
        let class = config.scrolled_class.clone();
        let window = page.window.clone();
        let scroll = Listener::passive(page.window.as_ref(), "scroll", move |_| {
            let offset = window.scroll_y().unwrap_or(0.0);
            set_class(&navbar, &class, header.is_scrolled(offset));
        })?;
        Some(Self { _scroll: scroll })
    }
}

impl Behavior for HeaderScroll {
    fn name(&self) -> &'static str {
        "header"
    }
}

// ---------------------------------------------------------------------------
// Reading progress
// ---------------------------------------------------------------------------

pub(crate) struct ReadingProgress {
    _scroll: Listener,
}

impl ReadingProgress {
    pub fn bind(page: &Page, config: &ProgressConfig) -> Option<Self> {
        let Some(bar) = page.html_element_by_id(&config.bar_id) else {
            skipped("progress", "progress bar missing");
            return None;
        };
        let sample_page = page.clone();
        let scroll = Listener::passive(page.window.as_ref(), "scroll", move |_| {
            if let Some(width) = ProgressBar.width_css(&sample_page.scroll_sample()) {
                set_style(&bar, "width", &width);
            }
        })?;
        Some(Self { _scroll: scroll })
    }
}

impl Behavior for ReadingProgress {
    fn name(&self) -> &'static str {
        "progress"
    }
}

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// Drive `tween` on a repeating timer, writing each frame into `element`.
fn run_counter(page: &Page, element: Element, mut tween: CounterTween) {
    let tick_ms = tween.tick_ms();
    let interval = Rc::new(Cell::new(None::<i32>));
    let tick = {
        let interval = Rc::clone(&interval);
        let window = page.window.clone();
        Closure::<dyn FnMut()>::new(move || {
            let frame = tween.tick();
            element.set_text_content(Some(&frame.value.to_string()));
            if frame.done {
                if let Some(handle) = interval.take() {
                    window.clear_interval_with_handle(handle);
                }
            }
        })
        .into_js_value()
    };
    let timeout = i32::try_from(tick_ms).unwrap_or(i32::MAX);
    match page
        .window
        .set_interval_with_callback_and_timeout_and_arguments_0(tick.unchecked_ref(), timeout)
    {
        Ok(handle) => interval.set(Some(handle)),
        Err(err) => debug!(target: "sitefx::counter", ?err, "setInterval rejected"),
    }
}

pub(crate) struct Counters {
    _observer: Observer,
    _ready: Option<Listener>,
}

impl Counters {
    pub fn bind(page: &Page, config: &CounterConfig) -> Option<Self> {
        let counter_config = config.clone();
        let timer_page = page.clone();
        let observer = Observer::new(config.threshold, None, move |entry, observer| {
            if !entry.is_intersecting() {
                return;
            }
            let element = entry.target();
            observer.unobserve(&element);
            let raw = element
                .get_attribute(&counter_config.target_attribute)
                .unwrap_or_default();
            let Some(target) = parse_count_target(&raw) else {
                debug!(
                    target: "sitefx::counter",
                    raw = raw.as_str(),
                    "counter target is not a number"
                );
                return;
            };
            run_counter(
                &timer_page,
                element,
                CounterTween::from_config(target, &counter_config),
            );
        });
        let Some(observer) = observer else {
            skipped("counters", "IntersectionObserver construction failed");
            return None;
        };
        let ready =
            observe_when_parsed(page, observer.handle(), config.selector.clone(), "counters");
        Some(Self {
            _observer: observer,
            _ready: ready,
        })
    }
}

impl Behavior for Counters {
    fn name(&self) -> &'static str {
        "counters"
    }
}

// ---------------------------------------------------------------------------
// Smooth anchor scroll
// ---------------------------------------------------------------------------

pub(crate) struct SmoothAnchors {
    _clicks: Vec<Listener>,
}

impl SmoothAnchors {
    pub fn bind(page: &Page, config: &AnchorConfig, header: &HeaderConfig) -> Option<Self> {
        let anchors = page.query_all(&config.selector);
        if anchors.is_empty() {
            skipped("anchors", "no same-page links");
            return None;
        }
        let clicks = anchors
            .iter()
            .filter_map(|anchor| {
                let page = page.clone();
                let anchor_el = anchor.clone();
                let navbar_id = header.navbar_id.clone();
                Listener::new(anchor.as_ref(), "click", move |event: Event| {
                    let Some(href) = anchor_el.get_attribute("href") else {
                        return;
                    };
                    // An invalid selector counts as no match.
                    let target_top = page
                        .html_element(&href)
                        .map(|target| f64::from(target.offset_top()));
                    let header_height = page
                        .html_element_by_id(&navbar_id)
                        .map(|navbar| f64::from(navbar.offset_height()));
                    match plan_anchor_scroll(&href, target_top, header_height) {
                        AnchorAction::ScrollTo { top } => {
                            event.prevent_default();
                            trace!(
                                target: "sitefx::anchor",
                                href = href.as_str(),
                                top,
                                "smooth scroll"
                            );
                            page.smooth_scroll_to(top);
                        }
                        AnchorAction::PassThrough => {}
                    }
                })
            })
            .collect();
        Some(Self { _clicks: clicks })
    }
}

impl Behavior for SmoothAnchors {
    fn name(&self) -> &'static str {
        "anchors"
    }
}

// ---------------------------------------------------------------------------
// Back to top
// ---------------------------------------------------------------------------

pub(crate) struct BackToTopControl {
    _scroll: Listener,
    _click: Listener,
}

impl BackToTopControl {
    pub fn bind(page: &Page, config: &BackToTopConfig) -> Option<Self> {
        let Some(button) = page.document.get_element_by_id(&config.button_id) else {
            skipped("back_to_top", "button missing");
            return None;
        };
        let control = BackToTop::new(config);
        let scroll = {
            let button = button.clone();
            let class = config.visible_class.clone();
            let window = page.window.clone();
            Listener::passive(page.window.as_ref(), "scroll", move |_| {
                let offset = window.scroll_y().unwrap_or(0.0);
                set_class(&button, &class, control.is_visible(offset));
            })?
        };
        let click = {
            let page = page.clone();
            Listener::new(button.as_ref(), "click", move |_| {
                page.smooth_scroll_to(control.destination());
            })?
        };
        Some(Self {
            _scroll: scroll,
            _click: click,
        })
    }
}

impl Behavior for BackToTopControl {
    fn name(&self) -> &'static str {
        "back_to_top"
    }
}

// ---------------------------------------------------------------------------
// Parallax
// ---------------------------------------------------------------------------

pub(crate) struct HeroParallax {
    _scroll: Listener,
}

impl HeroParallax {
    /// The hero layers are looked up on every scroll event, so markup
    /// inserted after mount still moves.
    pub fn bind(page: &Page, config: &ParallaxConfig) -> Option<Self> {
        let parallax = Parallax::new(config);
        let content_selector = config.content_selector.clone();
        let background_selector = config.background_selector.clone();
        let sample_page = page.clone();
        let scroll = Listener::passive(page.window.as_ref(), "scroll", move |_| {
            let sample = sample_page.scroll_sample();
            let Some(frame) = parallax.frame(sample.offset, sample.viewport_width) else {
                return;
            };
            if let Some(content) = sample_page.html_element(&content_selector) {
                set_style(&content, "transform", &frame.content_transform());
                set_style(&content, "opacity", &frame.content_opacity_css());
            }
            if let Some(background) = sample_page.html_element(&background_selector) {
                set_style(&background, "transform", &frame.background_transform());
            }
        })?;
        Some(Self { _scroll: scroll })
    }
}

impl Behavior for HeroParallax {
    fn name(&self) -> &'static str {
        "parallax"
    }
}

// ---------------------------------------------------------------------------
// One-shot startup behaviors
// ---------------------------------------------------------------------------

/// Reassign each lazy image's `src` to itself when the browser supports
/// native lazy loading. Returns the number of images touched.
pub(crate) fn activate_lazy_images(page: &Page, config: &LazyImageConfig) -> usize {
    if !supports_native_lazy_loading(&page.window) {
        skipped("lazy_images", "native lazy loading unsupported");
        return 0;
    }
    let images: Vec<HtmlImageElement> = page
        .query_all(&config.selector)
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlImageElement>().ok())
        .collect();
    for img in &images {
        img.set_src(&img.src());
    }
    images.len()
}

pub(crate) struct LoadMarker {
    _load: Option<Listener>,
}

impl LoadMarker {
    pub fn bind(page: &Page, config: &LoadedConfig) -> Option<Self> {
        let mark = {
            let page = page.clone();
            let class = config.class.clone();
            move || {
                if let Some(body) = page.document.body() {
                    set_class(&body, &class, true);
                }
            }
        };
        if page.is_complete() {
            mark();
            return Some(Self { _load: None });
        }
        let load = Listener::new(page.window.as_ref(), "load", move |_| mark())?;
        Some(Self { _load: Some(load) })
    }
}

impl Behavior for LoadMarker {
    fn name(&self) -> &'static str {
        "loaded"
    }
}

pub(crate) fn print_banner(banner: &Banner) {
    for line in banner.lines() {
        web_sys::console::log_2(
            &JsValue::from_str(&line.format),
            &JsValue::from_str(&line.css),
        );
    }
}
