#![forbid(unsafe_code)]

//! Thin DOM plumbing shared by the behavior bindings.
//!
//! Listener and observer handles are RAII: dropping them detaches the
//! callback from the page. Every DOM write here is best effort; a failed
//! write leaves the page as it was.

use js_sys::{Array, Function, Reflect};
use sitefx_core::ScrollSample;
use tracing::{debug, trace, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, ScrollBehavior,
    ScrollToOptions, Window,
};

/// Window and document handles captured once at mount time.
#[derive(Clone)]
pub(crate) struct Page {
    pub window: Window,
    pub document: Document,
}

impl Page {
    pub fn current() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// `true` once the document has been fully parsed.
    pub fn is_parsed(&self) -> bool {
        self.document.ready_state() != "loading"
    }

    /// `true` once every subresource has finished loading.
    pub fn is_complete(&self) -> bool {
        self.document.ready_state() == "complete"
    }

    pub fn html_element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    pub fn html_element(&self, selector: &str) -> Option<HtmlElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    /// All elements matching `selector`. An invalid selector matches nothing.
    pub fn query_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            debug!(target: "sitefx::dom", selector, "invalid selector");
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|idx| nodes.get(idx))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    pub fn scroll_sample(&self) -> ScrollSample {
        let offset = self.window.scroll_y().unwrap_or(0.0);
        let (scroll_height, client_height) = self
            .document
            .document_element()
            .map(|root| (f64::from(root.scroll_height()), f64::from(root.client_height())))
            .unwrap_or((0.0, 0.0));
        let viewport_width = self
            .window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0);
        ScrollSample {
            offset,
            scroll_height,
            client_height,
            viewport_width,
        }
    }

    pub fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    /// Run `f` after `delay_ms`, or right away when the delay is zero.
    pub fn after_delay(&self, delay_ms: u32, f: impl FnOnce() + 'static) {
        if delay_ms == 0 {
            f();
            return;
        }
        let callback = Closure::once_into_js(f);
        let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        if self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref::<Function>(),
                timeout,
            )
            .is_err()
        {
            debug!(target: "sitefx::dom", delay_ms, "setTimeout rejected");
        }
    }
}

/// Add or remove `class` so its presence matches `on`.
pub(crate) fn set_class(element: &Element, class: &str, on: bool) {
    let _ = element.class_list().toggle_with_force(class, on);
}

pub(crate) fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

/// Whether `HTMLImageElement.prototype` exposes a `loading` property.
pub(crate) fn supports_native_lazy_loading(window: &Window) -> bool {
    let Ok(ctor) = Reflect::get(window, &JsValue::from_str("HTMLImageElement")) else {
        return false;
    };
    let Ok(prototype) = Reflect::get(&ctor, &JsValue::from_str("prototype")) else {
        return false;
    };
    if !prototype.is_object() {
        return false;
    }
    Reflect::has(&prototype, &JsValue::from_str("loading")).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Event listeners
// ---------------------------------------------------------------------------

/// An event listener that is removed when dropped.
pub(crate) struct Listener {
    target: EventTarget,
    event_type: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event_type: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        Self::attach(target, event_type, false, callback)
    }

    /// Listener that never calls `preventDefault`, letting the browser keep
    /// scrolling on the compositor thread.
    pub fn passive(
        target: &EventTarget,
        event_type: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        Self::attach(target, event_type, true, callback)
    }

    fn attach(
        target: &EventTarget,
        event_type: &'static str,
        passive: bool,
        callback: impl FnMut(Event) + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        let options = AddEventListenerOptions::new();
        options.set_passive(passive);
        let attached = target.add_event_listener_with_callback_and_add_event_listener_options(
            event_type,
            callback.as_ref().unchecked_ref(),
            &options,
        );
        if attached.is_err() {
            debug!(target: "sitefx::dom", event_type, "addEventListener rejected");
            return None;
        }
        trace!(target: "sitefx::dom", event_type, passive, "listener attached");
        Some(Self {
            target: target.clone(),
            event_type,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event_type,
            self.callback.as_ref().unchecked_ref(),
        );
    }
}

// ---------------------------------------------------------------------------
// Visibility observers
// ---------------------------------------------------------------------------

/// An `IntersectionObserver` that disconnects when dropped.
pub(crate) struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Observer {
    /// Observe with a single visibility `threshold`. The callback receives
    /// each entry together with the observer, so it can stop watching a
    /// target.
    pub fn new(
        threshold: f64,
        root_margin: Option<&str>,
        mut on_entry: impl FnMut(IntersectionObserverEntry, &IntersectionObserver) + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        on_entry(entry, &observer);
                    }
                }
            },
        );
        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            init.set_root_margin(margin);
        }
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|err| {
                    warn!(
                        target: "sitefx::dom",
                        ?err,
                        threshold,
                        root_margin,
                        "IntersectionObserver construction failed"
                    );
                })
                .ok()?;
        Some(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn handle(&self) -> IntersectionObserver {
        self.observer.clone()
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Observe every element matching `selector` once the document is parsed.
///
/// Returns the pending `DOMContentLoaded` listener when the document is
/// still loading.
pub(crate) fn observe_when_parsed(
    page: &Page,
    observer: IntersectionObserver,
    selector: String,
    behavior: &'static str,
) -> Option<Listener> {
    let observe_all = {
        let page = page.clone();
        move || {
            let elements = page.query_all(&selector);
            for element in &elements {
                observer.observe(element);
            }
            debug!(
                target: "sitefx::dom",
                behavior,
                count = elements.len(),
                "observing elements"
            );
        }
    };
    if page.is_parsed() {
        observe_all();
        return None;
    }
    let mut pending = Some(observe_all);
    Listener::new(page.document.as_ref(), "DOMContentLoaded", move |_| {
        if let Some(observe_all) = pending.take() {
            observe_all();
        }
    })
}
