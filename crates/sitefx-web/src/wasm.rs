#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for sitefx.
//!
//! Only compiled on `wasm32` targets.

use std::cell::RefCell;

use js_sys::Array;
use sitefx_core::{Banner, SiteFxConfig};
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::behaviors::{
    BackToTopControl, Behavior, Counters, HeaderScroll, HeroParallax, LoadMarker, MobileMenu,
    ReadingProgress, Reveal, SmoothAnchors, activate_lazy_images, print_banner,
};
use crate::dom::Page;

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            web_sys::console::error_1(&JsValue::from_str(&msg));
        }));
    });
}

fn js_error(msg: &str) -> JsValue {
    js_sys::Error::new(msg).into()
}

/// Handle to the behaviors bound on the current page.
///
/// Listeners stay attached while the handle is alive. `dispose()` (or
/// dropping the handle from JS with `free()`) detaches them; reveal delays
/// and counters already running finish on their own. A handle that JS lets
/// go of is eventually collected, detaching everything, so callers that do
/// not manage the lifetime themselves should use [`mount`] instead.
#[wasm_bindgen]
pub struct SiteFx {
    behaviors: Vec<Box<dyn Behavior>>,
    lazy_images: usize,
}

#[wasm_bindgen]
impl SiteFx {
    /// Bind every behavior to the current page.
    ///
    /// `config_json` optionally overrides the default markup contract.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<SiteFx, JsValue> {
        install_panic_hook();
        let config = match config_json.as_deref() {
            Some(raw) => SiteFxConfig::from_json(raw).map_err(|err| {
                warn!(target: "sitefx::mount", %err, "rejected sitefx config");
                js_error(&err.to_string())
            })?,
            None => SiteFxConfig::default(),
        };
        let page =
            Page::current().ok_or_else(|| js_error("sitefx requires a window and document"))?;
        Ok(Self::bind_all(&page, &config))
    }

    /// Names of the behaviors currently bound.
    #[wasm_bindgen(js_name = activeBehaviors)]
    pub fn active_behaviors(&self) -> Array {
        let arr = Array::new_with_length(self.behaviors.len() as u32);
        for (idx, behavior) in self.behaviors.iter().enumerate() {
            arr.set(idx as u32, JsValue::from_str(behavior.name()));
        }
        arr
    }

    /// Number of lazy images re-armed at mount.
    #[wasm_bindgen(js_name = lazyImageCount)]
    pub fn lazy_image_count(&self) -> u32 {
        u32::try_from(self.lazy_images).unwrap_or(u32::MAX)
    }

    /// Detach every listener and observer.
    pub fn dispose(&mut self) {
        let count = self.behaviors.len();
        self.behaviors.clear();
        debug!(target: "sitefx::mount", behaviors = count, "sitefx disposed");
    }
}

impl SiteFx {
    fn bind_all(page: &Page, config: &SiteFxConfig) -> Self {
        print_banner(&Banner::new(&config.banner));

        let mut behaviors: Vec<Box<dyn Behavior>> = Vec::new();
        fn push<B: Behavior + 'static>(behaviors: &mut Vec<Box<dyn Behavior>>, bound: Option<B>) {
            if let Some(behavior) = bound {
                behaviors.push(Box::new(behavior));
            }
        }
        push(&mut behaviors, Reveal::bind(page, &config.reveal));
        push(&mut behaviors, MobileMenu::bind(page, &config.menu));
        push(&mut behaviors, HeaderScroll::bind(page, &config.header));
        push(&mut behaviors, ReadingProgress::bind(page, &config.progress));
        push(&mut behaviors, Counters::bind(page, &config.counter));
        push(
            &mut behaviors,
            SmoothAnchors::bind(page, &config.anchor, &config.header),
        );
        push(&mut behaviors, BackToTopControl::bind(page, &config.back_to_top));
        push(&mut behaviors, HeroParallax::bind(page, &config.parallax));
        push(&mut behaviors, LoadMarker::bind(page, &config.loaded));
        let lazy_images = activate_lazy_images(page, &config.lazy_images);

        debug!(
            target: "sitefx::mount",
            behaviors = behaviors.len(),
            lazy_images,
            "sitefx mounted"
        );
        Self {
            behaviors,
            lazy_images,
        }
    }
}

thread_local! {
    /// Behaviors bound through [`mount`]. Held here so they outlive any JS
    /// reference to a handle.
    static MOUNTED: RefCell<Option<SiteFx>> = const { RefCell::new(None) };
}

/// Bind every behavior to the current page and keep them bound for the
/// lifetime of the module. Mounting again replaces (and disposes) the
/// previous set.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<(), JsValue> {
    let fx = SiteFx::new(config_json)?;
    let previous = MOUNTED.with(|slot| slot.borrow_mut().replace(fx));
    if let Some(mut previous) = previous {
        previous.dispose();
    }
    Ok(())
}

/// Detach everything bound by [`mount`]. Returns whether anything was
/// mounted.
#[wasm_bindgen]
pub fn unmount() -> bool {
    let previous = MOUNTED.with(|slot| slot.borrow_mut().take());
    match previous {
        Some(mut fx) => {
            fx.dispose();
            true
        }
        None => false,
    }
}

/// Names of the behaviors bound by [`mount`]; empty when nothing is mounted.
#[wasm_bindgen(js_name = mountedBehaviors)]
pub fn mounted_behaviors() -> Array {
    MOUNTED.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or_else(Array::new, SiteFx::active_behaviors)
    })
}
