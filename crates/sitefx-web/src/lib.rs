#![forbid(unsafe_code)]

//! Browser bindings for sitefx.
//!
//! [`SiteFx`] attaches the page behaviors from `sitefx-core` to the live
//! document: reveal-on-visibility, the mobile menu, header and progress
//! updates on scroll, counters, smooth anchor scrolling, the back-to-top
//! control, lazy images, hero parallax, the load marker and the console
//! banner.
//!
//! ```js
//! import init, { mount } from "./pkg/sitefx_web.js";
//! await init();
//! mount(null); // or mount(JSON.stringify({ header: { threshold_px: 80 } }))
//! ```
//!
//! [`mount`] keeps the behaviors alive until [`unmount`] is called.
//! `new SiteFx(config)` returns an explicit handle instead; it stays bound
//! only while JS holds it.
//!
//! Everything here is `wasm32`-only; on other targets the crate is empty and
//! the behavior logic is exercised through `sitefx-core`'s native tests.

#[cfg(target_arch = "wasm32")]
mod behaviors;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{SiteFx, mount, mounted_behaviors, unmount};
