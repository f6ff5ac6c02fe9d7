#![forbid(unsafe_code)]

//! `sitefx-core` holds the decision logic behind the sitefx page behaviors.
//!
//! Design goals:
//! - **Host-driven**: the embedding environment (the wasm bindings in
//!   `sitefx-web`) reads scroll offsets, visibility changes and clicks from the
//!   browser and feeds them in as plain values.
//! - **Deterministic**: nothing here reads a clock or touches the DOM; timers
//!   are expressed as tick counts and delays the host schedules.
//! - **Independent behaviors**: each behavior owns only the thresholds it
//!   needs. No state is shared between them.
//!
//! The crate does not bind to `wasm-bindgen`, so every behavior is testable
//! natively.

pub mod anchor;
pub mod banner;
pub mod config;
pub mod counter;
pub mod menu;
pub mod reveal;
pub mod scroll;

pub use anchor::{AnchorAction, AnchorHref, plan_anchor_scroll};
pub use banner::{Banner, BannerLine};
pub use config::{ConfigError, SiteFxConfig};
pub use counter::{CounterFrame, CounterTween, parse_count_target};
pub use menu::{MenuToggle, MenuTransition};
pub use reveal::{RevealDecision, RevealWatch, parse_delay_ms};
pub use scroll::{BackToTop, HeaderStyle, Parallax, ParallaxFrame, ProgressBar, ScrollSample};

/// Format a CSS pixel/percent quantity the way the browser would print a
/// plain number: integral values carry no fractional part.
pub(crate) fn css_number(value: f64) -> String {
    if value == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::css_number;

    #[test]
    fn css_number_drops_trailing_zero_fraction() {
        assert_eq!(css_number(150.0), "150");
        assert_eq!(css_number(-0.0), "0");
        assert_eq!(css_number(12.5), "12.5");
    }
}
