#![forbid(unsafe_code)]

//! Scroll-driven behaviors: header style, reading progress, back-to-top
//! visibility and hero parallax.
//!
//! The host samples the window once per scroll event into a [`ScrollSample`]
//! and hands it to whichever behaviors are bound. Each behavior is evaluated
//! only from the latest sample, so the resulting state never depends on the
//! scroll history.

use crate::config::{BackToTopConfig, HeaderConfig, ParallaxConfig};
use crate::css_number;

// ---------------------------------------------------------------------------
// Sample
// ---------------------------------------------------------------------------

/// Scalar window/document measurements taken on one scroll event.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSample {
    /// Current vertical scroll offset in CSS pixels.
    pub offset: f64,
    /// Full scrollable height of the document element.
    pub scroll_height: f64,
    /// Visible height of the document element.
    pub client_height: f64,
    /// Window inner width.
    pub viewport_width: f64,
}

impl ScrollSample {
    /// Distance the page can scroll, or `None` when it cannot scroll at all.
    #[must_use]
    pub fn scrollable_range(&self) -> Option<f64> {
        let range = self.scroll_height - self.client_height;
        (range.is_finite() && range > 0.0).then_some(range)
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Adds the "scrolled" style once the page leaves the top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderStyle {
    threshold_px: f64,
}

impl HeaderStyle {
    #[must_use]
    pub fn new(config: &HeaderConfig) -> Self {
        Self {
            threshold_px: config.threshold_px,
        }
    }

    #[must_use]
    pub fn is_scrolled(&self, offset: f64) -> bool {
        offset > self.threshold_px
    }
}

impl Default for HeaderStyle {
    fn default() -> Self {
        Self::new(&HeaderConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Back to top
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackToTop {
    threshold_px: f64,
}

impl BackToTop {
    #[must_use]
    pub fn new(config: &BackToTopConfig) -> Self {
        Self {
            threshold_px: config.threshold_px,
        }
    }

    #[must_use]
    pub fn is_visible(&self, offset: f64) -> bool {
        offset > self.threshold_px
    }

    /// Scroll destination when the control is clicked.
    #[must_use]
    pub const fn destination(&self) -> f64 {
        0.0
    }
}

impl Default for BackToTop {
    fn default() -> Self {
        Self::new(&BackToTopConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Percentage of the scrollable range already scrolled.
///
/// Returns `None` when the page cannot scroll or the sample is not finite;
/// the bar is then left as it is. The value is not clamped.
#[must_use]
pub fn progress_percent(sample: &ScrollSample) -> Option<f64> {
    let range = sample.scrollable_range()?;
    let percent = sample.offset / range * 100.0;
    percent.is_finite().then_some(percent)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressBar;

impl ProgressBar {
    /// CSS width for the bar, e.g. `"42.5%"`.
    #[must_use]
    pub fn width_css(&self, sample: &ScrollSample) -> Option<String> {
        progress_percent(sample).map(|pct| format!("{}%", css_number(pct)))
    }
}

// ---------------------------------------------------------------------------
// Parallax
// ---------------------------------------------------------------------------

/// Layer adjustments for one scroll sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxFrame {
    pub content_translate_px: f64,
    /// May fall below zero past the fade distance; CSS clamps it.
    pub content_opacity: f64,
    pub background_translate_px: f64,
}

impl ParallaxFrame {
    #[must_use]
    pub fn content_transform(&self) -> String {
        translate_y(self.content_translate_px)
    }

    #[must_use]
    pub fn content_opacity_css(&self) -> String {
        css_number(self.content_opacity)
    }

    #[must_use]
    pub fn background_transform(&self) -> String {
        translate_y(self.background_translate_px)
    }
}

fn translate_y(px: f64) -> String {
    format!("translateY({}px)", css_number(px))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallax {
    min_viewport_width: f64,
    content_rate: f64,
    background_rate: f64,
    fade_distance_px: f64,
}

impl Parallax {
    #[must_use]
    pub fn new(config: &ParallaxConfig) -> Self {
        Self {
            min_viewport_width: config.min_viewport_width,
            content_rate: config.content_rate,
            background_rate: config.background_rate,
            fade_distance_px: config.fade_distance_px,
        }
    }

    /// Layer adjustments, or `None` on narrow viewports where both layers
    /// are left untouched.
    #[must_use]
    pub fn frame(&self, offset: f64, viewport_width: f64) -> Option<ParallaxFrame> {
        if viewport_width <= self.min_viewport_width {
            return None;
        }
        Some(ParallaxFrame {
            content_translate_px: offset * self.content_rate,
            content_opacity: 1.0 - offset / self.fade_distance_px,
            background_translate_px: offset * self.background_rate,
        })
    }
}

impl Default for Parallax {
    fn default() -> Self {
        Self::new(&ParallaxConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sample(offset: f64, scroll_height: f64, client_height: f64) -> ScrollSample {
        ScrollSample {
            offset,
            scroll_height,
            client_height,
            viewport_width: 1280.0,
        }
    }

    // -- Header / back-to-top thresholds --

    #[test]
    fn header_threshold_is_exclusive() {
        let header = HeaderStyle::default();
        assert!(!header.is_scrolled(0.0));
        assert!(!header.is_scrolled(50.0));
        assert!(header.is_scrolled(50.5));
        assert!(header.is_scrolled(1000.0));
    }

    #[test]
    fn back_to_top_threshold_is_exclusive() {
        let btn = BackToTop::default();
        assert!(!btn.is_visible(500.0));
        assert!(btn.is_visible(501.0));
        assert_eq!(btn.destination(), 0.0);
    }

    #[test]
    fn custom_header_threshold() {
        let header = HeaderStyle::new(&HeaderConfig {
            threshold_px: 120.0,
            ..HeaderConfig::default()
        });
        assert!(!header.is_scrolled(100.0));
        assert!(header.is_scrolled(121.0));
    }

    // -- Progress --

    #[test]
    fn progress_is_offset_over_scrollable_range() {
        assert_eq!(progress_percent(&sample(0.0, 3000.0, 1000.0)), Some(0.0));
        assert_eq!(progress_percent(&sample(500.0, 3000.0, 1000.0)), Some(25.0));
        assert_eq!(progress_percent(&sample(2000.0, 3000.0, 1000.0)), Some(100.0));
    }

    #[test]
    fn progress_is_none_when_page_cannot_scroll() {
        assert_eq!(progress_percent(&sample(0.0, 800.0, 800.0)), None);
        assert_eq!(progress_percent(&sample(0.0, 600.0, 800.0)), None);
        assert_eq!(progress_percent(&sample(f64::NAN, 3000.0, 1000.0)), None);
    }

    #[test]
    fn progress_is_not_clamped() {
        // Elastic overscroll can report a negative offset.
        assert_eq!(progress_percent(&sample(-20.0, 3000.0, 1000.0)), Some(-1.0));
    }

    #[test]
    fn progress_width_css() {
        let bar = ProgressBar;
        assert_eq!(
            bar.width_css(&sample(1000.0, 3000.0, 1000.0)).as_deref(),
            Some("50%")
        );
        assert_eq!(
            bar.width_css(&sample(250.0, 2000.0, 1000.0)).as_deref(),
            Some("25%")
        );
        assert_eq!(bar.width_css(&sample(10.0, 100.0, 100.0)), None);
    }

    // -- Parallax --

    #[test]
    fn parallax_disabled_at_or_below_min_width() {
        let parallax = Parallax::default();
        assert_eq!(parallax.frame(300.0, 768.0), None);
        assert_eq!(parallax.frame(300.0, 375.0), None);
    }

    #[test]
    fn parallax_shifts_layers_at_different_rates() {
        let frame = Parallax::default().frame(300.0, 1024.0).expect("wide viewport");
        assert_eq!(frame.content_translate_px, 90.0);
        assert_eq!(frame.background_translate_px, 150.0);
        assert_eq!(frame.content_opacity, 0.5);
        assert_eq!(frame.content_transform(), "translateY(90px)");
        assert_eq!(frame.background_transform(), "translateY(150px)");
        assert_eq!(frame.content_opacity_css(), "0.5");
    }

    #[test]
    fn parallax_at_top_is_identity() {
        let frame = Parallax::default().frame(0.0, 1024.0).expect("wide viewport");
        assert_eq!(frame.content_transform(), "translateY(0px)");
        assert_eq!(frame.background_transform(), "translateY(0px)");
        assert_eq!(frame.content_opacity_css(), "1");
    }

    #[test]
    fn parallax_opacity_goes_negative_past_fade_distance() {
        let frame = Parallax::default().frame(900.0, 1024.0).expect("wide viewport");
        assert_eq!(frame.content_opacity, -0.5);
    }

    proptest! {
        #[test]
        fn header_and_back_to_top_follow_latest_offset(
            offsets in prop::collection::vec(-100.0f64..5000.0, 1..100)
        ) {
            let header = HeaderStyle::default();
            let back_to_top = BackToTop::default();
            let mut scrolled = false;
            let mut visible = false;
            for offset in &offsets {
                scrolled = header.is_scrolled(*offset);
                visible = back_to_top.is_visible(*offset);
            }
            let last = *offsets.last().unwrap();
            prop_assert_eq!(scrolled, last > 50.0);
            prop_assert_eq!(visible, last > 500.0);
        }

        #[test]
        fn progress_stays_within_bounds_for_in_range_offsets(
            range in 1.0f64..100_000.0,
            fraction in 0.0f64..=1.0,
        ) {
            let s = sample(range * fraction, range + 900.0, 900.0);
            let pct = progress_percent(&s).unwrap();
            prop_assert!((0.0..=100.0 + 1e-9).contains(&pct));
            prop_assert!((pct - fraction * 100.0).abs() < 1e-6);
        }
    }
}
