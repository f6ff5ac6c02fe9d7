#![forbid(unsafe_code)]

//! Reveal-on-visibility decisions.
//!
//! The host observes every element carrying the animation marker. When an
//! observation reports the element as intersecting, [`RevealWatch`] decides
//! how long to wait before the element receives its animated class. The host
//! stops observing the element as soon as a [`RevealDecision::Schedule`] is
//! returned, so an element is revealed at most once.

use tracing::trace;

use crate::config::RevealConfig;

/// Outcome of one visibility observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealDecision {
    /// Element is not (yet) visible enough; keep observing.
    Ignore,
    /// Stop observing and apply the animated class after `delay_ms`.
    Schedule { delay_ms: u32 },
}

/// Parse a delay attribute in milliseconds.
///
/// Missing, empty, non-numeric, negative or non-finite values mean "no
/// delay". Fractions are truncated and huge values saturate.
#[must_use]
pub fn parse_delay_ms(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    let Ok(value) = raw.trim().parse::<f64>() else {
        return 0;
    };
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    // `as` saturates for out-of-range floats.
    value as u32
}

/// Visibility gate for the reveal behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealWatch {
    threshold: f64,
    root_margin: String,
}

impl RevealWatch {
    #[must_use]
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            root_margin: config.root_margin.clone(),
        }
    }

    /// Visible fraction passed to the host's visibility observer.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Root margin passed to the host's visibility observer.
    #[must_use]
    pub fn root_margin(&self) -> &str {
        &self.root_margin
    }

    pub fn on_visibility(&self, is_intersecting: bool, delay_attr: Option<&str>) -> RevealDecision {
        if !is_intersecting {
            return RevealDecision::Ignore;
        }
        let delay_ms = parse_delay_ms(delay_attr);
        trace!(target: "sitefx::reveal", delay_ms, "element entered view");
        RevealDecision::Schedule { delay_ms }
    }
}

impl Default for RevealWatch {
    fn default() -> Self {
        Self::new(&RevealConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_invalid_delay_is_zero() {
        assert_eq!(parse_delay_ms(None), 0);
        assert_eq!(parse_delay_ms(Some("")), 0);
        assert_eq!(parse_delay_ms(Some("soon")), 0);
        assert_eq!(parse_delay_ms(Some("-200")), 0);
        assert_eq!(parse_delay_ms(Some("NaN")), 0);
        assert_eq!(parse_delay_ms(Some("inf")), 0);
    }

    #[test]
    fn delay_is_parsed_and_truncated() {
        assert_eq!(parse_delay_ms(Some("200")), 200);
        assert_eq!(parse_delay_ms(Some(" 150 ")), 150);
        assert_eq!(parse_delay_ms(Some("99.9")), 99);
        assert_eq!(parse_delay_ms(Some("1e12")), u32::MAX);
    }

    #[test]
    fn default_watch_uses_ten_percent_and_bottom_margin() {
        let watch = RevealWatch::default();
        assert_eq!(watch.threshold(), 0.1);
        assert_eq!(watch.root_margin(), "0px 0px -50px 0px");
    }

    #[test]
    fn not_intersecting_is_ignored() {
        let watch = RevealWatch::default();
        assert_eq!(watch.on_visibility(false, Some("300")), RevealDecision::Ignore);
    }

    #[test]
    fn intersecting_schedules_with_delay() {
        let watch = RevealWatch::default();
        assert_eq!(
            watch.on_visibility(true, Some("300")),
            RevealDecision::Schedule { delay_ms: 300 }
        );
        assert_eq!(
            watch.on_visibility(true, None),
            RevealDecision::Schedule { delay_ms: 0 }
        );
    }
}
