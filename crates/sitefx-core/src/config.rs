#![forbid(unsafe_code)]

//! Markup contract and thresholds for every behavior.
//!
//! The defaults describe the page the behaviors were written for. A host can
//! pass a partial JSON document to override any subset; missing keys keep
//! their defaults and unknown keys are rejected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse sitefx config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("sitefx config validation failed: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration, one section per behavior.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteFxConfig {
    pub reveal: RevealConfig,
    pub menu: MenuConfig,
    pub header: HeaderConfig,
    pub progress: ProgressConfig,
    pub counter: CounterConfig,
    pub anchor: AnchorConfig,
    pub back_to_top: BackToTopConfig,
    pub lazy_images: LazyImageConfig,
    pub parallax: ParallaxConfig,
    pub loaded: LoadedConfig,
    pub banner: BannerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    pub selector: String,
    pub delay_attribute: String,
    /// Visible fraction that counts as "in view".
    pub threshold: f64,
    pub root_margin: String,
    pub animated_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: "[data-animate]".to_string(),
            delay_attribute: "data-delay".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
            animated_class: "animated".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MenuConfig {
    pub button_id: String,
    pub menu_id: String,
    pub link_selector: String,
    pub active_class: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            button_id: "mobileMenuBtn".to_string(),
            menu_id: "navMenu".to_string(),
            link_selector: ".nav-menu a".to_string(),
            active_class: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeaderConfig {
    pub navbar_id: String,
    pub threshold_px: f64,
    pub scrolled_class: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            navbar_id: "navbar".to_string(),
            threshold_px: 50.0,
            scrolled_class: "scrolled".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgressConfig {
    pub bar_id: String,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            bar_id: "progressBar".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    pub selector: String,
    pub target_attribute: String,
    pub threshold: f64,
    pub duration_ms: u32,
    pub tick_ms: u32,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            selector: "[data-count]".to_string(),
            target_attribute: "data-count".to_string(),
            threshold: 0.5,
            duration_ms: 2000,
            tick_ms: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorConfig {
    pub selector: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            selector: "a[href^=\"#\"]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackToTopConfig {
    pub button_id: String,
    pub threshold_px: f64,
    pub visible_class: String,
}

impl Default for BackToTopConfig {
    fn default() -> Self {
        Self {
            button_id: "backToTop".to_string(),
            threshold_px: 500.0,
            visible_class: "visible".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LazyImageConfig {
    pub selector: String,
}

impl Default for LazyImageConfig {
    fn default() -> Self {
        Self {
            selector: "img[loading=\"lazy\"]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParallaxConfig {
    pub content_selector: String,
    pub background_selector: String,
    /// Parallax is disabled at or below this viewport width.
    pub min_viewport_width: f64,
    pub content_rate: f64,
    pub background_rate: f64,
    /// Scroll distance over which the content layer fades from 1 to 0.
    pub fade_distance_px: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        Self {
            content_selector: ".hero-content".to_string(),
            background_selector: ".hero-background".to_string(),
            min_viewport_width: 768.0,
            content_rate: 0.3,
            background_rate: 0.5,
            fade_distance_px: 600.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadedConfig {
    pub class: String,
}

impl Default for LoadedConfig {
    fn default() -> Self {
        Self {
            class: "loaded".to_string(),
        }
    }
}

/// One styled console line. `css` applies to the `%c` directive at the
/// start of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BannerLineConfig {
    pub text: String,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BannerConfig {
    pub lines: Vec<BannerLineConfig>,
}

impl Default for BannerConfig {
    fn default() -> Self {
        let line = |text: &str, css: &str| BannerLineConfig {
            text: text.to_string(),
            css: css.to_string(),
        };
        Self {
            lines: vec![
                line(
                    "👋 안녕하세요!",
                    "font-size: 20px; font-weight: bold; color: #d92525;",
                ),
                line(
                    "JENNET 웹사이트를 방문해 주셔서 감사합니다.",
                    "font-size: 14px; color: #666;",
                ),
                line("문의: 010-8872-6800", "font-size: 12px; color: #999;"),
            ],
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

fn require_fraction(field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Validation(format!(
            "{field} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// A CSS margin shorthand with one to four `<length>`/`<percentage>`
/// values, as accepted by `IntersectionObserver`'s `rootMargin`. Lengths
/// must be in `px`; a bare `0` is allowed.
fn is_valid_root_margin(margin: &str) -> bool {
    let parts: Vec<&str> = margin.split_whitespace().collect();
    if parts.is_empty() || parts.len() > 4 {
        return false;
    }
    parts.iter().all(|part| {
        if *part == "0" {
            return true;
        }
        let number = part
            .strip_suffix("px")
            .or_else(|| part.strip_suffix('%'));
        number.is_some_and(|n| n.parse::<f64>().is_ok_and(f64::is_finite))
    })
}

fn require_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::Validation(format!(
            "{field} must be finite, got {value}"
        )));
    }
    Ok(())
}

impl SiteFxConfig {
    /// Parse a JSON override document and validate the merged result.
    pub fn from_json(raw_json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw_json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let reveal = &self.reveal;
        require_non_empty("reveal.selector", &reveal.selector)?;
        require_non_empty("reveal.delay_attribute", &reveal.delay_attribute)?;
        require_non_empty("reveal.animated_class", &reveal.animated_class)?;
        require_fraction("reveal.threshold", reveal.threshold)?;
        if !is_valid_root_margin(&reveal.root_margin) {
            return Err(ConfigError::Validation(format!(
                "reveal.root_margin must be 1-4 px or % values, got '{}'",
                reveal.root_margin
            )));
        }

        let menu = &self.menu;
        require_non_empty("menu.button_id", &menu.button_id)?;
        require_non_empty("menu.menu_id", &menu.menu_id)?;
        require_non_empty("menu.link_selector", &menu.link_selector)?;
        require_non_empty("menu.active_class", &menu.active_class)?;

        require_non_empty("header.navbar_id", &self.header.navbar_id)?;
        require_non_empty("header.scrolled_class", &self.header.scrolled_class)?;
        require_finite("header.threshold_px", self.header.threshold_px)?;

        require_non_empty("progress.bar_id", &self.progress.bar_id)?;

        let counter = &self.counter;
        require_non_empty("counter.selector", &counter.selector)?;
        require_non_empty("counter.target_attribute", &counter.target_attribute)?;
        require_fraction("counter.threshold", counter.threshold)?;
        if counter.duration_ms == 0 || counter.tick_ms == 0 {
            return Err(ConfigError::Validation(
                "counter.duration_ms and counter.tick_ms must be positive".to_string(),
            ));
        }
        if counter.tick_ms > counter.duration_ms {
            return Err(ConfigError::Validation(format!(
                "counter.tick_ms ({}) must not exceed counter.duration_ms ({})",
                counter.tick_ms, counter.duration_ms
            )));
        }

        require_non_empty("anchor.selector", &self.anchor.selector)?;

        let back_to_top = &self.back_to_top;
        require_non_empty("back_to_top.button_id", &back_to_top.button_id)?;
        require_non_empty("back_to_top.visible_class", &back_to_top.visible_class)?;
        require_finite("back_to_top.threshold_px", back_to_top.threshold_px)?;

        require_non_empty("lazy_images.selector", &self.lazy_images.selector)?;

        let parallax = &self.parallax;
        require_non_empty("parallax.content_selector", &parallax.content_selector)?;
        require_non_empty(
            "parallax.background_selector",
            &parallax.background_selector,
        )?;
        require_finite("parallax.min_viewport_width", parallax.min_viewport_width)?;
        require_finite("parallax.content_rate", parallax.content_rate)?;
        require_finite("parallax.background_rate", parallax.background_rate)?;
        if !parallax.fade_distance_px.is_finite() || parallax.fade_distance_px <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "parallax.fade_distance_px must be a positive number, got {}",
                parallax.fade_distance_px
            )));
        }

        require_non_empty("loaded.class", &self.loaded.class)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_page_contract() {
        let cfg = SiteFxConfig::default();
        assert_eq!(cfg.reveal.selector, "[data-animate]");
        assert_eq!(cfg.reveal.root_margin, "0px 0px -50px 0px");
        assert_eq!(cfg.menu.button_id, "mobileMenuBtn");
        assert_eq!(cfg.header.threshold_px, 50.0);
        assert_eq!(cfg.back_to_top.threshold_px, 500.0);
        assert_eq!(cfg.counter.duration_ms, 2000);
        assert_eq!(cfg.counter.tick_ms, 16);
        assert_eq!(cfg.parallax.min_viewport_width, 768.0);
        assert_eq!(cfg.banner.lines.len(), 3);
        assert_eq!(cfg.banner.lines[2].css, "font-size: 12px; color: #999;");
        cfg.validate().expect("defaults validate");
    }

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = SiteFxConfig::from_json("{}").expect("parse");
        assert_eq!(cfg, SiteFxConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = SiteFxConfig::from_json(
            r#"{"header":{"threshold_px":80},"counter":{"duration_ms":1000}}"#,
        )
        .expect("parse");
        assert_eq!(cfg.header.threshold_px, 80.0);
        assert_eq!(cfg.header.navbar_id, "navbar");
        assert_eq!(cfg.counter.duration_ms, 1000);
        assert_eq!(cfg.counter.tick_ms, 16);
        assert_eq!(cfg.menu, MenuConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SiteFxConfig::from_json(r#"{"heder":{}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SiteFxConfig::from_json("not json").unwrap_err();
        assert!(err.to_string().starts_with("failed to parse sitefx config JSON"));
    }

    #[test]
    fn threshold_out_of_range_fails_validation() {
        let err = SiteFxConfig::from_json(r#"{"reveal":{"threshold":1.5}}"#).unwrap_err();
        assert!(
            err.to_string().contains("reveal.threshold"),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn root_margin_accepts_px_percent_and_zero() {
        assert!(is_valid_root_margin("0px 0px -50px 0px"));
        assert!(is_valid_root_margin("10%"));
        assert!(is_valid_root_margin("0 -20px"));
        assert!(is_valid_root_margin(" 5px  5px 5px "));
    }

    #[test]
    fn malformed_root_margin_fails_validation() {
        for margin in ["", "10", "10em", "1px 2px 3px 4px 5px", "auto"] {
            let mut cfg = SiteFxConfig::default();
            cfg.reveal.root_margin = margin.to_string();
            let err = cfg.validate().unwrap_err();
            assert!(
                err.to_string().contains("reveal.root_margin"),
                "margin {margin:?}: {err}"
            );
        }
    }

    #[test]
    fn zero_tick_fails_validation() {
        let err = SiteFxConfig::from_json(r#"{"counter":{"tick_ms":0}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn tick_longer_than_duration_fails_validation() {
        let err =
            SiteFxConfig::from_json(r#"{"counter":{"tick_ms":50,"duration_ms":20}}"#).unwrap_err();
        assert!(err.to_string().contains("counter.tick_ms"));
    }

    #[test]
    fn empty_selector_fails_validation() {
        let err = SiteFxConfig::from_json(r#"{"anchor":{"selector":"  "}}"#).unwrap_err();
        assert!(err.to_string().contains("anchor.selector must not be empty"));
    }

    #[test]
    fn non_positive_fade_distance_fails_validation() {
        let mut cfg = SiteFxConfig::default();
        cfg.parallax.fade_distance_px = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn banner_lines_can_be_replaced() {
        let cfg = SiteFxConfig::from_json(
            r#"{"banner":{"lines":[{"text":"hi","css":"color: red;"}]}}"#,
        )
        .expect("parse");
        assert_eq!(
            cfg.banner.lines,
            vec![BannerLineConfig {
                text: "hi".to_string(),
                css: "color: red;".to_string(),
            }]
        );
    }
}
