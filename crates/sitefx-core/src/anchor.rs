#![forbid(unsafe_code)]

//! Smooth scrolling for same-page anchor links.

/// Classified `href` of a clicked anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorHref<'a> {
    /// A bare `#`.
    Top,
    /// `#something`; the whole string is used as a selector.
    Fragment(&'a str),
    /// Anything else. Left to the browser.
    External,
}

impl<'a> AnchorHref<'a> {
    #[must_use]
    pub fn parse(href: &'a str) -> Self {
        match href {
            "#" => Self::Top,
            _ if href.starts_with('#') => Self::Fragment(href),
            _ => Self::External,
        }
    }
}

/// What the host does with an anchor click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorAction {
    /// Prevent the default navigation and smooth-scroll to `top`.
    ScrollTo { top: f64 },
    /// Do nothing; the browser handles the click.
    PassThrough,
}

/// Decide how to handle a click on `href`.
///
/// `target_top` is the document offset of the element the fragment selects,
/// or `None` when nothing matches. `header_height` is the height of the fixed
/// header (`None` when the page has no header), so the target lands just
/// below it.
#[must_use]
pub fn plan_anchor_scroll(
    href: &str,
    target_top: Option<f64>,
    header_height: Option<f64>,
) -> AnchorAction {
    match AnchorHref::parse(href) {
        AnchorHref::Top => AnchorAction::ScrollTo { top: 0.0 },
        AnchorHref::Fragment(_) => match target_top {
            Some(top) => AnchorAction::ScrollTo {
                top: top - header_height.unwrap_or(0.0),
            },
            None => AnchorAction::PassThrough,
        },
        AnchorHref::External => AnchorAction::PassThrough,
    }
}
