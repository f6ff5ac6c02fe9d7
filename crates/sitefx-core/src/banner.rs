#![forbid(unsafe_code)]

//! Greeting printed to the developer console at startup.

use crate::config::BannerConfig;

/// A console line with a `%c` style directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerLine {
    /// Format string including the leading `%c`.
    pub format: String,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Banner {
    lines: Vec<BannerLine>,
}

impl Banner {
    #[must_use]
    pub fn new(config: &BannerConfig) -> Self {
        let lines = config
            .lines
            .iter()
            .map(|line| BannerLine {
                format: format!("%c{}", line.text),
                css: line.css.clone(),
            })
            .collect();
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[BannerLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
