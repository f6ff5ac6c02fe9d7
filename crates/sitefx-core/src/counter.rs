#![forbid(unsafe_code)]

//! Counter animation: a linear tween of an integer from zero to a target.
//!
//! The host drives the tween from a repeating timer every `tick_ms`
//! milliseconds and writes [`CounterFrame::value`] into the element text
//! until [`CounterFrame::done`] is set, at which point it cancels the timer.

use tracing::trace;

use crate::config::CounterConfig;

/// Parse a counter target the way `parseInt` without a radix does:
/// optional leading whitespace, an optional sign, then either a `0x`/`0X`
/// prefix with hex digits or decimal digits. Anything after the digits is
/// ignored (`"1,200"` is `1`). Returns `None` when no digits are present.
#[must_use]
pub fn parse_count_target(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x" | "0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let digits_len = rest
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digits_len == 0 {
        return None;
    }
    let digits = &rest[..digits_len];
    let magnitude = i64::from_str_radix(digits, radix).unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// One displayed step of a counter animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterFrame {
    pub value: i64,
    /// The target has been reached; no further ticks are needed.
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CounterTween {
    target: i64,
    increment: f64,
    tick_ms: u32,
    frame_count: u32,
    ticks: u32,
    finished: bool,
}

impl CounterTween {
    /// Create a tween to `target` over `duration_ms`, stepping every
    /// `tick_ms`. Zero durations or ticks finish on the first tick.
    #[must_use]
    pub fn new(target: i64, duration_ms: u32, tick_ms: u32) -> Self {
        let tick_ms = tick_ms.max(1);
        let steps = f64::from(duration_ms.max(tick_ms)) / f64::from(tick_ms);
        Self {
            target,
            increment: target as f64 / steps,
            tick_ms,
            frame_count: steps.ceil() as u32,
            ticks: 0,
            finished: false,
        }
    }

    #[must_use]
    pub fn from_config(target: i64, config: &CounterConfig) -> Self {
        Self::new(target, config.duration_ms, config.tick_ms)
    }

    #[must_use]
    pub const fn target(&self) -> i64 {
        self.target
    }

    /// Timer interval the host should use.
    #[must_use]
    pub const fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance one tick.
    pub fn tick(&mut self) -> CounterFrame {
        if self.finished {
            return CounterFrame {
                value: self.target,
                done: true,
            };
        }
        self.ticks = self.ticks.saturating_add(1);
        let current = self.increment * f64::from(self.ticks);
        if current >= self.target as f64 || self.ticks >= self.frame_count {
            self.finished = true;
            trace!(
                target: "sitefx::counter",
                target_value = self.target,
                ticks = self.ticks,
                "counter reached target"
            );
            return CounterFrame {
                value: self.target,
                done: true,
            };
        }
        CounterFrame {
            value: (current.ceil() as i64).min(self.target),
            done: false,
        }
    }
}
