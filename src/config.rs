use std::str::FromStr;

use crate::telemetry::{LogLevel, DEFAULT_LOG_LEVEL};

pub const DEFAULT_AUTO_SLIDE_MS: u32 = 4_000;
pub const AUTO_SLIDE_MS_BOUNDS: (u32, u32) = (1_000, 60_000);

pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_BOTTOM_MARGIN_PX: i32 = -50;
pub const STAT_THRESHOLD: f64 = 0.5;

/// Parses `raw` and keeps it only when it lands inside the inclusive bounds.
pub fn parse_bounded<T>(raw: Option<&str>, default: T, bounds: (T, T)) -> T
where
    T: FromStr + PartialOrd + Copy,
{
    raw.and_then(|value| value.trim().parse::<T>().ok())
        .filter(|value| *value >= bounds.0 && *value <= bounds.1)
        .unwrap_or(default)
}

pub fn parse_non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Settings read from `data-*` attributes on the page mount point.
#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub log_level: LogLevel,
    pub contact_endpoint: Option<String>,
    pub auto_slide_ms: u32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            contact_endpoint: None,
            auto_slide_ms: DEFAULT_AUTO_SLIDE_MS,
        }
    }
}

impl PageConfig {
    pub fn from_attributes(attribute: impl Fn(&str) -> Option<String>) -> Self {
        let log_level = attribute("data-log-level")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);
        let contact_endpoint = parse_non_empty(attribute("data-contact-endpoint").as_deref());
        let auto_slide_ms = parse_bounded(
            attribute("data-auto-slide-ms").as_deref(),
            DEFAULT_AUTO_SLIDE_MS,
            AUTO_SLIDE_MS_BOUNDS,
        );

        Self {
            log_level,
            contact_endpoint,
            auto_slide_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WatchOptions {
    pub threshold: f64,
    pub bottom_margin_px: i32,
    /// Stop observing an element after its first intersection.
    pub once: bool,
}

impl WatchOptions {
    pub fn reveal() -> Self {
        Self {
            threshold: REVEAL_THRESHOLD,
            bottom_margin_px: REVEAL_BOTTOM_MARGIN_PX,
            once: false,
        }
    }

    pub fn stat() -> Self {
        Self {
            threshold: STAT_THRESHOLD,
            bottom_margin_px: 0,
            once: true,
        }
    }

    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", self.bottom_margin_px)
    }
}
