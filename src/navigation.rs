pub const HEADER_OFFSET_PX: f64 = 80.0;
pub const SECTION_LEAD_IN_PX: f64 = 100.0;
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavAction {
    Toggle,
    Close,
    ViewportResized { width_px: u32 },
}

/// Open/closed state of the mobile menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(self) -> bool {
        self.open
    }

    pub fn apply(self, action: NavAction) -> Self {
        match action {
            NavAction::Toggle => Self { open: !self.open },
            NavAction::Close => Self { open: false },
            NavAction::ViewportResized { width_px }
                if f64::from(width_px) > MOBILE_BREAKPOINT_PX =>
            {
                Self { open: false }
            }
            NavAction::ViewportResized { .. } => self,
        }
    }

    /// Value for `body.style.overflow`; scrolling is locked while open.
    pub fn body_overflow(self) -> &'static str {
        if self.open {
            "hidden"
        } else {
            ""
        }
    }
}

/// Scroll position that puts an element just below the fixed header.
pub fn scroll_target(element_top: f64) -> f64 {
    element_top - HEADER_OFFSET_PX
}

/// Id of the last section (in document order) whose lead-in line has been
/// scrolled past.
pub fn active_section<'a>(sections: &[(&'a str, f64)], scroll_y: f64) -> Option<&'a str> {
    sections
        .iter()
        .filter(|(_, top)| scroll_y >= top - SECTION_LEAD_IN_PX)
        .last()
        .map(|(id, _)| *id)
}

/// Id referenced by an in-page anchor, e.g. `"#about"` -> `"about"`.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: [(&str, f64); 3] = [("home", 0.0), ("about", 500.0), ("projects", 1000.0)];

    #[test]
    fn scroll_position_selects_latest_passed_section() {
        assert_eq!(active_section(&SECTIONS, 600.0), Some("about"));
        assert_eq!(active_section(&SECTIONS, 0.0), Some("home"));
        assert_eq!(active_section(&SECTIONS, 900.0), Some("projects"));
        assert_eq!(active_section(&SECTIONS, 899.0), Some("about"));
    }

    #[test]
    fn no_section_is_active_above_the_first_lead_in() {
        let sections = [("about", 400.0)];
        assert_eq!(active_section(&sections, 0.0), None);
        assert_eq!(active_section(&[], 0.0), None);
    }

    #[test]
    fn scroll_target_clears_header() {
        assert_eq!(scroll_target(1_000.0), 920.0);
    }

    #[test]
    fn anchors_resolve_to_ids() {
        assert_eq!(anchor_target("#contact"), Some("contact"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("https://example.com"), None);
    }

    #[test]
    fn toggle_flips_and_close_is_idempotent() {
        let menu = NavMenu::default();
        let opened = menu.apply(NavAction::Toggle);

        assert!(opened.is_open());
        assert_eq!(opened.body_overflow(), "hidden");
        assert!(!opened.apply(NavAction::Toggle).is_open());

        let closed = opened.apply(NavAction::Close);
        assert!(!closed.is_open());
        assert_eq!(closed.body_overflow(), "");
        assert_eq!(closed.apply(NavAction::Close), closed);
    }

    #[test]
    fn widening_past_breakpoint_closes_menu() {
        let opened = NavMenu::default().apply(NavAction::Toggle);

        assert!(opened.apply(NavAction::ViewportResized { width_px: 768 }).is_open());
        assert!(!opened.apply(NavAction::ViewportResized { width_px: 769 }).is_open());
    }
}
