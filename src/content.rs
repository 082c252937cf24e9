//! Static copy rendered by the page.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Project {
    pub title: &'static str,
    pub summary: &'static str,
    pub category: &'static str,
    pub stack: &'static [&'static str],
    pub href: &'static str,
}

pub const SECTIONS: [Section; 4] = [
    Section { id: "home", label: "Home" },
    Section { id: "about", label: "About" },
    Section { id: "projects", label: "Projects" },
    Section { id: "contact", label: "Contact" },
];

pub const STATS: [Stat; 3] = [
    Stat { value: "25+", label: "Projects shipped" },
    Stat { value: "6+", label: "Years building" },
    Stat { value: "40+", label: "Happy clients" },
];

pub const PROJECTS: [Project; 7] = [
    Project {
        title: "Ledgerline",
        summary: "Append-only ledger service with snapshot compaction.",
        category: "systems",
        stack: &["Rust", "Tokio", "PostgreSQL"],
        href: "https://github.com/",
    },
    Project {
        title: "Storefront",
        summary: "Headless storefront with instant search and cart sync.",
        category: "web",
        stack: &["TypeScript", "React", "Stripe"],
        href: "https://github.com/",
    },
    Project {
        title: "Forecast Lab",
        summary: "Demand forecasting notebooks turned into a nightly job.",
        category: "ml",
        stack: &["Python", "PyTorch"],
        href: "https://github.com/",
    },
    Project {
        title: "Trail Maps",
        summary: "Offline-first trail map with vector tiles.",
        category: "web",
        stack: &["Rust", "WebAssembly", "MapLibre"],
        href: "https://github.com/",
    },
    Project {
        title: "Packet Scope",
        summary: "Terminal UI for capturing and replaying network traces.",
        category: "systems",
        stack: &["Rust", "ratatui"],
        href: "https://github.com/",
    },
    Project {
        title: "Caption Studio",
        summary: "Speech-to-text captioning for short video.",
        category: "ml",
        stack: &["Python", "Whisper", "FFmpeg"],
        href: "https://github.com/",
    },
    Project {
        title: "Booking Desk",
        summary: "Appointment booking for a chain of small clinics.",
        category: "web",
        stack: &["Rust", "axum", "Yew"],
        href: "https://github.com/",
    },
];

pub fn project_categories() -> impl Iterator<Item = &'static str> {
    PROJECTS.iter().map(|project| project.category)
}
