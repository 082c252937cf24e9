pub const ALL_KEY: &str = "all";
pub const SETTLE_DELAY_MS: u32 = 100;

/// Which project category the carousel shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn from_key(key: &str) -> Self {
        let key = key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case(ALL_KEY) {
            Self::All
        } else {
            Self::Only(key.to_string())
        }
    }

    pub fn key(&self) -> &str {
        match self {
            Self::All => ALL_KEY,
            Self::Only(category) => category,
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }

    pub fn apply<'a, T>(
        &self,
        items: &'a [T],
        category_of: impl Fn(&T) -> &str,
    ) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.matches(category_of(item)))
            .collect()
    }
}

/// Filter keys for the button row: `all`, then each category in first-seen
/// order.
pub fn filter_keys<'a>(categories: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut keys = vec![ALL_KEY];
    for category in categories {
        if !keys.contains(&category) {
            keys.push(category);
        }
    }
    keys
}
