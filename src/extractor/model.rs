use serde::{Deserialize, Serialize};

/// Number of leading name characters compared by the cross-page identity.
pub const LOOSE_NAME_PREFIX: usize = 50;

/// One auction listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub name: String,
    pub region: String,
    pub price: f64,
    pub price_text: String,
    pub link: String,
}

impl Lot {
    /// Exact name and bit-identical price. Used inside a single page.
    pub fn same_strict(&self, other: &Lot) -> bool {
        self.name == other.name && self.price.to_bits() == other.price.to_bits()
    }

    /// Truncated name plus price in whole kopecks. Used when merging pages.
    pub fn loose_key(&self) -> (String, i64) {
        let prefix: String = self.name.chars().take(LOOSE_NAME_PREFIX).collect();
        (prefix, (self.price * 100.0).round() as i64)
    }
}

/// A table cell as the classifier sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub href: Option<String>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: None,
        }
    }

    pub fn with_href(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: Some(href.into()),
        }
    }
}

/// Fields recovered from one data row, before price normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedRow {
    pub price_text: String,
    pub name: String,
    pub region: String,
    pub link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lot(name: &str, price: f64) -> Lot {
        Lot {
            name: name.to_string(),
            region: String::new(),
            price,
            price_text: String::new(),
            link: String::new(),
        }
    }

    #[test]
    fn test_strict_identity_needs_exact_price() {
        let a = lot("Нежилое помещение площадью 120 кв.м", 1500.0);
        assert!(a.same_strict(&lot("Нежилое помещение площадью 120 кв.м", 1500.0)));
        assert!(!a.same_strict(&lot("Нежилое помещение площадью 120 кв.м", 1500.001)));
        assert!(!a.same_strict(&lot("Нежилое помещение площадью 121 кв.м", 1500.0)));
    }

    #[test]
    fn test_loose_key_truncates_name_and_rounds_price() {
        let base = "Ж".repeat(LOOSE_NAME_PREFIX);
        let a = lot(&format!("{base} первая версия"), 1500.004);
        let b = lot(&format!("{base} обрезано"), 1500.0);
        assert_eq!(a.loose_key(), b.loose_key());
        assert_ne!(a.loose_key(), lot(&base, 1500.01).loose_key());
    }
}
