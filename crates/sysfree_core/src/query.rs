//! crates/sysfree_core/src/query.rs
//!
//! The query representation of a list view: a `page` entry plus arbitrary
//! filter entries. Every transition produces a new value; the list controller
//! publishes it and derives `(page, filters)` back from it.

use std::collections::BTreeMap;

/// Filter key to filter value. Keys are defined per list view.
pub type Filters = BTreeMap<String, String>;

pub const PAGE_KEY: &str = "page";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: BTreeMap<String, String>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The query a list view starts from after `clearFilters`: page 1, no filters.
    pub fn first_page() -> Self {
        Self::from_pairs([(PAGE_KEY, "1")])
    }

    /// The parameters handed to a fetcher: `{page, ...filters}`.
    pub fn for_request(page: u32, filters: &Filters) -> Self {
        let mut params = Self::from_pairs(filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        params.entries.insert(PAGE_KEY.to_string(), page.to_string());
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// The 1-based page, defaulting to 1 when absent, malformed or zero.
    pub fn page(&self) -> u32 {
        self.get(PAGE_KEY)
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }

    /// `initial` overlaid with every entry except `page`.
    pub fn filters(&self, initial: &Filters) -> Filters {
        let mut filters = initial.clone();
        for (key, value) in self.entries.iter().filter(|(k, _)| k.as_str() != PAGE_KEY) {
            filters.insert(key.clone(), value.clone());
        }
        filters
    }

    /// Same filters, page replaced. Pages start at 1.
    pub fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        next.entries.insert(PAGE_KEY.to_string(), page.max(1).to_string());
        next
    }

    /// Builds a fresh query from `current` merged with `updates`.
    ///
    /// Empty values are dropped, so passing `("categoria", "")` removes the key.
    /// The page always resets to 1 and no key outside the merge survives.
    pub fn apply_filters<I, K, V>(current: &Filters, updates: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged = current.clone();
        for (key, value) in updates {
            merged.insert(key.into(), value.into());
        }
        let mut entries: BTreeMap<String, String> =
            merged.into_iter().filter(|(_, v)| !v.is_empty()).collect();
        entries.insert(PAGE_KEY.to_string(), "1".to_string());
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters(pairs: &[(&str, &str)]) -> Filters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn page_defaults_to_one() {
        assert_eq!(QueryParams::new().page(), 1);
        assert_eq!(QueryParams::from_pairs([("page", "abc")]).page(), 1);
        assert_eq!(QueryParams::from_pairs([("page", "0")]).page(), 1);
        assert_eq!(QueryParams::from_pairs([("page", "4")]).page(), 4);
    }

    #[test]
    fn filters_exclude_page_and_overlay_initial() {
        let query = QueryParams::from_pairs([("page", "2"), ("estado", "pendiente")]);
        let derived = query.filters(&filters(&[("estado", "todos"), ("orden", "fecha")]));
        assert_eq!(derived, filters(&[("estado", "pendiente"), ("orden", "fecha")]));
    }

    #[test]
    fn apply_filters_resets_page() {
        let query = QueryParams::from_pairs([("page", "3")]);
        let next = QueryParams::apply_filters(&query.filters(&Filters::new()), [("categoria", "5")]);
        assert_eq!(next.page(), 1);
        assert_eq!(next.get("categoria"), Some("5"));
    }

    #[test]
    fn apply_filters_drops_empty_values() {
        let current = filters(&[("categoria", "5"), ("search", "tornillo")]);
        let next = QueryParams::apply_filters(&current, [("categoria", "")]);
        assert!(!next.contains_key("categoria"));
        assert_eq!(next.get("search"), Some("tornillo"));
        assert_eq!(next.get("page"), Some("1"));
    }

    #[test]
    fn with_page_keeps_filters() {
        let query = QueryParams::from_pairs([("page", "1"), ("search", "ana")]);
        let next = query.with_page(7);
        assert_eq!(next.page(), 7);
        assert_eq!(next.get("search"), Some("ana"));
    }

    #[test]
    fn with_page_never_writes_page_zero() {
        let next = QueryParams::new().with_page(0);
        assert_eq!(next.get("page"), Some("1"));
    }

    #[test]
    fn request_params_put_page_first_class() {
        let params = QueryParams::for_request(2, &filters(&[("fecha_inicio", "2024-01-01")]));
        assert_eq!(
            params.to_pairs(),
            vec![
                ("fecha_inicio".to_string(), "2024-01-01".to_string()),
                ("page".to_string(), "2".to_string())
            ]
        );
    }
}
