//! List query state: page, search text and named filters.

use std::collections::BTreeMap;

/// Query state for one list page.
///
/// Any search or filter change resets `page` to 1. Equality is structural
/// and drives request deduplication in the controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    page: u32,
    search_text: String,
    filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search_text: String::new(),
            filters: BTreeMap::new(),
        }
    }
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn filter(&self, name: &str) -> Option<&str> {
        self.filters.get(name).map(String::as_str)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.page = 1;
    }

    /// Set one filter. An empty value removes it ("all").
    pub fn set_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if value.trim().is_empty() {
            self.filters.remove(&name);
        } else {
            self.filters.insert(name, value);
        }
        self.page = 1;
    }

    pub fn clear_filter(&mut self, name: &str) {
        self.filters.remove(name);
        self.page = 1;
    }

    /// Store the requested page. Only the lower bound is enforced here.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// `page`, `search` (when non-empty) and `filter[<name>]` pairs, in
    /// that order with filters sorted by name.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("page".to_string(), self.page.to_string())];
        let search = self.search_text.trim();
        if !search.is_empty() {
            pairs.push(("search".to_string(), search.to_string()));
        }
        for (name, value) in &self.filters {
            pairs.push((format!("filter[{}]", name), value.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_resets_page() {
        let mut query = ListQuery::new();
        query.set_page(4);
        query.set_search_text("fence");
        assert_eq!(query.page(), 1);
        assert_eq!(query.search_text(), "fence");
    }

    #[test]
    fn test_filter_resets_page_and_empty_removes() {
        let mut query = ListQuery::new();
        query.set_filter("status", "pending");
        query.set_page(2);
        query.set_filter("status", "");
        assert_eq!(query.page(), 1);
        assert!(query.filter("status").is_none());

        query.set_filter("priority", "high");
        query.set_page(3);
        query.clear_filter("priority");
        assert_eq!(query.page(), 1);
        assert!(query.filters().is_empty());
    }

    #[test]
    fn test_set_page_clamps_to_one() {
        let mut query = ListQuery::new();
        query.set_page(0);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn test_query_pairs() {
        let mut query = ListQuery::new();
        query.set_search_text("  ");
        query.set_filter("status", "pending");
        query.set_filter("category", "noise");
        query.set_page(2);

        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("filter[category]".to_string(), "noise".to_string()),
                ("filter[status]".to_string(), "pending".to_string()),
            ]
        );
    }

    #[test]
    fn test_structural_equality() {
        let mut a = ListQuery::new();
        let mut b = ListQuery::new();
        a.set_filter("status", "open");
        b.set_filter("status", "open");
        assert_eq!(a, b);
        b.set_page(2);
        assert_ne!(a, b);
    }
}
