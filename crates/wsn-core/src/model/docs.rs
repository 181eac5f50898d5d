//! Documentation links composite

use serde::{Deserialize, Serialize};

use super::optional::Optional;

/// A single documentation reference. Every leaf is individually tri-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DocItem {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub title: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub slug: Optional<String>,
}

impl DocItem {
    /// URL used for the order-independent sort rule: nulls/absent first,
    /// then lexicographic.
    pub fn sort_key(&self) -> (u8, &str) {
        match self.url.value() {
            Some(url) => (1, url.as_str()),
            None => (0, ""),
        }
    }
}

/// Docs composite: an optional ordered list of [`DocItem`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Docs {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub list: Optional<Vec<DocItem>>,
}

/// Sort a docs list by URL (nulls/absent first, then lexicographic), for the
/// order-independent equality rule in the comparator.
pub fn sorted_docs_list(list: &[DocItem]) -> Vec<DocItem> {
    let mut sorted = list.to_vec();
    sorted.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(url: Option<&str>) -> DocItem {
        DocItem {
            url: url.map(|u| Optional::present(u.to_string())).unwrap_or(Optional::absent()),
            title: Optional::absent(),
            slug: Optional::absent(),
        }
    }

    #[test]
    fn sorted_docs_list_puts_null_urls_first() {
        let list = vec![item(Some("b")), item(None), item(Some("a"))];
        let sorted = sorted_docs_list(&list);
        assert_eq!(sorted[0].url.value(), None);
        assert_eq!(sorted[1].url.value().map(String::as_str), Some("a"));
        assert_eq!(sorted[2].url.value().map(String::as_str), Some("b"));
    }

    #[test]
    fn sorted_docs_list_is_order_independent() {
        let a = vec![item(Some("a")), item(Some("b"))];
        let b = vec![item(Some("b")), item(Some("a"))];
        assert_eq!(sorted_docs_list(&a), sorted_docs_list(&b));
    }
}
