use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Short identifier of a stock status (`instock`, `outofstock`, ...).
///
/// Keys are opaque: anything read from a URL is carried as-is, known or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockStatusKey(String);

impl StockStatusKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockStatusKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for StockStatusKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StockStatusKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StockStatusKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for StockStatusKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Number of products matching a status under the other active filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockStatusCount {
    pub status: StockStatusKey,
    pub count: u64,
}

impl StockStatusCount {
    pub fn new(status: impl Into<StockStatusKey>, count: u64) -> Self {
        Self {
            status: status.into(),
            count,
        }
    }
}

/// The selected stock statuses, in the order they were selected.
///
/// Insertion order is kept so the URL value and active-filter chips are
/// stable across navigations. Duplicates are never stored, and neither are
/// blank keys or keys containing the `,` separator: every stored key survives
/// a trip through the URL unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SelectionSet {
    keys: Vec<StockStatusKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends each comma-separated token of `key` that is not already
    /// selected. Tokens are trimmed and blank ones skipped. Returns whether
    /// anything was added.
    pub fn insert(&mut self, key: impl Into<StockStatusKey>) -> bool {
        let key = key.into();
        let mut added = false;
        for token in tokens(key.as_str()) {
            if !self.contains(token) {
                self.keys.push(StockStatusKey::from(token));
                added = true;
            }
        }
        added
    }

    /// Removes each token of `key` (split and trimmed as in [`insert`]).
    /// Returns whether anything was present.
    ///
    /// [`insert`]: SelectionSet::insert
    pub fn remove(&mut self, key: &str) -> bool {
        let before = self.keys.len();
        for token in tokens(key) {
            self.keys.retain(|k| k.as_str() != token);
        }
        self.keys.len() != before
    }

    pub fn contains(&self, key: &str) -> bool {
        let key = key.trim();
        self.keys.iter().any(|k| k.as_str() == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StockStatusKey> {
        self.keys.iter()
    }

    pub fn keys(&self) -> &[StockStatusKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Comma-joined keys, unencoded.
    pub fn join(&self) -> String {
        self.keys
            .iter()
            .map(StockStatusKey::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Same members regardless of order.
    pub fn same_members(&self, other: &SelectionSet) -> bool {
        self.len() == other.len() && self.iter().all(|k| other.contains(k.as_str()))
    }
}

fn tokens(key: &str) -> impl Iterator<Item = &str> {
    key.split(',').map(str::trim).filter(|token| !token.is_empty())
}

impl<K: Into<StockStatusKey>> FromIterator<K> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        for key in iter {
            set.insert(key);
        }
        set
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = &'a StockStatusKey;
    type IntoIter = std::slice::Iter<'a, StockStatusKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStyle {
    #[default]
    List,
    Dropdown,
}

impl DisplayStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStyle::List => "list",
            DisplayStyle::Dropdown => "dropdown",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectType {
    #[default]
    Single,
    Multiple,
}

impl SelectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectType::Single => "single",
            SelectType::Multiple => "multiple",
        }
    }

    /// Dropdown placeholder phrase for this selection mode.
    pub fn placeholder(&self) -> &'static str {
        match self {
            SelectType::Single => "Select stock status",
            SelectType::Multiple => "Select stock statuses",
        }
    }
}

/// Editor-authored block configuration, persisted with the post content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockAttributes {
    pub display_style: DisplayStyle,
    pub show_counts: bool,
    pub select_type: SelectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
}

/// The host's closed set of stock statuses and their human labels.
///
/// Entries keep the order the host supplied them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockStatusOptions {
    entries: IndexMap<StockStatusKey, String>,
}

impl StockStatusOptions {
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Adds or relabels a status. Returns self for chaining.
    pub fn with(mut self, key: impl Into<StockStatusKey>, label: impl Into<String>) -> Self {
        self.insert(key, label);
        self
    }

    /// Relabelling keeps the entry's original position.
    pub fn insert(&mut self, key: impl Into<StockStatusKey>, label: impl Into<String>) {
        self.entries.insert(key.into(), label.into());
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StockStatusKey, &str)> {
        self.entries.iter().map(|(k, label)| (k, label.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StockStatusOptions {
    fn default() -> Self {
        Self::empty()
            .with("instock", "In stock")
            .with("outofstock", "Out of stock")
            .with("onbackorder", "On backorder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_insert_dedupes_and_keeps_order() {
        let mut set = SelectionSet::new();
        assert!(set.insert("outofstock"));
        assert!(set.insert("instock"));
        assert!(!set.insert("outofstock"));
        assert_eq!(set.join(), "outofstock,instock");
    }

    #[test]
    fn test_selection_skips_blank_keys() {
        let mut set = SelectionSet::new();
        assert!(!set.insert(""));
        assert!(!set.insert("  "));
        assert!(set.is_empty());
        assert!(set.insert(" instock "));
        assert_eq!(set.join(), "instock");
    }

    #[test]
    fn test_selection_splits_comma_keys() {
        let mut set = SelectionSet::new();
        assert!(set.insert("a,b"));
        assert!(!set.insert("b, a"));
        assert_eq!(set.len(), 2);
        assert_eq!(set.join(), "a,b");
        assert!(set.remove("a,b"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_selection_remove() {
        let mut set: SelectionSet = ["instock", "onbackorder"].into_iter().collect();
        assert!(set.remove("instock"));
        assert!(!set.remove("instock"));
        assert_eq!(set.join(), "onbackorder");
    }

    #[test]
    fn test_selection_from_iter_dedupes() {
        let set: SelectionSet = ["a", "b", "a", "c", "b"].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.join(), "a,b,c");
    }

    #[test]
    fn test_same_members_ignores_order() {
        let a: SelectionSet = ["instock", "outofstock"].into_iter().collect();
        let b: SelectionSet = ["outofstock", "instock"].into_iter().collect();
        let c: SelectionSet = ["outofstock"].into_iter().collect();
        assert!(a.same_members(&b));
        assert!(!a.same_members(&c));
    }

    #[test]
    fn test_block_attributes_defaults() {
        let attrs: BlockAttributes = serde_json::from_str("{}").unwrap();
        assert_eq!(attrs.display_style, DisplayStyle::List);
        assert!(!attrs.show_counts);
        assert_eq!(attrs.select_type, SelectType::Single);
        assert_eq!(attrs.class_name, None);
    }

    #[test]
    fn test_block_attributes_camel_case() {
        let attrs: BlockAttributes = serde_json::from_str(
            r#"{"displayStyle":"dropdown","showCounts":true,"selectType":"multiple","className":"is-wide"}"#,
        )
        .unwrap();
        assert_eq!(attrs.display_style, DisplayStyle::Dropdown);
        assert!(attrs.show_counts);
        assert_eq!(attrs.select_type, SelectType::Multiple);
        assert_eq!(attrs.class_name.as_deref(), Some("is-wide"));
    }

    #[test]
    fn test_placeholder_by_select_type() {
        assert_eq!(SelectType::Single.placeholder(), "Select stock status");
        assert_eq!(SelectType::Multiple.placeholder(), "Select stock statuses");
    }

    #[test]
    fn test_default_options() {
        let options = StockStatusOptions::default();
        let keys: Vec<_> = options.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["instock", "outofstock", "onbackorder"]);
        assert_eq!(options.label("onbackorder"), Some("On backorder"));
        assert_eq!(options.label("nope"), None);
    }

    #[test]
    fn test_options_deserialize_keeps_host_order() {
        let options: StockStatusOptions =
            serde_json::from_str(r#"{"outofstock":"Sold out","instock":"Available"}"#).unwrap();
        let keys: Vec<_> = options.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["outofstock", "instock"]);
        assert_eq!(
            serde_json::to_string(&options).unwrap(),
            r#"{"outofstock":"Sold out","instock":"Available"}"#
        );
    }

    #[test]
    fn test_options_insert_relabels() {
        let options = StockStatusOptions::empty()
            .with("instock", "In stock")
            .with("instock", "Ready");
        assert_eq!(options.len(), 1);
        assert_eq!(options.label("instock"), Some("Ready"));
    }

    #[test]
    fn test_options_relabel_keeps_position() {
        let options = StockStatusOptions::default().with("instock", "Available");
        let keys: Vec<_> = options.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["instock", "outofstock", "onbackorder"]);
    }
}
