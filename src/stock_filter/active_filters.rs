//! # Active Filters
//!
//! A sibling block summarizes every filter in effect as removable chips. Each
//! filter contributes its own group to a shared aggregate, keyed by group name;
//! the stock filter contributes under `stock`.
//!
//! Contribution is a fold: the aggregate passes through every registered
//! [`ActiveFilterContributor`] in registration order, each adding its group
//! when its parameter is present. A companion fold collects the query
//! parameter names the summary must clear on "clear all".
//!
//! Each stock chip binds a click to the filter's `removeFilter` action with the
//! status key in its context, so clicking the chip lands on the same URL as
//! unchecking the box.

use crate::codec::{parse_selection, QueryParams, STOCK_STATUS_QUERY_VAR};
use crate::interactivity::{
    actions, context_directive, ActionPath, CONTEXT_ATTR, ON_ATTR_PREFIX, STOCK_FILTER_NAMESPACE,
};
use crate::model::StockStatusOptions;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Group key the stock filter contributes under.
pub const STOCK_GROUP: &str = "stock";

/// Heading of the stock group in the summary.
pub const STOCK_GROUP_TYPE: &str = "Stock Status";

/// Action and context a chip fires when clicked.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoveBinding {
    pub action: ActionPath,
    pub context: Value,
}

/// One removable chip.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveFilterItem {
    pub title: String,
    pub remove_binding: RemoveBinding,
}

impl ActiveFilterItem {
    /// Chip for a selected stock status.
    pub fn stock_status(key: &str, label: &str) -> Self {
        Self {
            title: label.to_string(),
            remove_binding: RemoveBinding {
                action: ActionPath::stock_filter(actions::REMOVE_FILTER),
                context: serde_json::json!({ "value": key }),
            },
        }
    }

    /// The chip's markup attributes: the click binding and the namespaced context.
    pub fn attributes(&self) -> Vec<(String, String)> {
        let namespace = self
            .remove_binding
            .action
            .namespace
            .as_deref()
            .unwrap_or(STOCK_FILTER_NAMESPACE);
        vec![
            (
                format!("{}click", ON_ATTR_PREFIX),
                self.remove_binding.action.to_string(),
            ),
            (
                CONTEXT_ATTR.to_string(),
                context_directive(Some(namespace), &self.remove_binding.context),
            ),
        ]
    }
}

impl Serialize for ActiveFilterItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("title", &self.title)?;
        let attributes: BTreeMap<String, String> = self.attributes().into_iter().collect();
        map.serialize_entry("attributes", &attributes)?;
        map.end()
    }
}

/// One filter's chips under a heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFilterGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub items: Vec<ActiveFilterItem>,
}

/// Every contributed group, keyed by group name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ActiveFilters {
    groups: BTreeMap<String, ActiveFilterGroup>,
}

impl ActiveFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, group: ActiveFilterGroup) {
        self.groups.insert(key.into(), group);
    }

    pub fn get(&self, key: &str) -> Option<&ActiveFilterGroup> {
        self.groups.get(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Adds the stock group to `aggregate` when the URL selects known statuses.
///
/// Keys without a label are skipped; when none remain the aggregate is
/// returned unchanged.
pub fn register_active_filters_data(
    mut aggregate: ActiveFilters,
    params: &QueryParams,
    options: &StockStatusOptions,
) -> ActiveFilters {
    let Some(value) = params.get(STOCK_STATUS_QUERY_VAR) else {
        return aggregate;
    };
    let selection = parse_selection(value);
    if selection.is_empty() {
        return aggregate;
    }

    let items: Vec<ActiveFilterItem> = selection
        .iter()
        .filter_map(|key| match options.label(key.as_str()) {
            Some(label) => Some(ActiveFilterItem::stock_status(key.as_str(), label)),
            None => {
                tracing::debug!(status = %key, "no label for selected status, leaving it out");
                None
            }
        })
        .collect();

    // No labelled status selected: no group, same as an absent parameter.
    if items.is_empty() {
        return aggregate;
    }

    aggregate.insert(
        STOCK_GROUP,
        ActiveFilterGroup {
            kind: STOCK_GROUP_TYPE.to_string(),
            items,
        },
    );
    aggregate
}

/// Adds the stock parameter to `keys` when the URL carries it.
pub fn filter_query_param_keys(mut keys: Vec<String>, url_param_keys: &[String]) -> Vec<String> {
    for key in url_param_keys {
        if key == STOCK_STATUS_QUERY_VAR && !keys.contains(key) {
            keys.push(key.clone());
        }
    }
    keys
}

/// A filter that contributes to the active-filters summary.
pub trait ActiveFilterContributor {
    fn contribute(&self, aggregate: ActiveFilters, params: &QueryParams) -> ActiveFilters;

    /// Parameter names this filter owns, added to `keys`. Contributes none by default.
    fn param_keys(&self, keys: Vec<String>, _url_param_keys: &[String]) -> Vec<String> {
        keys
    }
}

/// The stock filter's contribution, bound to the host's labels.
pub struct StockStatusContributor {
    options: StockStatusOptions,
}

impl StockStatusContributor {
    pub fn new(options: StockStatusOptions) -> Self {
        Self { options }
    }
}

impl ActiveFilterContributor for StockStatusContributor {
    fn contribute(&self, aggregate: ActiveFilters, params: &QueryParams) -> ActiveFilters {
        register_active_filters_data(aggregate, params, &self.options)
    }

    fn param_keys(&self, keys: Vec<String>, url_param_keys: &[String]) -> Vec<String> {
        filter_query_param_keys(keys, url_param_keys)
    }
}

/// Registered contributors, folded in registration order.
#[derive(Default)]
pub struct ActiveFiltersRegistry {
    contributors: Vec<Box<dyn ActiveFilterContributor>>,
}

impl ActiveFiltersRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, contributor: impl ActiveFilterContributor + 'static) {
        self.contributors.push(Box::new(contributor));
    }

    /// Folds every contributor over an empty aggregate.
    pub fn collect(&self, params: &QueryParams) -> ActiveFilters {
        self.contributors
            .iter()
            .fold(ActiveFilters::new(), |aggregate, c| c.contribute(aggregate, params))
    }

    /// Folds every contributor's parameter keys, starting from none.
    pub fn param_keys(&self, params: &QueryParams) -> Vec<String> {
        let url_keys = params.keys();
        self.contributors
            .iter()
            .fold(Vec::new(), |keys, c| c.param_keys(keys, &url_keys))
    }
}
