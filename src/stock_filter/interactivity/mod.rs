//! # Interactivity Bindings
//!
//! Server markup is wired to client behavior through declarative attributes:
//!
//! ```text
//! <div data-wc-interactive='{"namespace":"woocommerce/collection-stock-filter"}'>
//!   <input value="instock" data-wc-on--change="actions.updateProducts">
//!   <button data-wc-on--click="woocommerce/collection-stock-filter::actions.removeFilter"
//!           data-wc-context='woocommerce/collection-stock-filter::{"value":"instock"}'>
//! </div>
//! ```
//!
//! - `data-wc-interactive` declares the default namespace for a subtree
//! - `data-wc-on--<event>` binds an event to an action path, either fully
//!   qualified (`namespace::actions.name`) or relative to the nearest declared
//!   namespace (`actions.name`)
//! - `data-wc-context` attaches a JSON payload to a subtree, optionally
//!   prefixed with the namespace it belongs to
//!
//! [`dom`] hydrates markup into an element tree and [`runtime`] walks that tree
//! to dispatch events to registered [`runtime::ActionStore`]s.

pub mod dom;
pub mod runtime;

use serde_json::Value;
use std::fmt;

/// Namespace of the stock filter's actions.
pub const STOCK_FILTER_NAMESPACE: &str = "woocommerce/collection-stock-filter";

/// Namespace the dropdown widget keeps its own state under.
pub const DROPDOWN_NAMESPACE: &str = "woocommerce/interactivity-dropdown";

pub const INTERACTIVE_ATTR: &str = "data-wc-interactive";
pub const CONTEXT_ATTR: &str = "data-wc-context";
pub const ON_ATTR_PREFIX: &str = "data-wc-on--";

/// Action names the stock filter namespace answers to.
pub mod actions {
    /// Dropdown selection changed.
    pub const NAVIGATE: &str = "navigate";
    /// Checkbox toggled.
    pub const UPDATE_PRODUCTS: &str = "updateProducts";
    /// Active-filter chip clicked.
    pub const REMOVE_FILTER: &str = "removeFilter";
}

/// Reference to an action, as written in an event binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPath {
    pub namespace: Option<String>,
    pub name: String,
}

impl ActionPath {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    /// A path resolved against the enclosing namespace at dispatch time.
    pub fn local(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Stock filter action by name.
    pub fn stock_filter(name: &str) -> Self {
        Self::new(STOCK_FILTER_NAMESPACE, name)
    }

    /// Parses `namespace::actions.name` or `actions.name`.
    pub fn parse(binding: &str) -> Option<Self> {
        let (namespace, path) = match binding.split_once("::") {
            Some((ns, path)) => (Some(ns.trim().to_string()), path),
            None => (None, binding),
        };
        let name = path.trim().strip_prefix("actions.")?;
        if name.is_empty() {
            return None;
        }
        Some(Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
            name: name.to_string(),
        })
    }

    /// Fills in the namespace from the enclosing declaration when absent.
    pub fn resolve(&self, default_namespace: Option<&str>) -> Option<ActionPath> {
        let namespace = self
            .namespace
            .clone()
            .or_else(|| default_namespace.map(str::to_string))?;
        Some(ActionPath::new(namespace, self.name.clone()))
    }
}

impl fmt::Display for ActionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{}::actions.{}", ns, self.name),
            None => write!(f, "actions.{}", self.name),
        }
    }
}

/// Value of a `data-wc-interactive` attribute declaring `namespace`.
pub fn interactive_directive(namespace: &str) -> String {
    serde_json::json!({ "namespace": namespace }).to_string()
}

/// Value of a `data-wc-context` attribute, prefixed with `namespace` when given.
pub fn context_directive(namespace: Option<&str>, payload: &Value) -> String {
    match namespace {
        Some(ns) => format!("{}::{}", ns, payload),
        None => payload.to_string(),
    }
}

/// Reads the namespace out of a `data-wc-interactive` value.
///
/// Accepts both the JSON object form and a bare namespace string.
pub fn parse_interactive(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('{') {
        let parsed: Value = serde_json::from_str(trimmed).ok()?;
        return parsed
            .get("namespace")
            .and_then(Value::as_str)
            .map(str::to_string);
    }
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Splits a `data-wc-context` value into its optional namespace and payload.
pub fn parse_context(value: &str) -> Option<(Option<String>, Value)> {
    let trimmed = value.trim();
    let (namespace, json) = if trimmed.starts_with('{') {
        (None, trimmed)
    } else {
        let (ns, json) = trimmed.split_once("::")?;
        (Some(ns.to_string()), json)
    };
    let payload: Value = serde_json::from_str(json).ok()?;
    payload.is_object().then_some((namespace, payload))
}

/// What the event target reported when the event fired.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTarget {
    pub value: Option<String>,
    pub checked: Option<bool>,
}

/// A DOM event as seen by action handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub kind: String,
    pub target: EventTarget,
    pub detail: Value,
}

impl DomEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            target: EventTarget::default(),
            detail: Value::Null,
        }
    }

    /// A checkbox `change` after the box became `checked`.
    ///
    /// The target value is filled in from the element at dispatch time.
    pub fn change(checked: bool) -> Self {
        Self {
            target: EventTarget {
                value: None,
                checked: Some(checked),
            },
            ..Self::new("change")
        }
    }

    pub fn click() -> Self {
        Self::new("click")
    }

    /// The dropdown widget's `select` event carrying the new selection.
    pub fn select<I: AsRef<str>>(values: &[I]) -> Self {
        let items: Vec<Value> = values
            .iter()
            .map(|v| serde_json::json!({ "label": v.as_ref(), "value": v.as_ref() }))
            .collect();
        Self {
            detail: serde_json::json!({ "selectedItems": items }),
            ..Self::new("select")
        }
    }
}
