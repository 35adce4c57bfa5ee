//! # Selection Store
//!
//! The client-side actions that mutate the selection. The store never keeps a
//! copy of the selection: every action reads the current URL from its
//! [`Location`], derives the new selection, encodes it back into that same URL
//! and requests a navigation. The read, mutation and navigation happen within a
//! single call, so two rapid events each start from whatever URL the previous
//! one left behind, and the last navigation wins.
//!
//! The three operations map onto the actions the rendered markup binds to:
//!
//! | Action           | Trigger                 | Operation                     |
//! |------------------|-------------------------|-------------------------------|
//! | `updateProducts` | checkbox `change`       | [`SelectionStore::toggle`]    |
//! | `navigate`       | dropdown `select`       | [`SelectionStore::select_from_dropdown`] |
//! | `removeFilter`   | active-filter chip click | [`SelectionStore::remove`]   |
//!
//! None of them can fail from the user's point of view. Unknown keys are
//! carried through untouched.

use crate::codec;
use crate::interactivity::runtime::{ActionScope, ActionStore};
use crate::interactivity::{actions, DROPDOWN_NAMESPACE, STOCK_FILTER_NAMESPACE};
use crate::location::Location;
use crate::model::SelectionSet;
use serde_json::{Map, Value};

/// The stock filter's action namespace, bound to a page location.
pub struct SelectionStore<L: Location> {
    location: L,
}

impl<L: Location> SelectionStore<L> {
    pub fn new(location: L) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn location_mut(&mut self) -> &mut L {
        &mut self.location
    }

    pub fn into_inner(self) -> L {
        self.location
    }

    /// The selection as the current URL states it.
    pub fn selection(&self) -> SelectionSet {
        codec::decode(&self.location.href())
    }

    /// Adds `value` when `checked`, removes it otherwise, then navigates.
    ///
    /// Checking an already-selected key or unchecking an absent one leaves the
    /// selection as it was; the navigation still happens.
    pub fn toggle(&mut self, value: &str, checked: bool) -> String {
        self.commit(|selection| {
            if checked {
                selection.insert(value);
            } else {
                selection.remove(value);
            }
        })
    }

    /// Replaces the selection with the dropdown's items, then navigates.
    pub fn select_from_dropdown<I: AsRef<str>>(&mut self, selected: &[I]) -> String {
        let replacement: SelectionSet = selected.iter().map(|item| item.as_ref()).collect();
        self.commit(move |selection| *selection = replacement)
    }

    /// Drops `value` from the selection, then navigates.
    pub fn remove(&mut self, value: &str) -> String {
        self.commit(|selection| {
            selection.remove(value);
        })
    }

    fn commit(&mut self, mutate: impl FnOnce(&mut SelectionSet)) -> String {
        let href = self.location.href();
        let mut selection = codec::decode(&href);
        mutate(&mut selection);

        let target = codec::encode(&selection, &href);
        tracing::debug!(from = %href, to = %target, selection = %selection.join(), "navigating");
        self.location.navigate(&target);
        target
    }
}

impl<L: Location> ActionStore for SelectionStore<L> {
    fn namespace(&self) -> &str {
        STOCK_FILTER_NAMESPACE
    }

    fn invoke(&mut self, action: &str, scope: &ActionScope<'_>) -> bool {
        match action {
            actions::NAVIGATE => {
                let items = selected_items(&scope.event.detail)
                    .or_else(|| {
                        scope
                            .context_for(DROPDOWN_NAMESPACE)
                            .and_then(|ctx| ctx.get("selectedItems"))
                            .and_then(item_values)
                    })
                    .unwrap_or_default();
                self.select_from_dropdown(&items);
            }
            actions::UPDATE_PRODUCTS => {
                let target = &scope.event.target;
                match (target.value.as_deref(), target.checked) {
                    (Some(value), Some(checked)) => {
                        self.toggle(value, checked);
                    }
                    (None, _) => tracing::warn!("checkbox change without a value, ignoring"),
                    (Some(value), None) => {
                        tracing::warn!(value, "checkbox change without a checked state, ignoring")
                    }
                }
            }
            actions::REMOVE_FILTER => match scope.context().and_then(context_value) {
                Some(value) => {
                    self.remove(&value);
                }
                None => tracing::warn!("remove filter without a value in context, ignoring"),
            },
            _ => return false,
        }
        true
    }
}

fn selected_items(detail: &Value) -> Option<Vec<String>> {
    detail.get("selectedItems").and_then(item_values)
}

/// Values of a `[{label, value}]` list. Bare strings are accepted as values.
fn item_values(items: &Value) -> Option<Vec<String>> {
    let items = items.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(value) => Some(value.clone()),
                other => other.get("value").and_then(Value::as_str).map(str::to_string),
            })
            .collect(),
    )
}

fn context_value(context: &Map<String, Value>) -> Option<String> {
    context.get("value").and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactivity::dom::Element;
    use crate::interactivity::runtime::Runtime;
    use crate::interactivity::{
        context_directive, interactive_directive, DomEvent, CONTEXT_ATTR, INTERACTIVE_ATTR,
    };
    use crate::location::memory::InMemoryLocation;
    use serde_json::json;

    fn store(href: &str) -> SelectionStore<InMemoryLocation> {
        SelectionStore::new(InMemoryLocation::new(href))
    }

    #[test]
    fn test_check_on_bare_url() {
        let mut store = store("/shop/");
        assert_eq!(
            store.toggle("outofstock", true),
            "/shop/?filter_stock_status=outofstock"
        );
        assert_eq!(store.location().href(), "/shop/?filter_stock_status=outofstock");
    }

    #[test]
    fn test_check_appends_and_keeps_other_params() {
        let mut store = store("/shop/?filter_stock_status=instock&orderby=price");
        assert_eq!(
            store.toggle("outofstock", true),
            "/shop/?filter_stock_status=instock%2Coutofstock&orderby=price"
        );
    }

    #[test]
    fn test_uncheck_removes_key() {
        let mut store = store("/shop/?filter_stock_status=instock,outofstock");
        assert_eq!(
            store.toggle("instock", false),
            "/shop/?filter_stock_status=outofstock"
        );
    }

    #[test]
    fn test_remove_last_drops_param() {
        let mut store = store("/shop/?filter_stock_status=outofstock");
        assert_eq!(store.remove("outofstock"), "/shop/");
    }

    #[test]
    fn test_remove_keeps_unknown_keys() {
        let mut store = store("/shop/?filter_stock_status=unknownkey,instock");
        assert_eq!(store.remove("instock"), "/shop/?filter_stock_status=unknownkey");
    }

    #[test]
    fn test_remove_absent_is_noop_on_selection() {
        let mut store = store("/shop/?filter_stock_status=instock");
        assert_eq!(store.remove("outofstock"), "/shop/?filter_stock_status=instock");
    }

    #[test]
    fn test_check_already_selected_is_noop_on_selection() {
        let mut store = store("/shop/?filter_stock_status=instock");
        assert_eq!(store.toggle("instock", true), "/shop/?filter_stock_status=instock");
    }

    #[test]
    fn test_blank_value_never_writes_param() {
        let mut store = store("/shop/");
        assert_eq!(store.toggle("", true), "/shop/");
        assert_eq!(store.toggle("  ", true), "/shop/");
        assert!(!store.location().href().contains("filter_stock_status"));
    }

    #[test]
    fn test_comma_value_round_trips_as_separate_keys() {
        let mut store = store("/shop/");
        assert_eq!(store.toggle("a,b", true), "/shop/?filter_stock_status=a%2Cb");
        assert_eq!(store.selection().len(), 2);
        assert_eq!(store.toggle("a,b", false), "/shop/");
    }

    #[test]
    fn test_dropdown_replaces_selection() {
        let mut store = store("/shop/");
        assert_eq!(
            store.select_from_dropdown(&["instock", "onbackorder"]),
            "/shop/?filter_stock_status=instock%2Conbackorder"
        );
        let none: [&str; 0] = [];
        assert_eq!(store.select_from_dropdown(&none), "/shop/");
    }

    #[test]
    fn test_dropdown_dedupes() {
        let mut store = store("/shop/");
        assert_eq!(
            store.select_from_dropdown(&["instock", "instock"]),
            "/shop/?filter_stock_status=instock"
        );
    }

    #[test]
    fn test_toggle_involution() {
        let start = "/shop/?orderby=price&filter_stock_status=onbackorder";
        let mut store = store(start);
        let original = store.selection();
        store.toggle("instock", true);
        store.toggle("instock", false);
        assert!(store.selection().same_members(&original));
    }

    #[test]
    fn test_each_action_reads_current_url() {
        let mut store = store("/shop/");
        store.toggle("instock", true);
        store
            .location_mut()
            .replace("/shop/?filter_stock_status=instock%2Conbackorder");
        assert_eq!(
            store.toggle("outofstock", true),
            "/shop/?filter_stock_status=instock%2Conbackorder%2Coutofstock"
        );
    }

    #[test]
    fn test_rapid_toggles_compose() {
        let mut store = store("/shop/");
        store.toggle("instock", true);
        store.toggle("outofstock", true);
        assert_eq!(store.selection().join(), "instock,outofstock");
        assert_eq!(store.location().navigations(), 2);
    }

    #[test]
    fn test_back_restores_previous_selection() {
        let mut store = store("/shop/");
        store.toggle("instock", true);
        store.toggle("outofstock", true);
        store.location_mut().back();
        assert_eq!(store.selection().join(), "instock");
        assert_eq!(
            store.toggle("onbackorder", true),
            "/shop/?filter_stock_status=instock%2Conbackorder"
        );
    }

    fn bound_tree() -> Element {
        Element::new("div")
            .with_attr(INTERACTIVE_ATTR, interactive_directive(STOCK_FILTER_NAMESPACE))
            .with_child(
                Element::new("input")
                    .with_attr("value", "outofstock")
                    .with_attr("data-wc-on--change", "actions.updateProducts"),
            )
            .with_child(
                Element::new("button")
                    .with_attr(
                        "data-wc-on--click",
                        "woocommerce/collection-stock-filter::actions.removeFilter",
                    )
                    .with_attr(
                        CONTEXT_ATTR,
                        context_directive(
                            Some(STOCK_FILTER_NAMESPACE),
                            &json!({"value": "instock"}),
                        ),
                    ),
            )
            .with_child(
                Element::new("div")
                    .with_attr(INTERACTIVE_ATTR, interactive_directive(DROPDOWN_NAMESPACE))
                    .with_attr(
                        CONTEXT_ATTR,
                        json!({
                            "selectedItems": [{"label": "On backorder", "value": "onbackorder"}]
                        })
                        .to_string(),
                    )
                    .with_attr(
                        "data-wc-on--select",
                        "woocommerce/collection-stock-filter::actions.navigate",
                    ),
            )
    }

    #[test]
    fn test_dispatch_change_event() {
        let root = bound_tree();
        let mut store = store("/shop/");
        {
            let mut runtime = Runtime::new();
            runtime.register(&mut store);
            runtime.dispatch(&root, &[0], DomEvent::change(true)).unwrap();
        }
        assert_eq!(store.location().href(), "/shop/?filter_stock_status=outofstock");
    }

    #[test]
    fn test_dispatch_chip_click() {
        let root = bound_tree();
        let mut store = store("/shop/?filter_stock_status=instock,outofstock");
        {
            let mut runtime = Runtime::new();
            runtime.register(&mut store);
            runtime.dispatch(&root, &[1], DomEvent::click()).unwrap();
        }
        assert_eq!(store.location().href(), "/shop/?filter_stock_status=outofstock");
    }

    #[test]
    fn test_dispatch_dropdown_select_uses_event_detail() {
        let root = bound_tree();
        let mut store = store("/shop/");
        {
            let mut runtime = Runtime::new();
            runtime.register(&mut store);
            runtime
                .dispatch(&root, &[2], DomEvent::select(&["instock", "onbackorder"]))
                .unwrap();
        }
        assert_eq!(
            store.location().href(),
            "/shop/?filter_stock_status=instock%2Conbackorder"
        );
    }

    #[test]
    fn test_dispatch_dropdown_select_falls_back_to_widget_context() {
        let root = bound_tree();
        let mut store = store("/shop/");
        {
            let mut runtime = Runtime::new();
            runtime.register(&mut store);
            runtime.dispatch(&root, &[2], DomEvent::new("select")).unwrap();
        }
        assert_eq!(store.location().href(), "/shop/?filter_stock_status=onbackorder");
    }

    #[test]
    fn test_change_without_checked_state_is_skipped() {
        let root = bound_tree();
        let mut store = store("/shop/?filter_stock_status=outofstock");
        {
            let mut runtime = Runtime::new();
            runtime.register(&mut store);
            runtime.dispatch(&root, &[0], DomEvent::new("change")).unwrap();
        }
        assert_eq!(store.location().navigations(), 0);
        assert_eq!(store.location().href(), "/shop/?filter_stock_status=outofstock");
    }

    #[test]
    fn test_dispatch_change_on_blank_checkbox() {
        let root = Element::new("div")
            .with_attr(INTERACTIVE_ATTR, interactive_directive(STOCK_FILTER_NAMESPACE))
            .with_child(
                Element::new("input")
                    .with_attr("value", "")
                    .with_attr("data-wc-on--change", "actions.updateProducts"),
            );
        let mut store = store("/shop/");
        {
            let mut runtime = Runtime::new();
            runtime.register(&mut store);
            runtime.dispatch(&root, &[0], DomEvent::change(true)).unwrap();
        }
        assert_eq!(store.location().href(), "/shop/");
    }

    #[test]
    fn test_unknown_action_not_handled() {
        let mut store = store("/shop/");
        let root = Element::new("div")
            .with_attr(INTERACTIVE_ATTR, interactive_directive(STOCK_FILTER_NAMESPACE))
            .with_attr("data-wc-on--click", "actions.openModal");
        let invoked = {
            let mut runtime = Runtime::new();
            runtime.register(&mut store);
            runtime.dispatch(&root, &[], DomEvent::click()).unwrap()
        };
        assert!(invoked.is_empty());
        assert_eq!(store.location().navigations(), 0);
    }
}
