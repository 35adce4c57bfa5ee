//! Dropdown widget contract.
//!
//! The dropdown is an external widget; the filter only hands it props. What
//! gets rendered here is the widget's server markup as far as hydration needs
//! it: a root declaring the widget's own namespace, a context carrying the
//! current `selectedItems`, and a `select` binding pointing at the filter's
//! `navigate` action. The widget fires `select` at its root with
//! `{selectedItems: [{label, value}]}` as detail.

use super::templates;
use crate::error::Result;
use crate::interactivity::{
    interactive_directive, ActionPath, CONTEXT_ATTR, DROPDOWN_NAMESPACE, INTERACTIVE_ATTR,
    ON_ATTR_PREFIX,
};
use crate::model::SelectType;
use serde::Serialize;

/// One option the widget offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownItem {
    pub label: String,
    pub value: String,
}

/// Props handed to the dropdown widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownProps {
    pub items: Vec<DropdownItem>,
    /// Fully-qualified action the widget calls on selection change.
    pub action: String,
    pub selected_items: Vec<DropdownItem>,
    pub select_type: SelectType,
    pub placeholder: String,
}

impl DropdownProps {
    pub fn new(
        items: Vec<DropdownItem>,
        selected_items: Vec<DropdownItem>,
        select_type: SelectType,
    ) -> Self {
        Self {
            items,
            action: ActionPath::stock_filter(crate::interactivity::actions::NAVIGATE).to_string(),
            selected_items,
            select_type,
            placeholder: select_type.placeholder().to_string(),
        }
    }
}

#[derive(Serialize)]
struct OptionRow<'a> {
    label: &'a str,
    value: &'a str,
    selected: bool,
}

#[derive(Serialize)]
struct DropdownData<'a> {
    root: Vec<(String, String)>,
    items: Vec<OptionRow<'a>>,
    selected_items: &'a [DropdownItem],
    placeholder: &'a str,
    multiple: bool,
}

pub(crate) fn render(renderer: &blockmarkup::Renderer, props: &DropdownProps) -> Result<String> {
    let context = serde_json::json!({
        "selectedItems": props.selected_items,
        "selectType": props.select_type,
    });

    let items = props
        .items
        .iter()
        .map(|item| OptionRow {
            label: &item.label,
            value: &item.value,
            selected: props.selected_items.iter().any(|s| s.value == item.value),
        })
        .collect();

    let data = DropdownData {
        root: vec![
            (INTERACTIVE_ATTR.to_string(), interactive_directive(DROPDOWN_NAMESPACE)),
            (CONTEXT_ATTR.to_string(), context.to_string()),
            (format!("{}select", ON_ATTR_PREFIX), props.action.clone()),
        ],
        items,
        selected_items: &props.selected_items,
        placeholder: &props.placeholder,
        multiple: props.select_type == SelectType::Multiple,
    };

    Ok(renderer.render(templates::DROPDOWN, &data)?)
}
