//! # Server Renderer
//!
//! Emits the block's initial markup for a page request. Output depends only on
//! its inputs: block attributes, the per-status counts of the current
//! collection, the host's status labels and the request context. Nothing is
//! kept between requests.
//!
//! ## Layout
//!
//! ```text
//! <div wrapper attributes + data-wc-interactive>
//!   inner blocks (heading)
//!   <div class="wc-block-stock-filter__controls">
//!     list of checkboxes | dropdown widget
//!   </div>
//!   <div class="wc-block-stock-filter__actions"></div>
//! </div>
//! ```
//!
//! Rows come from the counts, never from the URL: a key in the URL that has no
//! count produces no row, and a counted key with no label uses the key itself.
//! A row is checked when its key is a member of the decoded URL selection.

pub mod dropdown;
pub mod templates;

use crate::codec;
use crate::error::Result;
use crate::interactivity::{interactive_directive, INTERACTIVE_ATTR, STOCK_FILTER_NAMESPACE};
use crate::model::{
    BlockAttributes, DisplayStyle, SelectionSet, StockStatusCount, StockStatusOptions,
};
use dropdown::{DropdownItem, DropdownProps};
use serde::Serialize;

/// Class every rendering of the block carries on its wrapper.
pub const BLOCK_CLASS: &str = "wp-block-woocommerce-collection-stock-filter";

/// Request-level facts the host supplies alongside the block data.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Rendering inside the administrative editor.
    pub is_admin: bool,
    /// Rendering for an asynchronous page update.
    pub doing_ajax: bool,
    /// The URL of the request being served.
    pub url: String,
    /// Wrapper attributes computed by the host; `None` uses the block defaults.
    pub wrapper_attributes: Option<Vec<(String, String)>>,
    /// Already-rendered inner blocks.
    pub inner_content: String,
}

impl RenderContext {
    pub fn for_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_inner_content(mut self, inner: impl Into<String>) -> Self {
        self.inner_content = inner.into();
        self
    }

    fn is_inert(&self) -> bool {
        self.is_admin || self.doing_ajax
    }
}

#[derive(Serialize)]
struct Row {
    value: String,
    label: String,
    count: u64,
    checked: bool,
}

#[derive(Serialize)]
struct ListData<'a> {
    rows: &'a [Row],
    show_counts: bool,
}

#[derive(Serialize)]
struct BlockData<'a> {
    wrapper: Vec<(String, String)>,
    inner_content: &'a str,
    controls: String,
}

/// Renders the block's frontend markup.
pub struct ServerRenderer {
    renderer: blockmarkup::Renderer,
}

impl ServerRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            renderer: templates::renderer()?,
        })
    }

    /// Markup for one block instance, or the empty string in the editor and
    /// during asynchronous updates.
    pub fn render(
        &self,
        attributes: &BlockAttributes,
        counts: &[StockStatusCount],
        options: &StockStatusOptions,
        context: &RenderContext,
    ) -> Result<String> {
        if context.is_inert() {
            tracing::debug!(
                is_admin = context.is_admin,
                doing_ajax = context.doing_ajax,
                "skipping render outside the storefront"
            );
            return Ok(String::new());
        }

        let selection = codec::decode(&context.url);
        let controls = match attributes.display_style {
            DisplayStyle::List => self.render_list(attributes, counts, options, &selection)?,
            DisplayStyle::Dropdown => {
                let props = dropdown_props(attributes, counts, options, &selection);
                dropdown::render(&self.renderer, &props)?
            }
        };

        let data = BlockData {
            wrapper: wrapper_attributes(attributes, context),
            inner_content: &context.inner_content,
            controls,
        };
        Ok(self.renderer.render(templates::BLOCK, &data)?)
    }

    fn render_list(
        &self,
        attributes: &BlockAttributes,
        counts: &[StockStatusCount],
        options: &StockStatusOptions,
        selection: &SelectionSet,
    ) -> Result<String> {
        let rows: Vec<Row> = counts
            .iter()
            .map(|entry| Row {
                value: entry.status.to_string(),
                label: row_label(options, entry),
                count: entry.count,
                checked: selection.contains(entry.status.as_str()),
            })
            .collect();

        let data = ListData {
            rows: &rows,
            show_counts: attributes.show_counts,
        };
        Ok(self.renderer.render(templates::LIST, &data)?)
    }
}

/// Dropdown props for the given counts and selection.
pub fn dropdown_props(
    attributes: &BlockAttributes,
    counts: &[StockStatusCount],
    options: &StockStatusOptions,
    selection: &SelectionSet,
) -> DropdownProps {
    let items: Vec<DropdownItem> = counts
        .iter()
        .map(|entry| {
            let label = row_label(options, entry);
            DropdownItem {
                label: if attributes.show_counts {
                    format!("{} ({})", label, blockmarkup::group_digits(entry.count))
                } else {
                    label
                },
                value: entry.status.to_string(),
            }
        })
        .collect();

    let selected = items
        .iter()
        .filter(|item| selection.contains(&item.value))
        .cloned()
        .collect();

    DropdownProps::new(items, selected, attributes.select_type)
}

fn row_label(options: &StockStatusOptions, entry: &StockStatusCount) -> String {
    match options.label(entry.status.as_str()) {
        Some(label) => label.to_string(),
        None => {
            tracing::debug!(status = %entry.status, "no label for counted status, using key");
            entry.status.to_string()
        }
    }
}

/// The block's default wrapper attributes plus the namespace declaration.
fn wrapper_attributes(
    attributes: &BlockAttributes,
    context: &RenderContext,
) -> Vec<(String, String)> {
    let mut wrapper = context.wrapper_attributes.clone().unwrap_or_else(|| {
        let class = match attributes.class_name.as_deref().map(str::trim) {
            Some(extra) if !extra.is_empty() => format!("{} {}", BLOCK_CLASS, extra),
            _ => BLOCK_CLASS.to_string(),
        };
        vec![("class".to_string(), class)]
    });
    wrapper.retain(|(name, _)| name != INTERACTIVE_ATTR);
    wrapper.push((
        INTERACTIVE_ATTR.to_string(),
        interactive_directive(STOCK_FILTER_NAMESPACE),
    ));
    wrapper
}
