//! # Editor Preview
//!
//! What the block looks like inside the editor. The preview reads the same
//! attributes and status labels as the storefront rendering, asks the host's
//! collection-data hook for an illustrative set of counts and renders a
//! disabled control. It never sees a [`Location`](crate::location::Location),
//! so it cannot touch the URL or the selection.
//!
//! List rows follow the label map's order, not the counts', so every known
//! status shows even when the sample collection has none of it.

use crate::error::Result;
use crate::model::{BlockAttributes, DisplayStyle, StockStatusCount, StockStatusOptions};
use crate::render::templates;
use serde::Serialize;
use serde_json::{Map, Value};

/// Block the editor offers as the only allowed child.
pub const HEADING_BLOCK: &str = "core/heading";

/// Blocks the editor lets authors nest inside the filter.
pub const ALLOWED_BLOCKS: &[&str] = &[HEADING_BLOCK];

/// Query sent to the collection-data hook.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    pub query_stock: bool,
    pub query_state: Map<String, Value>,
    pub is_editor: bool,
}

impl CollectionQuery {
    /// Stock counts for the editor, with no other filters applied.
    pub fn editor_stock() -> Self {
        Self {
            query_stock: true,
            query_state: Map::new(),
            is_editor: true,
        }
    }
}

/// The host's source of collection data.
pub trait CollectionDataSource {
    fn stock_status_counts(&self, query: &CollectionQuery) -> Vec<StockStatusCount>;
}

/// Fixed counts, for hosts that precompute them and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCollectionData {
    counts: Vec<StockStatusCount>,
}

impl StaticCollectionData {
    pub fn new(counts: Vec<StockStatusCount>) -> Self {
        Self { counts }
    }
}

impl CollectionDataSource for StaticCollectionData {
    fn stock_status_counts(&self, _query: &CollectionQuery) -> Vec<StockStatusCount> {
        self.counts.clone()
    }
}

/// An entry of the inner-block template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InnerBlock {
    pub name: String,
    pub content: String,
    pub level: u8,
}

/// The inner blocks a freshly inserted filter starts with.
pub fn inner_blocks_template() -> Vec<InnerBlock> {
    vec![InnerBlock {
        name: HEADING_BLOCK.to_string(),
        content: "Filter by Stock Status".to_string(),
        level: 3,
    }]
}

/// A disabled checkbox in the preview list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub value: String,
    pub label: String,
}

#[derive(Serialize)]
struct PreviewData<'a> {
    wrapper: Vec<(String, String)>,
    inner_blocks: &'a [InnerBlock],
    display_style: &'static str,
    dropdown: bool,
    placeholder: &'static str,
    rows: &'a [PreviewRow],
}

/// Renders the block for the editor canvas.
pub struct EditorPreview<D: CollectionDataSource> {
    renderer: blockmarkup::Renderer,
    data: D,
    options: StockStatusOptions,
}

impl<D: CollectionDataSource> EditorPreview<D> {
    pub fn new(data: D, options: StockStatusOptions) -> Result<Self> {
        Ok(Self {
            renderer: templates::renderer()?,
            data,
            options,
        })
    }

    /// One row per known status, with a count when counts are shown and the
    /// sample has a non-zero count for it.
    pub fn rows(&self, attributes: &BlockAttributes) -> Vec<PreviewRow> {
        let counts = self
            .data
            .stock_status_counts(&CollectionQuery::editor_stock());

        self.options
            .iter()
            .map(|(key, label)| {
                let count = counts
                    .iter()
                    .find(|entry| entry.status == *key)
                    .map(|entry| entry.count)
                    .filter(|count| *count > 0);
                let label = match count {
                    Some(count) if attributes.show_counts => {
                        format!("{} ({})", label, blockmarkup::group_digits(count))
                    }
                    _ => label.to_string(),
                };
                PreviewRow {
                    value: key.to_string(),
                    label,
                }
            })
            .collect()
    }

    /// Preview markup, with `inner_blocks` rendered as headings above the control.
    pub fn render(
        &self,
        attributes: &BlockAttributes,
        inner_blocks: &[InnerBlock],
    ) -> Result<String> {
        let dropdown = attributes.display_style == DisplayStyle::Dropdown;
        let rows = if dropdown { Vec::new() } else { self.rows(attributes) };

        let mut class = "wc-block-stock-filter".to_string();
        if let Some(extra) = attributes.class_name.as_deref().filter(|c| !c.trim().is_empty()) {
            class.push(' ');
            class.push_str(extra.trim());
        }

        let data = PreviewData {
            wrapper: vec![("class".to_string(), class)],
            inner_blocks,
            display_style: attributes.display_style.as_str(),
            dropdown,
            placeholder: attributes.select_type.placeholder(),
            rows: &rows,
        };
        Ok(self.renderer.render(templates::PREVIEW, &data)?)
    }
}
