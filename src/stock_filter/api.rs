//! # API Facade
//!
//! [`StockFilterApi`] is the single entry point a host talks to. It owns the
//! host configuration and the page [`Location`], and dispatches to the
//! components:
//!
//! - selection actions go to [`SelectionStore`]
//! - storefront markup comes from [`ServerRenderer`]
//! - the active-filters hooks come from [`active_filters`](crate::active_filters)
//! - editor markup comes from [`EditorPreview`]
//!
//! The facade holds no logic of its own beyond wiring. Like the components,
//! it never prints and never exits.
//!
//! ## Generic Over Location
//!
//! `StockFilterApi<L: Location>` works over any host location. Tests and the
//! command-line host use [`InMemoryLocation`](crate::location::memory::InMemoryLocation).

use crate::actions::SelectionStore;
use crate::active_filters::{self, ActiveFilters, StockStatusContributor};
use crate::codec::QueryParams;
use crate::config::{AssetData, FilterConfig};
use crate::error::Result;
use crate::interactivity::dom::Element;
use crate::interactivity::runtime::Runtime;
use crate::interactivity::{ActionPath, DomEvent};
use crate::location::Location;
use crate::model::{BlockAttributes, SelectionSet, StockStatusCount};
use crate::preview::{inner_blocks_template, CollectionDataSource, EditorPreview};
use crate::render::{RenderContext, ServerRenderer};

/// The stock filter block, bound to one page.
pub struct StockFilterApi<L: Location> {
    config: FilterConfig,
    store: SelectionStore<L>,
    renderer: ServerRenderer,
}

impl<L: Location> StockFilterApi<L> {
    pub fn new(location: L, config: FilterConfig) -> Result<Self> {
        Ok(Self {
            config,
            store: SelectionStore::new(location),
            renderer: ServerRenderer::new()?,
        })
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn location(&self) -> &L {
        self.store.location()
    }

    pub fn location_mut(&mut self) -> &mut L {
        self.store.location_mut()
    }

    pub fn selection(&self) -> SelectionSet {
        self.store.selection()
    }

    pub fn toggle(&mut self, value: &str, checked: bool) -> String {
        self.store.toggle(value, checked)
    }

    pub fn select_from_dropdown<I: AsRef<str>>(&mut self, selected: &[I]) -> String {
        self.store.select_from_dropdown(selected)
    }

    pub fn remove(&mut self, value: &str) -> String {
        self.store.remove(value)
    }

    /// Fires a DOM event at `target` within hydrated markup.
    pub fn dispatch(
        &mut self,
        root: &Element,
        target: &[usize],
        event: DomEvent,
    ) -> Result<Vec<ActionPath>> {
        let mut runtime = Runtime::new();
        runtime.register(&mut self.store);
        runtime.dispatch(root, target, event)
    }

    /// Storefront markup for the block.
    pub fn render(
        &self,
        attributes: &BlockAttributes,
        counts: &[StockStatusCount],
        context: &RenderContext,
    ) -> Result<String> {
        self.renderer
            .render(attributes, counts, &self.config.stock_status_options, context)
    }

    /// Storefront markup for the page the location currently points at.
    pub fn render_current(
        &self,
        attributes: &BlockAttributes,
        counts: &[StockStatusCount],
    ) -> Result<String> {
        self.render(attributes, counts, &RenderContext::for_url(self.store.location().href()))
    }

    pub fn active_filters(&self, aggregate: ActiveFilters, params: &QueryParams) -> ActiveFilters {
        active_filters::register_active_filters_data(
            aggregate,
            params,
            &self.config.stock_status_options,
        )
    }

    pub fn filter_query_param_keys(
        &self,
        keys: Vec<String>,
        url_param_keys: &[String],
    ) -> Vec<String> {
        active_filters::filter_query_param_keys(keys, url_param_keys)
    }

    /// A contributor for a shared active-filters registry.
    pub fn contributor(&self) -> StockStatusContributor {
        StockStatusContributor::new(self.config.stock_status_options.clone())
    }

    /// Editor markup, with the default inner-block template.
    pub fn preview<D: CollectionDataSource>(
        &self,
        data: D,
        attributes: &BlockAttributes,
    ) -> Result<String> {
        EditorPreview::new(data, self.config.stock_status_options.clone())?
            .render(attributes, &inner_blocks_template())
    }

    pub fn asset_data(&self) -> AssetData<'_> {
        self.config.asset_data()
    }
}
