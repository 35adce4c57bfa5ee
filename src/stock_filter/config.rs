use crate::error::{FilterError, Result};
use crate::model::StockStatusOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Host data for the stock filter, stored as JSON.
///
/// ```json
/// {
///   "stockStatusOptions": { "instock": "In stock", "outofstock": "Out of stock" },
///   "hideOutOfStockItems": false
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    /// Status keys and their labels, in display order.
    pub stock_status_options: StockStatusOptions,

    /// Whether the store hides out-of-stock products. Passed through to the
    /// client untouched.
    pub hide_out_of_stock_items: bool,
}

/// Data handed to the client script alongside the block.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetData<'a> {
    pub stock_status_options: &'a StockStatusOptions,
    pub hide_out_of_stock_items: bool,
}

impl FilterConfig {
    /// Load config from `path`, or return defaults if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: FilterConfig = serde_json::from_str(&content)?;
        if config.stock_status_options.is_empty() {
            return Err(FilterError::Config(format!(
                "{}: stockStatusOptions must list at least one status",
                path.display()
            )));
        }
        Ok(config)
    }

    /// Save config to `path`, creating parent directories as needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn asset_data(&self) -> AssetData<'_> {
        AssetData {
            stock_status_options: &self.stock_status_options,
            hide_out_of_stock_items: self.hide_out_of_stock_items,
        }
    }
}
