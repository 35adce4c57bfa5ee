use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use stock_filter::model::{BlockAttributes, DisplayStyle, SelectType, StockStatusCount};

#[derive(Parser, Debug)]
#[command(name = "stock-filter")]
#[command(
    about = "Stock-status filter: URL state, storefront markup and editor preview",
    long_about = None
)]
#[command(version = version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Host configuration file (status labels, out-of-stock visibility)
    #[arg(short, long, global = true, env = "STOCK_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log filter, either a level or full directives (overrides --verbose)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the stock statuses a URL selects
    Decode {
        url: String,

        /// Print a JSON array instead of one key per line
        #[arg(long)]
        json: bool,
    },

    /// Check or uncheck a status and print the URL navigated to
    Toggle {
        url: String,

        value: String,

        /// The checkbox was unchecked
        #[arg(long)]
        unchecked: bool,
    },

    /// Replace the selection with the given statuses and print the URL
    Select {
        url: String,

        /// Selected statuses; none clears the filter
        values: Vec<String>,
    },

    /// Remove a status (active-filter chip click) and print the URL
    Remove { url: String, value: String },

    /// Render the storefront markup for a URL
    Render {
        url: String,

        #[command(flatten)]
        block: BlockArgs,

        /// Per-status counts (e.g. instock=12)
        #[arg(long = "count", value_parser = parse_count)]
        counts: Vec<StockStatusCount>,

        /// Render as the administrative editor would (produces nothing)
        #[arg(long)]
        admin: bool,

        /// Render as an asynchronous page update would (produces nothing)
        #[arg(long)]
        ajax: bool,

        /// Markup of the inner blocks, placed before the controls
        #[arg(long, default_value = "")]
        inner_content: String,
    },

    /// Print the active-filters contribution for a URL as JSON
    Active { url: String },

    /// Render the editor preview
    Preview {
        #[command(flatten)]
        block: BlockArgs,

        /// Sample counts (e.g. instock=12)
        #[arg(long = "count", value_parser = parse_count)]
        counts: Vec<StockStatusCount>,
    },

    /// Print the data handed to the client script as JSON
    Assets,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleArg {
    List,
    Dropdown,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectArg {
    Single,
    Multiple,
}

/// Block attributes, either piecewise or as the stored JSON.
#[derive(Args, Debug, Clone)]
pub struct BlockArgs {
    #[arg(long, value_enum, default_value_t = StyleArg::List)]
    pub display_style: StyleArg,

    #[arg(long)]
    pub show_counts: bool,

    #[arg(long, value_enum, default_value_t = SelectArg::Single)]
    pub select_type: SelectArg,

    #[arg(long)]
    pub class_name: Option<String>,

    /// Block attributes JSON (overrides the flags above)
    #[arg(long, conflicts_with_all = ["display_style", "show_counts", "select_type", "class_name"])]
    pub attributes: Option<String>,
}

impl BlockArgs {
    pub fn to_attributes(&self) -> Result<BlockAttributes, serde_json::Error> {
        if let Some(json) = &self.attributes {
            return serde_json::from_str(json);
        }
        Ok(BlockAttributes {
            display_style: match self.display_style {
                StyleArg::List => DisplayStyle::List,
                StyleArg::Dropdown => DisplayStyle::Dropdown,
            },
            show_counts: self.show_counts,
            select_type: match self.select_type {
                SelectArg::Single => SelectType::Single,
                SelectArg::Multiple => SelectType::Multiple,
            },
            class_name: self.class_name.clone(),
        })
    }
}

fn parse_count(raw: &str) -> Result<StockStatusCount, String> {
    let (status, count) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected STATUS=COUNT, got '{}'", raw))?;
    let status = status.trim();
    if status.is_empty() {
        return Err(format!("missing status in '{}'", raw));
    }
    let count = count
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("invalid count in '{}': {}", raw, e))?;
    Ok(StockStatusCount::new(status, count))
}

fn version() -> &'static str {
    if env!("IS_RELEASE") == "true" || env!("GIT_HASH").is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("instock=12"), Ok(StockStatusCount::new("instock", 12)));
        assert_eq!(parse_count(" onbackorder = 3 "), Ok(StockStatusCount::new("onbackorder", 3)));
        assert!(parse_count("instock").is_err());
        assert!(parse_count("=3").is_err());
        assert!(parse_count("instock=-1").is_err());
    }

    #[test]
    fn test_block_args_to_attributes() {
        let cli = Cli::parse_from([
            "stock-filter",
            "render",
            "/shop/",
            "--display-style",
            "dropdown",
            "--select-type",
            "multiple",
            "--show-counts",
        ]);
        let Commands::Render { block, .. } = cli.command else {
            panic!("expected render");
        };
        let attributes = block.to_attributes().unwrap();
        assert_eq!(attributes.display_style, DisplayStyle::Dropdown);
        assert_eq!(attributes.select_type, SelectType::Multiple);
        assert!(attributes.show_counts);
    }

    #[test]
    fn test_block_args_from_json() {
        let cli = Cli::parse_from([
            "stock-filter",
            "preview",
            "--attributes",
            r#"{"displayStyle":"dropdown"}"#,
        ]);
        let Commands::Preview { block, .. } = cli.command else {
            panic!("expected preview");
        };
        assert_eq!(block.to_attributes().unwrap().display_style, DisplayStyle::Dropdown);
    }

    #[test]
    fn test_repeated_counts() {
        let cli = Cli::parse_from([
            "stock-filter",
            "render",
            "/shop/",
            "--count",
            "instock=1",
            "--count",
            "outofstock=2",
        ]);
        let Commands::Render { counts, .. } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(counts.len(), 2);
    }
}
