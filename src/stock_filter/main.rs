use clap::Parser;
use stock_filter::active_filters::ActiveFilters;
use stock_filter::api::StockFilterApi;
use stock_filter::codec::PageUrl;
use stock_filter::config::FilterConfig;
use stock_filter::error::{FilterError, Result};
use stock_filter::location::memory::InMemoryLocation;
use stock_filter::logging::init_tracing;
use stock_filter::model::StockStatusCount;
use stock_filter::preview::StaticCollectionData;
use stock_filter::render::RenderContext;

mod args;
use args::{BlockArgs, Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json)
        .map_err(|e| FilterError::Config(format!("cannot initialise logging: {}", e)))?;

    let config = match &cli.config {
        Some(path) => FilterConfig::load(path)?,
        None => FilterConfig::default(),
    };

    match cli.command {
        Commands::Decode { url, json } => handle_decode(config, &url, json),
        Commands::Toggle {
            url,
            value,
            unchecked,
        } => {
            let mut api = open(config, &url)?;
            println!("{}", api.toggle(&value, !unchecked));
            Ok(())
        }
        Commands::Select { url, values } => {
            let mut api = open(config, &url)?;
            println!("{}", api.select_from_dropdown(&values));
            Ok(())
        }
        Commands::Remove { url, value } => {
            let mut api = open(config, &url)?;
            println!("{}", api.remove(&value));
            Ok(())
        }
        Commands::Render {
            url,
            block,
            counts,
            admin,
            ajax,
            inner_content,
        } => {
            let context = RenderContext {
                is_admin: admin,
                doing_ajax: ajax,
                inner_content,
                ..RenderContext::for_url(url.clone())
            };
            handle_render(config, &url, &block, &counts, &context)
        }
        Commands::Active { url } => handle_active(config, &url),
        Commands::Preview { block, counts } => handle_preview(config, &block, counts),
        Commands::Assets => {
            let api = open(config, "/")?;
            println!("{}", serde_json::to_string_pretty(&api.asset_data())?);
            Ok(())
        }
    }
}

/// Builds the facade over an in-memory location at `url`.
///
/// Absolute URLs must parse; relative ones are taken as they are.
fn open(config: FilterConfig, url: &str) -> Result<StockFilterApi<InMemoryLocation>> {
    if url.contains("://") {
        url::Url::parse(url)
            .map_err(|e| FilterError::Config(format!("invalid URL '{}': {}", url, e)))?;
    }
    StockFilterApi::new(InMemoryLocation::new(url), config)
}

fn handle_decode(config: FilterConfig, url: &str, json: bool) -> Result<()> {
    let selection = open(config, url)?.selection();
    if json {
        println!("{}", serde_json::to_string(&selection)?);
    } else {
        for key in &selection {
            println!("{}", key);
        }
    }
    Ok(())
}

fn handle_render(
    config: FilterConfig,
    url: &str,
    block: &BlockArgs,
    counts: &[StockStatusCount],
    context: &RenderContext,
) -> Result<()> {
    let api = open(config, url)?;
    let attributes = block.to_attributes()?;
    let html = api.render(&attributes, counts, context)?;
    if !html.is_empty() {
        println!("{}", html.trim_end());
    }
    Ok(())
}

fn handle_active(config: FilterConfig, url: &str) -> Result<()> {
    let api = open(config, url)?;
    let params = PageUrl::parse(url).query_params();
    let aggregate = api.active_filters(ActiveFilters::new(), &params);
    let keys = api.filter_query_param_keys(Vec::new(), &params.keys());
    let output = serde_json::json!({
        "activeFilters": aggregate,
        "paramKeys": keys,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn handle_preview(
    config: FilterConfig,
    block: &BlockArgs,
    counts: Vec<StockStatusCount>,
) -> Result<()> {
    let api = open(config, "/")?;
    let attributes = block.to_attributes()?;
    let html = api.preview(StaticCollectionData::new(counts), &attributes)?;
    println!("{}", html.trim_end());
    Ok(())
}
