use anyhow::Result;
use chrono::Utc;
use std::time::Duration;
use torgi_lots::{
    config::{Config, OutputFormat},
    output,
    pipeline::{self, Aggregator, HttpPageSource},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RETRY_BASE: Duration = Duration::from_millis(750);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    info!(
        url = %config.listing_url(),
        pages = config.pages(),
        "Scraping auction listing"
    );

    let source = HttpPageSource::new(config.listing_url().clone(), config.page_param());
    let aggregator = Aggregator::new(source)
        .with_page_delay(config.page_delay())
        .with_retries(config.fetch_retries(), RETRY_BASE);

    let lots = pipeline::sort_by_price_desc(aggregator.run(config.pages()).await);
    if lots.is_empty() {
        warn!("No lots found on any listing page");
    }

    let filtered = pipeline::filter_by_price_range(
        lots.clone(),
        config.min_price(),
        config.max_price(),
    );

    let rendered = match config.output_format() {
        OutputFormat::Text => {
            let mut text = output::render_listing("Lots", &lots);
            if config.min_price().is_some() || config.max_price().is_some() {
                text.push('\n');
                text.push_str(&output::render_listing("Within price range", &filtered));
            }
            text
        }
        OutputFormat::Json => output::to_json(&filtered, Utc::now())?,
        OutputFormat::Csv => output::to_csv(&filtered)?,
    };

    match config.output_path() {
        Some(path) => {
            tokio::fs::write(path, rendered).await?;
            info!(path, count = filtered.len(), "Saved lots");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}
