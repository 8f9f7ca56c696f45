//! Runtime configuration.
//!
//! Everything is read from environment variables by [`Config::from_env`],
//! falling back to defaults that scrape the first page of the open auction
//! listing and print it to the terminal.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const ENV_LISTING_URL: &str = "TORGI_LISTING_URL";
pub const ENV_PAGE_PARAM: &str = "TORGI_PAGE_PARAM";
pub const ENV_PAGES: &str = "TORGI_PAGES";
pub const ENV_MIN_PRICE: &str = "TORGI_MIN_PRICE";
pub const ENV_MAX_PRICE: &str = "TORGI_MAX_PRICE";
pub const ENV_PAGE_DELAY_MS: &str = "TORGI_PAGE_DELAY_MS";
pub const ENV_FETCH_RETRIES: &str = "TORGI_FETCH_RETRIES";
pub const ENV_OUTPUT_FORMAT: &str = "TORGI_OUTPUT_FORMAT";
pub const ENV_OUTPUT_PATH: &str = "TORGI_OUTPUT_PATH";

const DEFAULT_LISTING_URL: &str =
    "https://torgi.org/index.php?class=Auction&action=List&mod=Open&AuctionType=All";
const DEFAULT_PAGE_PARAM: &str = "page";
const DEFAULT_PAGES: u32 = 1;
const DEFAULT_PAGE_DELAY_MS: u64 = 500;
const DEFAULT_FETCH_RETRIES: u32 = 2;

/// How the final lot list is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("unknown format '{other}', expected text, json or csv")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    listing_url: Url,
    page_param: String,
    pages: u32,
    min_price: Option<f64>,
    max_price: Option<f64>,
    page_delay: Duration,
    fetch_retries: u32,
    output_format: OutputFormat,
    output_path: Option<String>,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Empty variables count as unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let listing_url = match var(ENV_LISTING_URL) {
            Some(raw) => Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
                field: ENV_LISTING_URL,
                reason: e.to_string(),
            })?,
            None => Url::parse(DEFAULT_LISTING_URL).map_err(|e| ConfigError::InvalidValue {
                field: ENV_LISTING_URL,
                reason: e.to_string(),
            })?,
        };

        let pages = parsed(ENV_PAGES)?.unwrap_or(DEFAULT_PAGES);
        if pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_PAGES,
                reason: "must be at least 1".to_string(),
            });
        }

        let min_price = price_bound(ENV_MIN_PRICE)?;
        let max_price = price_bound(ENV_MAX_PRICE)?;
        if let (Some(min), Some(max)) = (min_price, max_price)
            && min > max
        {
            return Err(ConfigError::InvalidValue {
                field: ENV_MIN_PRICE,
                reason: format!("{min} is greater than {ENV_MAX_PRICE} {max}"),
            });
        }

        Ok(Self {
            listing_url,
            page_param: var(ENV_PAGE_PARAM).unwrap_or_else(|| DEFAULT_PAGE_PARAM.to_string()),
            pages,
            min_price,
            max_price,
            page_delay: Duration::from_millis(
                parsed(ENV_PAGE_DELAY_MS)?.unwrap_or(DEFAULT_PAGE_DELAY_MS),
            ),
            fetch_retries: parsed(ENV_FETCH_RETRIES)?.unwrap_or(DEFAULT_FETCH_RETRIES),
            output_format: parsed(ENV_OUTPUT_FORMAT)?.unwrap_or(OutputFormat::Text),
            output_path: var(ENV_OUTPUT_PATH),
        })
    }

    /// Listing URL; each page request sets `page_param` on it.
    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }
    pub fn page_param(&self) -> &str {
        &self.page_param
    }
    /// Number of listing pages to scrape, at least 1.
    pub fn pages(&self) -> u32 {
        self.pages
    }
    pub fn min_price(&self) -> Option<f64> {
        self.min_price
    }
    pub fn max_price(&self) -> Option<f64> {
        self.max_price
    }
    pub fn page_delay(&self) -> Duration {
        self.page_delay
    }
    pub fn fetch_retries(&self) -> u32 {
        self.fetch_retries
    }
    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }
    /// File for json/csv output; `None` writes to stdout.
    pub fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    var(key)
        .map(|raw| {
            raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                field: key,
                reason: e.to_string(),
            })
        })
        .transpose()
}

fn price_bound(key: &'static str) -> Result<Option<f64>, ConfigError> {
    match parsed::<f64>(key)? {
        Some(value) if !value.is_finite() || value < 0.0 => Err(ConfigError::InvalidValue {
            field: key,
            reason: format!("{value} is not a price"),
        }),
        bound => Ok(bound),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
