use thiserror::Error;

use crate::extractor::ExtractError;
use crate::fetcher::FetchError;

/// Why a single listing page contributed no lots.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}
