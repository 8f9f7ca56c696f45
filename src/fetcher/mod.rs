pub mod charset;
pub mod client;
pub mod errors;
pub mod types;

pub use client::{fetch, fetch_with_headers};
pub use errors::FetchError;
pub use types::{Charset, PageResponse};
