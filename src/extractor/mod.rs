pub mod classifier;
pub mod dom;
pub mod errors;
pub mod link;
pub mod model;
pub mod page;
pub mod price;

#[cfg(test)]
mod tests;

pub use errors::ExtractError;
pub use model::{Cell, ClassifiedRow, Lot};
pub use page::{extract_from_html, extract_lots};
