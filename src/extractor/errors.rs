use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractError {
    #[error("listing table not found ({found} tables on page)")]
    MissingTable { found: usize },
}
