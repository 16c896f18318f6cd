use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("missing filter_operator table in style specification")]
    MissingFilterOperators,
    #[error("filter_operator values must be an object")]
    InvalidFilterOperators,
    #[error("style specification is missing combining operator: {0}")]
    MissingCombiningOperator(String),
    #[error("style specification defines no clause operators")]
    NoClauseOperators,
}
