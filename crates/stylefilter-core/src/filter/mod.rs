mod arguments;
mod canonical;
mod clause;
mod edit;
mod expr;
mod view;

use crate::operators::Arity;
use thiserror::Error;

pub use arguments::{ArgumentFormat, DEFAULT_SEPARATOR};
pub use canonical::{
    check_support, has_nested_combining, inspect, normalize, CombiningForm, FilterSupport,
    UnsupportedReason,
};
pub use clause::{validate_clause, Clause};
pub use edit::{
    append_clause, change_clause_arguments, change_clause_operator, change_clause_property,
    change_combining_operator, remove_clause_at, replace_clause_at, FilterEdit,
};
pub use expr::{combining_operator_of, FilterExpr};
pub use view::{ClauseView, EditableView, FilterView};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("malformed filter: {0}")]
    Malformed(String),
    #[error("clause index {index} out of range (filter has {len} clauses)")]
    ClauseIndexOutOfRange { index: usize, len: usize },
    #[error("clause {index} is a nested combining filter")]
    NestedCombining { index: usize },
    #[error("combining operator cannot be used in a clause: {0}")]
    CombiningOperatorInClause(String),
    #[error("unknown operator: {0}")]
    UnknownOperator(String),
    #[error("operator {operator} takes {expected}, got {actual}")]
    ArityMismatch {
        operator: String,
        expected: Arity,
        actual: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("unterminated quoted value")]
    UnterminatedQuote,
    #[error("unexpected text after quoted value: {0}")]
    TrailingText(String),
}
