pub mod error;
pub mod filter;
pub mod operators;
pub mod suggest;

pub use error::CatalogError;
pub use filter::{
    inspect, normalize, ArgumentError, ArgumentFormat, Clause, CombiningForm, FilterEdit,
    FilterError, FilterExpr, FilterSupport, FilterView, UnsupportedReason,
};
pub use operators::{Arity, CombiningOp, OperatorCatalog, OperatorClass};
pub use suggest::{filter_properties, suggest_properties};
