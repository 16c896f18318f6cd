use crate::filter::clause::Clause;
use crate::filter::expr::{combining_operator_of, FilterExpr};
use crate::filter::FilterError;
use crate::operators::CombiningOp;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The editable shape of any filter: one combining operator over an ordered
/// list of entries. Entries are kept as raw values so nesting can be
/// detected before they are treated as clauses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombiningForm {
    pub operator: CombiningOp,
    pub clauses: Vec<Value>,
}

impl CombiningForm {
    pub fn new(operator: CombiningOp, clauses: Vec<Value>) -> Self {
        Self { operator, clauses }
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clause_at(&self, index: usize) -> Result<&Value, FilterError> {
        self.clauses
            .get(index)
            .ok_or(FilterError::ClauseIndexOutOfRange {
                index,
                len: self.clauses.len(),
            })
    }

    pub fn with_operator(self, operator: CombiningOp) -> Self {
        Self {
            operator,
            clauses: self.clauses,
        }
    }

    pub fn with_clause(mut self, index: usize, entry: Value) -> Result<Self, FilterError> {
        let len = self.clauses.len();
        let slot = self
            .clauses
            .get_mut(index)
            .ok_or(FilterError::ClauseIndexOutOfRange { index, len })?;
        *slot = entry;
        Ok(self)
    }

    pub fn without_clause(mut self, index: usize) -> Result<Self, FilterError> {
        if index >= self.clauses.len() {
            return Err(FilterError::ClauseIndexOutOfRange {
                index,
                len: self.clauses.len(),
            });
        }
        self.clauses.remove(index);
        Ok(self)
    }

    pub fn to_value(&self) -> Value {
        self.clone().into_value()
    }

    pub fn into_value(self) -> Value {
        let mut items = Vec::with_capacity(self.clauses.len() + 1);
        items.push(Value::String(self.operator.as_str().to_string()));
        items.extend(self.clauses);
        Value::Array(items)
    }
}

impl From<FilterExpr> for CombiningForm {
    fn from(expr: FilterExpr) -> Self {
        match expr {
            FilterExpr::Empty => CombiningForm::new(CombiningOp::All, Vec::new()),
            FilterExpr::Combining { operator, operands } => CombiningForm::new(operator, operands),
            FilterExpr::Clause(clause) => {
                CombiningForm::new(CombiningOp::All, vec![clause.into_value()])
            }
            FilterExpr::Opaque(value) => CombiningForm::new(CombiningOp::All, vec![value]),
        }
    }
}

/// Absent filters become an empty `all`, bare clauses a single-entry `all`,
/// and combining filters pass through without touching their entries.
pub fn normalize(value: Option<&Value>) -> Result<CombiningForm, FilterError> {
    Ok(FilterExpr::classify(value)?.into())
}

pub fn has_nested_combining(form: &CombiningForm) -> bool {
    first_nested_combining(form).is_some()
}

fn first_nested_combining(form: &CombiningForm) -> Option<usize> {
    form.clauses
        .iter()
        .position(|entry| combining_operator_of(entry).is_some())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnsupportedReason {
    NestedCombining { index: usize },
    MalformedClause { index: usize },
}

impl fmt::Display for UnsupportedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsupportedReason::NestedCombining { index } => {
                write!(f, "clause {} is a nested combining filter", index)
            }
            UnsupportedReason::MalformedClause { index } => {
                write!(f, "clause {} is not a comparison or set filter", index)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterSupport {
    Supported(CombiningForm),
    Unsupported(UnsupportedReason),
}

impl FilterSupport {
    pub fn is_supported(&self) -> bool {
        matches!(self, FilterSupport::Supported(_))
    }
}

pub fn check_support(form: CombiningForm) -> FilterSupport {
    let nested = first_nested_combining(&form);
    let checked = nested.unwrap_or(form.clauses.len());
    let malformed = form.clauses[..checked]
        .iter()
        .position(|entry| Clause::from_value(entry).is_err());
    match (malformed, nested) {
        (Some(index), _) => {
            FilterSupport::Unsupported(UnsupportedReason::MalformedClause { index })
        }
        (None, Some(index)) => {
            FilterSupport::Unsupported(UnsupportedReason::NestedCombining { index })
        }
        (None, None) => FilterSupport::Supported(form),
    }
}

pub fn inspect(value: Option<&Value>) -> Result<FilterSupport, FilterError> {
    Ok(check_support(normalize(value)?))
}
