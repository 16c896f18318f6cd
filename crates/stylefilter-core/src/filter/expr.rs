use crate::filter::clause::Clause;
use crate::filter::FilterError;
use crate::operators::CombiningOp;
use serde_json::Value;

/// A filter value classified once at the document boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    Empty,
    Combining {
        operator: CombiningOp,
        operands: Vec<Value>,
    },
    Clause(Clause),
    /// A string-headed array that does not decompose into a clause.
    Opaque(Value),
}

impl FilterExpr {
    pub fn classify(value: Option<&Value>) -> Result<Self, FilterError> {
        let value = match value {
            None | Some(Value::Null) => return Ok(FilterExpr::Empty),
            Some(value) => value,
        };

        let items = value
            .as_array()
            .ok_or_else(|| FilterError::Malformed("filter must be an array".to_string()))?;
        let operator = items
            .first()
            .ok_or_else(|| FilterError::Malformed("filter array is empty".to_string()))?
            .as_str()
            .ok_or_else(|| FilterError::Malformed("filter operator must be a string".to_string()))?;

        match CombiningOp::from_name(operator) {
            Some(operator) => Ok(FilterExpr::Combining {
                operator,
                operands: items[1..].to_vec(),
            }),
            None => Ok(match Clause::from_value(value) {
                Ok(clause) => FilterExpr::Clause(clause),
                Err(_) => FilterExpr::Opaque(value.clone()),
            }),
        }
    }

    pub fn to_value(&self) -> Option<Value> {
        match self {
            FilterExpr::Empty => None,
            FilterExpr::Combining { operator, operands } => {
                let mut items = Vec::with_capacity(operands.len() + 1);
                items.push(Value::String(operator.as_str().to_string()));
                items.extend(operands.iter().cloned());
                Some(Value::Array(items))
            }
            FilterExpr::Clause(clause) => Some(clause.to_value()),
            FilterExpr::Opaque(value) => Some(value.clone()),
        }
    }
}

/// Returns the combining operator when `value` is itself a combining filter.
pub fn combining_operator_of(value: &Value) -> Option<CombiningOp> {
    value
        .as_array()?
        .first()?
        .as_str()
        .and_then(CombiningOp::from_name)
}
