use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SET_OPERATORS: [&str; 2] = ["in", "!in"];
pub const EXISTENCE_OPERATORS: [&str; 2] = ["has", "!has"];

const DEFAULT_CLAUSE_OPERATORS: [&str; 10] =
    ["==", "!=", ">", ">=", "<", "<=", "in", "!in", "has", "!has"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombiningOp {
    All,
    Any,
    None,
}

impl CombiningOp {
    pub const ALL: [CombiningOp; 3] = [CombiningOp::All, CombiningOp::Any, CombiningOp::None];

    pub fn as_str(self) -> &'static str {
        match self {
            CombiningOp::All => "all",
            CombiningOp::Any => "any",
            CombiningOp::None => "none",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "all" => Some(CombiningOp::All),
            "any" => Some(CombiningOp::Any),
            "none" => Some(CombiningOp::None),
            _ => None,
        }
    }
}

impl fmt::Display for CombiningOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown combining operator: {0} (expected all|any|none)")]
pub struct UnknownCombiningOp(pub String);

impl FromStr for CombiningOp {
    type Err = UnknownCombiningOp;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        CombiningOp::from_name(&value).ok_or_else(|| UnknownCombiningOp(raw.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorClass {
    Combining,
    Set,
    Comparison,
}

/// How many argument values a clause operator takes after the property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "count")]
pub enum Arity {
    None,
    Exactly(usize),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::None => count == 0,
            Arity::Exactly(n) => count == n,
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::None => f.write_str("no values"),
            Arity::Exactly(1) => f.write_str("exactly one value"),
            Arity::Exactly(n) => write!(f, "exactly {} values", n),
            Arity::Any => f.write_str("any number of values"),
        }
    }
}

/// Operators known to the editor, partitioned into combining, set and
/// comparison classes. Combining operators are fixed; the clause operators
/// come from the style specification table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorCatalog {
    clause_operators: Vec<String>,
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self {
            clause_operators: DEFAULT_CLAUSE_OPERATORS
                .iter()
                .map(|op| op.to_string())
                .collect(),
        }
    }
}

impl OperatorCatalog {
    pub fn from_operator_names<I, S>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names.into_iter().map(|s| s.as_ref().to_string()).collect();
        for op in CombiningOp::ALL {
            if !names.iter().any(|name| name == op.as_str()) {
                return Err(CatalogError::MissingCombiningOperator(op.as_str().to_string()));
            }
        }

        let mut clause_operators: Vec<String> = Vec::new();
        for name in names {
            if CombiningOp::from_name(&name).is_some() || clause_operators.contains(&name) {
                continue;
            }
            clause_operators.push(name);
        }
        if clause_operators.is_empty() {
            return Err(CatalogError::NoClauseOperators);
        }

        Ok(Self { clause_operators })
    }

    /// Reads `filter_operator.values` from a style specification reference
    /// document. Operator order follows the document.
    pub fn from_spec_reference(reference: &Value) -> Result<Self, CatalogError> {
        let values = reference
            .get("filter_operator")
            .and_then(|table| table.get("values"))
            .ok_or(CatalogError::MissingFilterOperators)?;
        match values {
            Value::Object(map) => Self::from_operator_names(map.keys()),
            Value::Array(items) => {
                let names = items
                    .iter()
                    .map(|item| item.as_str().ok_or(CatalogError::InvalidFilterOperators))
                    .collect::<Result<Vec<_>, _>>()?;
                Self::from_operator_names(names)
            }
            _ => Err(CatalogError::InvalidFilterOperators),
        }
    }

    pub fn classify(&self, op: &str) -> Option<OperatorClass> {
        if CombiningOp::from_name(op).is_some() {
            return Some(OperatorClass::Combining);
        }
        if !self.clause_operators.iter().any(|known| known == op) {
            return None;
        }
        if SET_OPERATORS.contains(&op) {
            Some(OperatorClass::Set)
        } else {
            Some(OperatorClass::Comparison)
        }
    }

    pub fn combining_operators(&self) -> &'static [CombiningOp] {
        &CombiningOp::ALL
    }

    /// Operators a clause may be switched to. Set and comparison operators are
    /// freely interchangeable; combining operators never appear here.
    pub fn clause_operators(&self) -> &[String] {
        &self.clause_operators
    }

    pub fn arity(&self, op: &str) -> Option<Arity> {
        match self.classify(op)? {
            OperatorClass::Combining => None,
            OperatorClass::Set => Some(Arity::Any),
            OperatorClass::Comparison if EXISTENCE_OPERATORS.contains(&op) => Some(Arity::None),
            OperatorClass::Comparison => Some(Arity::Exactly(1)),
        }
    }
}
