use crate::filter::FilterError;
use crate::operators::{CombiningOp, OperatorCatalog, OperatorClass};
use serde::Serialize;
use serde_json::Value;

/// A single comparison or set-membership test, decomposed from
/// `[operator, property, ...arguments]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clause {
    pub operator: String,
    pub property: String,
    pub arguments: Vec<Value>,
}

impl Clause {
    pub fn new(
        operator: impl Into<String>,
        property: impl Into<String>,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            operator: operator.into(),
            property: property.into(),
            arguments,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, FilterError> {
        let items = value
            .as_array()
            .ok_or_else(|| FilterError::Malformed("clause must be an array".to_string()))?;
        let operator = items
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| FilterError::Malformed("clause operator must be a string".to_string()))?;
        if CombiningOp::from_name(operator).is_some() {
            return Err(FilterError::CombiningOperatorInClause(operator.to_string()));
        }
        let property = items.get(1).and_then(Value::as_str).ok_or_else(|| {
            FilterError::Malformed(format!("clause {} needs a property name", operator))
        })?;

        Ok(Self {
            operator: operator.to_string(),
            property: property.to_string(),
            arguments: items[2..].to_vec(),
        })
    }

    pub fn to_value(&self) -> Value {
        let mut items = Vec::with_capacity(self.arguments.len() + 2);
        items.push(Value::String(self.operator.clone()));
        items.push(Value::String(self.property.clone()));
        items.extend(self.arguments.iter().cloned());
        Value::Array(items)
    }

    pub fn into_value(self) -> Value {
        let mut items = Vec::with_capacity(self.arguments.len() + 2);
        items.push(Value::String(self.operator));
        items.push(Value::String(self.property));
        items.extend(self.arguments);
        Value::Array(items)
    }
}

/// Checks the clause against the catalog: the operator must be a known
/// clause operator and the argument count must fit its arity.
pub fn validate_clause(catalog: &OperatorCatalog, clause: &Clause) -> Result<(), FilterError> {
    match catalog.classify(&clause.operator) {
        None => return Err(FilterError::UnknownOperator(clause.operator.clone())),
        Some(OperatorClass::Combining) => {
            return Err(FilterError::CombiningOperatorInClause(clause.operator.clone()))
        }
        Some(_) => {}
    }

    if let Some(arity) = catalog.arity(&clause.operator) {
        if !arity.accepts(clause.arguments.len()) {
            return Err(FilterError::ArityMismatch {
                operator: clause.operator.clone(),
                expected: arity,
                actual: clause.arguments.len(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_clause, Clause};
    use crate::filter::FilterError;
    use crate::operators::{Arity, OperatorCatalog};
    use serde_json::json;

    #[test]
    fn decompose_clause() {
        let clause = Clause::from_value(&json!(["in", "class", "park", "forest", 3])).unwrap();
        assert_eq!(clause.operator, "in");
        assert_eq!(clause.property, "class");
        assert_eq!(clause.arguments, vec![json!("park"), json!("forest"), json!(3)]);
    }

    #[test]
    fn clause_round_trip() {
        for raw in [
            json!(["==", "a", 1]),
            json!(["has", "name"]),
            json!(["!in", "kind", "a", true, 2.5]),
        ] {
            let clause = Clause::from_value(&raw).unwrap();
            assert_eq!(clause.to_value(), raw);
            assert_eq!(clause.into_value(), raw);
        }
    }

    #[test]
    fn decompose_rejects_missing_property() {
        let err = Clause::from_value(&json!(["=="])).unwrap_err();
        assert!(matches!(err, FilterError::Malformed(_)));
        let err = Clause::from_value(&json!(["==", 4, 1])).unwrap_err();
        assert!(matches!(err, FilterError::Malformed(_)));
    }

    #[test]
    fn decompose_rejects_combining_filter() {
        let err = Clause::from_value(&json!(["any", ["==", "a", 1]])).unwrap_err();
        assert_eq!(err, FilterError::CombiningOperatorInClause("any".to_string()));
    }

    #[test]
    fn validate_checks_arity() {
        let catalog = OperatorCatalog::default();
        let ok = Clause::new("==", "a", vec![json!(1)]);
        assert!(validate_clause(&catalog, &ok).is_ok());

        let too_many = Clause::new("==", "a", vec![json!(1), json!(2)]);
        assert_eq!(
            validate_clause(&catalog, &too_many).unwrap_err(),
            FilterError::ArityMismatch {
                operator: "==".to_string(),
                expected: Arity::Exactly(1),
                actual: 2,
            }
        );

        let empty_set = Clause::new("in", "a", Vec::new());
        assert!(validate_clause(&catalog, &empty_set).is_ok());

        let has_with_value = Clause::new("has", "a", vec![json!("x")]);
        assert!(validate_clause(&catalog, &has_with_value).is_err());
    }

    #[test]
    fn validate_rejects_unknown_operator() {
        let catalog = OperatorCatalog::default();
        let clause = Clause::new("~=", "a", vec![json!(1)]);
        assert_eq!(
            validate_clause(&catalog, &clause).unwrap_err(),
            FilterError::UnknownOperator("~=".to_string())
        );
    }
}
