use crate::filter::canonical::normalize;
use crate::filter::clause::Clause;
use crate::filter::expr::combining_operator_of;
use crate::filter::FilterError;
use crate::operators::CombiningOp;
use serde_json::Value;

// Every edit re-normalizes the current value and returns a whole new filter
// value; inputs are never modified.

pub fn change_combining_operator(
    value: Option<&Value>,
    operator: CombiningOp,
) -> Result<Value, FilterError> {
    Ok(normalize(value)?.with_operator(operator).into_value())
}

pub fn replace_clause_at(
    value: Option<&Value>,
    index: usize,
    entry: Value,
) -> Result<Value, FilterError> {
    Ok(normalize(value)?.with_clause(index, entry)?.into_value())
}

pub fn change_clause_operator(
    value: Option<&Value>,
    index: usize,
    operator: &str,
) -> Result<Value, FilterError> {
    if CombiningOp::from_name(operator).is_some() {
        return Err(FilterError::CombiningOperatorInClause(operator.to_string()));
    }
    edit_clause(value, index, |clause| Clause {
        operator: operator.to_string(),
        ..clause
    })
}

pub fn change_clause_property(
    value: Option<&Value>,
    index: usize,
    property: &str,
) -> Result<Value, FilterError> {
    edit_clause(value, index, |clause| Clause {
        property: property.to_string(),
        ..clause
    })
}

pub fn change_clause_arguments(
    value: Option<&Value>,
    index: usize,
    arguments: Vec<Value>,
) -> Result<Value, FilterError> {
    edit_clause(value, index, |clause| Clause {
        arguments,
        ..clause
    })
}

pub fn append_clause(value: Option<&Value>, clause: Clause) -> Result<Value, FilterError> {
    if CombiningOp::from_name(&clause.operator).is_some() {
        return Err(FilterError::CombiningOperatorInClause(clause.operator));
    }
    let mut form = normalize(value)?;
    form.clauses.push(clause.into_value());
    Ok(form.into_value())
}

pub fn remove_clause_at(value: Option<&Value>, index: usize) -> Result<Value, FilterError> {
    Ok(normalize(value)?.without_clause(index)?.into_value())
}

fn edit_clause<F>(value: Option<&Value>, index: usize, edit: F) -> Result<Value, FilterError>
where
    F: FnOnce(Clause) -> Clause,
{
    let form = normalize(value)?;
    let entry = form.clause_at(index)?;
    if combining_operator_of(entry).is_some() {
        return Err(FilterError::NestedCombining { index });
    }
    let clause = edit(Clause::from_value(entry)?);
    Ok(form.with_clause(index, clause.into_value())?.into_value())
}

/// One user edit, applied against the current filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterEdit {
    SetCombiningOperator(CombiningOp),
    ReplaceClause { index: usize, entry: Value },
    SetClauseOperator { index: usize, operator: String },
    SetClauseProperty { index: usize, property: String },
    SetClauseArguments { index: usize, arguments: Vec<Value> },
    AppendClause(Clause),
    RemoveClause { index: usize },
}

impl FilterEdit {
    pub fn apply(&self, value: Option<&Value>) -> Result<Value, FilterError> {
        match self {
            FilterEdit::SetCombiningOperator(operator) => {
                change_combining_operator(value, *operator)
            }
            FilterEdit::ReplaceClause { index, entry } => {
                replace_clause_at(value, *index, entry.clone())
            }
            FilterEdit::SetClauseOperator { index, operator } => {
                change_clause_operator(value, *index, operator)
            }
            FilterEdit::SetClauseProperty { index, property } => {
                change_clause_property(value, *index, property)
            }
            FilterEdit::SetClauseArguments { index, arguments } => {
                change_clause_arguments(value, *index, arguments.clone())
            }
            FilterEdit::AppendClause(clause) => append_clause(value, clause.clone()),
            FilterEdit::RemoveClause { index } => remove_clause_at(value, *index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!(["all", ["==", "a", 1], ["!=", "b", 2]])
    }

    #[test]
    fn change_operator_preserves_clauses() {
        let value = sample();
        let changed = change_combining_operator(Some(&value), CombiningOp::Any).unwrap();
        assert_eq!(changed, json!(["any", ["==", "a", 1], ["!=", "b", 2]]));
        assert_eq!(value, sample());
    }

    #[test]
    fn change_operator_on_bare_clause_wraps_it() {
        let value = json!(["==", "a", 1]);
        let changed = change_combining_operator(Some(&value), CombiningOp::None).unwrap();
        assert_eq!(changed, json!(["none", ["==", "a", 1]]));
    }

    #[test]
    fn replace_is_index_isolated() {
        let value = sample();
        let changed = replace_clause_at(Some(&value), 1, json!(["<", "c", 3])).unwrap();
        assert_eq!(changed, json!(["all", ["==", "a", 1], ["<", "c", 3]]));
    }

    #[test]
    fn replace_out_of_range_fails_fast() {
        let value = sample();
        let err = replace_clause_at(Some(&value), 2, json!(["<", "c", 3])).unwrap_err();
        assert_eq!(err, FilterError::ClauseIndexOutOfRange { index: 2, len: 2 });
        let err = replace_clause_at(None, 0, json!(["<", "c", 3])).unwrap_err();
        assert_eq!(err, FilterError::ClauseIndexOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn clause_field_edits() {
        let value = sample();
        assert_eq!(
            change_clause_operator(Some(&value), 0, "in").unwrap(),
            json!(["all", ["in", "a", 1], ["!=", "b", 2]])
        );
        assert_eq!(
            change_clause_property(Some(&value), 1, "class").unwrap(),
            json!(["all", ["==", "a", 1], ["!=", "class", 2]])
        );
        assert_eq!(
            change_clause_arguments(Some(&value), 0, vec![json!("x"), json!("y")]).unwrap(),
            json!(["all", ["==", "a", "x", "y"], ["!=", "b", 2]])
        );
    }

    #[test]
    fn clause_edit_on_bare_clause_produces_combining_filter() {
        let value = json!(["==", "a", 1]);
        assert_eq!(
            change_clause_property(Some(&value), 0, "b").unwrap(),
            json!(["all", ["==", "b", 1]])
        );
    }

    #[test]
    fn clause_operator_cannot_become_combining() {
        let value = sample();
        let err = change_clause_operator(Some(&value), 0, "any").unwrap_err();
        assert_eq!(err, FilterError::CombiningOperatorInClause("any".to_string()));
    }

    #[test]
    fn clause_edit_refuses_nested_entry() {
        let value = json!(["all", ["==", "a", 1], ["any", ["has", "b"]]]);
        let err = change_clause_property(Some(&value), 1, "c").unwrap_err();
        assert_eq!(err, FilterError::NestedCombining { index: 1 });
    }

    #[test]
    fn append_and_remove() {
        let appended = append_clause(None, Clause::new("has", "name", Vec::new())).unwrap();
        assert_eq!(appended, json!(["all", ["has", "name"]]));

        let value = sample();
        assert_eq!(
            remove_clause_at(Some(&value), 0).unwrap(),
            json!(["all", ["!=", "b", 2]])
        );
        assert_eq!(
            remove_clause_at(Some(&appended), 0).unwrap(),
            json!(["all"])
        );
        assert!(remove_clause_at(Some(&value), 5).is_err());
    }

    #[test]
    fn edit_enum_dispatches() {
        let value = sample();
        let edit = FilterEdit::SetClauseArguments {
            index: 1,
            arguments: vec![json!(5)],
        };
        assert_eq!(
            edit.apply(Some(&value)).unwrap(),
            json!(["all", ["==", "a", 1], ["!=", "b", 5]])
        );
        let edit = FilterEdit::SetCombiningOperator(CombiningOp::None);
        assert_eq!(
            edit.apply(Some(&value)).unwrap(),
            json!(["none", ["==", "a", 1], ["!=", "b", 2]])
        );
    }
}
