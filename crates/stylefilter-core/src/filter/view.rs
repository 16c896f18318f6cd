use crate::filter::arguments::ArgumentFormat;
use crate::filter::canonical::{inspect, FilterSupport, UnsupportedReason};
use crate::filter::clause::Clause;
use crate::filter::FilterError;
use crate::operators::{Arity, CombiningOp, OperatorCatalog};
use serde::Serialize;
use serde_json::Value;

/// What a presentation layer needs to draw the filter editor for one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilterView {
    Editable(EditableView),
    Unsupported { reason: UnsupportedReason },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditableView {
    pub operator: CombiningOp,
    pub combining_operators: Vec<CombiningOp>,
    pub clauses: Vec<ClauseView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClauseView {
    pub index: usize,
    pub operator: String,
    pub property: String,
    pub arguments: Vec<Value>,
    pub arguments_text: String,
    pub arity: Option<Arity>,
    pub operators: Vec<String>,
}

impl FilterView {
    pub fn build(
        value: Option<&Value>,
        catalog: &OperatorCatalog,
        format: &ArgumentFormat,
    ) -> Result<Self, FilterError> {
        let form = match inspect(value)? {
            FilterSupport::Supported(form) => form,
            FilterSupport::Unsupported(reason) => return Ok(FilterView::Unsupported { reason }),
        };

        let clauses = form
            .clauses
            .iter()
            .enumerate()
            .map(|(index, entry)| -> Result<ClauseView, FilterError> {
                let Clause {
                    operator,
                    property,
                    arguments,
                } = Clause::from_value(entry)?;
                Ok(ClauseView {
                    index,
                    arguments_text: format.format_arguments(&arguments),
                    arity: catalog.arity(&operator),
                    operators: catalog.clause_operators().to_vec(),
                    operator,
                    property,
                    arguments,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FilterView::Editable(EditableView {
            operator: form.operator,
            combining_operators: catalog.combining_operators().to_vec(),
            clauses,
        }))
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, FilterView::Editable(_))
    }
}
