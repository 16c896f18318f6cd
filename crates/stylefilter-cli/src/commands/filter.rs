use crate::commands::{print_json, Context};
use crate::error::{invalid_input, unsupported};
use crate::util::{parse_combining_op, parse_layer_id};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use stylefilter_core::filter::validate_clause;
use stylefilter_core::{
    inspect, normalize, suggest_properties, Clause, FilterEdit, FilterError, FilterSupport,
    FilterView,
};
use tracing::{debug, warn};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub layer: String,
}

#[derive(Debug, Args)]
pub struct SetCombiningArgs {
    pub layer: String,
    /// all | any | none
    pub operator: String,
}

#[derive(Debug, Args)]
pub struct SetOperatorArgs {
    pub layer: String,
    pub index: usize,
    pub operator: String,
}

#[derive(Debug, Args)]
pub struct SetPropertyArgs {
    pub layer: String,
    pub index: usize,
    pub property: String,
}

#[derive(Debug, Args)]
pub struct SetArgsArgs {
    pub layer: String,
    pub index: usize,
    /// Separated argument list, e.g. `park,wood` or `""` for one empty string
    #[arg(allow_hyphen_values = true)]
    pub values: String,
}

#[derive(Debug, Args)]
pub struct AddClauseArgs {
    pub layer: String,
    pub operator: String,
    pub property: String,
    #[arg(allow_hyphen_values = true)]
    pub values: Option<String>,
}

#[derive(Debug, Args)]
pub struct RmClauseArgs {
    pub layer: String,
    pub index: usize,
}

#[derive(Debug, Args)]
pub struct ClearArgs {
    pub layer: String,
}

#[derive(Debug, Args)]
pub struct SuggestArgs {
    pub layer: String,
    #[arg(default_value = "")]
    pub input: String,
    #[arg(long, default_value_t = DEFAULT_SUGGESTION_LIMIT)]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct ShowDto<'a> {
    layer: &'a str,
    filter: Option<&'a Value>,
    view: FilterView,
}

#[derive(Debug, Serialize)]
struct FilterChangeDto<'a> {
    layer: &'a str,
    filter: Option<&'a Value>,
}

pub fn show_filter(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let layer = parse_layer_id(&args.layer)?;
    let doc = ctx.load()?;
    let filter = doc.layer_filter(layer)?;
    let view = FilterView::build(filter, ctx.catalog, &ctx.config.arguments)
        .with_context(|| format!("read filter of layer {}", layer))?;

    if let FilterView::Unsupported { reason } = &view {
        warn!(layer, %reason, "filter cannot be edited");
    }

    if ctx.json {
        return print_json(&ShowDto {
            layer,
            filter,
            view,
        });
    }

    match view {
        FilterView::Unsupported { reason } => {
            println!("{}: unsupported filter shape ({})", layer, reason);
            if let Some(filter) = filter {
                println!("{}", serde_json::to_string(filter)?);
            }
        }
        FilterView::Editable(editable) => {
            println!("{}: {} of the filters match", layer, editable.operator);
            if editable.clauses.is_empty() {
                println!("  (no clauses)");
            }
            for clause in editable.clauses {
                println!(
                    "  [{}] {} {} {}",
                    clause.index, clause.property, clause.operator, clause.arguments_text
                );
            }
        }
    }
    Ok(())
}

pub fn set_combining(ctx: &Context<'_>, args: SetCombiningArgs) -> Result<()> {
    let operator = parse_combining_op(&args.operator)?;
    apply_edit(ctx, &args.layer, FilterEdit::SetCombiningOperator(operator))
}

pub fn set_operator(ctx: &Context<'_>, args: SetOperatorArgs) -> Result<()> {
    let operator = args.operator.trim().to_string();
    if ctx.catalog.classify(&operator).is_none() {
        return Err(invalid_input(format!("unknown operator: {}", operator)));
    }
    apply_edit(
        ctx,
        &args.layer,
        FilterEdit::SetClauseOperator {
            index: args.index,
            operator,
        },
    )
}

pub fn set_property(ctx: &Context<'_>, args: SetPropertyArgs) -> Result<()> {
    let property = non_empty_property(&args.property)?;
    apply_edit(
        ctx,
        &args.layer,
        FilterEdit::SetClauseProperty {
            index: args.index,
            property,
        },
    )
}

pub fn set_arguments(ctx: &Context<'_>, args: SetArgsArgs) -> Result<()> {
    let arguments = ctx
        .config
        .arguments
        .parse_arguments(&args.values)
        .with_context(|| format!("parse arguments {:?}", args.values))?;
    apply_edit(
        ctx,
        &args.layer,
        FilterEdit::SetClauseArguments {
            index: args.index,
            arguments,
        },
    )
}

pub fn add_clause(ctx: &Context<'_>, args: AddClauseArgs) -> Result<()> {
    let property = non_empty_property(&args.property)?;
    let arguments = match args.values.as_deref() {
        Some(text) => ctx
            .config
            .arguments
            .parse_arguments(text)
            .with_context(|| format!("parse arguments {:?}", text))?,
        None => Vec::new(),
    };
    let clause = Clause::new(args.operator.trim(), property, arguments);
    apply_edit(ctx, &args.layer, FilterEdit::AppendClause(clause))
}

pub fn remove_clause(ctx: &Context<'_>, args: RmClauseArgs) -> Result<()> {
    apply_edit(ctx, &args.layer, FilterEdit::RemoveClause { index: args.index })
}

pub fn clear_filter(ctx: &Context<'_>, args: ClearArgs) -> Result<()> {
    let layer = parse_layer_id(&args.layer)?;
    let mut doc = ctx.load()?;
    let previous = doc.replace_layer_filter(layer, None)?;
    if previous.is_some() {
        ctx.commit(&doc)?;
        debug!(layer, "filter removed");
    }

    if ctx.json {
        return print_json(&FilterChangeDto {
            layer,
            filter: None,
        });
    }
    println!("{}: filter cleared", layer);
    Ok(())
}

pub fn suggest(ctx: &Context<'_>, args: SuggestArgs) -> Result<()> {
    let layer = parse_layer_id(&args.layer)?;
    let doc = ctx.load()?;
    let known = doc.known_properties(layer)?;
    let suggestions = suggest_properties(&known, &args.input, args.limit);

    if ctx.json {
        return print_json(&suggestions);
    }
    for name in suggestions {
        println!("{}", name);
    }
    Ok(())
}

/// Reloads the document, applies one edit to the layer's current filter and
/// writes the whole document back.
fn apply_edit(ctx: &Context<'_>, layer: &str, edit: FilterEdit) -> Result<()> {
    let layer = parse_layer_id(layer)?;
    let mut doc = ctx.load()?;
    let current = doc.layer_filter(layer)?.cloned();

    match inspect(current.as_ref()).with_context(|| format!("read filter of layer {}", layer))? {
        FilterSupport::Supported(_) => {}
        FilterSupport::Unsupported(reason) => {
            warn!(layer, %reason, "refusing to edit filter");
            return Err(unsupported(format!("layer {}: {}", layer, reason)));
        }
    }

    let updated = edit
        .apply(current.as_ref())
        .with_context(|| format!("edit filter of layer {}", layer))?;
    if let Some(index) = validated_clause(&edit, &updated)? {
        check_clause(ctx, &updated, index)
            .with_context(|| format!("clause {} of layer {}", index, layer))?;
    }

    doc.replace_layer_filter(layer, Some(updated.clone()))?;
    ctx.commit(&doc)?;
    debug!(layer, ?edit, "filter replaced");

    if ctx.json {
        return print_json(&FilterChangeDto {
            layer,
            filter: Some(&updated),
        });
    }
    println!("{}: {}", layer, serde_json::to_string(&updated)?);
    Ok(())
}

// Edits that change an operator or argument list are checked against the
// operator catalog; property renames and removals are not.
fn validated_clause(edit: &FilterEdit, updated: &Value) -> Result<Option<usize>> {
    Ok(match edit {
        FilterEdit::SetClauseOperator { index, .. }
        | FilterEdit::SetClauseArguments { index, .. }
        | FilterEdit::ReplaceClause { index, .. } => Some(*index),
        FilterEdit::AppendClause(_) => normalize(Some(updated))?.len().checked_sub(1),
        FilterEdit::SetCombiningOperator(_)
        | FilterEdit::SetClauseProperty { .. }
        | FilterEdit::RemoveClause { .. } => None,
    })
}

fn check_clause(ctx: &Context<'_>, filter: &Value, index: usize) -> Result<()> {
    let form = normalize(Some(filter))?;
    let clause = Clause::from_value(form.clause_at(index)?)?;
    match validate_clause(ctx.catalog, &clause) {
        Err(FilterError::ArityMismatch { .. }) if !ctx.config.enforce_arity => Ok(()),
        result => Ok(result?),
    }
}

fn non_empty_property(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(invalid_input("property name cannot be empty"));
    }
    Ok(trimmed.to_string())
}
