use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use stylefilter_core::{inspect, Arity, CombiningOp, FilterSupport, OperatorClass};

#[derive(Debug, Args)]
pub struct LayersArgs {
    /// Only list layers that carry a filter
    #[arg(long)]
    pub filtered: bool,
}

#[derive(Debug, Args)]
pub struct OperatorsArgs {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum FilterStatus {
    None,
    Editable,
    Unsupported,
    Malformed,
}

impl FilterStatus {
    fn label(self) -> &'static str {
        match self {
            FilterStatus::None => "none",
            FilterStatus::Editable => "editable",
            FilterStatus::Unsupported => "unsupported",
            FilterStatus::Malformed => "malformed",
        }
    }
}

#[derive(Debug, Serialize)]
struct LayerDto {
    id: String,
    #[serde(rename = "type")]
    layer_type: Option<String>,
    source: Option<String>,
    source_layer: Option<String>,
    filter: FilterStatus,
    clauses: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ClauseOperatorDto<'a> {
    operator: &'a str,
    class: OperatorClass,
    arity: Option<Arity>,
}

#[derive(Debug, Serialize)]
struct OperatorsDto<'a> {
    combining: &'a [CombiningOp],
    clause: Vec<ClauseOperatorDto<'a>>,
}

pub fn list_layers(ctx: &Context<'_>, args: LayersArgs) -> Result<()> {
    let doc = ctx.load()?;
    let mut items = Vec::new();
    for summary in doc.layers() {
        if args.filtered && !summary.has_filter {
            continue;
        }
        let (filter, clauses) = filter_status(doc.layer_filter(&summary.id)?);
        items.push(LayerDto {
            id: summary.id,
            layer_type: summary.layer_type,
            source: summary.source,
            source_layer: summary.source_layer,
            filter,
            clauses,
        });
    }

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("no layers");
        return Ok(());
    }

    for item in items {
        let kind = item.layer_type.as_deref().unwrap_or("-");
        let source_layer = item.source_layer.as_deref().unwrap_or("-");
        match item.clauses {
            Some(count) => println!(
                "{}  {}  {}  {} ({} clauses)",
                item.id,
                kind,
                source_layer,
                item.filter.label(),
                count
            ),
            None => println!("{}  {}  {}  {}", item.id, kind, source_layer, item.filter.label()),
        }
    }
    Ok(())
}

pub fn list_operators(ctx: &Context<'_>, _args: OperatorsArgs) -> Result<()> {
    let catalog = ctx.catalog;
    let clause = catalog
        .clause_operators()
        .iter()
        .filter_map(|op| {
            Some(ClauseOperatorDto {
                operator: op,
                class: catalog.classify(op)?,
                arity: catalog.arity(op),
            })
        })
        .collect::<Vec<_>>();

    if ctx.json {
        return print_json(&OperatorsDto {
            combining: catalog.combining_operators(),
            clause,
        });
    }

    let combining: Vec<&str> = catalog
        .combining_operators()
        .iter()
        .map(|op| op.as_str())
        .collect();
    println!("combining: {}", combining.join(" "));
    for item in clause {
        let arity = item
            .arity
            .map(|arity| arity.to_string())
            .unwrap_or_default();
        let class = match item.class {
            OperatorClass::Set => "set",
            OperatorClass::Comparison => "comparison",
            OperatorClass::Combining => "combining",
        };
        println!("{}  {}  {}", item.operator, class, arity);
    }
    Ok(())
}

fn filter_status(filter: Option<&Value>) -> (FilterStatus, Option<usize>) {
    if filter.is_none() {
        return (FilterStatus::None, None);
    }
    match inspect(filter) {
        Ok(FilterSupport::Supported(form)) => (FilterStatus::Editable, Some(form.len())),
        Ok(FilterSupport::Unsupported(_)) => (FilterStatus::Unsupported, None),
        Err(_) => (FilterStatus::Malformed, None),
    }
}
