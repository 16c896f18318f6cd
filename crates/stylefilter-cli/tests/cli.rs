use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;

const STYLE: &str = r#"{
  "version": 8,
  "name": "Basic",
  "sources": {
    "openmaptiles": {"type": "vector", "url": "https://example.com/tiles.json"}
  },
  "layers": [
    {"id": "background", "type": "background"},
    {
      "id": "landuse-park",
      "type": "fill",
      "source": "openmaptiles",
      "source-layer": "landuse",
      "filter": ["==", "class", "park"]
    },
    {
      "id": "roads",
      "type": "line",
      "source": "openmaptiles",
      "source-layer": "transportation",
      "filter": ["all", ["in", "class", "primary", "secondary"], ["!=", "brunnel", "tunnel"]]
    },
    {
      "id": "labels",
      "type": "symbol",
      "source": "openmaptiles",
      "source-layer": "transportation",
      "filter": ["all", ["has", "name"], ["any", ["==", "rank", 1], ["==", "rank", 2]]]
    }
  ]
}"#;

fn setup() -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("temp dir");
    let style = temp.path().join("style.json");
    fs::write(&style, STYLE).expect("write style");
    (temp, style)
}

fn run_raw(temp: &TempDir, style: &Path, args: &[&str]) -> Output {
    cargo_bin_cmd!("stylefilter")
        .env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env_remove("RUST_LOG")
        .args(["--style", style.to_str().expect("style path")])
        .args(args)
        .output()
        .expect("run command")
}

fn run_cmd(temp: &TempDir, style: &Path, args: &[&str]) -> String {
    let output = run_raw(temp, style, args);
    assert!(output.status.success(), "command failed: {:?}", output);
    String::from_utf8(output.stdout).expect("utf8")
}

fn run_cmd_json(temp: &TempDir, style: &Path, args: &[&str]) -> Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_raw(temp, style, &full);
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("parse json")
}

fn layer_filter(style: &Path, id: &str) -> Value {
    let doc: Value = serde_json::from_str(&fs::read_to_string(style).expect("read")).expect("json");
    doc["layers"]
        .as_array()
        .expect("layers")
        .iter()
        .find(|layer| layer["id"] == id)
        .expect("layer")
        .get("filter")
        .cloned()
        .unwrap_or(Value::Null)
}

#[test]
fn cli_show_and_edit_flow() {
    let (temp, style) = setup();

    let shown = run_cmd_json(&temp, &style, &["show", "landuse-park"]);
    assert_eq!(shown["view"]["status"], "editable");
    assert_eq!(shown["view"]["operator"], "all");
    assert_eq!(shown["view"]["clauses"][0]["property"], "class");
    assert_eq!(shown["view"]["clauses"][0]["arguments_text"], "park");

    run_cmd(&temp, &style, &["set-combining", "landuse-park", "any"]);
    assert_eq!(
        layer_filter(&style, "landuse-park"),
        json!(["any", ["==", "class", "park"]])
    );

    run_cmd(&temp, &style, &["set-operator", "landuse-park", "0", "in"]);
    run_cmd(&temp, &style, &["set-args", "landuse-park", "0", "park, wood, 3"]);
    run_cmd(&temp, &style, &["set-property", "landuse-park", "0", "subclass"]);
    assert_eq!(
        layer_filter(&style, "landuse-park"),
        json!(["any", ["in", "subclass", "park", "wood", 3]])
    );

    run_cmd(&temp, &style, &["add-clause", "landuse-park", "has", "name"]);
    run_cmd(&temp, &style, &["rm-clause", "landuse-park", "0"]);
    assert_eq!(layer_filter(&style, "landuse-park"), json!(["any", ["has", "name"]]));

    let text = run_cmd(&temp, &style, &["show", "landuse-park"]);
    assert!(text.contains("any of the filters match"));
    assert!(text.contains("[0] name has"));
}

#[test]
fn cli_edit_only_touches_target_clause() {
    let (temp, style) = setup();
    let changed = run_cmd_json(&temp, &style, &["set-args", "roads", "1", "bridge"]);
    assert_eq!(
        changed["filter"],
        json!(["all", ["in", "class", "primary", "secondary"], ["!=", "brunnel", "bridge"]])
    );
    assert_eq!(layer_filter(&style, "roads"), changed["filter"]);
}

#[test]
fn cli_refuses_nested_filters() {
    let (temp, style) = setup();
    let shown = run_cmd_json(&temp, &style, &["show", "labels"]);
    assert_eq!(shown["view"]["status"], "unsupported");
    assert_eq!(shown["view"]["reason"]["kind"], "nested_combining");
    assert_eq!(shown["view"]["reason"]["index"], 1);

    let before = fs::read_to_string(&style).expect("read");
    let output = run_raw(&temp, &style, &["set-combining", "labels", "any"]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(fs::read_to_string(&style).expect("read"), before);
}

#[test]
fn cli_degrades_undecomposable_bare_clause() {
    let (temp, style) = setup();
    let doc = json!({
        "version": 8,
        "layers": [{"id": "odd", "type": "fill", "filter": ["has"]}]
    });
    fs::write(&style, doc.to_string()).expect("write style");

    let shown = run_cmd_json(&temp, &style, &["show", "odd"]);
    assert_eq!(shown["view"]["status"], "unsupported");
    assert_eq!(shown["view"]["reason"]["kind"], "malformed_clause");
    assert_eq!(shown["view"]["reason"]["index"], 0);

    let layers = run_cmd_json(&temp, &style, &["layers"]);
    assert_eq!(layers[0]["filter"], "unsupported");

    let output = run_raw(&temp, &style, &["set-property", "odd", "0", "name"]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(layer_filter(&style, "odd"), json!(["has"]));
}

#[test]
fn cli_rejects_bad_edits() {
    let (temp, style) = setup();

    let output = run_raw(&temp, &style, &["set-property", "roads", "5", "class"]);
    assert_eq!(output.status.code(), Some(3));

    let output = run_raw(&temp, &style, &["set-args", "roads", "1", "a,b"]);
    assert_eq!(output.status.code(), Some(3));

    let output = run_raw(&temp, &style, &["set-operator", "roads", "0", "any"]);
    assert_eq!(output.status.code(), Some(3));

    let output = run_raw(&temp, &style, &["show", "missing-layer"]);
    assert_eq!(output.status.code(), Some(2));

    assert_eq!(
        layer_filter(&style, "roads"),
        json!(["all", ["in", "class", "primary", "secondary"], ["!=", "brunnel", "tunnel"]])
    );
}

#[test]
fn cli_layers_clear_and_suggest() {
    let (temp, style) = setup();

    let layers = run_cmd_json(&temp, &style, &["layers"]);
    let items = layers.as_array().expect("array");
    assert_eq!(items.len(), 4);
    assert_eq!(items[0]["filter"], "none");
    assert_eq!(items[2]["filter"], "editable");
    assert_eq!(items[2]["clauses"], 2);
    assert_eq!(items[3]["filter"], "unsupported");

    let suggestions = run_cmd_json(&temp, &style, &["suggest", "roads", "r"]);
    assert_eq!(suggestions, json!(["rank", "brunnel"]));

    run_cmd(&temp, &style, &["clear", "labels"]);
    assert_eq!(layer_filter(&style, "labels"), Value::Null);

    let filtered = run_cmd_json(&temp, &style, &["layers", "--filtered"]);
    assert_eq!(filtered.as_array().expect("array").len(), 2);
}

#[test]
fn cli_backup_writes_copy() {
    let (temp, style) = setup();
    let out = temp.path().join("copy.json");
    let report = run_cmd_json(
        &temp,
        &style,
        &["backup", "--out", out.to_str().expect("out path")],
    );
    assert_eq!(report["size_bytes"], STYLE.len() as u64);
    assert_eq!(fs::read_to_string(&out).expect("read"), STYLE);
}
