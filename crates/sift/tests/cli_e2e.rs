//! End-to-end tests for the `sift` binary.
//!
//! Each test runs the binary in a sandbox with its own config file and
//! field definitions, so nothing from the user's environment leaks in.
//!
//! Run with: cargo test --package sift-cli-rs --test cli_e2e

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

const FIELDS_TOML: &str = r#"
[[fields]]
field = "status"
type = "select"
options = ["open", "closed"]

[[fields]]
field = "name"

[[fields]]
field = "age"
type = "number"

[[fields]]
field = "joined"
type = "date_range"
query_field = "joined_at"

[[fields]]
field = "q"
custom_param = "search"
operators = ["fts"]
query_field = "bio"
"#;

const RECORDS_JSON: &str = r#"[
  {"id": 1, "name": "Ada", "status": "open", "age": 36, "joined_at": "2024-01-15", "bio": "first published algorithm"},
  {"id": 2, "name": "Bob", "status": "closed", "age": 17, "joined_at": "2024-03-02", "bio": "plays bass"},
  {"id": 3, "name": "Adele", "status": "open", "age": 52, "joined_at": "2023-12-31", "bio": "sings"}
]"#;

fn sift_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_sift"))
}

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temporary sandbox");
        fs::write(dir.path().join("fields.toml"), FIELDS_TOML).expect("failed to write fields");
        fs::write(dir.path().join("records.json"), RECORDS_JSON).expect("failed to write records");
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn config_path(&self) -> PathBuf {
        self.path("config").join("config.toml")
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(sift_binary());
        cmd.args(args);
        cmd.env("SIFT_CONFIG", self.config_path());
        cmd.env("XDG_CONFIG_HOME", self.path("xdg"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("SIFT_FIELDS");
        cmd.env_remove("SIFT_LOG");
        cmd.env_remove("RUST_LOG");
        cmd
    }

    fn run_allow_failure(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("failed to run sift command")
    }

    fn run(&self, args: &[&str]) -> Output {
        let output = self.run_allow_failure(args);
        if output.status.success() {
            return output;
        }

        panic!(
            "sift command failed\nargs: {:?}\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }

    fn run_stdout(&self, args: &[&str]) -> String {
        String::from_utf8_lossy(&self.run(args).stdout).into_owned()
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let stdout = self.run_stdout(args);
        serde_json::from_str(&stdout).unwrap_or_else(|err| {
            panic!(
                "command did not emit valid JSON\nargs: {:?}\nerror: {}\nstdout:\n{}",
                args, err, stdout
            )
        })
    }

    fn fields_arg(&self) -> String {
        self.path("fields.toml").display().to_string()
    }

    fn records_arg(&self) -> String {
        self.path("records.json").display().to_string()
    }
}

fn error_json(output: &Output) -> Value {
    let stderr = String::from_utf8_lossy(&output.stderr);
    serde_json::from_str(&stderr)
        .unwrap_or_else(|err| panic!("stderr is not JSON ({err}):\n{stderr}"))
}

// ============================================================================
// Parse / normalize / validate
// ============================================================================

#[test]
fn test_parse_json() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let out = sb.run_json(&[
        "--json",
        "--fields",
        &fields,
        "parse",
        "status=in.(open,closed)&search=algorithm&stauts=eq.x&page=2",
    ]);

    let filters = out["filters"].as_array().unwrap();
    assert_eq!(filters.len(), 2);
    assert_eq!(filters[0]["field"], "status");
    assert_eq!(filters[0]["value"], json!(["open", "closed"]));
    assert_eq!(filters[1]["field"], "q");
    assert_eq!(filters[1]["operator"], "fts");
    assert_eq!(out["remaining"], json!([["stauts", "eq.x"], ["page", "2"]]));
    assert_eq!(out["unknown"][0]["suggestion"], "status");
}

#[test]
fn test_parse_table() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let stdout = sb.run_stdout(&["--fields", &fields, "parse", "name=eq.Ada&sort=name"]);
    assert!(stdout.contains("name"));
    assert!(stdout.contains("eq"));
    assert!(stdout.contains("Ada"));
    assert!(stdout.contains("Passed through: sort=name"));
}

#[test]
fn test_normalize() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let stdout = sb.run_stdout(&[
        "--fields",
        &fields,
        "normalize",
        "name=ada&joined=gte.2024-01-01&joined=lte.2024-02-01",
    ]);
    assert_eq!(
        stdout.trim(),
        "name=ilike.*ada*&and=%28joined.gte.2024-01-01%2Cjoined.lte.2024-02-01%29"
    );
}

#[test]
fn test_validate_ok_and_failure() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();

    let out = sb.run_json(&["--json", "--fields", &fields, "validate", "status=eq.open"]);
    assert_eq!(out, json!({"valid": true, "filters": 1}));

    let output = sb.run_allow_failure(&["--json", "--fields", &fields, "validate", "status=gt.open"]);
    assert_eq!(output.status.code(), Some(1));
    let err = error_json(&output);
    assert_eq!(err["error"]["code"], "INVALID_OPERATOR");
}

#[test]
fn test_validate_strict_unknown_field() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let output = sb.run_allow_failure(&["--fields", &fields, "validate", "--strict", "stauts=eq.open"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("did you mean 'status'?"), "{stderr}");
}

#[test]
fn test_config_limits_apply_to_validate() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    sb.run(&["config", "set", "limits.max_value_length", "3"]);

    let output = sb.run_allow_failure(&["--json", "--fields", &fields, "validate", "name=eq.Adele"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(error_json(&output)["error"]["code"], "VALUE_TOO_LONG");
}

// ============================================================================
// Apply
// ============================================================================

#[test]
fn test_apply_json() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let records = sb.records_arg();
    let out = sb.run_json(&[
        "--json",
        "--fields",
        &fields,
        "apply",
        "status=eq.open&age=gt.40",
        "--data",
        &records,
    ]);

    assert_eq!(out["total"], 1);
    assert_eq!(out["rows"][0]["name"], "Adele");
    assert_eq!(out["conditions"][1], json!({"field": "age", "operator": "gt", "value": 40.0}));
}

#[test]
fn test_apply_range_sort_and_page() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let records = sb.records_arg();
    let out = sb.run_json(&[
        "--json",
        "--fields",
        &fields,
        "apply",
        "and=(joined.gte.2024-01-01)",
        "--data",
        &records,
        "--sort",
        "age",
        "--limit",
        "1",
        "--select",
        "id,name",
    ]);

    assert_eq!(out["total"], 2);
    assert_eq!(out["returned"], 1);
    assert_eq!(out["rows"], json!([{"id": 2, "name": "Bob"}]));
}

#[test]
fn test_apply_full_text_custom_param() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let records = sb.records_arg();
    let out = sb.run_json(&[
        "--json",
        "--fields",
        &fields,
        "apply",
        "search=published",
        "--data",
        &records,
    ]);
    assert_eq!(out["rows"][0]["id"], 1);
    assert_eq!(out["total"], 1);
}

#[test]
fn test_apply_raw_needs_no_fields() {
    let sb = Sandbox::new();
    let records = sb.records_arg();
    let out = sb.run_json(&[
        "--json",
        "apply",
        "name=ilike.*ad*&page=3",
        "--data",
        &records,
        "--raw",
    ]);
    assert_eq!(out["total"], 2);
}

#[test]
fn test_apply_allow_restricts_fields() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let records = sb.records_arg();
    let out = sb.run_json(&[
        "--json",
        "--fields",
        &fields,
        "apply",
        "status=eq.closed&age=gt.40",
        "--data",
        &records,
        "--allow",
        "age",
    ]);
    assert_eq!(out["total"], 1);
    assert_eq!(out["rows"][0]["id"], 3);
}

#[test]
fn test_apply_table() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let records = sb.records_arg();
    let stdout = sb.run_stdout(&[
        "--fields",
        &fields,
        "apply",
        "name=ada",
        "--data",
        &records,
        "--select",
        "id,name",
    ]);
    assert!(stdout.starts_with("id  name"), "{stdout}");
    assert!(stdout.contains("Showing 2 of 2 records"));
}

#[test]
fn test_apply_cast_error() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let records = sb.records_arg();
    let output = sb.run_allow_failure(&[
        "--json",
        "--fields",
        &fields,
        "apply",
        "age=gt.old",
        "--data",
        &records,
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(error_json(&output)["error"]["code"], "CAST_ERROR");
}

#[test]
fn test_apply_missing_data_file() {
    let sb = Sandbox::new();
    let fields = sb.fields_arg();
    let missing = sb.path("missing.json").display().to_string();
    let output = sb.run_allow_failure(&["--fields", &fields, "apply", "age=gt.1", "--data", &missing]);
    assert_eq!(output.status.code(), Some(3));
}

// ============================================================================
// Fields, operators, config
// ============================================================================

#[test]
fn test_no_fields_configured() {
    let sb = Sandbox::new();
    let output = sb.run_allow_failure(&["--json", "parse", "a=eq.1"]);
    assert_eq!(output.status.code(), Some(5));
    assert_eq!(error_json(&output)["error"]["code"], "CONFIG_ERROR");
}

#[test]
fn test_fields_from_env() {
    let sb = Sandbox::new();
    let output = sb
        .command(&["--json", "fields"])
        .env("SIFT_FIELDS", sb.path("fields.toml"))
        .output()
        .expect("failed to run sift command");
    assert!(output.status.success());

    let out: Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = out["fields"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["field"].as_str())
        .collect();
    assert_eq!(names, vec!["status", "name", "age", "joined", "q"]);
}

#[test]
fn test_inline_fields_in_config() {
    let sb = Sandbox::new();
    fs::create_dir_all(sb.path("config")).unwrap();
    fs::write(
        sb.config_path(),
        "[[fields]]\nfield = \"title\"\noperators = [\"eq\"]\n",
    )
    .unwrap();

    let out = sb.run_json(&["--json", "parse", "title=Rust"]);
    assert_eq!(out["filters"][0]["operator"], "eq");
    assert_eq!(out["filters"][0]["value"], "Rust");
}

#[test]
fn test_relative_fields_file_in_config() {
    let sb = Sandbox::new();
    fs::create_dir_all(sb.path("config")).unwrap();
    fs::copy(sb.path("fields.toml"), sb.path("config").join("mine.toml")).unwrap();
    sb.run(&["config", "set", "fields_file", "mine.toml"]);

    let out = sb.run_json(&["--json", "fields"]);
    assert_eq!(out["fields"].as_array().unwrap().len(), 5);
}

#[test]
fn test_operators() {
    let sb = Sandbox::new();
    let out = sb.run_json(&["--json", "operators"]);
    assert_eq!(out["operators"].as_array().unwrap().len(), 19);

    let stdout = sb.run_stdout(&["operators"]);
    assert!(stdout.contains("gte_lte"));
    assert!(stdout.contains("between"));
}

#[test]
fn test_config_init_set_show() {
    let sb = Sandbox::new();

    let path = sb.run_json(&["--json", "config", "path"]);
    assert_eq!(path["exists"], false);

    sb.run(&["config", "init"]);
    assert!(sb.config_path().exists());

    let output = sb.run_allow_failure(&["config", "init"]);
    assert_eq!(output.status.code(), Some(5));
    sb.run(&["config", "init", "--force"]);

    sb.run(&["config", "set", "query.default_limit", "25"]);
    sb.run(&["config", "set", "output.color", "no"]);

    let show = sb.run_json(&["--json", "config", "show"]);
    assert_eq!(show["exists"], true);
    assert_eq!(show["config"]["query"]["default_limit"], 25);
    assert_eq!(show["config"]["output"]["color"], false);

    let output = sb.run_allow_failure(&["config", "set", "output.theme", "dark"]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_completions() {
    let sb = Sandbox::new();
    let stdout = sb.run_stdout(&["completions", "bash"]);
    assert!(stdout.contains("sift"));
    assert!(stdout.contains("normalize"));
}
