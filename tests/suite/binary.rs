//! End-to-end runs of the `api-governor` binary.

use std::path::Path;
use std::process::{Command, Output};

use governor_config::{ENV_AUTO_LINT, ENV_BASELINE, ENV_POLICY, ENV_PYTHON};

use crate::common::{Fixture, MIXED_FINDINGS, NO_FINDINGS};

fn run(fixture: &Fixture, config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_api-governor"))
        .arg("--config")
        .arg(config)
        .args(args)
        .current_dir(fixture.dir.path())
        .env("HOME", fixture.dir.path())
        .env_remove(ENV_PYTHON)
        .env_remove(ENV_POLICY)
        .env_remove(ENV_BASELINE)
        .env_remove(ENV_AUTO_LINT)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn lint_prints_diagnostics_and_fails_on_blockers() {
    let fixture = Fixture::printing(MIXED_FINDINGS);
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let config = fixture.config_file("");

    let output = run(&fixture, &config, &["lint", "openapi.yaml"]);

    assert!(!output.status.success());
    assert_eq!(
        stdout(&output),
        "openapi.yaml:5:1: error: [OAS001] operationId missing\n\
         openapi.yaml:1:1: warning: [OAS014] no description\n"
    );
    assert!(
        stderr(&output).contains("error: API Governor: 1 blockers, 1 warnings"),
        "{}",
        stderr(&output)
    );
}

#[test]
fn lint_prints_breaking_changes_with_their_message_prefix() {
    let fixture = Fixture::printing(
        r#"{"findings":[{"rule_id":"OAS003","message":"no servers","severity":"MINOR","line":2}],"breaking_changes":[{"description":"removed GET /pets","client_impact":"404"}]}"#,
    );
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let config = fixture.config_file("");

    let output = run(&fixture, &config, &["lint", "openapi.yaml"]);

    assert!(!output.status.success());
    assert_eq!(
        stdout(&output),
        "openapi.yaml:2:1: info: [OAS003] no servers\n\
         openapi.yaml:1:1: error: [BREAKING] removed GET /pets - 404\n"
    );
}

#[test]
fn clean_lint_succeeds_and_json_lists_document() {
    let fixture = Fixture::printing(NO_FINDINGS);
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let config = fixture.config_file("");

    let output = run(&fixture, &config, &["lint", "--json", "openapi.yaml"]);

    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value[0]["path"], "openapi.yaml");
    assert_eq!(value[0]["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn lint_of_ungoverned_file_is_a_no_op() {
    let fixture = Fixture::printing(MIXED_FINDINGS);
    fixture.document("notes.txt", "hello\n");
    let config = fixture.config_file("");

    let output = run(&fixture, &config, &["lint", "notes.txt"]);

    assert!(output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("warning: Current file is not an OpenAPI specification"));
}

#[test]
fn configured_policy_reaches_analyzer() {
    let fixture = Fixture::new("echo \"$*\" >&2\nexit 4\n");
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let config = fixture.config_file("policy = \"strict\"\n");

    let output = run(&fixture, &config, &["lint", "openapi.yaml"]);

    assert!(!output.status.success());
    assert!(
        stderr(&output).contains(
            "error: API Governor error: openapi.yaml --policy strict --output-format json"
        ),
        "{}",
        stderr(&output)
    );
}

#[test]
fn diff_exits_non_zero_on_breaking_changes() {
    let fixture = Fixture::printing(
        r#"{"breaking_changes":[{"description":"removed GET /pets","client_impact":"404"}]}"#,
    );
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let config = fixture.config_file("");

    let output = run(&fixture, &config, &["diff", "openapi.yaml", "--baseline", "v1.yaml"]);

    assert!(!output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("=== API Governor Breaking Change Analysis ===\n\n"), "{text}");
    assert!(text.contains("removed GET /pets"));
}

#[test]
fn diff_uses_configured_baseline() {
    let fixture = Fixture::new("shift\nwhile [ \"$1\" != --baseline ]; do shift; done\necho \"baseline=$2\"\n");
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let config = fixture.config_file("baseline_spec = \"released.yaml\"\n");

    let output = run(&fixture, &config, &["diff", "openapi.yaml"]);

    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("baseline=released.yaml"));
}

#[test]
fn report_open_prints_generated_report() {
    let fixture = Fixture::new(
        "while [ \"$1\" != --output-dir ]; do shift; done\nmkdir -p \"$2\"\necho '# Review' > \"$2/API_REVIEW.md\"\n",
    );
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");
    let config = fixture.config_file("");

    let output = run(
        &fixture,
        &config,
        &["report", "openapi.yaml", "--workspace", ".", "--open"],
    );

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "# Review\n\n");
    assert!(fixture.path(".api-governor/API_REVIEW.md").exists());
    assert!(stderr(&output).contains("Report generated in ./.api-governor (Open Report)"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let fixture = Fixture::printing(NO_FINDINGS);
    fixture.document("openapi.yaml", "openapi: 3.0.0\n");

    let output = run(&fixture, &fixture.path("nope.toml"), &["lint", "openapi.yaml"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to load configuration"));
}

#[test]
fn missing_document_is_an_error() {
    let fixture = Fixture::printing(NO_FINDINGS);
    let config = fixture.config_file("");

    let output = run(&fixture, &config, &["lint", "absent.openapi.yaml"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("failed to read absent.openapi.yaml"));
}
