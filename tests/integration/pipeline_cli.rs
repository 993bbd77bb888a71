use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tempfile::tempdir;

use crate::common::{run, stderr_of, stdout_of, write_config, PIPELINE_BINARY};

const RECORD_ARGS: &str = "printf '%s\\n' \"$@\" > \"$(dirname \"$0\")/args.txt\"";

/// Config pointing the launcher at `sh <dir>/main.sh`.
fn pipeline_fixture(dir: &Path, script_body: &str) -> PathBuf {
    let script = dir.join("main.sh");
    fs::write(&script, format!("{script_body}\n")).expect("can write pipeline script");
    write_config(
        dir,
        &format!(
            "[pipeline]\ninterpreter = \"sh\"\nscript = \"{}\"\n",
            script.display()
        ),
    )
}

fn recorded_args(dir: &Path) -> Option<Vec<String>> {
    fs::read_to_string(dir.join("args.txt"))
        .ok()
        .map(|content| content.lines().map(String::from).collect())
}

#[test]
fn four_arguments_are_forwarded_as_named_flags() {
    let temp = tempdir().expect("can create temporary directory");
    let config = pipeline_fixture(temp.path(), RECORD_ARGS);
    let config = config.to_string_lossy();

    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "01", "ra_summary", "2025-04-30", "--config", &config],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    assert_eq!(
        recorded_args(temp.path()).expect("pipeline ran"),
        vec![
            "--country",
            "KE",
            "--le_book",
            "01",
            "--pipeline_type",
            "ra_summary",
            "--business_date",
            "2025-04-30"
        ]
    );
    assert!(stdout_of(&output).contains("✅ Pipeline completed successfully"));
}

#[test]
fn omitted_date_defaults_to_today() {
    let temp = tempdir().expect("can create temporary directory");
    let config = pipeline_fixture(temp.path(), RECORD_ARGS);
    let config = config.to_string_lossy();

    let before = chrono::Local::now().format("%Y-%m-%d").to_string();
    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "01", "bs_summary", "--config", &config],
    );
    let after = chrono::Local::now().format("%Y-%m-%d").to_string();

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let args = recorded_args(temp.path()).expect("pipeline ran");
    let date = args.last().expect("date flag value");
    assert!(
        date == &before || date == &after,
        "expected today's date, got {date}"
    );
}

#[test]
fn malformed_date_fails_before_running_anything() {
    let temp = tempdir().expect("can create temporary directory");
    let config = pipeline_fixture(temp.path(), RECORD_ARGS);
    let config = config.to_string_lossy();

    for date in ["30-04-2025", "2025/04/30", "yesterday"] {
        let output = run(
            PIPELINE_BINARY,
            temp.path(),
            &["KE", "01", "ra_summary", date, "--config", &config],
        );

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr_of(&output).contains("YYYY-MM-DD"));
        assert!(recorded_args(temp.path()).is_none(), "pipeline must not run");
    }
}

#[test]
fn empty_required_field_fails() {
    let temp = tempdir().expect("can create temporary directory");
    let config = pipeline_fixture(temp.path(), RECORD_ARGS);
    let config = config.to_string_lossy();

    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "", "ra_summary", "--config", &config],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("le_book must not be empty"));
    assert!(recorded_args(temp.path()).is_none());
}

#[test]
fn wrong_argument_count_prints_usage() {
    let temp = tempdir().expect("can create temporary directory");

    let output = run(PIPELINE_BINARY, temp.path(), &["KE", "01"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Usage"));
}

#[test]
fn unknown_pipeline_type_is_rejected() {
    let temp = tempdir().expect("can create temporary directory");
    let config = pipeline_fixture(temp.path(), RECORD_ARGS);
    let config = config.to_string_lossy();

    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "01", "pl_summary", "2025-04-30", "--config", &config],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("pl_summary"));
    assert!(recorded_args(temp.path()).is_none());
}

#[test]
fn pipeline_exit_code_is_propagated() {
    let temp = tempdir().expect("can create temporary directory");
    let config = pipeline_fixture(temp.path(), "exit 5");
    let config = config.to_string_lossy();

    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "01", "ra_summary", "2025-04-30", "--config", &config],
    );

    assert_eq!(output.status.code(), Some(5));
    assert!(stdout_of(&output).contains("❌ Pipeline failed (exit code 5)"));
}

#[test]
fn dry_run_prints_command_without_running_it() {
    let temp = tempdir().expect("can create temporary directory");
    let config = pipeline_fixture(temp.path(), RECORD_ARGS);
    let config = config.to_string_lossy();

    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "01", "ra_summary", "2025-04-30", "--dry-run", "--config", &config],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr_of(&output));
    let plan: Value = serde_json::from_str(&stdout_of(&output)).expect("dry-run prints JSON");
    assert_eq!(plan["program"], "sh");
    assert_eq!(plan["args"][1], "--country");
    assert_eq!(plan["args"][8], "2025-04-30");
    assert!(recorded_args(temp.path()).is_none());
}

#[test]
fn missing_interpreter_is_reported() {
    let temp = tempdir().expect("can create temporary directory");
    let config = write_config(
        temp.path(),
        "[pipeline]\ninterpreter = \"newsletter-launch-missing-python\"\nscript = \"main.py\"\n",
    );
    let config = config.to_string_lossy();

    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "01", "ra_summary", "2025-04-30", "--config", &config],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("newsletter-launch-missing-python"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let temp = tempdir().expect("can create temporary directory");

    let output = run(
        PIPELINE_BINARY,
        temp.path(),
        &["KE", "01", "ra_summary", "--config", "absent.toml"],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("absent.toml"));
}
