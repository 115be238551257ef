//! Integration tests for the lazy-ta CLI.
//!
//! These drive the built binary end to end: CSV bars in, plot CSV or JSON
//! schema out, and non-zero exit with a useful message on failure.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_lazy-ta"))
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_list_names_every_indicator() {
    let output = run_cli(&["list"]);
    assert!(output.status.success());
    let text = stdout_of(&output);
    for name in ["bollinger", "mcginley", "moving_average", "parabolic_sar", "supertrend", "zigzag"] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
}

#[test]
fn test_describe_prints_json_schema() {
    let output = run_cli(&["describe", "zigzag"]);
    assert!(output.status.success());
    let schema: serde_json::Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(schema["name"], "zigzag");
    let deviation = schema["inputs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == "deviation")
        .expect("deviation input");
    assert_eq!(deviation["type"], "float");
    assert_eq!(deviation["default"]["value"], 5.0);
}

#[test]
fn test_run_bollinger_to_stdout() {
    let output = run_cli(&["run", "bollinger", &fixture("bars.csv")]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let text = stdout_of(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "time,basis,lower,upper");
    assert_eq!(lines.len(), 41, "header plus one row per bar");
    // default length 20: the first 19 bars have no bands
    assert_eq!(lines[1], "1700000000,,,");
    assert_eq!(lines[19], format!("{},,,", 1_700_000_000 + 60 * 18));
    let cells: Vec<f64> = lines[20]
        .split(',')
        .skip(1)
        .map(|c| c.parse().unwrap())
        .collect();
    let (basis, lower, upper) = (cells[0], cells[1], cells[2]);
    assert!(lower < basis && basis < upper);
    assert!(((upper - basis) - (basis - lower)).abs() < 1e-9);
}

#[test]
fn test_run_with_overrides_to_file() {
    let out = std::env::temp_dir().join(format!("lazy-ta-ma-{}.csv", std::process::id()));
    let out_path = out.to_string_lossy().into_owned();
    let output = run_cli(&[
        "run",
        "moving_average",
        &fixture("bars.csv"),
        "-s",
        "length=3",
        "--set",
        "ma_type=EMA",
        "-o",
        &out_path,
    ]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).is_empty());

    let content = fs::read_to_string(&out).unwrap();
    let _ = fs::remove_file(&out);
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "time,ma");
    assert_eq!(lines.len(), 41);
    assert!(lines[1].ends_with(','));
    assert!(lines[2].ends_with(','));
    assert!(!lines[3].ends_with(','));
}

#[test]
fn test_run_zigzag_plots() {
    let output = run_cli(&["run", "zigzag", &fixture("bars.csv"), "-s", "depth=4"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let text = stdout_of(&output);
    assert_eq!(text.lines().next(), Some("time,extension,zigzag"));

    let output = run_cli(&[
        "run",
        "zigzag",
        &fixture("bars.csv"),
        "-s",
        "depth=4",
        "-s",
        "extend=false",
    ]);
    assert!(output.status.success());
    assert_eq!(stdout_of(&output).lines().next(), Some("time,zigzag"));
}

#[test]
fn test_run_without_time_column_uses_row_numbers() {
    let output = run_cli(&["run", "moving_average", &fixture("no_time.csv"), "-s", "length=2"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let text = stdout_of(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, vec!["time,ma", "0,", "1,11", "2,11.25"]);
}

#[test]
fn test_unknown_indicator_fails_with_hint() {
    let output = run_cli(&["run", "nope", &fixture("bars.csv")]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("lazy-ta list"));
}

#[test]
fn test_invalid_input_fails_with_hint() {
    let output = run_cli(&["run", "bollinger", &fixture("bars.csv"), "-s", "length=0"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr_of(&output);
    assert!(err.contains("length"), "{err}");
    assert!(err.contains("lazy-ta describe"), "{err}");
}

#[test]
fn test_malformed_set_fails() {
    let output = run_cli(&["run", "bollinger", &fixture("bars.csv"), "-s", "length"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("id=value"));
}

#[test]
fn test_header_only_csv_is_empty_input() {
    let output = run_cli(&["run", "bollinger", &fixture("header_only.csv")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("empty input"));
}

#[test]
fn test_missing_column_fails() {
    let output = run_cli(&["run", "bollinger", &fixture("missing_low.csv")]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("no 'low' column"));
}

#[test]
fn test_missing_file_fails() {
    let output = run_cli(&["run", "bollinger", "no/such/bars.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("no/such/bars.csv"));
}
