use clap::Parser;
use dupes::cli::Cli;
use dupes::error::ExitCode;
use dupes::output::JsonOutput;
use dupes::signal::ShutdownHandler;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn dupes_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dupes"));
    cmd.env_remove("RUST_LOG").env("NO_COLOR", "true");
    cmd
}

#[test]
fn test_run_app_success_without_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unique.txt"), b"unique").unwrap();

    let cli = Cli::try_parse_from(["dupes", "--no-progress", dir.path().to_str().unwrap()]).unwrap();
    assert_eq!(dupes::run_app(cli).unwrap(), ExitCode::Success);
}

#[test]
fn test_run_app_writes_json() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), b"dup").unwrap();
    fs::write(data.join("b.txt"), b"dup").unwrap();
    let report = dir.path().join("report.json");

    let cli = Cli::try_parse_from([
        "dupes",
        "-q",
        "--json",
        report.to_str().unwrap(),
        data.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(dupes::run_app(cli).unwrap(), ExitCode::Success);

    let parsed = JsonOutput::parse(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(parsed.groups.len(), 1);
    assert_eq!(parsed.groups[0].files.len(), 2);
}

#[test]
fn test_run_app_missing_directory_is_traversal_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let cli = Cli::try_parse_from(["dupes", "-q", missing.to_str().unwrap()]).unwrap();
    let err = dupes::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::TraversalError);
}

#[test]
fn test_run_app_unwritable_json_is_output_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    let target = dir.path().join("no/such/dir/out.json");

    let cli = Cli::try_parse_from([
        "dupes",
        "-q",
        "-j",
        target.to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ])
    .unwrap();
    let err = dupes::run_app(cli).unwrap_err();
    assert_eq!(ExitCode::from_error(&err), ExitCode::OutputError);
}

#[test]
fn test_run_app_interrupted_exit_code_and_partial_json() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("a.txt"), b"dup").unwrap();
    fs::write(data.join("b.txt"), b"dup").unwrap();
    let report = dir.path().join("partial.json");

    let shutdown = ShutdownHandler::new();
    shutdown.request_shutdown();

    let cli = Cli::try_parse_from([
        "dupes",
        "-q",
        "--json",
        report.to_str().unwrap(),
        data.to_str().unwrap(),
    ])
    .unwrap();
    assert_eq!(
        dupes::run_app_with_shutdown(cli, &shutdown).unwrap(),
        ExitCode::Interrupted
    );

    // The report is still written for whatever was found before the stop
    let parsed = JsonOutput::parse(&fs::read_to_string(&report).unwrap()).unwrap();
    assert!(parsed.groups.is_empty());
}

#[test]
fn test_binary_reports_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();
    fs::write(dir.path().join("c.txt"), b"other").unwrap();

    let output = dupes_bin()
        .args(["--no-progress", "-q"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("1 Files with duplicates found:\n"));
    assert!(stdout.contains("Hash: "));
    assert!(stdout.contains("\t1 "));
    assert!(stdout.contains("a.txt"));
    assert!(stdout.contains("b.txt"));
    assert!(!stdout.contains("c.txt"));
    assert!(!stdout.contains('\u{1b}'));
}

#[test]
fn test_binary_no_duplicates_message() {
    let dir = tempdir().unwrap();
    let output = dupes_bin().arg("-q").arg(dir.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "No duplicate files exist in the specified directory.\n"
    );
}

#[test]
fn test_binary_usage_errors_exit_one() {
    let no_args = dupes_bin().output().unwrap();
    assert_eq!(no_args.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&no_args.stderr).contains("Usage"));

    let bad_flag = dupes_bin().args(["--bogus", "."]).output().unwrap();
    assert_eq!(bad_flag.status.code(), Some(1));

    let missing_value = dupes_bin().args([".", "--json"]).output().unwrap();
    assert_eq!(missing_value.status.code(), Some(1));
}

#[test]
fn test_binary_help_exits_zero() {
    let output = dupes_bin().arg("--help").output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--json"));
}

#[test]
fn test_binary_missing_directory_exits_three() {
    let dir = tempdir().unwrap();
    let output = dupes_bin()
        .arg("-q")
        .arg(dir.path().join("missing"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("DP003"));
}

#[test]
fn test_binary_file_instead_of_directory_exits_three() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"x").unwrap();

    let output = dupes_bin().arg("-q").arg(&file).output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_binary_json_failure_exits_four_after_report() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();

    let output = dupes_bin()
        .arg("-q")
        .arg("--json")
        .arg(dir.path().join("missing/dir/out.json"))
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Files with duplicates found"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("DP004"));
}
