use crate::util::*;
mod util;

#[test]
fn input_file_does_not_exist() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg("tests/test-data/does_not_exist.jsonl");
    cmd.assert().failure().code(1);

    let output = cmd.output()?;
    match_on_out_no_case(&output.stderr, "FATAL: .*No such file", 1)?;
    match_on_out_no_case(&output.stdout, "FATAL ERROR - EARLY TERMINATION", 1)?;

    Ok(())
}

#[test]
fn input_is_not_events() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg("Cargo.toml").arg("-m");
    cmd.assert().success();

    // Every line is malformed, nothing is counted
    let stdout = cmd.output()?.stdout;
    match_on_out_no_case(&stdout, "Total Errors.*E10", 1)?;
    match_on_out_no_case(&stdout, r"Events classified.*\b0\b", 1)?;

    Ok(())
}

#[test]
fn any_errors_exit_code_zero() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg(FILE_10_EVENTS).arg("-E").arg("0");
    cmd.assert().failure().code(1);

    match_on_out_no_case(
        &cmd.output()?.stderr,
        "Exit code for any errors cannot be 0",
        1,
    )?;

    Ok(())
}

#[test]
fn empty_estimator() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg(FILE_10_EVENTS).arg("--estimator").arg(" ");
    cmd.assert().failure();

    match_on_out_no_case(&cmd.output()?.stderr, "estimator cannot be empty", 1)?;

    Ok(())
}

#[test]
fn stats_output_without_format() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg(FILE_10_EVENTS).arg("--output-stats").arg("stats.json");
    cmd.assert().failure();

    match_on_out_no_case(
        &cmd.output()?.stderr,
        "required arguments were not provided",
        1,
    )?;

    Ok(())
}

#[test]
fn input_stats_file_does_not_exist() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg(FILE_10_EVENTS)
        .arg("-i")
        .arg("tests/test-data/does_not_exist.json");
    cmd.assert().failure().code(1);

    match_on_out_no_case(&cmd.output()?.stderr, "Input stats file does not exist", 1)?;

    Ok(())
}

#[test]
fn input_stats_file_corrupt() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    let stats_file = tmp_d.child("stats.json");
    stats_file.write_str("not json")?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg(FILE_10_EVENTS)
        .arg("-m")
        .arg("-i")
        .arg(stats_file.path())
        .arg("-E")
        .arg("4");
    cmd.assert().failure().code(4);

    match_on_out_no_case(&cmd.output()?.stderr, "Failed to deserialize stats file", 1)?;

    Ok(())
}

#[test]
fn merge_with_input_file() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg(FILE_10_EVENTS).arg("merge").arg("stats.json");
    cmd.assert().failure().code(1);

    match_on_out_no_case(
        &cmd.output()?.stderr,
        "Cannot read events and merge stats files in the same run",
        1,
    )?;

    Ok(())
}

#[test]
fn merge_bad_stats_files() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg("merge").arg("tests/test-data/does_not_exist.json");
    cmd.assert().failure().code(1);
    match_on_out_no_case(
        &cmd.output()?.stderr,
        "Stats file to merge does not exist",
        1,
    )?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg("merge").arg(FILE_10_EVENTS);
    cmd.assert().failure().code(1);
    match_on_out_no_case(&cmd.output()?.stderr, "invalid extension", 1)?;

    let tmp_d = assert_fs::TempDir::new()?;
    let corrupt = tmp_d.child("corrupt.toml");
    corrupt.write_str("events_seen = \"many\"")?;
    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg("merge").arg(corrupt.path());
    cmd.assert().failure().code(1);
    match_on_out_no_case(&cmd.output()?.stderr, "Failed to deserialize stats file", 1)?;

    Ok(())
}

#[test]
fn bad_checks_toml() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    let checks = tmp_d.child("checks.toml");
    checks.write_str("phys_sel_any = -1")?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg(FILE_10_EVENTS).arg("-c").arg(checks.path());
    cmd.assert().failure().code(1);

    match_on_out_no_case(&cmd.output()?.stderr, "Failed to parse checks TOML", 1)?;
    match_on_out_no_case(&cmd.output()?.stdout, "Events read", 0)?;

    Ok(())
}

#[test]
fn view_without_type() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg(FILE_10_EVENTS).arg("view");
    cmd.assert().failure();
    match_on_out_no_case(&cmd.output()?.stdout, "Events read", 0)?;

    Ok(())
}

#[test]
fn invalid_utf8_line_is_not_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let events = std::fs::read_to_string(FILE_10_EVENTS)?;
    let mut lines = events.lines();
    let mut input = Vec::new();
    for _ in 0..2 {
        input.extend_from_slice(lines.next().unwrap().as_bytes());
        input.push(b'\n');
    }
    input.extend_from_slice(b"{\"format\":\"\xff\xfe\"}\n");
    input.extend_from_slice(lines.next().unwrap().as_bytes());
    input.push(b'\n');

    let tmp_d = assert_fs::TempDir::new()?;
    let events_file = tmp_d.child("bad_utf8.jsonl");
    events_file.write_binary(&input)?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg(events_file.path());
    cmd.assert().success();

    let output = cmd.output()?;
    match_on_out_no_case(&output.stderr, r"line 3: \[E10\].*UTF-8", 1)?;
    match_on_out_no_case(&output.stderr, "FATAL", 0)?;
    // The events around the bad line are all counted
    match_on_out_no_case(&output.stdout, "Events read.*4", 1)?;
    match_on_out_no_case(&output.stdout, "Events classified.*3", 1)?;

    Ok(())
}

#[test]
fn fatal_read_error_exit_code() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    // Opening a directory succeeds, reading from it fails
    cmd.arg("tests/test-data");
    cmd.assert().failure().code(1);

    let output = cmd.output()?;
    match_on_out_no_case(&output.stderr, "FATAL: Failed reading input", 1)?;
    match_on_out_no_case(&output.stdout, "FATAL ERROR - EARLY TERMINATION", 1)?;

    Ok(())
}
