use crate::util::*;
mod util;

/// Runs evcount on [FILE_10_EVENTS] and writes the collected stats to `out_file` in the given format
fn write_stats(out_file: &std::path::Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg(FILE_10_EVENTS)
        .arg("--mute-errors")
        .arg("--output-stats")
        .arg(out_file)
        .arg("--stats-format")
        .arg(format);
    cmd.assert().success();
    Ok(())
}

#[test]
fn output_stats_to_stdout() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("evcount")?;

    cmd.arg(FILE_10_EVENTS)
        .arg("-m")
        .arg("-S")
        .arg("stdout")
        .arg("-D")
        .arg("json");
    cmd.assert().success();

    let stdout = cmd.output()?.stdout;
    // Stats instead of the report
    match_on_out_no_case(&stdout, "Events read", 0)?;
    let stats: serde_json::Value = serde_json::from_slice(&stdout)?;
    assert_eq!(stats["events_seen"], 10);
    assert_eq!(stats["events_classified"], 8);
    assert_eq!(stats["defaulted_centrality"], 1);

    Ok(())
}

#[test]
fn output_stats_then_verify() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    for format in ["json", "toml"] {
        let stats_file = tmp_d.child(format!("stats.{format}"));
        write_stats(stats_file.path(), format)?;
        stats_file.assert(predicate::path::is_file());

        let mut cmd = Command::cargo_bin("evcount")?;
        cmd.arg(FILE_10_EVENTS)
            .arg("-m")
            .arg("-v2")
            .arg("--input-stats-file")
            .arg(stats_file.path())
            .arg("-E")
            .arg("5");
        // Errors in the input set the exit code regardless of the match
        cmd.assert().failure().code(5);

        let stderr = cmd.output()?.stderr;
        match_on_out_no_case(&stderr, "Input stats matched collected stats", 1)?;
        match_on_out_no_case(&stderr, "did not match", 0)?;
    }

    Ok(())
}

#[test]
fn verify_stats_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    let stats_file = tmp_d.child("stats.json");
    write_stats(stats_file.path(), "json")?;

    // Only the first event of the file
    let first_event = std::fs::read_to_string(FILE_10_EVENTS)?
        .lines()
        .next()
        .unwrap()
        .to_string();

    let mut cmd = assert_cmd::Command::cargo_bin("evcount")?;
    cmd.arg("-i")
        .arg(stats_file.path())
        .arg("-E")
        .arg("7")
        .write_stdin(first_event);
    cmd.assert().failure().code(7);

    let stderr = cmd.output()?.stderr;
    match_on_out_no_case(&stderr, "warn - Input stats did not match collected stats", 1)?;
    match_on_out_no_case(&stderr, "events_seen mismatch", 1)?;

    Ok(())
}

#[test]
fn merge_stats_files() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    let json_file = tmp_d.child("segment_1.json");
    let toml_file = tmp_d.child("segment_2.toml");
    write_stats(json_file.path(), "json")?;
    write_stats(toml_file.path(), "toml")?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg("merge").arg(json_file.path()).arg(toml_file.path());
    cmd.assert().success();

    let stdout = cmd.output()?.stdout;
    match_on_out_no_case(&stdout, "Events read.*20", 1)?;
    match_on_out_no_case(&stdout, "Events classified.*16", 1)?;
    match_on_out_no_case(&stdout, r"kAny\b.*14.*10.*4", 1)?;
    match_on_out_no_case(&stdout, r"kSemiCentral\b.*4", 1)?;
    match_on_out_no_case(&stdout, r"Track\s+4", 1)?;

    Ok(())
}

#[test]
fn merge_stats_files_then_verify() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    let segment = tmp_d.child("segment.json");
    let merged = tmp_d.child("merged.toml");
    write_stats(segment.path(), "json")?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg("merge")
        .arg(segment.path())
        .arg(segment.path())
        .arg("-S")
        .arg(merged.path())
        .arg("-D")
        .arg("toml");
    cmd.assert().success();
    merged.assert(predicate::str::contains("events_seen = 20"));

    // Merging the merged stats with nothing else reproduces them
    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg("merge")
        .arg(merged.path())
        .arg("-i")
        .arg(merged.path())
        .arg("-v2");
    cmd.assert().success();
    match_on_out_no_case(
        &cmd.output()?.stderr,
        "Input stats matched collected stats",
        1,
    )?;

    Ok(())
}

#[test]
fn custom_checks_match() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    let checks = tmp_d.child("checks.toml");
    checks.write_str("events = 10\nphys_sel_any = 7\nspd_vert_any = 5\ntrack_vert_any = 2\n")?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg(FILE_10_EVENTS)
        .arg("-m")
        .arg("--checks-toml")
        .arg(checks.path());
    cmd.assert().success();

    match_on_out_no_case(&cmd.output()?.stdout, "E900", 0)?;

    Ok(())
}

#[test]
fn custom_checks_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;
    let checks = tmp_d.child("checks.toml");
    checks.write_str("phys_sel_any = 8\ntrack_vert_any = 2\n")?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.arg(FILE_10_EVENTS)
        .arg("-c")
        .arg(checks.path());
    cmd.assert().success();

    let output = cmd.output()?;
    match_on_out_no_case(
        &output.stderr,
        r"\[E9002\] Expected 8 PhysSel events in kAny, but found 7",
        1,
    )?;
    match_on_out_no_case(&output.stderr, "E9004", 0)?;
    match_on_out_no_case(&output.stdout, "Total Errors.*3", 1)?;

    Ok(())
}

#[test]
fn generate_checks_toml() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_d = assert_fs::TempDir::new()?;

    let mut cmd = Command::cargo_bin("evcount")?;
    cmd.current_dir(tmp_d.path()).arg("--generate-checks-toml");
    cmd.assert().success();

    let generated = tmp_d.child("custom_checks.toml");
    generated.assert(predicate::path::is_file());
    generated.assert(predicate::str::contains("phys_sel_any"));
    match_on_out_no_case(&cmd.output()?.stderr, "custom_checks.toml' file generated", 1)?;

    Ok(())
}
