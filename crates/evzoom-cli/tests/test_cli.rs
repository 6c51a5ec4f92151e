use assert_cmd::Command;
use evzoom_test_data::TestFile;
use std::fs;

#[test]
fn test_render_command() {
    let (data, _tmp) = TestFile::couplings_01().create_temp().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("viewer.svg");

    let mut cmd = Command::cargo_bin("evzoom").unwrap();
    cmd.arg("render")
        .arg("--data")
        .arg(&data)
        .arg("--output")
        .arg(&output);
    cmd.assert().success();

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("Coupling value"));
}

#[test]
fn test_render_from_query_with_hover() {
    let (data, _tmp) = TestFile::couplings_02().create_temp().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("hover.svg");

    let mut cmd = Command::cargo_bin("evzoom").unwrap();
    cmd.arg("render")
        .arg("--query")
        .arg(format!("?data={}", data))
        .arg("--hover")
        .arg("137.5")
        .arg("302.5")
        .arg("--output")
        .arg(&output);
    cmd.assert().success();
    assert!(output.exists());
}

#[test]
fn test_render_without_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("evzoom").unwrap();
    cmd.arg("render")
        .arg("--output")
        .arg(dir.path().join("none.svg"));
    cmd.assert().failure();
}

#[test]
fn test_replay_command() {
    let (data, _tmp) = TestFile::couplings_02().create_temp().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let events = dir.path().join("events.json");
    let output = dir.path().join("replay.svg");
    let trace = dir.path().join("trace.json");

    // 80 ticks clear the load time; the pointer then settles on cell (1, 4)
    let mut script = vec![r#"{"event": "tick"}"#.to_string(); 80];
    script.push(r#"{"event": "pointer_move", "x": 137.5, "y": 302.5}"#.to_string());
    script.extend(vec![r#"{"event": "tick"}"#.to_string(); 20]);
    fs::write(&events, format!("[{}]", script.join(","))).unwrap();

    let mut cmd = Command::cargo_bin("evzoom").unwrap();
    cmd.arg("replay")
        .arg("--data")
        .arg(&data)
        .arg("--events")
        .arg(&events)
        .arg("--output")
        .arg(&output)
        .arg("--trace")
        .arg(&trace);
    cmd.assert().success();

    let requests: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&trace).unwrap()).unwrap();
    assert!(requests
        .iter()
        .any(|r| r["target"] == serde_json::json!("MatrixBackground")));
    assert!(output.exists());
}
