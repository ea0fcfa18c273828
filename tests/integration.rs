use std::{env, fs, path::PathBuf, process::Command};

fn run_bin(args: &[&str]) -> String {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_planfact"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str =
        std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

    assert!(
        output.status.success(),
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );

    stdout_str.to_string()
}

fn read_json(file: PathBuf) -> serde_json::Value {
    let contents = fs::read_to_string(&file).expect("failed to read json file");
    serde_json::from_str(&contents).expect("failed to parse json file")
}

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_contents = String::new()
        + "[series]\n"
        + "timeframe = \"year\"\n"
        + "\n"
        + "[trend]\n"
        + "kind = \"moving_average\"\n"
        + "smoothing = false\n";
    fs::write(test_dir.join("config.toml"), config_contents).expect("failed to write config file");

    let yearly = r#"{
  "points": [
    { "label": "2022", "plan": "100", "actual": 100, "group": "North" },
    { "label": "2023", "plan": 100, "actual": "110,0", "group": "South" },
    { "label": "2024", "plan": 100, "actual": 121, "deviation": 20, "group": "North" }
  ]
}"#;
    fs::write(test_dir.join("input-yearly.json"), yearly).expect("failed to write input file");

    let empty = r#"{ "points": [] }"#;
    fs::write(test_dir.join("input-empty.json"), empty).expect("failed to write input file");

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    run_bin(&["--report-dir", test_dir_str, "analyze"]);

    let result = read_json(test_dir.join("result-yearly.json"));
    assert_eq!(result["statistics"]["count"], 3);
    let cagr = result["statistics"]["cagr"].as_f64().expect("cagr is not a number");
    assert!((cagr - 10.0).abs() < 1e-9);
    assert_eq!(result["summary"]["totalPlan"], 300.0);
    assert_eq!(result["groups"][0]["group"], "North");
    assert_eq!(result["trend"][1]["actual"], 105.0);
    // upstream deviation wins over the derived one
    assert_eq!(result["trend"][2]["deviation"], 20.0);

    let result = read_json(test_dir.join("result-empty.json"));
    assert_eq!(result["statistics"]["count"], 0);
    assert_eq!(result["statistics"]["mean"], 0.0);

    let stdout = run_bin(&[
        "--report-dir",
        test_dir_str,
        "trend",
        "--file",
        "yearly",
        "--kind",
        "percentage",
    ]);
    let points: serde_json::Value =
        serde_json::from_str(&stdout).expect("failed to parse trend output");
    assert_eq!(points[2]["actual"], 100.0);

    run_bin(&["--report-dir", test_dir_str, "clean"]);
    assert!(!test_dir.join("result-yearly.json").exists());
    assert!(test_dir.join("input-yearly.json").exists());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn missing_input_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("missing_input");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    let output = Command::new(env!("CARGO_BIN_EXE_planfact"))
        .args(["--report-dir", test_dir_str, "trend", "--file", "nope"])
        .output()
        .expect("failed to execute command");
    assert!(!output.status.success());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn invalid_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("invalid_config");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_contents = String::new() + "[series]\n" + "first_month = 13\n";
    fs::write(test_dir.join("config.toml"), config_contents).expect("failed to write config file");

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    let output = Command::new(env!("CARGO_BIN_EXE_planfact"))
        .args(["--report-dir", test_dir_str, "analyze"])
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute command");
    assert!(!output.status.success());

    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");
    assert!(stderr_str.contains("failed to construct cfg"), "{stderr_str}");
    assert!(stderr_str.contains("invalid first month"), "{stderr_str}");

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn config_enables_dev_mode() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("config_dev_mode");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_contents = String::new() + "[output]\n" + "dev_mode = true\n";
    fs::write(test_dir.join("config.toml"), config_contents).expect("failed to write config file");

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    let output = Command::new(env!("CARGO_BIN_EXE_planfact"))
        .args(["--report-dir", test_dir_str, "clean"])
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to execute command");
    assert!(output.status.success());

    let stderr_str =
        std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");
    assert!(stderr_str.contains("DEBUG"), "{stderr_str}");

    fs::remove_dir_all(&test_dir).ok();
}
