use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_orgpulse"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "orgpulse init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let config_path = dir.path().join(".orgpulse.toml");
    assert!(config_path.exists(), ".orgpulse.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[data]"));
    assert!(content.contains("[analytics]"));

    // Verify it's valid TOML that orgpulse-core can parse
    let _config: orgpulse_core::PulseConfig = toml::from_str(&content).unwrap();
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".orgpulse.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_orgpulse"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}
