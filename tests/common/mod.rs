use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Environment variables that would leak host configuration into a test run.
pub const PROBMODELSEED_ENV_VARS: [&str; 5] = [
    "PROBMODELSEED_CONFIG",
    "PROBMODELSEED_URL",
    "PROBMODELSEED_TOKEN",
    "PROBMODELSEED_USER_ID",
    "PROBMODELSEED_TIMEOUT_SECONDS",
];

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// A `probmodelseed` command isolated from the host environment, pointed at
/// a config file written from `config`.
#[allow(dead_code)]
pub fn probmodelseed_cmd(config: &str) -> (TempDir, assert_cmd::Command) {
    let (temp_dir, config_path) = temp_config_file(config);
    let mut cmd = assert_cmd::Command::cargo_bin("probmodelseed").expect("binary is built");
    for var in PROBMODELSEED_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd.arg("--config").arg(config_path);
    (temp_dir, cmd)
}
