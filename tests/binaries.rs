use std::process::Command;

/// Run a binary with a config path that does not exist.
fn run_without_config(binary: &str) -> std::process::Output {
    Command::new(binary)
        .env("KB_CONFIG", "/nonexistent/kb-hierarchy/config")
        .env("RUST_LOG", "info")
        .output()
        .unwrap_or_else(|err| panic!("failed to start {binary}: {err}"))
}

#[test]
fn api_server_logs_bad_config_and_exits() {
    let output = run_without_config(env!("CARGO_BIN_EXE_kb-api"));
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"), "stderr: {stderr}");
    assert!(stderr.contains("error initializing configs"), "stderr: {stderr}");
}

#[test]
fn graph_exporter_logs_bad_config_and_exits() {
    let output = run_without_config(env!("CARGO_BIN_EXE_kb-graph"));
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error initializing configs"), "stderr: {stderr}");
}
