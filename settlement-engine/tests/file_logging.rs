use settlement_engine::utils::init_logger_with_file;

#[test]
fn test_file_logger_writes_to_log_dir() {
    let dir = tempfile::tempdir().unwrap();
    let dir_str = dir.path().to_str().unwrap();

    init_logger_with_file(Some("info"), Some(dir_str));
    tracing::info!(booking_id = "b-1", "file logger smoke test");

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    assert!(
        files.iter().any(|name| name.starts_with("settlement-engine")),
        "files: {:?}",
        files
    );

    // second call is a no-op rather than a panic
    init_logger_with_file(Some("debug"), None);
}
