use rotalog::{Error, Level, global};

#[tokio::test]
async fn test_get_logger_rejects_zero_size_threshold() {
    let dir = std::env::temp_dir().join(format!("rotalog-global-zero-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("app.log");

    let err = global::get_logger(Level::Info, &path, 0, 3).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(!path.exists());

    // Same permanence as any other failed first initialization.
    let err = global::get_logger(Level::Info, &path, 1, 3).await.unwrap_err();
    assert!(matches!(err, Error::InitFailed));
    assert!(global::logger().is_none());
    std::fs::remove_dir_all(dir).unwrap();
}
