use tasklist_core::{
    default_log_level, open_controller, AppConfig, ConfigError, Feedback, Phase, StorageConfig,
};

#[test]
fn parses_local_config_with_default_key() {
    let config =
        AppConfig::from_json_str(r#"{"storage": {"kind": "local", "dir": "/tmp/tasks"}}"#)
            .unwrap();
    assert_eq!(
        config.storage,
        StorageConfig::Local {
            dir: "/tmp/tasks".into(),
            key: "todos".to_string(),
        }
    );
    assert_eq!(config.log_level, None);
    assert_eq!(config.effective_log_level(), default_log_level());
}

#[test]
fn parses_remote_config_with_logging() {
    let config = AppConfig::from_json_str(
        r#"{
            "storage": {"kind": "remote", "db_path": "/tmp/tasks.sqlite3"},
            "log_level": "warning",
            "log_dir": "/tmp/tasklist-logs"
        }"#,
    )
    .unwrap();
    assert_eq!(config.effective_log_level(), "warning");
    assert!(matches!(config.storage, StorageConfig::Remote { .. }));
}

#[test]
fn rejects_invalid_configs() {
    for raw in [
        r#"{"storage": {"kind": "cloud"}}"#,
        r#"{"storage": {"kind": "local", "dir": ""}}"#,
        r#"{"storage": {"kind": "local", "dir": "/x", "key": " "}}"#,
        r#"{"storage": {"kind": "remote", "db_path": "/x"}, "log_level": "loud"}"#,
        r#"{"storage": {"kind": "remote", "db_path": "/x"}, "log_dir": "relative/logs"}"#,
        r#"{"storage": {"kind": "remote", "db_path": "/x"}, "colour": "blue"}"#,
    ] {
        let err = AppConfig::from_json_str(raw).unwrap_err();
        assert!(
            matches!(err, ConfigError::Parse(_) | ConfigError::Invalid(_)),
            "{raw}: {err}"
        );
    }
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn local_storage_config_opens_persistent_controller() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageConfig::Local {
        dir: dir.path().to_path_buf(),
        key: "todos".to_string(),
    };

    let mut controller = open_controller(&storage).unwrap();
    assert_eq!(controller.state().phase, Phase::Ready);
    assert_eq!(controller.add("Buy milk"), Feedback::Applied);
    drop(controller);

    assert!(dir.path().join("todos.json").exists());
    let reopened = open_controller(&storage).unwrap();
    assert_eq!(reopened.view().texts(), vec!["Buy milk"]);
}

#[test]
fn remote_storage_config_resumes_session_after_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let storage = StorageConfig::Remote {
        db_path: dir.path().join("tasklist.sqlite3"),
    };

    let mut controller = open_controller(&storage).unwrap();
    assert_eq!(controller.state().phase, Phase::Unauthenticated);
    assert_eq!(
        controller.sign_up("me@example.com", "secret1"),
        Feedback::Applied
    );
    controller.add("Walk dog");
    drop(controller);

    let reopened = open_controller(&storage).unwrap();
    assert!(matches!(reopened.state().phase, Phase::Authenticated(_)));
    assert_eq!(reopened.view().texts(), vec!["Walk dog"]);
}
