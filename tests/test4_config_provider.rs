#![cfg(feature = "sqlite")]

use std::fs;

use sql_binder::config::CONFIG_FILE_NAME;
use sql_binder::prelude::*;

#[test]
fn provider_from_config_dir_uses_last_connection_string() -> Result<(), Box<dyn std::error::Error>>
{
    let dir = tempfile::tempdir()?;
    let unused = dir.path().join("unused.db");
    let active = dir.path().join("active.db");
    let config = serde_json::json!({
        "connection_strings": [
            { "name": "legacy", "connection_string": unused.to_string_lossy() },
            {
                "name": "main",
                "connection_string": format!("Data Source={};Busy Timeout=1000", active.display())
            }
        ]
    });
    fs::write(dir.path().join(CONFIG_FILE_NAME), config.to_string())?;

    let provider = SqliteProvider::from_dir(dir.path())?;
    assert_eq!(provider.options().db_path, active.to_string_lossy());

    let binder = SqlBinder::new(provider);
    binder.execute("CREATE TABLE t (v INTEGER)")?;
    binder.execute_with("INSERT INTO t (v) VALUES (@v)", &5_i32)?;
    let v: i32 = binder.fetch_scalar_as("SELECT v FROM t")?;
    assert_eq!(v, 5);

    assert!(active.exists());
    assert!(!unused.exists());
    Ok(())
}

#[test]
fn missing_config_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        SqliteProvider::from_dir(dir.path()),
        Err(SqlBinderError::ConfigError(_))
    ));
}

#[test]
fn config_without_entries_is_config_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{"connection_strings": []}"#,
    )?;
    assert!(matches!(
        SqliteProvider::from_dir(dir.path()),
        Err(SqlBinderError::ConfigError(_))
    ));
    Ok(())
}
