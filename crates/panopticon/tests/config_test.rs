//! Tests for configuration loading.

use panopticon::{PanopticonConfig, environment};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn config_file(contents: &str) -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

/// Environment source that sees only `vars`, not the process environment.
fn env_with(vars: &[(&str, &str)]) -> config::Environment {
    environment().source(Some(
        vars.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    ))
}

#[test]
fn test_file_values_with_defaults() -> TestResult {
    let file = config_file(
        r#"
[discord]
token = "file-token"

[database]
dsn = "postgres://localhost/panopticon"
"#,
    )?;

    let config = PanopticonConfig::load_with(file.path(), true, env_with(&[]))?;
    assert_eq!(config.discord().token(), "file-token");
    assert_eq!(*config.discord().max_messages(), 1000);
    assert_eq!(config.database().dsn(), "postgres://localhost/panopticon");
    assert_eq!(*config.database().max_connections(), 10);
    assert!(*config.database().run_migrations());
    assert_eq!(*config.cache().private_channels(), 512);
    Ok(())
}

#[test]
fn test_file_overrides_defaults() -> TestResult {
    let file = config_file(
        r#"
[discord]
token = "file-token"
max_messages = 50

[database]
dsn = "postgres://localhost/panopticon"
max_connections = 3
run_migrations = false

[cache]
private_channels = 0
"#,
    )?;

    let config = PanopticonConfig::load_with(file.path(), true, env_with(&[]))?;
    assert_eq!(*config.discord().max_messages(), 50);
    assert_eq!(*config.database().max_connections(), 3);
    assert!(!*config.database().run_migrations());
    assert_eq!(*config.cache().private_channels(), 0);
    Ok(())
}

#[test]
fn test_environment_overrides_file() -> TestResult {
    let file = config_file(
        r#"
[discord]
token = "file-token"

[database]
dsn = "postgres://localhost/panopticon"
"#,
    )?;

    let env = env_with(&[
        ("PANOPTICON__DISCORD__TOKEN", "env-token"),
        ("PANOPTICON__DATABASE__MAX_CONNECTIONS", "4"),
    ]);
    let config = PanopticonConfig::load_with(file.path(), true, env)?;
    assert_eq!(config.discord().token(), "env-token");
    assert_eq!(*config.database().max_connections(), 4);
    assert_eq!(config.database().dsn(), "postgres://localhost/panopticon");
    Ok(())
}

#[test]
fn test_environment_alone_is_enough() -> TestResult {
    let env = env_with(&[
        ("PANOPTICON__DISCORD__TOKEN", "env-token"),
        ("PANOPTICON__DATABASE__DSN", "postgres://db/panopticon"),
    ]);
    let config =
        PanopticonConfig::load_with(Path::new("does-not-exist.toml"), false, env)?;
    assert_eq!(config.discord().token(), "env-token");
    assert_eq!(config.database().dsn(), "postgres://db/panopticon");
    Ok(())
}

#[test]
fn test_missing_required_file_fails() {
    let result = PanopticonConfig::load_with(Path::new("does-not-exist.toml"), true, env_with(&[]));
    assert!(result.is_err());
}

#[test]
fn test_missing_token_fails() -> TestResult {
    let file = config_file(
        r#"
[database]
dsn = "postgres://localhost/panopticon"
"#,
    )?;

    let err = PanopticonConfig::load_with(file.path(), true, env_with(&[]))
        .err()
        .ok_or("config without a token should not load")?;
    assert!(err.to_string().contains("Failed to parse configuration"));
    Ok(())
}

#[test]
fn test_zero_connections_rejected() -> TestResult {
    let file = config_file(
        r#"
[discord]
token = "file-token"

[database]
dsn = "postgres://localhost/panopticon"
max_connections = 0
"#,
    )?;

    let err = PanopticonConfig::load_with(file.path(), true, env_with(&[]))
        .err()
        .ok_or("zero connections should be rejected")?;
    assert!(err.to_string().contains("max_connections"));
    Ok(())
}

#[test]
fn test_blank_token_rejected() {
    let env = env_with(&[
        ("PANOPTICON__DISCORD__TOKEN", "  "),
        ("PANOPTICON__DATABASE__DSN", "postgres://db/panopticon"),
    ]);
    let result = PanopticonConfig::load_with(Path::new("does-not-exist.toml"), false, env);
    assert!(result.is_err());
}
