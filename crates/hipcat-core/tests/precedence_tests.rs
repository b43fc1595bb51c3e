//! Precedence tests for layered config resolution
//!
//! Every field is checked against every combination of sources that could
//! define it: system file, home file, current-directory file, environment,
//! and (room only) the command-line flag.

use hipcat_core::config::{
    resolve_config_with_env, ConfigError, ConfigField, ConfigOverrides, ConfigPaths,
};
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;

const SOURCES: [&str; 5] = ["system", "home", "local", "env", "flag"];

struct Fixture {
    _temp: TempDir,
    paths: ConfigPaths,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("home");
        let cwd = temp.path().join("work");
        fs::create_dir_all(&home).unwrap();
        fs::create_dir_all(&cwd).unwrap();
        let paths = ConfigPaths {
            system: temp.path().join("etc/hipcat.conf"),
            home: Some(home.join(".hipcat.conf")),
            local: cwd.join("hipcat.conf"),
        };
        fs::create_dir_all(paths.system.parent().unwrap()).unwrap();
        Self { _temp: temp, paths }
    }

    fn file_for(&self, source: &str) -> &std::path::Path {
        match source {
            "system" => &self.paths.system,
            "home" => self.paths.home.as_deref().unwrap(),
            "local" => &self.paths.local,
            other => panic!("{other} is not a file source"),
        }
    }
}

fn json_key(field: ConfigField) -> &'static str {
    match field {
        ConfigField::HipchatUrl => "hipchat_url",
        ConfigField::Room => "room",
        ConfigField::ApiToken => "api_token",
    }
}

fn baseline(field: ConfigField) -> HashMap<String, String> {
    // Other two fields always come from env so only `field` varies
    [ConfigField::HipchatUrl, ConfigField::Room, ConfigField::ApiToken]
        .into_iter()
        .filter(|f| *f != field)
        .map(|f| (f.env_var().to_string(), format!("base-{}", json_key(f))))
        .collect()
}

fn value_of(config: &hipcat_core::Config, field: ConfigField) -> &str {
    match field {
        ConfigField::HipchatUrl => &config.hipchat_url,
        ConfigField::Room => &config.room,
        ConfigField::ApiToken => &config.api_token,
    }
}

/// Resolve `field` with the sources selected by `mask` each defining it
fn resolve_with(field: ConfigField, mask: u32) -> Result<String, ConfigError> {
    let fixture = Fixture::new();
    let mut env = baseline(field);
    let mut overrides = ConfigOverrides::default();

    for (bit, source) in SOURCES.iter().enumerate() {
        if mask & (1 << bit) == 0 {
            continue;
        }
        let value = format!("from-{source}");
        match *source {
            "env" => {
                env.insert(field.env_var().to_string(), value);
            }
            "flag" => overrides.room = Some(value),
            file => {
                let mut body = serde_json::Map::new();
                body.insert(json_key(field).to_string(), value.into());
                body.insert("unrelated".to_string(), 1.into());
                fs::write(fixture.file_for(file), serde_json::Value::Object(body).to_string())
                    .unwrap();
            }
        }
    }

    let config = resolve_config_with_env(&fixture.paths, &overrides, |k| env.get(k).cloned())?;
    Ok(value_of(&config, field).to_string())
}

fn expected_winner(field: ConfigField, mask: u32) -> Option<&'static str> {
    let max_source = if field == ConfigField::Room { 5 } else { 4 };
    (0..max_source)
        .rev()
        .find(|bit| mask & (1 << bit) != 0)
        .map(|bit| SOURCES[bit])
}

#[test]
fn test_precedence_for_every_field_and_source_combination() {
    for field in [ConfigField::HipchatUrl, ConfigField::Room, ConfigField::ApiToken] {
        // The flag only exists for room
        let combos = if field == ConfigField::Room { 1 << 5 } else { 1 << 4 };
        for mask in 0..combos {
            let result = resolve_with(field, mask);
            match expected_winner(field, mask) {
                Some(source) => assert_eq!(
                    result.unwrap(),
                    format!("from-{source}"),
                    "field {field} mask {mask:05b}"
                ),
                None => assert_eq!(
                    result.unwrap_err().missing_field(),
                    Some(field),
                    "field {field} mask {mask:05b}"
                ),
            }
        }
    }
}

#[test]
fn test_later_file_keeps_fields_it_does_not_define() {
    let fixture = Fixture::new();
    fs::write(
        &fixture.paths.system,
        r#"{"hipchat_url": "https://system", "room": "sys-room", "api_token": "sys-token"}"#,
    )
    .unwrap();
    fs::write(&fixture.paths.local, r#"{"room": "local-room"}"#).unwrap();

    let config =
        resolve_config_with_env(&fixture.paths, &ConfigOverrides::default(), |_| None).unwrap();

    assert_eq!(config.hipchat_url, "https://system");
    assert_eq!(config.room, "local-room");
    assert_eq!(config.api_token, "sys-token");
}

#[test]
fn test_malformed_early_file_is_not_recovered_by_later_sources() {
    let fixture = Fixture::new();
    fs::write(&fixture.paths.system, "hipchat_url = nope").unwrap();
    fs::write(
        &fixture.paths.local,
        r#"{"hipchat_url": "https://local", "room": "r", "api_token": "t"}"#,
    )
    .unwrap();

    let err = resolve_config_with_env(&fixture.paths, &ConfigOverrides::default(), |_| None)
        .unwrap_err();

    match err {
        ConfigError::Parse { path, .. } => assert_eq!(path, fixture.paths.system),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_empty_string_in_later_file_clears_earlier_value() {
    let fixture = Fixture::new();
    fs::write(
        fixture.paths.home.as_deref().unwrap(),
        r#"{"hipchat_url": "https://home", "room": "r", "api_token": "t"}"#,
    )
    .unwrap();
    fs::write(&fixture.paths.local, r#"{"api_token": ""}"#).unwrap();

    let err = resolve_config_with_env(&fixture.paths, &ConfigOverrides::default(), |_| None)
        .unwrap_err();

    assert_eq!(err.missing_field(), Some(ConfigField::ApiToken));
}

#[test]
fn test_missing_field_message_lists_all_sources() {
    let fixture = Fixture::new();
    let err = resolve_config_with_env(&fixture.paths, &ConfigOverrides::default(), |_| None)
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("HIPCHAT_URL"));
    for path in fixture.paths.iter() {
        assert!(msg.contains(&path.display().to_string()), "{msg} missing {path:?}");
    }
}
