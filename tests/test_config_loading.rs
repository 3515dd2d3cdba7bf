//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error handling.
//! The `PORT` override is exercised through `apply_env_overrides` so these
//! tests never mutate the process-wide `PORT` variable.

use gym_concierge::config::{ConciergeConfig, ConfigError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{contents}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[server]
host = "127.0.0.1"
port = 9001

[llm]
provider = "openai"
model = "gpt-4o-mini"
api_key_env = "GYM_OPENAI_KEY"
base_url = "http://localhost:4010/v1"
timeout_secs = 15
temperature = 0.2
max_tokens = 512

[assistant]
gym_name = "Iron Paradise"
"#,
    );

    let config = ConciergeConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.api_key_env, "GYM_OPENAI_KEY");
    assert_eq!(config.llm.base_url, "http://localhost:4010/v1");
    assert_eq!(config.llm.timeout_secs, 15);
    assert_eq!(config.llm.temperature, Some(0.2));
    assert_eq!(config.llm.max_tokens, Some(512));
    assert_eq!(config.assistant.gym_name, "Iron Paradise");
}

#[test]
fn test_config_empty_file_uses_defaults() {
    let temp_file = write_config("");

    let config = ConciergeConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.llm.provider, "openai");
    assert_eq!(config.llm.model, "gpt-4o");
    assert_eq!(config.llm.base_url, "https://api.openai.com/v1");
    assert_eq!(config.llm.timeout_secs, 60);
    assert_eq!(config.assistant.gym_name, "WTF GYM");
}

#[test]
fn test_config_partial_sections_fill_defaults() {
    let temp_file = write_config(
        r#"
[assistant]
gym_name = "Muscle Beach"
"#,
    );

    let config = ConciergeConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.assistant.gym_name, "Muscle Beach");
    assert_eq!(config.llm.model, "gpt-4o");
    assert_eq!(config.llm.temperature, None);
}

#[test]
fn test_config_returns_error_for_invalid_toml_syntax() {
    let temp_file = write_config(
        r#"
[server
port = 8001
"#,
    );

    let result = ConciergeConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_returns_error_for_wrong_value_type() {
    let temp_file = write_config(
        r#"
[server]
port = "eighty"
"#,
    );

    let result = ConciergeConfig::load_from_file(temp_file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_returns_error_when_file_not_found() {
    let result = ConciergeConfig::load_from_file(std::path::Path::new(
        "/nonexistent/path/concierge.toml",
    ));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_config_rejects_unsupported_provider() {
    let temp_file = write_config(
        r#"
[llm]
provider = "anthropic"
"#,
    );

    match ConciergeConfig::load_from_file(temp_file.path()) {
        Err(ConfigError::InvalidConfig(message)) => assert!(message.contains("anthropic")),
        other => panic!("Expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_config_rejects_empty_model() {
    let temp_file = write_config(
        r#"
[llm]
model = "   "
"#,
    );

    assert!(matches!(
        ConciergeConfig::load_from_file(temp_file.path()),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
fn test_config_rejects_out_of_range_temperature() {
    let temp_file = write_config(
        r#"
[llm]
temperature = 2.5
"#,
    );

    assert!(matches!(
        ConciergeConfig::load_from_file(temp_file.path()),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
fn test_port_override_wins_over_file() {
    let temp_file = write_config(
        r#"
[server]
port = 9001
"#,
    );

    let mut config = ConciergeConfig::load_from_file(temp_file.path()).unwrap();
    config.apply_env_overrides(Some("7000")).unwrap();

    assert_eq!(config.server.port, 7000);
    assert!(config.listen_addr().ends_with(":7000"));
}

#[test]
fn test_port_override_must_be_numeric() {
    let mut config = ConciergeConfig::default();
    let result = config.apply_env_overrides(Some("not-a-port"));

    match result {
        Err(ConfigError::InvalidConfig(message)) => assert!(message.contains("PORT")),
        other => panic!("Expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_get_llm_api_key_retrieves_from_environment() {
    std::env::set_var("GYM_CONCIERGE_TEST_API_KEY", "sk-test123");

    let temp_file = write_config(
        r#"
[llm]
api_key_env = "GYM_CONCIERGE_TEST_API_KEY"
"#,
    );

    let config = ConciergeConfig::load_from_file(temp_file.path()).unwrap();
    assert_eq!(config.get_llm_api_key().unwrap(), "sk-test123");

    std::env::remove_var("GYM_CONCIERGE_TEST_API_KEY");
}

#[test]
fn test_get_llm_api_key_returns_error_when_env_var_not_set() {
    std::env::remove_var("GYM_CONCIERGE_NONEXISTENT_KEY");

    let temp_file = write_config(
        r#"
[llm]
api_key_env = "GYM_CONCIERGE_NONEXISTENT_KEY"
"#,
    );

    let config = ConciergeConfig::load_from_file(temp_file.path()).unwrap();

    match config.get_llm_api_key() {
        Err(ConfigError::EnvVarNotFound(var)) => assert_eq!(var, "GYM_CONCIERGE_NONEXISTENT_KEY"),
        other => panic!("Expected EnvVarNotFound error, got {other:?}"),
    }
}

#[test]
fn test_config_round_trips_through_pretty_toml() {
    let temp_file = write_config(
        r#"
[llm]
temperature = 0.5

[assistant]
gym_name = "Gold's"
"#,
    );

    let config = ConciergeConfig::load_from_file(temp_file.path()).unwrap();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let reparsed: ConciergeConfig = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed, config);
}
