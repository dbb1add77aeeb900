//! Tests for `RegistryConfig` loading.

use provider::RegistryConfig;
use std::io::Write;

#[test]
fn parse_minimal_config() {
    let toml = r#"
[[providers]]
name = "OpenAI"
"#;
    let config = RegistryConfig::from_toml(toml).unwrap();
    assert_eq!(config.providers.len(), 1);
    assert_eq!(config.providers[0].name.as_str(), "OpenAI");
    assert!(config.env.is_empty());
    assert!(config.providers[0].static_models.is_empty());
}

#[test]
fn parse_full_config() {
    let toml = r#"
[env]
OPENAI_API_BASE_URL = "https://api.openai.com/v1"

[[providers]]
name = "OpenAI"
base_url_key = "OPENAI_API_BASE_URL"
api_token_key = "OPENAI_API_KEY"
api_key_link = "https://platform.openai.com/api-keys"
label = "OpenAI"

[[providers.static_models]]
name = "gpt-4o"
label = "GPT-4o"
provider = "OpenAI"
context_length = 128000
capabilities = { vision = true, tools = true }

[[providers]]
name = "Ollama"
base_url = "http://127.0.0.1:11434"
"#;
    let config = RegistryConfig::from_toml(toml).unwrap();
    assert_eq!(
        config.env.get("OPENAI_API_BASE_URL").map(String::as_str),
        Some("https://api.openai.com/v1")
    );
    assert_eq!(config.providers.len(), 2);

    let openai = &config.providers[0];
    assert_eq!(openai.api_token_key.as_deref(), Some("OPENAI_API_KEY"));
    let gpt = &openai.static_models[0];
    assert_eq!(gpt.context_length, 128_000);
    assert!(gpt.capabilities.vision);
    assert!(!gpt.capabilities.reasoning);

    let ollama = &config.providers[1];
    assert_eq!(ollama.base_url.as_deref(), Some("http://127.0.0.1:11434"));
}

#[test]
fn static_model_defaults() {
    let toml = r#"
[[providers]]
name = "Groq"

[[providers.static_models]]
name = "llama-3.1-8b-instant"
provider = "Groq"
"#;
    let config = RegistryConfig::from_toml(toml).unwrap();
    let model = &config.providers[0].static_models[0];
    assert_eq!(model.context_length, 8_000);
    assert_eq!(model.display_label(), "llama-3.1-8b-instant");
}

#[test]
fn env_var_expansion() {
    unsafe { std::env::set_var("MG_CONFIG_TEST_HOST", "http://ollama:11434") };
    let toml = r#"
[env]
OLLAMA_API_BASE_URL = "${MG_CONFIG_TEST_HOST}"
MISSING = "${MG_CONFIG_TEST_UNSET}"

[[providers]]
name = "Ollama"
"#;
    let config = RegistryConfig::from_toml(toml).unwrap();
    assert_eq!(
        config.env.get("OLLAMA_API_BASE_URL").map(String::as_str),
        Some("http://ollama:11434")
    );
    assert_eq!(config.env.get("MISSING").map(String::as_str), Some(""));
    unsafe { std::env::remove_var("MG_CONFIG_TEST_HOST") };
}

#[test]
fn duplicate_provider_rejected() {
    let toml = r#"
[[providers]]
name = "OpenAI"

[[providers]]
name = "OpenAI"
"#;
    let err = RegistryConfig::from_toml(toml).unwrap_err();
    assert!(err.to_string().contains("duplicate provider 'OpenAI'"));
}

#[test]
fn empty_provider_name_rejected() {
    let toml = r#"
[[providers]]
name = "  "
"#;
    assert!(RegistryConfig::from_toml(toml).is_err());
}

#[test]
fn load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[[providers]]\nname = \"Anthropic\"").unwrap();
    let config = RegistryConfig::load(file.path()).unwrap();
    assert_eq!(config.providers[0].name.as_str(), "Anthropic");
}

#[test]
fn load_missing_file_fails_with_path() {
    let err = RegistryConfig::load(std::path::Path::new("/nonexistent/modelgate.toml")).unwrap_err();
    assert!(err.to_string().contains("/nonexistent/modelgate.toml"));
}

#[test]
fn unterminated_reference_in_value_fails() {
    let toml = r#"
[env]
OLLAMA_API_BASE_URL = "${MG_CONFIG_TEST_HOST"

[[providers]]
name = "Ollama"
"#;
    let err = RegistryConfig::from_toml(toml).unwrap_err();
    assert!(format!("{err:#}").contains("unterminated"));
}

#[test]
fn references_in_comments_are_ignored() {
    let toml = r#"
[[providers]]
name = "OpenAI"

# point OLLAMA at ${OLLAMA_HOST
[[providers]]
name = "Ollama"

[[providers]]
name = "Groq"
"#;
    let config = RegistryConfig::from_toml(toml).unwrap();
    let names: Vec<&str> = config.providers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["OpenAI", "Ollama", "Groq"]);
}

#[test]
fn expanded_values_cannot_change_structure() {
    unsafe {
        std::env::set_var(
            "MG_CONFIG_TEST_QUOTED",
            "x\"\n[[providers]]\nname = \"Injected",
        )
    };
    let toml = r#"
[env]
K = "${MG_CONFIG_TEST_QUOTED}"
"#;
    let config = RegistryConfig::from_toml(toml).unwrap();
    assert!(config.providers.is_empty());
    assert_eq!(
        config.env.get("K").map(String::as_str),
        Some("x\"\n[[providers]]\nname = \"Injected")
    );
    unsafe { std::env::remove_var("MG_CONFIG_TEST_QUOTED") };
}

#[test]
fn provider_fields_are_expanded() {
    unsafe { std::env::set_var("MG_CONFIG_TEST_PROXY", "https://proxy.example.com") };
    let toml = r#"
[[providers]]
name = "OpenAI"
base_url = "${MG_CONFIG_TEST_PROXY}/v1"
"#;
    let config = RegistryConfig::from_toml(toml).unwrap();
    assert_eq!(
        config.providers[0].base_url.as_deref(),
        Some("https://proxy.example.com/v1")
    );
    unsafe { std::env::remove_var("MG_CONFIG_TEST_PROXY") };
}
