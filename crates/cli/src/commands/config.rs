use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use toml::Value;
use trendfit_core::config::{resolve_config_path, AppConfig};

/// Renders the effective configuration, attributing every value to the layer
/// it came from. Secrets are never printed.
pub fn run(config: &AppConfig) -> String {
    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "llm.provider",
        config.llm.provider.as_str(),
        source("llm.provider", &["TRENDFIT_LLM_PROVIDER"]),
    ));
    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        source("llm.api_key", &["TRENDFIT_LLM_API_KEY", "GEMINI_API_KEY"]),
    ));
    lines.push(render_line(
        "llm.base_url",
        &config.llm.base_url,
        source("llm.base_url", &["TRENDFIT_LLM_BASE_URL"]),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        source("llm.model", &["TRENDFIT_LLM_MODEL"]),
    ));
    lines.push(render_line(
        "llm.timeout_secs",
        &config.llm.timeout_secs.to_string(),
        source("llm.timeout_secs", &["TRENDFIT_LLM_TIMEOUT_SECS"]),
    ));
    lines.push(render_line(
        "llm.max_retries",
        &config.llm.max_retries.to_string(),
        source("llm.max_retries", &["TRENDFIT_LLM_MAX_RETRIES"]),
    ));

    lines.push(render_line(
        "matching.use_ai",
        &config.matching.use_ai.to_string(),
        source("matching.use_ai", &["TRENDFIT_MATCHING_USE_AI"]),
    ));
    lines.push(render_line(
        "matching.trends_path",
        &config.matching.trends_path.display().to_string(),
        source("matching.trends_path", &["TRENDFIT_MATCHING_TRENDS_PATH"]),
    ));
    lines.push(format!("- matching.ai_enabled = {} (derived)", config.ai_enabled()));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["TRENDFIT_LOGGING_LEVEL", "TRENDFIT_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["TRENDFIT_LOGGING_FORMAT", "TRENDFIT_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use toml::Value;

    use super::{contains_path, field_source};

    #[test]
    fn nested_keys_are_found_in_file_doc() {
        let doc: Value = "[matching]\nuse_ai = false\n".parse().expect("toml should parse");

        assert!(contains_path(&doc, "matching.use_ai"));
        assert!(!contains_path(&doc, "matching.trends_path"));
        assert!(!contains_path(&doc, "llm.model"));
    }

    #[test]
    fn file_layer_is_reported_with_its_path() {
        let doc: Value = "[llm]\nmodel = \"gemini-1.5-pro\"\n".parse().expect("toml should parse");
        let path = PathBuf::from("trendfit.toml");

        let source = field_source(
            "llm.model",
            &["TRENDFIT_TEST_UNSET_MODEL_VAR"],
            Some(&doc),
            Some(path.as_path()),
        );

        assert_eq!(source, "file (trendfit.toml)");
        assert_eq!(
            field_source("llm.base_url", &["TRENDFIT_TEST_UNSET_BASE_URL_VAR"], Some(&doc), None),
            "default"
        );
    }
}
