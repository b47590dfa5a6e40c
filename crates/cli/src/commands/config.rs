use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use fleetbot_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{CommandResult, EXIT_CONFIG};

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                EXIT_CONFIG,
            )
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields: [(&str, String, &[&str]); 9] = [
        ("catalog.base_url", config.catalog.base_url.clone(), &["FLEETBOT_CATALOG_BASE_URL"]),
        (
            "catalog.link_base_url",
            config.catalog.link_base_url.clone(),
            &["FLEETBOT_CATALOG_LINK_BASE_URL"],
        ),
        (
            "catalog.timeout_secs",
            config.catalog.timeout_secs.to_string(),
            &["FLEETBOT_CATALOG_TIMEOUT_SECS"],
        ),
        (
            "catalog.accept_invalid_certs",
            config.catalog.accept_invalid_certs.to_string(),
            &["FLEETBOT_CATALOG_ACCEPT_INVALID_CERTS"],
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            &["FLEETBOT_SERVER_BIND_ADDRESS"],
        ),
        ("server.port", config.server.port.to_string(), &["FLEETBOT_SERVER_PORT"]),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["FLEETBOT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["FLEETBOT_LOGGING_LEVEL", "FLEETBOT_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_lowercase(),
            &["FLEETBOT_LOGGING_FORMAT", "FLEETBOT_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for (key_path, value, env_keys) in fields {
        lines.push(render_line(
            key_path,
            &value,
            field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.push(format!("- config file: {}", display_path(config_file_path.as_deref())));

    CommandResult::success("config", lines.join("\n"))
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("fleetbot.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/fleetbot.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| "<none>".to_string())
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
            return format!("file ({})", display_path(config_file_path));
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
    use super::contains_path;

    #[test]
    fn contains_path_walks_nested_tables() {
        let doc = "[catalog]\nbase_url = \"https://catalog.local\"\n"
            .parse::<toml::Value>()
            .expect("toml parses");

        assert!(contains_path(&doc, "catalog.base_url"));
        assert!(!contains_path(&doc, "catalog.timeout_secs"));
        assert!(!contains_path(&doc, "server.port"));
    }
}
