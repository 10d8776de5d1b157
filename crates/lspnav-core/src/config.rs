use crate::constants;
use crate::error::ConfigError;
use crate::types::HoverStrategy;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lsp: LspConfig,
    #[serde(default)]
    pub outline: OutlineConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LspConfig {
    #[serde(default = "default_lsp_command")]
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_startup_timeout_ms")]
    pub startup_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineConfig {
    #[serde(default = "default_hover_strategy")]
    pub hover_strategy: String,
    #[serde(default = "default_hover_concurrency")]
    pub hover_concurrency: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_lsp_command() -> String {
    constants::DEFAULT_LSP_COMMAND.to_string()
}
fn default_request_timeout_ms() -> u64 {
    constants::DEFAULT_REQUEST_TIMEOUT_MS
}
fn default_startup_timeout_ms() -> u64 {
    constants::DEFAULT_STARTUP_TIMEOUT_MS
}
fn default_hover_strategy() -> String {
    "sequential".to_string()
}
fn default_hover_concurrency() -> usize {
    constants::DEFAULT_HOVER_CONCURRENCY
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LspConfig {
    fn default() -> Self {
        Self {
            command: default_lsp_command(),
            args: Vec::new(),
            request_timeout_ms: default_request_timeout_ms(),
            startup_timeout_ms: default_startup_timeout_ms(),
        }
    }
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            hover_strategy: default_hover_strategy(),
            hover_concurrency: default_hover_concurrency(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl OutlineConfig {
    pub fn hover_strategy_typed(&self) -> HoverStrategy {
        HoverStrategy::from_config(&self.hover_strategy, self.hover_concurrency)
    }
}

impl Config {
    /// Load configuration with layered precedence:
    /// 1. Environment variables `LSPNAV_<SECTION>_<KEY>` (highest priority)
    /// 2. Explicit config file (from `--config` flag)
    /// 3. Project config: `<workspace>/.lspnav/config.toml`
    /// 4. Global config: `~/.lspnav/config.toml`
    /// 5. Built-in defaults (lowest priority)
    ///
    /// Only fields explicitly set in a higher-priority file override lower layers.
    pub fn load(workspace: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_file(workspace, None)
    }

    /// Load configuration with an explicit config file path.
    pub fn load_with_file(
        workspace: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let global = dirs::home_dir().map(|home| {
            home.join(constants::DEFAULT_DATA_DIR)
                .join("config.toml")
        });
        Self::load_layers(global.as_deref(), workspace, config_file)
    }

    fn load_layers(
        global_path: Option<&Path>,
        workspace: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut merged = toml::Value::Table(toml::map::Map::new());

        if let Some(global_path) = global_path
            && global_path.exists()
        {
            let raw = load_toml_value(global_path)?;
            merge_toml_values(&mut merged, &raw);
        }

        if let Some(root) = workspace {
            let project_path = root.join(constants::PROJECT_CONFIG_FILE);
            if project_path.exists() {
                let raw = load_toml_value(&project_path)?;
                merge_toml_values(&mut merged, &raw);
            }
        }

        if let Some(cf) = config_file {
            if !cf.exists() {
                return Err(ConfigError::NotFound {
                    path: cf.display().to_string(),
                });
            }
            let raw = load_toml_value(cf)?;
            merge_toml_values(&mut merged, &raw);
        }

        let config_str =
            toml::to_string(&merged).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        let mut config: Config =
            toml::from_str(&config_str).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        apply_env_overrides(&mut config);

        config.outline.hover_strategy = normalize_hover_strategy(&config.outline.hover_strategy);
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.lsp.command.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "lsp.command".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.lsp.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lsp.request_timeout_ms".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Load a TOML file as a raw `toml::Value` (preserving only explicitly-set fields).
fn load_toml_value(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    content
        .parse::<toml::Value>()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Deep-merge `overlay` into `base`. Only keys present in `overlay` are written.
fn merge_toml_values(base: &mut toml::Value, overlay: &toml::Value) {
    if let (toml::Value::Table(base_map), toml::Value::Table(overlay_map)) = (base, overlay) {
        for (key, overlay_val) in overlay_map {
            if let Some(base_val) = base_map.get_mut(key) {
                if base_val.is_table() && overlay_val.is_table() {
                    merge_toml_values(base_val, overlay_val);
                } else {
                    *base_val = overlay_val.clone();
                }
            } else {
                base_map.insert(key.clone(), overlay_val.clone());
            }
        }
    }
}

/// Apply environment variable overrides to config fields.
/// Convention: `LSPNAV_<SECTION>_<KEY>` in UPPER_SNAKE_CASE.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(v) = std::env::var("LSPNAV_LSP_COMMAND") {
        config.lsp.command = v;
    }
    if let Ok(v) = std::env::var("LSPNAV_LSP_ARGS") {
        config.lsp.args = parse_csv_env_list(&v);
    }
    if let Ok(v) = std::env::var("LSPNAV_LSP_REQUEST_TIMEOUT_MS")
        && let Ok(n) = v.parse()
    {
        config.lsp.request_timeout_ms = n;
    }
    if let Ok(v) = std::env::var("LSPNAV_LSP_STARTUP_TIMEOUT_MS")
        && let Ok(n) = v.parse()
    {
        config.lsp.startup_timeout_ms = n;
    }
    if let Ok(v) = std::env::var("LSPNAV_OUTLINE_HOVER_STRATEGY") {
        config.outline.hover_strategy = v;
    }
    if let Ok(v) = std::env::var("LSPNAV_OUTLINE_HOVER_CONCURRENCY")
        && let Ok(n) = v.parse()
    {
        config.outline.hover_concurrency = n;
    }
    if let Ok(v) = std::env::var("LSPNAV_LOGGING_LEVEL") {
        config.logging.level = v;
    }
}

fn parse_csv_env_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn normalize_hover_strategy(raw: &str) -> String {
    match raw.trim().to_ascii_lowercase().as_str() {
        "concurrent" | "parallel" | "fan_out" | "fanout" => "concurrent".to_string(),
        "sequential" => "sequential".to_string(),
        other => {
            tracing::warn!(
                value = other,
                "unknown outline.hover_strategy; falling back to sequential"
            );
            "sequential".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sequential_rust_analyzer() {
        let config = Config::default();
        assert_eq!(config.lsp.command, "rust-analyzer");
        assert!(config.lsp.args.is_empty());
        assert_eq!(config.lsp.request_timeout_ms, 30_000);
        assert_eq!(
            config.outline.hover_strategy_typed(),
            HoverStrategy::Sequential
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn normalize_hover_strategy_values() {
        assert_eq!(normalize_hover_strategy("Sequential"), "sequential");
        assert_eq!(normalize_hover_strategy("PARALLEL"), "concurrent");
        assert_eq!(normalize_hover_strategy("fan_out"), "concurrent");
        assert_eq!(normalize_hover_strategy("whatever"), "sequential");
    }

    #[test]
    fn parse_csv_env_list_skips_blanks() {
        assert_eq!(
            parse_csv_env_list("--stdio, ,--log-level=info"),
            vec!["--stdio".to_string(), "--log-level=info".to_string()]
        );
    }

    #[test]
    fn project_file_overrides_global_and_explicit_file_wins() {
        let tmp = tempfile::tempdir().unwrap();
        let global = tmp.path().join("global.toml");
        std::fs::write(
            &global,
            "[lsp]\ncommand = \"global-ls\"\nrequest_timeout_ms = 5000\n",
        )
        .unwrap();

        let workspace = tmp.path().join("ws");
        std::fs::create_dir_all(workspace.join(".lspnav")).unwrap();
        std::fs::write(
            workspace.join(constants::PROJECT_CONFIG_FILE),
            "[lsp]\ncommand = \"project-ls\"\n\n[outline]\nhover_strategy = \"concurrent\"\nhover_concurrency = 3\n",
        )
        .unwrap();

        let config = Config::load_layers(Some(&global), Some(&workspace), None).unwrap();
        assert_eq!(config.lsp.command, "project-ls");
        // Untouched keys from the global layer survive the merge.
        assert_eq!(config.lsp.request_timeout_ms, 5000);
        assert_eq!(
            config.outline.hover_strategy_typed(),
            HoverStrategy::Concurrent { limit: 3 }
        );

        let explicit = tmp.path().join("explicit.toml");
        std::fs::write(&explicit, "[lsp]\ncommand = \"explicit-ls\"\nargs = [\"--stdio\"]\n")
            .unwrap();
        let config =
            Config::load_layers(Some(&global), Some(&workspace), Some(&explicit)).unwrap();
        assert_eq!(config.lsp.command, "explicit-ls");
        assert_eq!(config.lsp.args, vec!["--stdio".to_string()]);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = Config::load_layers(None, None, Some(&tmp.path().join("nope.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let explicit = tmp.path().join("bad.toml");
        std::fs::write(&explicit, "[lsp]\nrequest_timeout_ms = 0\n").unwrap();
        let err = Config::load_layers(None, None, Some(&explicit)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
