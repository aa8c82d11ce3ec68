use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

pub const CONFIG_FILE_NAME: &str = "codearena.toml";
pub const API_URL_ENV: &str = "CODEARENA_API_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            languages: default_languages(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    /// Screen pixels per logical chart unit.
    #[serde(default = "default_display_scale")]
    pub display_scale: f32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            display_scale: default_display_scale(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArenaConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Minimum spacing between analysis requests.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            min_request_interval_ms: default_min_request_interval_ms(),
            analyzer: AnalyzerConfig::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl ArenaConfig {
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }
}

fn default_api_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_min_request_interval_ms() -> u64 {
    1500
}

fn default_language() -> String {
    "python".to_string()
}

fn default_languages() -> Vec<String> {
    ["python", "javascript", "java", "cpp"]
        .into_iter()
        .map(ToOwned::to_owned)
        .collect()
}

fn default_display_scale() -> f32 {
    1.0
}

pub fn parse_arena_config(raw: &str) -> Result<ArenaConfig> {
    let mut config = toml::from_str::<ArenaConfig>(raw).context("invalid codearena.toml")?;
    if config.chart.display_scale <= 0.0 || !config.chart.display_scale.is_finite() {
        config.chart.display_scale = default_display_scale();
    }
    if !config.analyzer.languages.contains(&config.analyzer.default_language) {
        config
            .analyzer
            .languages
            .insert(0, config.analyzer.default_language.clone());
    }
    Ok(config)
}

/// Reads `codearena.toml` from `dir`, falling back to defaults when absent.
/// `CODEARENA_API_URL` overrides the configured backend address.
pub fn load_arena_config(dir: &Path) -> Result<ArenaConfig> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    let mut config = if config_path.exists() {
        let raw = fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        parse_arena_config(&raw)
            .with_context(|| format!("failed to parse {}", config_path.display()))?
    } else {
        info!(
            "{} not found, using defaults: {}",
            CONFIG_FILE_NAME,
            config_path.display()
        );
        ArenaConfig::default()
    };

    if let Ok(url) = std::env::var(API_URL_ENV)
        && !url.trim().is_empty()
    {
        info!("Using API base URL from {}: {}", API_URL_ENV, url);
        config.api_base_url = url.trim().to_string();
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_arena_config("").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.min_request_interval(), Duration::from_millis(1500));
        assert_eq!(config.analyzer.default_language, "python");
        assert_eq!(config.chart.display_scale, 1.0);
    }

    #[test]
    fn sections_override_defaults() {
        let raw = r#"
            api_base_url = "https://arena.example.com/api"
            min_request_interval_ms = 3000

            [analyzer]
            default_language = "rust"
            languages = ["cpp", "java"]

            [chart]
            display_scale = 1.5
        "#;
        let config = parse_arena_config(raw).unwrap();
        assert_eq!(config.api_base_url, "https://arena.example.com/api");
        assert_eq!(config.min_request_interval_ms, 3000);
        assert_eq!(config.analyzer.languages, vec!["rust", "cpp", "java"]);
        assert_eq!(config.chart.display_scale, 1.5);
    }

    #[test]
    fn non_positive_scale_is_reset() {
        let config = parse_arena_config("[chart]\ndisplay_scale = 0.0").unwrap();
        assert_eq!(config.chart.display_scale, 1.0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_arena_config("api_base_url = ").is_err());
    }
}
