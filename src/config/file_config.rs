use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Sources (can override CLI)
    pub seed_path: Option<String>,
    pub seed_url: Option<String>,
    pub live_path: Option<String>,
    pub live_poll_secs: Option<u64>,
    pub http_timeout_sec: Option<u64>,

    /// Output format: "table" or "json"
    pub output: Option<String>,

    pub valuation: Option<ValuationFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ValuationFileConfig {
    pub mid_from: Option<f64>,
    pub high_from: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
seed_path = "/data/seed.json"
live_path = "/data/live.json"
live_poll_secs = 5
http_timeout_sec = 10
output = "json"

[valuation]
mid_from = 30.0
high_from = 150.0
"#
        )
        .unwrap();

        let config = FileConfig::load(file.path()).unwrap();

        assert_eq!(config.seed_path.as_deref(), Some("/data/seed.json"));
        assert!(config.seed_url.is_none());
        assert_eq!(config.live_path.as_deref(), Some("/data/live.json"));
        assert_eq!(config.live_poll_secs, Some(5));
        assert_eq!(config.http_timeout_sec, Some(10));
        assert_eq!(config.output.as_deref(), Some("json"));
        let valuation = config.valuation.unwrap();
        assert_eq!(valuation.mid_from, Some(30.0));
        assert_eq!(valuation.high_from, Some(150.0));
    }

    #[test]
    fn test_load_empty_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let config = FileConfig::load(file.path()).unwrap();
        assert!(config.seed_path.is_none());
        assert!(config.valuation.is_none());
    }

    #[test]
    fn test_load_missing_file_error() {
        let result = FileConfig::load(Path::new("/nonexistent/vinyl.toml"));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to read config file"));
    }

    #[test]
    fn test_load_invalid_toml_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "live_poll_secs = \"often\"").unwrap();
        let result = FileConfig::load(file.path());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse config file"));
    }
}
