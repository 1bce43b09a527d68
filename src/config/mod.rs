mod file_config;

pub use file_config::{FileConfig, ValuationFileConfig};

use crate::catalog::ValuationConfig;
use crate::render::{JsonRenderer, OutputFormat, Renderer, TableRenderer};
use crate::sources::{
    FileSeedLoader, HttpSeedLoader, LiveSource, PollingFileLiveSource, SeedLoader,
    StaticSeedLoader,
};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

/// Source and output flags shared by every binary.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// JSON file holding the seed records.
    #[clap(long, value_parser = parse_path, conflicts_with = "seed_url")]
    pub seed_path: Option<PathBuf>,

    /// URL serving the seed records as JSON.
    #[clap(long)]
    pub seed_url: Option<String>,

    /// JSON file holding the live records.
    #[clap(long, value_parser = parse_path)]
    pub live_path: Option<PathBuf>,

    /// Interval in seconds between live file reads when watching.
    #[clap(long, default_value_t = 2)]
    pub live_poll_secs: u64,

    /// Timeout in seconds for seed downloads.
    #[clap(long, default_value_t = 30)]
    pub http_timeout_sec: u64,

    /// Output format.
    #[clap(long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

impl SourceArgs {
    pub fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            seed_path: self.seed_path.clone(),
            seed_url: self.seed_url.clone(),
            live_path: self.live_path.clone(),
            live_poll_secs: self.live_poll_secs,
            http_timeout_sec: self.http_timeout_sec,
            output: self.output,
        }
    }

    /// Loads the config file, if any, and resolves it against the flags.
    pub fn resolve(&self) -> Result<AppConfig> {
        let file_config = match &self.config {
            Some(path) => {
                info!("Loading config from {:?}", path);
                Some(FileConfig::load(path)?)
            }
            None => None,
        };
        AppConfig::resolve(&self.to_cli_config(), file_config)
    }
}

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub seed_path: Option<PathBuf>,
    pub seed_url: Option<String>,
    pub live_path: Option<PathBuf>,
    pub live_poll_secs: u64,
    pub http_timeout_sec: u64,
    pub output: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedSettings {
    None,
    File(PathBuf),
    Url(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub seed: SeedSettings,
    pub live_path: Option<PathBuf>,
    pub live_poll_interval: Duration,
    pub http_timeout_sec: u64,
    pub output: OutputFormat,
    pub valuation: ValuationConfig,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // The seed source is overridden as a whole
        let seed = match (file.seed_path, file.seed_url) {
            (Some(_), Some(_)) => {
                bail!("seed_path and seed_url cannot both be set in the config file")
            }
            (Some(path), None) => SeedSettings::File(PathBuf::from(path)),
            (None, Some(url)) => SeedSettings::Url(url),
            (None, None) => match (&cli.seed_path, &cli.seed_url) {
                (Some(_), Some(_)) => bail!("--seed-path and --seed-url cannot be used together"),
                (Some(path), None) => SeedSettings::File(path.clone()),
                (None, Some(url)) => SeedSettings::Url(url.clone()),
                (None, None) => SeedSettings::None,
            },
        };
        if let SeedSettings::Url(url) = &seed {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("seed_url must be an http(s) URL: {}", url);
            }
        }

        let live_path = file
            .live_path
            .map(PathBuf::from)
            .or_else(|| cli.live_path.clone());
        let live_poll_secs = file.live_poll_secs.unwrap_or(cli.live_poll_secs);
        if live_path.is_some() && live_poll_secs == 0 {
            bail!("live_poll_secs must be greater than 0");
        }

        let http_timeout_sec = file.http_timeout_sec.unwrap_or(cli.http_timeout_sec);
        if http_timeout_sec == 0 {
            bail!("http_timeout_sec must be greater than 0");
        }

        let output = match file.output {
            Some(s) => parse_output_format(&s)?,
            None => cli.output,
        };

        let defaults = ValuationConfig::default();
        let valuation_file = file.valuation.unwrap_or_default();
        let valuation = ValuationConfig {
            mid_from: valuation_file.mid_from.unwrap_or(defaults.mid_from),
            high_from: valuation_file.high_from.unwrap_or(defaults.high_from),
        };
        validate_valuation(&valuation)?;

        Ok(Self {
            seed,
            live_path,
            live_poll_interval: Duration::from_secs(live_poll_secs),
            http_timeout_sec,
            output,
            valuation,
        })
    }

    pub fn seed_loader(&self) -> Result<Arc<dyn SeedLoader>> {
        Ok(match &self.seed {
            SeedSettings::None => {
                info!("No seed source configured, starting from an empty seed");
                Arc::new(StaticSeedLoader::default())
            }
            SeedSettings::File(path) => Arc::new(FileSeedLoader::new(path)),
            SeedSettings::Url(url) => Arc::new(
                HttpSeedLoader::new(url, self.http_timeout_sec)
                    .context("Failed to create HTTP client")?,
            ),
        })
    }

    /// The live source, polling the file when `watch` is set and reading it
    /// once otherwise.
    pub fn live_source(&self, watch: bool) -> Option<Arc<dyn LiveSource>> {
        let path = self.live_path.as_ref()?;
        let source = if watch {
            PollingFileLiveSource::new(path, self.live_poll_interval)
        } else {
            PollingFileLiveSource::once(path)
        };
        Some(Arc::new(source))
    }

    pub fn renderer<W: Write + Send + 'static>(&self, out: W) -> Box<dyn Renderer> {
        match self.output {
            OutputFormat::Table => Box::new(TableRenderer::new(out, self.valuation)),
            OutputFormat::Json => Box::new(JsonRenderer::new(out)),
        }
    }
}

/// Uses clap's ValueEnum trait for parsing.
fn parse_output_format(s: &str) -> Result<OutputFormat> {
    match OutputFormat::from_str(s, true) {
        Ok(format) => Ok(format),
        Err(_) => bail!("output must be \"table\" or \"json\", got {:?}", s),
    }
}

fn validate_valuation(valuation: &ValuationConfig) -> Result<()> {
    let ValuationConfig {
        mid_from,
        high_from,
    } = *valuation;
    if !mid_from.is_finite() || !high_from.is_finite() {
        bail!("valuation cutoffs must be finite numbers");
    }
    if mid_from < 0.0 || high_from < 0.0 {
        bail!("valuation cutoffs must be non-negative");
    }
    if mid_from > high_from {
        bail!(
            "valuation mid_from ({}) must not exceed high_from ({})",
            mid_from,
            high_from
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[clap(flatten)]
        source: SourceArgs,
    }

    fn cli_defaults() -> CliConfig {
        CliConfig {
            live_poll_secs: 2,
            http_timeout_sec: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("table").unwrap(), OutputFormat::Table);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("csv")
            .unwrap_err()
            .to_string()
            .contains("output must be"));
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(&cli_defaults(), None).unwrap();

        assert_eq!(config.seed, SeedSettings::None);
        assert!(config.live_path.is_none());
        assert_eq!(config.live_poll_interval, Duration::from_secs(2));
        assert_eq!(config.http_timeout_sec, 30);
        assert_eq!(config.output, OutputFormat::Table);
        assert_eq!(config.valuation, ValuationConfig::default());
    }

    #[test]
    fn test_resolve_cli_only() {
        let cli = CliConfig {
            seed_url: Some("http://localhost:8080/seed.json".to_string()),
            live_path: Some(PathBuf::from("/data/live.json")),
            live_poll_secs: 7,
            http_timeout_sec: 12,
            output: OutputFormat::Json,
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, None).unwrap();

        assert_eq!(
            config.seed,
            SeedSettings::Url("http://localhost:8080/seed.json".to_string())
        );
        assert_eq!(config.live_path, Some(PathBuf::from("/data/live.json")));
        assert_eq!(config.live_poll_interval, Duration::from_secs(7));
        assert_eq!(config.http_timeout_sec, 12);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_resolve_toml_overrides_cli() {
        let cli = CliConfig {
            seed_url: Some("http://cli/seed.json".to_string()),
            live_path: Some(PathBuf::from("/cli/live.json")),
            ..cli_defaults()
        };
        let file_config = FileConfig {
            seed_path: Some("/toml/seed.json".to_string()),
            live_poll_secs: Some(9),
            output: Some("json".to_string()),
            valuation: Some(ValuationFileConfig {
                mid_from: Some(10.0),
                high_from: None,
            }),
            ..Default::default()
        };

        let config = AppConfig::resolve(&cli, Some(file_config)).unwrap();

        // TOML values should override CLI
        assert_eq!(config.seed, SeedSettings::File(PathBuf::from("/toml/seed.json")));
        assert_eq!(config.live_poll_interval, Duration::from_secs(9));
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.valuation.mid_from, 10.0);
        // CLI value used when TOML doesn't specify
        assert_eq!(config.live_path, Some(PathBuf::from("/cli/live.json")));
        assert_eq!(config.valuation.high_from, 100.0);
        assert_eq!(config.http_timeout_sec, 30);
    }

    #[test]
    fn test_resolve_conflicting_seed_sources_error() {
        let file_config = FileConfig {
            seed_path: Some("/seed.json".to_string()),
            seed_url: Some("http://host/seed.json".to_string()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli_defaults(), Some(file_config));
        assert!(result.unwrap_err().to_string().contains("cannot both be set"));

        let cli = CliConfig {
            seed_path: Some(PathBuf::from("/seed.json")),
            seed_url: Some("http://host/seed.json".to_string()),
            ..cli_defaults()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("cannot be used together"));
    }

    #[test]
    fn test_resolve_invalid_seed_url_error() {
        let cli = CliConfig {
            seed_url: Some("ftp://host/seed.json".to_string()),
            ..cli_defaults()
        };
        let result = AppConfig::resolve(&cli, None);
        assert!(result.unwrap_err().to_string().contains("http(s) URL"));
    }

    #[test]
    fn test_resolve_invalid_output_error() {
        let file_config = FileConfig {
            output: Some("xml".to_string()),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli_defaults(), Some(file_config));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_invalid_valuation_error() {
        let unordered = FileConfig {
            valuation: Some(ValuationFileConfig {
                mid_from: Some(200.0),
                high_from: Some(100.0),
            }),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli_defaults(), Some(unordered));
        assert!(result.unwrap_err().to_string().contains("must not exceed"));

        let negative = FileConfig {
            valuation: Some(ValuationFileConfig {
                mid_from: Some(-1.0),
                high_from: None,
            }),
            ..Default::default()
        };
        let result = AppConfig::resolve(&cli_defaults(), Some(negative));
        assert!(result.unwrap_err().to_string().contains("non-negative"));
    }

    #[test]
    fn test_resolve_zero_timeouts_error() {
        let cli = CliConfig {
            live_path: Some(PathBuf::from("/live.json")),
            live_poll_secs: 0,
            ..cli_defaults()
        };
        assert!(AppConfig::resolve(&cli, None).is_err());

        let cli = CliConfig {
            http_timeout_sec: 0,
            ..cli_defaults()
        };
        assert!(AppConfig::resolve(&cli, None).is_err());
    }

    #[test]
    fn test_source_helpers() {
        let config = AppConfig::resolve(&cli_defaults(), None).unwrap();
        assert!(config.live_source(true).is_none());
        assert_eq!(config.seed_loader().unwrap().describe(), "0 in-memory records");

        let cli = CliConfig {
            seed_path: Some(PathBuf::from("/data/seed.json")),
            live_path: Some(PathBuf::from("/data/live.json")),
            ..cli_defaults()
        };
        let config = AppConfig::resolve(&cli, None).unwrap();
        assert_eq!(config.seed_loader().unwrap().describe(), "/data/seed.json");
        assert!(config.live_source(false).is_some());
    }

    #[test]
    fn test_source_args_parsing() {
        let cli = TestCli::try_parse_from([
            "test",
            "--seed-url",
            "http://host/seed.json",
            "--live-poll-secs",
            "5",
            "--output",
            "json",
        ])
        .unwrap();

        let config = cli.source.to_cli_config();
        assert_eq!(config.seed_url.as_deref(), Some("http://host/seed.json"));
        assert_eq!(config.live_poll_secs, 5);
        assert_eq!(config.http_timeout_sec, 30);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn test_source_args_reject_both_seeds() {
        let result = TestCli::try_parse_from([
            "test",
            "--seed-path",
            "/seed.json",
            "--seed-url",
            "http://host/seed.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_args_resolve_with_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_path = dir.path().join("vinyl.toml");
        std::fs::write(&config_path, "output = \"json\"\n").unwrap();

        let cli = TestCli::try_parse_from([
            "test",
            "--config",
            config_path.to_str().unwrap(),
        ])
        .unwrap();

        let config = cli.source.resolve().unwrap();
        assert_eq!(config.output, OutputFormat::Json);
    }
}
