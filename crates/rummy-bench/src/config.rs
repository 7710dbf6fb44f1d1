use rummy_core::model::card::{Card, Face, ParseCardError};
use rummy_core::win::{PRE_DISCARD_HAND_SIZE, WINNING_HAND_SIZE};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_LATENCY_BUDGET_MS: u64 = 250;
const DEFAULT_DECKS: u8 = 2;
const MAX_DECKS: u8 = 3;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root bench configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BenchConfig {
    pub run_id: String,
    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
    #[serde(default)]
    pub sampling: Option<SamplingConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BenchConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: BenchConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        validate_scenarios(&self.scenarios)?;
        if let Some(sampling) = self.sampling.as_ref() {
            sampling.validate()?;
        }
        if self.scenarios.is_empty() && self.sampling.is_none() {
            return Err(ValidationError::InvalidField {
                field: "scenarios".to_string(),
                message: "at least one scenario or a sampling block is required".to_string(),
            });
        }
        self.outputs.validate(&self.run_id)?;
        self.metrics.validate()?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// A fixed hand to analyse, written in card notation.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScenarioConfig {
    pub name: String,
    /// Whitespace-separated cards, e.g. `"A♠ 2♠ 3♠ 10h Qd 5c*"`.
    pub hand: String,
    #[serde(default)]
    pub wildcard: Option<String>,
    #[serde(default)]
    pub discard_top: Option<String>,
}

impl ScenarioConfig {
    /// Hand cards take ids from 0; the discard top gets the next free id.
    pub fn cards(&self) -> Result<Vec<Card>, ParseCardError> {
        self.hand
            .split_whitespace()
            .enumerate()
            .map(|(index, token)| Card::parse_with_id(token, index as u16))
            .collect()
    }

    pub fn discard_top(&self, next_id: u16) -> Result<Option<Card>, ParseCardError> {
        self.discard_top
            .as_deref()
            .map(|token| Card::parse_with_id(token, next_id))
            .transpose()
    }

    pub fn wildcard(&self) -> Result<Option<Face>, ParseCardError> {
        self.wildcard.as_deref().map(str::parse).transpose()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let field = |suffix: &str| format!("scenarios[{}].{suffix}", self.name);
        let invalid = |suffix: &str, err: ParseCardError| ValidationError::InvalidField {
            field: field(suffix),
            message: err.to_string(),
        };

        let cards = self.cards().map_err(|err| invalid("hand", err))?;
        if cards.len() != WINNING_HAND_SIZE && cards.len() != PRE_DISCARD_HAND_SIZE {
            return Err(ValidationError::InvalidField {
                field: field("hand"),
                message: format!(
                    "hand must hold {WINNING_HAND_SIZE} or {PRE_DISCARD_HAND_SIZE} cards, found {}",
                    cards.len()
                ),
            });
        }
        self.wildcard().map_err(|err| invalid("wildcard", err))?;
        self.discard_top(cards.len() as u16)
            .map_err(|err| invalid("discard_top", err))?;
        Ok(())
    }
}

/// Seeded random deals analysed alongside the fixed scenarios.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SamplingConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    pub hands: usize,
    #[serde(default = "default_decks")]
    pub decks: u8,
}

impl SamplingConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.hands == 0 {
            return Err(ValidationError::InvalidField {
                field: "sampling.hands".to_string(),
                message: "number of hands must be greater than zero".to_string(),
            });
        }

        if self.decks == 0 || self.decks > MAX_DECKS {
            return Err(ValidationError::InvalidField {
                field: "sampling.decks".to_string(),
                message: format!("decks must be between 1 and {MAX_DECKS}"),
            });
        }

        Ok(())
    }
}

fn default_decks() -> u8 {
    DEFAULT_DECKS
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Metrics configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
    /// Wall-clock cap for each winning-hand search; unbounded when absent.
    #[serde(default)]
    pub search_budget_ms: Option<u64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            latency_budget_ms: DEFAULT_LATENCY_BUDGET_MS,
            search_budget_ms: None,
        }
    }
}

impl MetricsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.latency_budget_ms == 0 {
            return Err(ValidationError::InvalidField {
                field: "metrics.latency_budget_ms".to_string(),
                message: "latency budget must be greater than zero".to_string(),
            });
        }

        if self.search_budget_ms == Some(0) {
            return Err(ValidationError::InvalidField {
                field: "metrics.search_budget_ms".to_string(),
                message: "search budget must be greater than zero when set".to_string(),
            });
        }

        Ok(())
    }
}

fn default_latency_budget_ms() -> u64 {
    DEFAULT_LATENCY_BUDGET_MS
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    /// Keep the bot's per-decision events in the telemetry log.
    #[serde(default)]
    pub decision_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            decision_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn validate_scenarios(scenarios: &[ScenarioConfig]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for scenario in scenarios {
        if scenario.name.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "scenarios.name".to_string(),
                message: "scenario name must not be empty".to_string(),
            });
        }

        if !seen.insert(scenario.name.clone()) {
            return Err(ValidationError::InvalidField {
                field: "scenarios".to_string(),
                message: format!("scenario name '{}' defined more than once", scenario.name),
            });
        }

        scenario.validate()?;
    }
    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Telemetry lands next to the summary.
    pub fn telemetry_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
