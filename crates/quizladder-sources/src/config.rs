//! Configuration file and source factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizladder_core::model::QuestionBank;
use quizladder_core::traits::QuestionSource;

use crate::error::SourceError;
use crate::file::FileSource;
use crate::opentdb::OpenTdbSource;

/// Configuration for a single question source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    /// A TOML bank file or a directory of them.
    File { path: PathBuf },
    /// The Open Trivia DB HTTP API.
    OpenTdb {
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default = "default_amount")]
        amount: u32,
        #[serde(default)]
        category: Option<u32>,
    },
}

fn default_amount() -> u32 {
    10
}

/// Top-level quizladder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizladderConfig {
    /// Test-taker whose history sessions are recorded under.
    #[serde(default)]
    pub user: Option<String>,
    /// Source to use when none is named on the command line.
    #[serde(default)]
    pub default_source: Option<String>,
    /// Directory holding per-user history files.
    #[serde(default = "default_history_dir")]
    pub history_dir: PathBuf,
    /// Source configurations keyed by name.
    #[serde(default)]
    pub sources: HashMap<String, SourceConfig>,
}

fn default_history_dir() -> PathBuf {
    PathBuf::from("./quizladder-history")
}

impl Default for QuizladderConfig {
    fn default() -> Self {
        Self {
            user: None,
            default_source: None,
            history_dir: default_history_dir(),
            sources: HashMap::new(),
        }
    }
}

impl QuizladderConfig {
    /// Look up a named source, listing the configured names on failure.
    pub fn source(&self, name: &str) -> Result<&SourceConfig> {
        self.sources.get(name).with_context(|| {
            let mut names: Vec<&String> = self.sources.keys().collect();
            names.sort();
            format!("source '{name}' not found in config. Available: {names:?}")
        })
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Resolve env vars in a source config.
fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::File { path } => SourceConfig::File {
            path: resolve_path(path),
        },
        SourceConfig::OpenTdb {
            base_url,
            amount,
            category,
        } => SourceConfig::OpenTdb {
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            amount: *amount,
            category: *category,
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizladder.toml` in the current directory
/// 2. `~/.config/quizladder/config.toml`
///
/// Environment variable overrides: `QUIZLADDER_USER`, `QUIZLADDER_HISTORY_DIR`.
pub fn load_config() -> Result<QuizladderConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizladderConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizladder.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => QuizladderConfig::default(),
    };

    // Apply env var overrides
    if let Ok(user) = std::env::var("QUIZLADDER_USER") {
        if !user.is_empty() {
            config.user = Some(user);
        }
    }
    if let Ok(dir) = std::env::var("QUIZLADDER_HISTORY_DIR") {
        if !dir.is_empty() {
            config.history_dir = PathBuf::from(dir);
        }
    }

    Ok(config)
}

/// Parse a config document and resolve `${VAR}` references in it.
pub fn parse_config(content: &str) -> Result<QuizladderConfig> {
    let mut config: QuizladderConfig = toml::from_str(content)?;

    config.user = config.user.as_deref().map(resolve_env_vars);
    config.history_dir = resolve_path(&config.history_dir);
    config.sources = config
        .sources
        .iter()
        .map(|(k, v)| (k.clone(), resolve_source_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizladder"))
}

/// Create a source instance from its configuration.
pub fn create_source(name: &str, config: &SourceConfig) -> Result<Box<dyn QuestionSource>> {
    tracing::debug!(source = name, ?config, "creating question source");
    match config {
        SourceConfig::File { path } => Ok(Box::new(FileSource::new(path.clone()))),
        SourceConfig::OpenTdb {
            base_url,
            amount,
            category,
        } => {
            anyhow::ensure!(*amount >= 1, "source '{name}': amount must be at least 1");
            Ok(Box::new(OpenTdbSource::new(
                base_url.clone(),
                *amount,
                *category,
            )))
        }
    }
}

/// Retries after a transient [`SourceError`].
const FETCH_RETRIES: u32 = 2;
/// Delay before the first retry; doubled for each one after.
const RETRY_DELAY: Duration = Duration::from_millis(250);

/// Fetch from every source concurrently, keeping the sources' order.
pub async fn fetch_all(sources: &[Box<dyn QuestionSource>]) -> Result<Vec<QuestionBank>> {
    futures::future::try_join_all(sources.iter().map(|source| async move {
        fetch_with_retry(source.as_ref())
            .await
            .with_context(|| format!("failed to fetch from source '{}'", source.name()))
    }))
    .await
}

/// Fetch from one source, retrying transient source errors with backoff.
async fn fetch_with_retry(source: &dyn QuestionSource) -> Result<QuestionBank> {
    let mut retry_delay = RETRY_DELAY;
    let mut retry = 0;
    loop {
        match source.fetch().await {
            Ok(bank) => return Ok(bank),
            Err(e) => {
                let transient = e
                    .downcast_ref::<SourceError>()
                    .is_some_and(|err| !err.is_permanent());
                if !transient || retry >= FETCH_RETRIES {
                    return Err(e);
                }
                retry += 1;
                tracing::warn!(source = source.name(), retry, "fetch failed, retrying: {e:#}");
                tokio::time::sleep(retry_delay).await;
                retry_delay *= 2;
            }
        }
    }
}
