//! Per-user session history.
//!
//! Each user gets one JSON file under the history directory holding every
//! recorded session in chronological order.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizladder_core::report::SessionReport;
use quizladder_core::traits::SummarySink;

/// User name recorded for sessions that carry none.
pub const ANONYMOUS: &str = "anonymous";

#[derive(Debug, Serialize, Deserialize)]
struct HistoryFile {
    user: String,
    #[serde(default)]
    sessions: Vec<SessionReport>,
}

/// JSON-file history store keyed by user.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `user`'s history. Distinct names map to distinct files.
    pub fn path_for(&self, user: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(normalize_user(user))))
    }

    /// All sessions recorded for `user`, oldest first. Empty if none.
    pub fn load(&self, user: &str) -> Result<Vec<SessionReport>> {
        let user = normalize_user(user);
        let path = self.path_for(user);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read history from {}", path.display()))?;
        let file: HistoryFile = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse history file {}", path.display()))?;
        anyhow::ensure!(
            file.user == user,
            "history file {} belongs to '{}', not '{}'",
            path.display(),
            file.user,
            user
        );
        Ok(file.sessions)
    }

    /// Append a session to its user's history.
    pub fn append(&self, report: &SessionReport) -> Result<PathBuf> {
        let user = normalize_user(report.user.as_deref().unwrap_or(ANONYMOUS));
        let mut sessions = self.load(user)?;
        sessions.push(report.clone());

        let file = HistoryFile {
            user: user.to_string(),
            sessions,
        };
        let json = serde_json::to_string_pretty(&file).context("failed to serialize history")?;

        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(user);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write history to {}", tmp.display()))?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        tracing::debug!(user, path = %path.display(), "recorded session");
        Ok(path)
    }

    /// Users with a history file, sorted.
    pub fn users(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();
        for entry in std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read directory: {}", self.dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                match read_user(&path) {
                    Ok(user) => users.push(user),
                    Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
                }
            }
        }
        users.sort();
        Ok(users)
    }
}

impl SummarySink for HistoryStore {
    fn record(&self, report: &SessionReport) -> Result<()> {
        self.append(report).map(|_| ())
    }
}

fn read_user(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path)?;
    let file: HistoryFile = serde_json::from_str(&content)?;
    Ok(file.user)
}

/// Trimmed user name, or [`ANONYMOUS`] if blank.
fn normalize_user(user: &str) -> &str {
    let user = user.trim();
    if user.is_empty() {
        ANONYMOUS
    } else {
        user
    }
}

/// Map a user name onto a file stem. ASCII letters, digits, `-` and `_`
/// are kept as is; every other byte becomes `%XX`, so the mapping is
/// one-to-one.
fn file_stem(user: &str) -> String {
    let mut stem = String::with_capacity(user.len());
    for byte in user.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}
