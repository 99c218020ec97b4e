use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlipwayError {
    #[error("no slipway.yaml found at {0}: run 'slipway init'")]
    ConfigNotFound(PathBuf),

    #[error("no deploy host configured: set 'host' in slipway.yaml")]
    HostMissing,

    #[error("no repository configured: set 'repo' in slipway.yaml")]
    RepoMissing,

    #[error("no release directories found in {0}")]
    NoReleases(PathBuf),

    #[error("required path does not exist: {0}")]
    MissingPath(PathBuf),

    #[error("{0} exists but is not a symlink")]
    InvalidLiveLink(PathBuf),

    #[error("required command '{name}' not found on {target}")]
    CommandMissing { name: String, target: String },

    #[error("command failed ({}): {command}{}", exit_label(.code), stderr_tail(.stderr))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("invalid pattern: {0}")]
    BadPattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("exit {c}"),
        None => "killed by signal".to_string(),
    }
}

fn stderr_tail(stderr: &str) -> String {
    match stderr.trim().lines().last() {
        Some(line) => format!(": {line}"),
        None => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, SlipwayError>;
