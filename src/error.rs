// SPDX-License-Identifier: PMPL-1.0-or-later
//! Error types for a11y-monitor

use thiserror::Error;

/// Main error type for a11y-monitor
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid scan results: {0}")]
    Scan(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
