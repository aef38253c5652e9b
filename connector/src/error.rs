/*
 * SPDX-FileCopyrightText: 2026 Wavelens GmbH <info@wavelens.io>
 *
 * SPDX-License-Identifier: AGPL-3.0-only
 */

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Request failed with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Session store error: {0}")]
    Store(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn missing_token() -> Self {
        Error::Unauthorized("no credential held for API call".to_string())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized(_))
    }

    /// Duplicate names on create are reported by the API as 409.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status == StatusCode::CONFLICT)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
