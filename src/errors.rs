/*!
 * Error types for the voxweave application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when talking to a speech synthesis engine
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

/// Errors that can occur when driving external media tools
#[derive(Error, Debug)]
pub enum MediaError {
    /// A required external tool is not installed or not on PATH
    #[error("Media tool not available: {0}")]
    ToolMissing(String),

    /// Error reading or writing working files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An external command exited with a non-zero status
    #[error("{tool} failed: {detail}")]
    CommandFailed {
        /// Name of the external tool
        tool: String,
        /// Filtered stderr or status description
        detail: String
    },

    /// A duration probe could not measure the given file
    #[error("Duration probe failed: {0}")]
    ProbeFailed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the speech engine
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from media composition
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
