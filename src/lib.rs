//! eID REST Library
//!
//! A Rust library for reading Belgian eID card data through OpenSC's `eidenv`
//! utility and republishing it as JSON over a token-protected HTTP endpoint.
//!
//! This library provides tools for:
//! - Parsing the `KEY: value` output of `eidenv` into a typed [`CardRecord`]
//! - Normalizing birth dates written with French, Dutch or German month names
//! - Mapping document type and special status codes onto closed enumerations
//! - Running `eidenv` behind a [`CardReader`] capability
//! - Serving card reads over HTTP

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod server;
    pub mod services {
        pub mod card_reader;
        pub mod eidenv_parser;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{CardRecord, DocumentType, Gender, ReaderOutput, SpecialStatus};
pub use app::services::card_reader::{CardReader, CardService, EidenvReader};
pub use app::services::eidenv_parser::{EidenvParser, ParsePolicy};
pub use config::Config;

/// Result type alias for eID operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for card reading and parsing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// `eidenv` reported that no card is inserted in the reader
    #[error("card not present")]
    CardNotPresent,

    /// `eidenv` exited with a status outside the tolerated set
    #[error("failed to read card: {} {output:?}", describe_exit(.exit_code))]
    ExternalToolFailure {
        exit_code: Option<i32>,
        output: String,
    },

    /// A field could not be parsed while the strict parse policy was active
    #[error("invalid value for {key}: '{value}' ({reason})")]
    FieldParse {
        key: String,
        value: String,
        reason: String,
    },

    /// The card reading utility could not be located
    #[error("{program} not found in PATH")]
    ReaderNotFound {
        program: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The card reading utility did not finish in time
    #[error("card read timed out after {seconds}s")]
    ReaderTimeout { seconds: u64 },

    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A record could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operation was cancelled by the user
    #[error("Interrupted: {message}")]
    Interrupted { message: String },
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Create an external tool failure carrying the captured output
    pub fn external_tool_failure(exit_code: Option<i32>, output: impl Into<String>) -> Self {
        Self::ExternalToolFailure {
            exit_code,
            output: output.into(),
        }
    }

    /// Create a field parse error
    pub fn field_parse(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::FieldParse {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a reader not found error
    pub fn reader_not_found(program: impl Into<String>, source: Option<std::io::Error>) -> Self {
        Self::ReaderNotFound {
            program: program.into(),
            source,
        }
    }

    /// Create a reader timeout error
    pub fn reader_timeout(seconds: u64) -> Self {
        Self::ReaderTimeout { seconds }
    }

    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an interruption error
    pub fn interrupted(message: impl Into<String>) -> Self {
        Self::Interrupted {
            message: message.into(),
        }
    }

    /// Whether the caller can expect a later read to succeed without intervention
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::CardNotPresent | Self::ReaderTimeout { .. })
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}
