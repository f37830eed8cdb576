//! Card reading capability
//!
//! The parser never talks to the card reader itself. It receives the captured
//! output of a [`CardReader`], which in production is [`EidenvReader`]
//! running OpenSC's `eidenv` and in tests is any in-memory fake.

use std::env;
use std::ffi::OsStr;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::app::models::{CardRecord, ReaderOutput};
use crate::app::services::eidenv_parser::EidenvParser;
use crate::constants::{DEFAULT_EIDENV_PROGRAM, DEFAULT_READ_TIMEOUT_SECS};
use crate::{Error, Result};

/// Something that yields the raw output of one card read
pub trait CardReader: Send + Sync {
    /// Run one read and capture its standard output and exit code
    fn read_output(&self) -> impl Future<Output = Result<ReaderOutput>> + Send;
}

/// Runs OpenSC's `eidenv` as a child process
#[derive(Debug, Clone)]
pub struct EidenvReader {
    program: PathBuf,
    timeout: Duration,
}

impl Default for EidenvReader {
    fn default() -> Self {
        Self::new(
            DEFAULT_EIDENV_PROGRAM,
            Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        )
    }
}

impl EidenvReader {
    /// Create a reader for `program`, a bare name looked up in `PATH` or a path
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve the program against the current `PATH`
    ///
    /// Resolution happens on every read so a utility installed after startup
    /// is picked up.
    pub fn locate(&self) -> Result<PathBuf> {
        resolve_program(&self.program, env::var_os("PATH").as_deref())
    }
}

impl CardReader for EidenvReader {
    async fn read_output(&self) -> Result<ReaderOutput> {
        let program = self.locate()?;
        debug!("Running {}", program.display());

        let child = Command::new(&program)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| Error::reader_timeout(self.timeout.as_secs()))?
            .map_err(|e| Error::io(format!("Failed to run {}", program.display()), e))?;

        if !output.stderr.is_empty() {
            debug!(
                "{} stderr: {}",
                program.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(ReaderOutput::new(output.stdout, output.status.code()))
    }
}

/// Find an executable for `program`
///
/// Names containing a path separator are taken as paths; bare names are
/// searched in each directory of `path_var`.
pub fn resolve_program(program: &Path, path_var: Option<&OsStr>) -> Result<PathBuf> {
    let name = program.display().to_string();

    if program.components().count() > 1 {
        return if is_executable(program) {
            Ok(program.to_path_buf())
        } else {
            Err(Error::reader_not_found(name, None))
        };
    }

    path_var
        .map(|paths| env::split_paths(paths).collect::<Vec<_>>())
        .unwrap_or_default()
        .into_iter()
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
        .ok_or_else(|| Error::reader_not_found(name, None))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

// =============================================================================
// Card Service
// =============================================================================

/// Reads a card and parses the result
///
/// Every call runs a fresh read; nothing is cached between calls.
#[derive(Debug, Clone)]
pub struct CardService<R> {
    reader: R,
    parser: EidenvParser,
}

impl<R: CardReader> CardService<R> {
    pub fn new(reader: R, parser: EidenvParser) -> Self {
        Self { reader, parser }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn parser(&self) -> &EidenvParser {
        &self.parser
    }

    /// Read the card currently in the reader
    pub async fn read_card(&self) -> Result<CardRecord> {
        let output = self.reader.read_output().await?;
        debug!(
            "Reader returned {} bytes with exit code {:?}",
            output.stdout.len(),
            output.exit_code
        );

        match self.parser.parse_output(&output) {
            Ok(record) => {
                info!("Read card {}", record.card_number());
                Ok(record)
            }
            Err(e) => {
                warn!("Card read failed: {}", e);
                Err(e)
            }
        }
    }
}
