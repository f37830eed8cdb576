//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then environment variables, then
//! command line flags, and finally [`Config::validate`].

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

use crate::app::services::card_reader::EidenvReader;
use crate::app::services::eidenv_parser::{EidenvParser, ParsePolicy};
use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_EIDENV_PROGRAM, DEFAULT_PORT, DEFAULT_READ_TIMEOUT_SECS,
    DEFAULT_TOLERATED_EXIT_CODES, env_vars,
};
use crate::{Error, Result};

/// Global configuration for eID REST
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// IP address the HTTP server binds to
    pub bind_address: String,

    /// TCP port of the HTTP server
    pub port: u16,

    /// Token clients must present on the read endpoint
    #[serde(skip_serializing)]
    pub auth_token: String,

    /// `eidenv` program name or path
    pub eidenv_program: PathBuf,

    /// Maximum duration of a single card read in seconds
    pub read_timeout_secs: u64,

    /// How malformed field values are handled
    pub policy: ParsePolicy,

    /// Non-zero exit codes of `eidenv` treated as success
    pub tolerated_exit_codes: Vec<i32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            auth_token: String::new(),
            eidenv_program: PathBuf::from(DEFAULT_EIDENV_PROGRAM),
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            policy: ParsePolicy::default(),
            tolerated_exit_codes: DEFAULT_TOLERATED_EXIT_CODES.to_vec(),
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_lookup(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an environment lookup function
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(address) = lookup(env_vars::BIND_ADDRESS) {
            self.bind_address = address;
        }
        if let Some(port) = lookup(env_vars::PORT) {
            self.port = parse_env(env_vars::PORT, &port)?;
        }
        if let Some(token) = lookup(env_vars::AUTH_TOKEN) {
            self.auth_token = token;
        }
        if let Some(program) = lookup(env_vars::EIDENV_PATH) {
            self.eidenv_program = PathBuf::from(program);
        }
        if let Some(timeout) = lookup(env_vars::TIMEOUT_SECS) {
            self.read_timeout_secs = parse_env(env_vars::TIMEOUT_SECS, &timeout)?;
        }
        if let Some(strict) = lookup(env_vars::STRICT) {
            if parse_flag(env_vars::STRICT, &strict)? {
                self.policy = ParsePolicy::Strict;
            }
        }

        debug!("Configuration after environment overrides: {:?}", self);
        Ok(self)
    }

    /// Set the bind address
    pub fn with_bind_address(mut self, address: impl Into<String>) -> Self {
        self.bind_address = address.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the access token
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = token.into();
        self
    }

    /// Set the `eidenv` program
    pub fn with_eidenv_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.eidenv_program = program.into();
        self
    }

    /// Set the read timeout in seconds
    pub fn with_read_timeout_secs(mut self, seconds: u64) -> Self {
        self.read_timeout_secs = seconds;
        self
    }

    /// Reject malformed field values instead of degrading them
    pub fn with_strict(mut self) -> Self {
        self.policy = ParsePolicy::Strict;
        self
    }

    /// Set the tolerated exit codes
    pub fn with_tolerated_exit_codes(mut self, codes: Vec<i32>) -> Self {
        self.tolerated_exit_codes = codes;
        self
    }

    /// Validate settings shared by every command
    pub fn validate(&self) -> Result<()> {
        if self.read_timeout_secs == 0 {
            return Err(Error::configuration("read timeout must be at least 1 second"));
        }
        if self.eidenv_program.as_os_str().is_empty() {
            return Err(Error::configuration("eidenv program must not be empty"));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Validate settings required to run the HTTP server
    pub fn validate_for_serve(&self) -> Result<()> {
        self.validate()?;
        if self.auth_token.trim().is_empty() {
            return Err(Error::configuration(format!(
                "an auth token is required (--auth-token or {})",
                env_vars::AUTH_TOKEN
            )));
        }
        Ok(())
    }

    /// Socket address of the HTTP server
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind_address.trim().parse().map_err(|_| {
            Error::configuration(format!("invalid bind address '{}'", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Build the parser described by this configuration
    pub fn to_parser(&self) -> EidenvParser {
        EidenvParser::new(self.policy).with_tolerated_exit_codes(self.tolerated_exit_codes.clone())
    }

    /// Build the `eidenv` reader described by this configuration
    pub fn to_reader(&self) -> EidenvReader {
        EidenvReader::new(self.eidenv_program.clone(), self.read_timeout())
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::configuration(format!("invalid value for {}: '{}'", name, value)))
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::configuration(format!(
            "invalid value for {}: '{}'",
            name, value
        ))),
    }
}
