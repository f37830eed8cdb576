//! Command-line argument definitions for eID REST
//!
//! This module defines the CLI interface using the clap derive API. Flags
//! are optional so that values from the environment survive unless the user
//! overrides them explicitly.

use crate::config::Config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the eID card reader service
#[derive(Debug, Clone, Parser)]
#[command(
    name = "eid-rest",
    version,
    about = "Read Belgian eID cards through OpenSC's eidenv and serve them as JSON",
    long_about = "Runs OpenSC's eidenv utility, parses its KEY: value output into a typed \
                  card record and publishes the result over a token-protected HTTP endpoint. \
                  Captured eidenv output can also be parsed offline."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Serve card reads over HTTP
    Serve(ServeArgs),
    /// Read the inserted card once and print it
    Read(ReadArgs),
    /// Parse captured eidenv output from a file or stdin
    Parse(ParseArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Serve(_) => "serve",
            Commands::Read(_) => "read",
            Commands::Parse(_) => "parse",
        }
    }
}

/// Options controlling how eidenv is run and how its output is parsed
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ReaderOptions {
    /// eidenv program name or path (default: eidenv)
    #[arg(long = "eidenv", value_name = "PATH")]
    pub eidenv: Option<PathBuf>,

    /// Maximum duration of one card read in seconds (default: 30)
    #[arg(long = "timeout", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Fail on malformed field values instead of leaving them empty
    #[arg(long = "strict")]
    pub strict: bool,
}

impl ReaderOptions {
    /// Layer these options over a configuration
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(program) = &self.eidenv {
            config = config.with_eidenv_program(program.clone());
        }
        if let Some(seconds) = self.timeout {
            config = config.with_read_timeout_secs(seconds);
        }
        if self.strict {
            config = config.with_strict();
        }
        config
    }
}

/// Arguments for the serve command
#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Address to bind the HTTP server to (default: 0.0.0.0)
    #[arg(short = 'b', long = "bind-address", value_name = "ADDRESS")]
    pub bind_address: Option<String>,

    /// Port of the HTTP server (default: 8080)
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,

    /// Token clients must pass as the `token` query parameter
    ///
    /// Required. May also be set through EID_REST_AUTH_TOKEN.
    #[arg(short = 't', long = "auth-token", value_name = "TOKEN")]
    pub auth_token: Option<String>,

    #[command(flatten)]
    pub reader: ReaderOptions,
}

impl ServeArgs {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(address) = &self.bind_address {
            config = config.with_bind_address(address.clone());
        }
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(token) = &self.auth_token {
            config = config.with_auth_token(token.clone());
        }
        self.reader.apply(config)
    }
}

/// Arguments for the read command
#[derive(Debug, Clone, Parser)]
pub struct ReadArgs {
    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    #[command(flatten)]
    pub reader: ReaderOptions,
}

/// Arguments for the parse command
#[derive(Debug, Clone, Parser)]
pub struct ParseArgs {
    /// File holding captured eidenv output, `-` for stdin
    #[arg(value_name = "FILE", default_value = "-")]
    pub input: PathBuf,

    /// Exit code eidenv returned when the output was captured
    #[arg(long = "exit-code", value_name = "CODE", default_value_t = 0, allow_negative_numbers = true)]
    pub exit_code: i32,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Fail on malformed field values instead of leaving them empty
    #[arg(long = "strict")]
    pub strict: bool,
}

impl ParseArgs {
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}

/// Output format of a card record
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Human-readable table
    Text,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    ///
    /// The server logs requests at info by default, one-shot commands stay
    /// quiet unless asked.
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }

        let base: u8 = match self.command {
            Some(Commands::Serve(_)) => 1,
            _ => 0,
        };
        match self.verbose.saturating_add(base) {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_serve_args() {
        let args = parse(&[
            "eid-rest", "serve", "-b", "127.0.0.1", "-p", "9000", "-t", "s3cret", "--eidenv",
            "/opt/eidenv", "--timeout", "10", "--strict",
        ]);

        let Some(Commands::Serve(serve)) = args.command else {
            panic!("expected serve command");
        };
        let config = serve.apply(Config::default());
        assert_eq!(config.bind_address, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth_token, "s3cret");
        assert_eq!(config.eidenv_program, PathBuf::from("/opt/eidenv"));
        assert_eq!(config.read_timeout_secs, 10);
        assert!(config.policy.is_strict());
    }

    #[test]
    fn test_unset_flags_keep_configuration() {
        let args = parse(&["eid-rest", "serve"]);
        let Some(Commands::Serve(serve)) = args.command else {
            panic!("expected serve command");
        };

        let base = Config::default().with_port(9999).with_auth_token("from-env");
        assert_eq!(serve.apply(base.clone()), base);
    }

    #[test]
    fn test_parse_args() {
        let args = parse(&["eid-rest", "parse", "capture.txt", "--exit-code", "1", "--format", "text"]);
        let Some(Commands::Parse(parse_args)) = args.command else {
            panic!("expected parse command");
        };
        assert_eq!(parse_args.input, PathBuf::from("capture.txt"));
        assert_eq!(parse_args.exit_code, 1);
        assert_eq!(parse_args.format, OutputFormat::Text);
        assert!(!parse_args.reads_stdin());

        let args = parse(&["eid-rest", "parse"]);
        let Some(Commands::Parse(parse_args)) = args.command else {
            panic!("expected parse command");
        };
        assert!(parse_args.reads_stdin());
        assert_eq!(parse_args.exit_code, 0);
        assert_eq!(parse_args.format, OutputFormat::Json);
    }

    #[test]
    fn test_log_level() {
        assert_eq!(parse(&["eid-rest", "read"]).get_log_level(), "warn");
        assert_eq!(parse(&["eid-rest", "read", "-vv"]).get_log_level(), "debug");
        assert_eq!(parse(&["eid-rest", "serve"]).get_log_level(), "info");
        assert_eq!(parse(&["eid-rest", "-v", "serve"]).get_log_level(), "debug");
        assert_eq!(parse(&["eid-rest", "serve", "-vvv"]).get_log_level(), "trace");
        assert_eq!(parse(&["eid-rest", "serve", "-q"]).get_log_level(), "error");
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["eid-rest", "read", "-q", "-v"]).is_err());
    }
}
