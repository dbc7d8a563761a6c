use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{DEFAULT_CONFIG_FILE, LOCAL_CONFIG_FILE};

/// Verbosity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum VerbosityLevel {
    /// Only show errors
    Quiet,
    /// Show warnings and errors
    #[default]
    Normal,
    /// Show progress information
    Verbose,
    /// Show debugging information
    Debug,
    /// Show everything, including per-event tracing
    Trace,
}

impl VerbosityLevel {
    /// Default `tracing` filter directive for this level
    pub fn filter_directive(self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "info",
            VerbosityLevel::Debug => "debug",
            VerbosityLevel::Trace => "trace",
        }
    }
}

/// Utilities for the Faust Edition's TEI/XML sources
#[derive(Parser, Debug, Clone)]
#[command(name = "faust")]
#[command(about = "Utilities for the Faust Edition's TEI/XML sources")]
#[command(version)]
pub struct Cli {
    /// Primary configuration file
    #[arg(long = "config", global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Local configuration overrides, read after the primary file if present
    #[arg(long = "local", global = true, default_value = LOCAL_CONFIG_FILE)]
    pub local: PathBuf,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the effective configuration
    Config,

    /// List the edition's XML documents in sorted order
    List {
        /// Print paths relative to the XML root
        #[arg(long)]
        relative: bool,

        /// Only list documents whose root element is in the TEI namespace
        #[arg(long = "tei-only")]
        tei_only: bool,
    },

    /// Print whether a document is a TEI document
    IsTei {
        /// Document to check, absolute or relative to the XML root
        file: String,
    },

    /// Re-serialize a TEI document with the configured schema instruction
    Serialize {
        /// Document to serialize, absolute or relative to the XML root
        file: String,
    },

    /// Evaluate an XPath expression with the edition's namespace prefixes
    Xpath {
        /// XPath expression, e.g. "count(//tei:l)"
        expression: String,

        /// Documents to query (default: all XML documents)
        files: Vec<String>,
    },

    /// Send a report by mail, or print it when mail is disabled
    Report {
        /// Report subject
        #[arg(short = 's', long)]
        subject: String,

        /// Report body; read from stdin when omitted
        #[arg(short = 'b', long)]
        body: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else {
            match self.verbose {
                0 => VerbosityLevel::Normal,
                1 => VerbosityLevel::Verbose,
                2 => VerbosityLevel::Debug,
                _ => VerbosityLevel::Trace,
            }
        }
    }

    /// Override files consulted after the primary configuration
    pub fn config_overrides(&self) -> Vec<PathBuf> {
        vec![self.local.clone()]
    }
}
