//! # faust-utils
//!
//! Helpers for the Faust Edition's publishing pipeline: configuration lookup,
//! locating the edition's TEI/XML sources, sniffing TEI documents,
//! re-serializing them for the editors, XPath queries with the edition's
//! namespace prefixes, and mailing maintenance reports.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod file_discovery;
pub mod paths;
pub mod report;
pub mod serialize;
pub mod tei;
pub mod xpath;

pub use cli::{Cli, Command, VerbosityLevel};
pub use config::{Config, EnvProvider, SystemEnvProvider};
pub use error::{ConfigError, FaustError, ReportError, Result};
pub use file_discovery::{FileDiscovery, XML_SUFFIX};
pub use paths::XmlRoot;
pub use report::{
    Mailer, REPORT_RECIPIENTS, REPORT_SENDER, ReportSender, SmtpMailer, compose_report,
    write_report,
};
pub use serialize::TeiSerializer;
pub use tei::{is_tei_document, is_tei_reader};
pub use xpath::{
    NamespacedXPath, TEI_NS, XPATH_NAMESPACES, load_document, namespace_uri, parse_document,
    xpath,
};
