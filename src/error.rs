use std::path::PathBuf;

use thiserror::Error;

/// Main library error type that encompasses all possible failure modes
#[derive(Error, Debug)]
pub enum FaustError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML document: {source_name} - {details}")]
    XmlStructure { source_name: String, details: String },

    #[error("XPath error: {expression} - {details}")]
    XPath { expression: String, details: String },

    #[error("Document parsing error: {details}")]
    Document { details: String },

    #[error("Report error: {0}")]
    Report(#[from] ReportError),
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration file {path}: {source}")]
    Ini {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] ini::ParseError),

    #[error("Missing required configuration field: {section}.{key}")]
    MissingField { section: String, key: String },

    #[error("Invalid configuration value: {section}.{key} = {value} - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// Report delivery error types
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to compose report message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Console output failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, FaustError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Report result type alias
pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_faust_error_display() {
        let io_error = FaustError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));
        assert!(io_error.to_string().contains("IO error"));

        let structure = FaustError::XmlStructure {
            source_name: "empty.xml".to_string(),
            details: "no root element".to_string(),
        };
        assert!(structure.to_string().contains("Malformed XML document"));
        assert!(structure.to_string().contains("empty.xml"));
        assert!(structure.to_string().contains("no root element"));

        let xpath = FaustError::XPath {
            expression: "//tei:".to_string(),
            details: "unexpected end".to_string(),
        };
        assert!(xpath.to_string().contains("//tei:"));
    }

    #[test]
    fn test_config_error_display() {
        let missing_field = ConfigError::MissingField {
            section: "xml".to_string(),
            key: "dir".to_string(),
        };
        assert!(
            missing_field
                .to_string()
                .contains("Missing required configuration field")
        );
        assert!(missing_field.to_string().contains("xml.dir"));

        let invalid_value = ConfigError::InvalidValue {
            section: "mail".to_string(),
            key: "enabled".to_string(),
            value: "maybe".to_string(),
            reason: "not a boolean".to_string(),
        };
        assert!(invalid_value.to_string().contains("mail.enabled = maybe"));
        assert!(invalid_value.to_string().contains("not a boolean"));

        let not_found = ConfigError::FileNotFound {
            path: PathBuf::from("/etc/faust.ini"),
        };
        assert!(not_found.to_string().contains("faust.ini"));
    }

    #[test]
    fn test_config_error_conversion() {
        let config_error = ConfigError::MissingField {
            section: "validate".to_string(),
            key: "schema".to_string(),
        };
        let faust_error: FaustError = config_error.into();

        match faust_error {
            FaustError::Config(ConfigError::MissingField { .. }) => (),
            _ => panic!("Expected FaustError::Config"),
        }
    }

    #[test]
    fn test_report_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed");
        let faust_error: FaustError = ReportError::from(io_error).into();

        assert!(matches!(faust_error, FaustError::Report(ReportError::Io(_))));
    }

    #[test]
    fn test_error_source_chain() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let faust_error = FaustError::Io(io_error);

        let source = faust_error.source().unwrap();
        assert_eq!(source.to_string(), "File not found");
    }
}
