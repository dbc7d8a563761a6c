//! Execution of the `faust` subcommands against a loaded configuration.

use std::io::Write;
use std::path::Path;

use sxd_xpath::Value;
use tracing::{info, warn};

use crate::cli::Command;
use crate::config::Config;
use crate::error::Result;
use crate::file_discovery::FileDiscovery;
use crate::paths::XmlRoot;
use crate::report::ReportSender;
use crate::serialize::TeiSerializer;
use crate::tei::is_tei_document;
use crate::xpath::{load_document, xpath};

/// Run `command`, writing its output to `out`
pub fn run<W: Write>(command: &Command, config: &Config, out: &mut W) -> Result<()> {
    match command {
        Command::Config => {
            writeln!(out, "{}", config.dump())?;
        }
        Command::List { relative, tei_only } => {
            let root = XmlRoot::from_config(config)?;
            for file in FileDiscovery::for_root(&root).xml_files() {
                if *tei_only && !tei_or_warn(&file) {
                    continue;
                }
                let shown = if *relative {
                    root.relative_path(&file)
                } else {
                    file.as_str()
                };
                writeln!(out, "{}", shown)?;
            }
        }
        Command::IsTei { file } => {
            let root = XmlRoot::from_config(config)?;
            let path = resolve(&root, file);
            writeln!(out, "{}", is_tei_document(Path::new(&path))?)?;
        }
        Command::Serialize { file } => {
            let root = XmlRoot::from_config(config)?;
            let serializer = TeiSerializer::from_config(config)?;
            serializer.serialize_file(Path::new(&resolve(&root, file)), out)?;
            writeln!(out)?;
        }
        Command::Xpath { expression, files } => {
            let root = XmlRoot::from_config(config)?;
            let query = xpath(expression)?;
            let files: Vec<String> = if files.is_empty() {
                FileDiscovery::for_root(&root).xml_files()
            } else {
                files.iter().map(|f| resolve(&root, f)).collect()
            };
            for file in &files {
                let package = load_document(Path::new(file))?;
                let value = query.evaluate_document(&package)?;
                writeln!(
                    out,
                    "{}: {}",
                    root.relative_path(file),
                    render_value(&value)
                )?;
            }
        }
        Command::Report { subject, body } => {
            let body = match body {
                Some(body) => body.clone(),
                None => stdin_body(std::io::read_to_string(std::io::stdin())?),
            };
            let sender = ReportSender::from_config(config)?;
            sender.send_report_to(out, subject, &body)?;
        }
    }
    Ok(())
}

/// Absolute paths are taken as given, everything else is relative to the root
fn resolve(root: &XmlRoot, file: &str) -> String {
    if Path::new(file).is_absolute() {
        file.to_string()
    } else {
        root.absolute_path(file)
    }
}

/// Body piped on stdin, without the final line break of its last line
fn stdin_body(mut input: String) -> String {
    if input.ends_with('\n') {
        input.pop();
        if input.ends_with('\r') {
            input.pop();
        }
    }
    input
}

fn tei_or_warn(file: &str) -> bool {
    match is_tei_document(Path::new(file)) {
        Ok(is_tei) => is_tei,
        Err(e) => {
            warn!("Skipping {}: {}", file, e);
            false
        }
    }
}

fn render_value(value: &Value<'_>) -> String {
    match value {
        Value::Boolean(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Nodeset(nodes) => {
            let values: Vec<String> = nodes
                .document_order()
                .iter()
                .map(|node| node.string_value())
                .collect();
            info!("XPath matched {} nodes", values.len());
            values.join(" | ")
        }
    }
}
