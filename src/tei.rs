//! Namespace sniffing for TEI documents.
//!
//! Only the prologue and the first element start tag are read; anything after
//! that, well-formed or not, is never looked at.

use std::io::BufRead;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::trace;

use crate::error::{FaustError, Result};
use crate::xpath::TEI_NS;

/// Whether the file's first element is in the TEI namespace
pub fn is_tei_document(path: &Path) -> Result<bool> {
    let reader = NsReader::from_file(path)?;
    sniff(reader, &path.display().to_string())
}

/// Whether the first element read from `input` is in the TEI namespace
pub fn is_tei_reader<R: BufRead>(input: R, source_name: &str) -> Result<bool> {
    sniff(NsReader::from_reader(input), source_name)
}

/// Namespace URI of the first element, `None` when it has no namespace
pub fn first_element_namespace<R: BufRead>(
    mut reader: NsReader<R>,
    source_name: &str,
) -> Result<Option<String>> {
    let mut buf = Vec::new();
    loop {
        let (resolved, event) = reader.read_resolved_event_into(&mut buf)?;
        match event {
            Event::Start(_) | Event::Empty(_) => {
                return match resolved {
                    ResolveResult::Bound(Namespace(ns)) => {
                        Ok(Some(String::from_utf8_lossy(ns).into_owned()))
                    }
                    ResolveResult::Unbound => Ok(None),
                    ResolveResult::Unknown(prefix) => Err(FaustError::XmlStructure {
                        source_name: source_name.to_string(),
                        details: format!(
                            "unbound namespace prefix '{}'",
                            String::from_utf8_lossy(&prefix)
                        ),
                    }),
                };
            }
            Event::Eof => {
                return Err(FaustError::XmlStructure {
                    source_name: source_name.to_string(),
                    details: "no root element".to_string(),
                });
            }
            _ => {}
        }
        buf.clear();
    }
}

fn sniff<R: BufRead>(reader: NsReader<R>, source_name: &str) -> Result<bool> {
    let namespace = first_element_namespace(reader, source_name)?;
    trace!("{}: first element namespace {:?}", source_name, namespace);
    Ok(namespace.as_deref() == Some(TEI_NS))
}
