//! Re-serialization of TEI documents for the edition's editors.
//!
//! The output starts with an `oxygen` processing instruction pointing at the
//! validation schema, followed by the last top-level element of the input.
//! Everything inside that element is copied verbatim; the XML declaration,
//! doctype and other top-level nodes are dropped. Input in any declared
//! encoding is written as UTF-8.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigResult, FaustError, Result};

/// Immutable transform, built once from the configured schema and applied to
/// any number of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeiSerializer {
    schema: String,
    instruction: String,
}

impl TeiSerializer {
    pub fn new(schema: impl Into<String>) -> Self {
        let schema = schema.into();
        let instruction = format!("<?oxygen RNGSchema=\"{}\" type=\"xml\"?>", schema);
        Self {
            schema,
            instruction,
        }
    }

    /// Serializer referencing `validate.schema`
    pub fn from_config(config: &Config) -> ConfigResult<Self> {
        Ok(Self::new(config.validation_schema()?))
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The processing instruction prepended to every document
    pub fn processing_instruction(&self) -> &str {
        &self.instruction
    }

    /// Transform `input`, decoded per its BOM or declaration, into `output`
    pub fn serialize<R: BufRead, W: Write>(
        &self,
        mut input: R,
        output: &mut W,
        source_name: &str,
    ) -> Result<()> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes)?;
        let xml = decode_document(&bytes, source_name)?;
        self.write_document(&xml, output, source_name)
    }

    /// Transform an in-memory document. The text is already decoded, so any
    /// `encoding` in its declaration is ignored.
    pub fn serialize_str(&self, xml: &str) -> Result<String> {
        let mut output = Vec::new();
        self.write_document(xml, &mut output, "<string>")?;
        String::from_utf8(output).map_err(|e| FaustError::XmlStructure {
            source_name: "<string>".to_string(),
            details: e.to_string(),
        })
    }

    /// Transform a file, writing the result to `output`
    pub fn serialize_file<W: Write>(&self, path: &Path, output: &mut W) -> Result<()> {
        debug!("Re-serializing {}", path.display());
        let input = BufReader::new(File::open(path)?);
        self.serialize(input, output, &path.display().to_string())
    }

    fn write_document<W: Write>(&self, xml: &str, output: &mut W, source_name: &str) -> Result<()> {
        let element = last_top_level_element(Reader::from_str(xml), source_name)?;
        output.write_all(self.instruction.as_bytes())?;
        output.write_all(&element)?;
        Ok(())
    }
}

/// Document text decoded from the encoding given by its BOM or XML
/// declaration, UTF-8 when neither is present
fn decode_document<'b>(bytes: &'b [u8], source_name: &str) -> Result<Cow<'b, str>> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    // A declaration can only be the first event; reading it selects the decoder
    reader.read_event_into(&mut buf)?;

    let decoder = reader.decoder();
    decoder.decode(bytes).map_err(|e| FaustError::XmlStructure {
        source_name: source_name.to_string(),
        details: format!("cannot decode as {}: {}", decoder.encoding().name(), e),
    })
}

/// Raw bytes of the last top-level element, copied event by event
fn last_top_level_element<R: BufRead>(
    mut reader: Reader<R>,
    source_name: &str,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut seen_element = false;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match event {
            Event::Eof => break,
            Event::Start(_) | Event::Empty(_) if depth == 0 => {
                // A new top-level sibling replaces any earlier one
                writer.get_mut().clear();
                seen_element = true;
                if matches!(event, Event::Start(_)) {
                    depth += 1;
                }
                writer.write_event(event)?;
            }
            Event::Start(_) => {
                depth += 1;
                writer.write_event(event)?;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                writer.write_event(event)?;
            }
            _ if depth > 0 => writer.write_event(event)?,
            _ => {}
        }
        buf.clear();
    }

    if !seen_element {
        return Err(FaustError::XmlStructure {
            source_name: source_name.to_string(),
            details: "no root element".to_string(),
        });
    }
    if depth > 0 {
        return Err(FaustError::XmlStructure {
            source_name: source_name.to_string(),
            details: "unexpected end of document".to_string(),
        });
    }

    Ok(writer.into_inner())
}
