//! XPath namespace registry and namespace-aware query compilation.

use std::path::Path;

use sxd_document::Package;
use sxd_document::parser;
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value, XPath};

use crate::error::{FaustError, Result};

pub const TEI_NS: &str = "http://www.tei-c.org/ns/1.0";
pub const GE_NS: &str = "http://www.tei-c.org/ns/geneticEditions";
pub const FAUST_NS: &str = "http://www.faustedition.net/ns";
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const EXIST_NS: &str = "http://exist.sourceforge.net/NS/exist";

/// Prefix bindings available to every query
pub const XPATH_NAMESPACES: [(&str, &str); 5] = [
    ("tei", TEI_NS),
    ("ge", GE_NS),
    ("f", FAUST_NS),
    ("svg", SVG_NS),
    ("exist", EXIST_NS),
];

/// Namespace URI bound to `prefix`
pub fn namespace_uri(prefix: &str) -> Option<&'static str> {
    XPATH_NAMESPACES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, uri)| *uri)
}

/// A compiled XPath expression bound to the namespace registry
pub struct NamespacedXPath {
    expression: String,
    xpath: XPath,
}

impl std::fmt::Debug for NamespacedXPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespacedXPath")
            .field("expression", &self.expression)
            .finish()
    }
}

/// Compile `expression`. Every call compiles afresh.
pub fn xpath(expression: &str) -> Result<NamespacedXPath> {
    let compiled = Factory::new()
        .build(expression)
        .map_err(|e| FaustError::XPath {
            expression: expression.to_string(),
            details: e.to_string(),
        })?
        .ok_or_else(|| FaustError::XPath {
            expression: expression.to_string(),
            details: "empty expression".to_string(),
        })?;

    Ok(NamespacedXPath {
        expression: expression.to_string(),
        xpath: compiled,
    })
}

impl NamespacedXPath {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Evaluate against `node` with the registry's prefixes in scope
    pub fn evaluate<'d, N>(&self, node: N) -> Result<Value<'d>>
    where
        N: Into<Node<'d>>,
    {
        let mut context = Context::new();
        for (prefix, uri) in XPATH_NAMESPACES {
            context.set_namespace(prefix, uri);
        }

        self.xpath
            .evaluate(&context, node)
            .map_err(|e| FaustError::XPath {
                expression: self.expression.clone(),
                details: e.to_string(),
            })
    }

    /// Evaluate against the root of a parsed document
    pub fn evaluate_document<'d>(&self, package: &'d Package) -> Result<Value<'d>> {
        self.evaluate(package.as_document().root())
    }
}

/// Parse an in-memory document for querying
pub fn parse_document(xml: &str) -> Result<Package> {
    parser::parse(xml).map_err(|e| FaustError::Document {
        details: format!("{:?}", e),
    })
}

/// Parse a file for querying
pub fn load_document(path: &Path) -> Result<Package> {
    let content = std::fs::read_to_string(path)?;
    parse_document(&content).map_err(|e| match e {
        FaustError::Document { details } => FaustError::Document {
            details: format!("{}: {}", path.display(), details),
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRANSCRIPT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0" xmlns:ge="http://www.tei-c.org/ns/geneticEditions">
  <teiHeader><fileDesc><titleStmt><title>Faust I</title></titleStmt></fileDesc></teiHeader>
  <text>
    <body>
      <l n="354">Habe nun, ach! Philosophie,</l>
      <l n="355">Juristerey und Medicin,</l>
      <ge:document><ge:line>Und leider auch Theologie!</ge:line></ge:document>
    </body>
  </text>
</TEI>"#;

    #[test]
    fn test_registry_bindings() {
        assert_eq!(namespace_uri("tei"), Some("http://www.tei-c.org/ns/1.0"));
        assert_eq!(
            namespace_uri("ge"),
            Some("http://www.tei-c.org/ns/geneticEditions")
        );
        assert_eq!(namespace_uri("f"), Some("http://www.faustedition.net/ns"));
        assert_eq!(namespace_uri("svg"), Some("http://www.w3.org/2000/svg"));
        assert_eq!(
            namespace_uri("exist"),
            Some("http://exist.sourceforge.net/NS/exist")
        );
        assert_eq!(namespace_uri("xsl"), None);
    }

    #[test]
    fn test_prefixed_query() {
        let package = parse_document(TRANSCRIPT).unwrap();

        let count = xpath("count(//tei:l)")
            .unwrap()
            .evaluate_document(&package)
            .unwrap();
        assert_eq!(count.number(), 2.0);

        let title = xpath("string(/tei:TEI/tei:teiHeader//tei:title)")
            .unwrap()
            .evaluate_document(&package)
            .unwrap();
        assert_eq!(title.string(), "Faust I");

        let line = xpath("string(//ge:line)")
            .unwrap()
            .evaluate_document(&package)
            .unwrap();
        assert_eq!(line.string(), "Und leider auch Theologie!");
    }

    #[test]
    fn test_unprefixed_names_do_not_match_namespaced_elements() {
        let package = parse_document(TRANSCRIPT).unwrap();

        let count = xpath("count(//l)")
            .unwrap()
            .evaluate_document(&package)
            .unwrap();
        assert_eq!(count.number(), 0.0);
    }

    #[test]
    fn test_invalid_expression() {
        let result = xpath("//tei:l[");
        assert!(matches!(result, Err(FaustError::XPath { .. })));
    }

    #[test]
    fn test_malformed_document() {
        let result = parse_document("<TEI><text></TEI>");
        assert!(matches!(result, Err(FaustError::Document { .. })));
    }
}
