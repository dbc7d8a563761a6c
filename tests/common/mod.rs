#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SCHEMA: &str = "http://www.faustedition.net/xml/schema/faust-tei.rng";

pub const TEI_TRANSCRIPT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<?oxygen RNGSchema="outdated.rng" type="xml"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0" xmlns:ge="http://www.tei-c.org/ns/geneticEditions">
  <teiHeader><fileDesc><titleStmt><title>Faust I, Studierzimmer</title></titleStmt></fileDesc></teiHeader>
  <text><body>
    <l n="354">Habe nun, ach! Philosophie,</l>
    <l n="355">Juristerey und Medicin,</l>
    <l n="356">Und leider auch Theologie!</l>
  </body></text>
</TEI>"#;

pub const ARCHIVE_DESCRIPTION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<archives xmlns="http://www.faustedition.net/ns"><archive id="gsa"/></archives>"#;

/// A temporary edition: XML sources plus `faust.ini` / `local.ini`
pub struct TestEdition {
    pub dir: TempDir,
}

impl TestEdition {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let xml = dir.path().join("xml");

        fs::create_dir_all(xml.join("transcript/gsa")).unwrap();
        fs::create_dir_all(xml.join("document")).unwrap();
        fs::create_dir_all(xml.join("archives")).unwrap();

        fs::write(xml.join("transcript/gsa/390781.xml"), TEI_TRANSCRIPT).unwrap();
        fs::write(xml.join("transcript/gsa/390782.xml"), TEI_TRANSCRIPT).unwrap();
        fs::write(xml.join("archives/archives.xml"), ARCHIVE_DESCRIPTION).unwrap();
        fs::write(xml.join("document/readme.txt"), "not a document").unwrap();

        fs::write(
            dir.path().join("faust.ini"),
            format!(
                "[xml]\ndir = {}\n\n[mail]\nenabled = yes\n\n[validate]\nschema = {}\n",
                xml.display(),
                SCHEMA
            ),
        )
        .unwrap();
        fs::write(dir.path().join("local.ini"), "[mail]\nenabled = no\n").unwrap();

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn xml_dir(&self) -> PathBuf {
        self.dir.path().join("xml")
    }

    pub fn primary_config(&self) -> PathBuf {
        self.dir.path().join("faust.ini")
    }

    pub fn local_config(&self) -> PathBuf {
        self.dir.path().join("local.ini")
    }
}
