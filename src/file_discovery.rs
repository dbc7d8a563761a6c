use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::paths::XmlRoot;

/// Suffix of the edition's XML documents
pub const XML_SUFFIX: &str = ".xml";

/// Recursive discovery of XML documents below the edition's root directory
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// Directory to walk
    root: PathBuf,
    /// File name suffix to include (e.g. ".xml")
    suffix: String,
    /// Follow symbolic links
    follow_symlinks: bool,
}

impl FileDiscovery {
    /// Create a new FileDiscovery instance for the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: XML_SUFFIX.to_string(),
            follow_symlinks: false,
        }
    }

    /// Discovery over the configured XML root
    pub fn for_root(root: &XmlRoot) -> Self {
        Self::new(root.as_str())
    }

    /// Set the file name suffix to discover
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Paths of all matching files, sorted lexicographically.
    ///
    /// Entries that cannot be read (including unreadable directories) are
    /// skipped without being reported to the caller.
    pub fn xml_files(&self) -> Vec<String> {
        let mut files: Vec<String> = WalkDir::new(&self.root)
            .follow_links(self.follow_symlinks)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| !entry.file_type().is_dir() && entry.path().is_file())
            .filter(|entry| self.should_process(entry.path()))
            .filter_map(|entry| match entry.path().to_str() {
                Some(path) => Some(path.to_string()),
                None => {
                    warn!("Skipping non UTF-8 path {}", entry.path().display());
                    None
                }
            })
            .collect();

        files.sort();
        debug!(
            "Discovered {} files ending in {} below {}",
            files.len(),
            self.suffix,
            self.root.display()
        );
        files
    }

    /// Check if a file should be processed based on its name
    pub fn should_process(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.ends_with(&self.suffix))
    }
}
