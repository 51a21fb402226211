//! File system walker with ignore-list filtering.
//!
//! Traverses directory trees lazily, depth-first, skipping system
//! and VCS entries, hidden entries, scratch-file suffixes, and empty
//! files. Handles errors gracefully (permission denied, vanished
//! entries) without ending the walk.

use glob::Pattern;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{FiledexError, Result};

/// Base names never indexed, whether file or directory
pub const IGNORED_NAMES: &[&str] = &[
    "node_modules",
    "__pycache__",
    ".git",
    ".svn",
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "$Recycle.Bin",
    "System Volume Information",
    "Program Files",
    "Program Files (x86)",
    "Windows",
    "AppData",
    "Local Settings",
    "Recovery",
    "PerfLogs",
    "Temp",
    "Tmp",
    "cache",
    "Cache",
    "__MACOSX",
    ".Spotlight-V100",
    ".Trashes",
    "ehthumbs.db",
    "pagefile.sys",
    "hiberfil.sys",
    "swapfile.sys",
    ".gitignore",
    ".gitattributes",
    "index.html",
    "$RECYCLE.BIN",
    ".env",
    ".dockerignore",
];

static IGNORED_NAME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| IGNORED_NAMES.iter().copied().collect());

/// Lowercase file name suffixes never indexed
pub const IGNORED_SUFFIXES: &[&str] = &[
    ".aof",
    ".incr.aof",
    ".tmp",
    ".dmp",
    ".log",
    ".dump",
    ".txt~",
    ".lnk",
    ".bak",
    ".swp",
    ".env.development",
    ".env.production",
];

/// File system walker
pub struct FileWalker {
    /// Extra patterns to exclude (e.g., "**/scratch/**")
    exclude_patterns: Vec<Pattern>,
}

impl FileWalker {
    /// Create a walker with additional glob exclusions
    ///
    /// # Returns
    ///
    /// An error if any pattern is not a valid glob
    pub fn new(exclude_patterns: Vec<String>) -> Result<Self> {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    FiledexError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            exclude_patterns: exclude,
        })
    }

    /// Lazily yield every indexable regular file under `root`
    ///
    /// Depth-first. Not resumable: a new call starts over.
    pub fn walk<'a>(&'a self, root: &'a Path) -> impl Iterator<Item = PathBuf> + 'a {
        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |e| self.should_process_entry(e, root))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.accept_file(&entry),
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    None
                }
            })
    }

    /// Convenience for tests and small trees
    pub fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        self.walk(root).collect()
    }

    /// Decide whether to descend into / consider an entry
    ///
    /// Never filters the root directory itself.
    fn should_process_entry(&self, entry: &DirEntry, root: &Path) -> bool {
        let path = entry.path();
        if path == root {
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        if IGNORED_NAME_SET.contains(name.as_ref()) {
            tracing::debug!("Skipping ignored entry: {:?}", path);
            return false;
        }

        if is_hidden(entry, &name) {
            return false;
        }

        if self.is_excluded(path) {
            tracing::debug!("Skipping excluded entry: {:?}", path);
            return false;
        }

        true
    }

    fn accept_file(&self, entry: &DirEntry) -> Option<PathBuf> {
        // Symlinks report their own type when links are not followed
        if !entry.file_type().is_file() {
            return None;
        }

        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_lowercase();
        if has_ignored_suffix(&name) {
            tracing::debug!("Skipping ignored extension: {:?}", path);
            return None;
        }

        match entry.metadata() {
            Ok(metadata) if metadata.len() == 0 => {
                tracing::debug!("Skipping empty file: {:?}", path);
                None
            }
            Ok(_) => Some(path.to_path_buf()),
            Err(e) => {
                tracing::warn!("Cannot stat {:?}: {}", path, e);
                None
            }
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let path_str = match path.to_str() {
            Some(s) => s,
            None => return false,
        };

        self.exclude_patterns
            .iter()
            .any(|p| p.matches(path_str) || p.matches_path(path))
    }
}

fn has_ignored_suffix(lowercase_name: &str) -> bool {
    IGNORED_SUFFIXES
        .iter()
        .any(|suffix| lowercase_name.ends_with(suffix))
}

#[cfg(not(windows))]
fn is_hidden(_entry: &DirEntry, name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(windows)]
fn is_hidden(entry: &DirEntry, name: &str) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    if name.starts_with('.') {
        return true;
    }

    name.starts_with('$')
        && entry
            .metadata()
            .map(|m| m.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
            .unwrap_or(false)
}
