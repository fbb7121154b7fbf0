//! Date-partitioned upload store implementation.
//!
//! [`UploadStore`] owns a single uploads root and provides the three
//! filesystem operations the gateway needs: store, read, remove.
//!
//! # Path resolution
//!
//! Stored paths are reported relative to the root's parent directory, so a
//! root named `uploads` yields paths like `uploads/2024/03/05/photo.jpg` —
//! the same string a caller later passes back to read or remove the file.
//! Absolute paths (the `full_path` from a store result) are accepted too.
//! Either way the resolved path must stay inside the root.
//!
//! # Atomicity
//!
//! - Writes land in a [`tempfile::NamedTempFile`] in the destination
//!   directory and are renamed over the final path, so readers never observe
//!   a partially written file and failed writes leave nothing behind.
//! - Read and remove are attempted directly and a `NotFound` I/O error is
//!   classified as [`StorageError::NotFound`]; there is no separate existence
//!   check to race against.

use crate::validate::{validate_file_type, validate_leaf_name};
use crate::{StorageError, StorageResult, DEFAULT_UPLOADS_DIR_NAME, MAX_UPLOAD_BYTES};
use chrono::{DateTime, Datelike, Local, Utc};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Metadata for a successfully stored file
///
/// Returned by [`UploadStore::store`] and serialised into the upload
/// response. `relative_path` is the string clients pass back to download or
/// delete the file; `full_path` is the absolute location on the server.
#[derive(Debug, Clone, serde::Serialize, PartialEq, Eq)]
pub struct StoredFile {
    /// Original filename as supplied by the client
    pub file_name: String,

    /// Leaf name on disk (`<visitorId>-<file_name>` when a visitor id was given)
    pub stored_name: String,

    /// Path relative to the uploads root's parent, e.g. `uploads/2024/03/05/photo.jpg`
    pub relative_path: String,

    /// Absolute resolved path on the server's filesystem
    pub full_path: PathBuf,

    /// Size of the stored file in bytes
    pub size_bytes: u64,

    /// Visitor identifier, when the upload supplied one
    pub visitor_id: Option<String>,

    /// UTC timestamp when the file was stored
    pub stored_at: DateTime<Utc>,
}

/// Store for uploaded files under a date-partitioned directory tree
///
/// The store is bound to one uploads root. The root is created if missing and
/// canonicalised at construction, so no path work happens lazily during
/// request handling.
#[derive(Debug)]
pub struct UploadStore {
    /// Canonical absolute uploads root
    root: PathBuf,

    /// Directory that relative client paths are resolved against (root's parent)
    base: PathBuf,

    /// Leaf name of the root, used when reporting relative paths
    dir_name: String,
}

impl UploadStore {
    /// Creates a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the root cannot be created or
    /// canonicalised.
    pub fn new(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root).map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create uploads root {}: {}", root.display(), e),
            ))
        })?;

        let root = root.canonicalize().map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!("Cannot canonicalize uploads root {}: {}", root.display(), e),
            ))
        })?;

        let base = root.parent().unwrap_or(&root).to_path_buf();
        let dir_name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(DEFAULT_UPLOADS_DIR_NAME)
            .to_string();

        Ok(Self {
            root,
            base,
            dir_name,
        })
    }

    /// Validates and persists an upload.
    ///
    /// Validation happens before any byte touches the disk: the filename must
    /// be a plain leaf name, the payload must be at most
    /// [`MAX_UPLOAD_BYTES`], and both the extension and the declared content
    /// type must match the allow-set.
    ///
    /// The destination directory is `<root>/<YYYY>/<MM>/<DD>` from the
    /// server's current local date; missing directories are created. The leaf
    /// is `<visitor_id>-<file_name>` when a visitor id is present. An
    /// existing file at the same path is silently overwritten.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if:
    /// - The filename is not a plain leaf name
    /// - The payload exceeds the size limit
    /// - The extension or declared content type is outside the allow-set
    /// - Directory creation or the write itself fails (I/O)
    pub fn store(
        &self,
        file_name: &str,
        content_type: &str,
        visitor_id: Option<&str>,
        bytes: &[u8],
    ) -> StorageResult<StoredFile> {
        validate_leaf_name(file_name)?;

        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(StorageError::TooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        validate_file_type(file_name, content_type)?;

        let now = Local::now();
        let (year, month, day) = (now.year(), now.month(), now.day());
        let partition = self
            .root
            .join(format!("{year:04}"))
            .join(format!("{month:02}"))
            .join(format!("{day:02}"));

        fs::create_dir_all(&partition).map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create storage directory {}: {}",
                    partition.display(),
                    e
                ),
            ))
        })?;

        let stored_name = match visitor_id {
            Some(visitor) => format!("{visitor}-{file_name}"),
            None => file_name.to_string(),
        };
        let full_path = partition.join(&stored_name);

        // Temp file + rename keeps the final path all-or-nothing; the temp
        // file is removed on drop if persist never runs.
        let mut tmp = NamedTempFile::new_in(&partition)?;
        tmp.write_all(bytes)?;
        tmp.persist(&full_path).map_err(|e| {
            StorageError::Io(std::io::Error::new(
                e.error.kind(),
                format!("Failed to write file to {}: {}", full_path.display(), e.error),
            ))
        })?;

        let relative_path = format!(
            "{}/{year:04}/{month:02}/{day:02}/{stored_name}",
            self.dir_name
        );

        Ok(StoredFile {
            file_name: file_name.to_string(),
            stored_name,
            relative_path,
            full_path,
            size_bytes: size,
            visitor_id: visitor_id.map(str::to_string),
            stored_at: Utc::now(),
        })
    }

    /// Reads a stored file back as bytes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if:
    /// - The path has `..` components or resolves outside the uploads root
    /// - The file does not exist (`NotFound`)
    /// - The read fails (I/O)
    pub fn read(&self, file_path: &str) -> StorageResult<Vec<u8>> {
        let resolved = self.resolve(file_path)?;

        fs::read(&resolved).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(file_path.to_string()),
            kind => StorageError::Io(std::io::Error::new(
                kind,
                format!("Failed to read file from {}: {}", resolved.display(), e),
            )),
        })
    }

    /// Permanently removes a stored file.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if:
    /// - The path has `..` components or resolves outside the uploads root
    /// - The file does not exist (`NotFound`)
    /// - The removal fails (I/O)
    pub fn remove(&self, file_path: &str) -> StorageResult<()> {
        let resolved = self.resolve(file_path)?;

        fs::remove_file(&resolved).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StorageError::NotFound(file_path.to_string()),
            kind => StorageError::Io(std::io::Error::new(
                kind,
                format!("Failed to remove file {}: {}", resolved.display(), e),
            )),
        })
    }

    /// Resolves a client-supplied path and confines it to the uploads root.
    ///
    /// Relative paths (as reported in `StoredFile::relative_path`) resolve
    /// against the root's parent; absolute paths are taken as-is. Paths with
    /// `..` components or resolving outside the root are rejected.
    fn resolve(&self, raw: &str) -> StorageResult<PathBuf> {
        if raw.is_empty() {
            return Err(StorageError::OutsideRoot(raw.to_string()));
        }

        let candidate = Path::new(raw);
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StorageError::OutsideRoot(raw.to_string()));
        }

        let resolved = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.base.join(candidate)
        };

        if !resolved.starts_with(&self.root) {
            return Err(StorageError::OutsideRoot(raw.to_string()));
        }

        Ok(resolved)
    }

    /// Returns the canonical uploads root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}
