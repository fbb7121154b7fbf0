//! File gateway storage
//!
//! This crate provides the filesystem storage core for the file gateway
//! service. It knows nothing about HTTP; the REST layer sits on top of it.
//!
//! ## Storage model
//!
//! Uploaded files live under a single uploads root, partitioned by the
//! server's date at upload time:
//!
//! ```text
//! uploads/
//! └── 2024/
//!     └── 03/
//!         └── 05/
//!             ├── visitor42-photo.jpg
//!             └── report.pdf
//! ```
//!
//! The filesystem tree is the sole source of truth: there is no database or
//! index, and callers pass the stored path back to read or remove a file.
//! Two uploads that compute the same path on the same day silently overwrite
//! (last-writer-wins); writes go through a temporary file and a rename, so a
//! failed upload never leaves a truncated leaf behind.
//!
//! ## Path handling
//!
//! Client-supplied paths are resolved against the uploads root and confined
//! to it: `..` components and paths resolving outside the root are rejected.
//! Uploaded filenames must be plain leaf names.
//!
//! ## Example Usage
//!
//! ```no_run
//! use gateway_storage::UploadStore;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = UploadStore::new(Path::new("uploads"))?;
//! let stored = store.store("photo.jpg", "image/jpeg", Some("visitor42"), b"...")?;
//! let bytes = store.read(&stored.relative_path)?;
//! # Ok(())
//! # }
//! ```

mod constants;
mod store;
mod validate;

pub use constants::{ALLOWED_FILE_TYPES, DEFAULT_UPLOADS_DIR_NAME, MAX_UPLOAD_BYTES};
pub use store::{StoredFile, UploadStore};

/// Errors that can occur during storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Upload exceeds the configured size limit
    #[error("File is too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    /// Extension or declared content type outside the allow-set
    #[error("Only images, PDF, and Word documents are allowed (jpeg, jpg, png, pdf, doc, docx).")]
    DisallowedType,

    /// Uploaded filename is not a plain leaf name
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    /// Supplied path resolves outside the uploads root
    #[error("Path escapes the uploads root: {0}")]
    OutsideRoot(String),

    /// Target file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
