//! Storage-wide constants.

/// Directory name used for the uploads root when none is configured.
pub const DEFAULT_UPLOADS_DIR_NAME: &str = "uploads";

/// Maximum accepted upload size in bytes (2 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 2 * 1024 * 1024;

/// Type tokens accepted for uploads.
///
/// A file is accepted only when its extension is one of these AND its
/// declared content type contains one of them as a substring. The substring
/// check is what lets the long Word MIME types
/// (`application/vnd.openxmlformats-officedocument.wordprocessingml.document`)
/// match `doc`/`docx`.
pub const ALLOWED_FILE_TYPES: [&str; 6] = ["jpeg", "jpg", "png", "pdf", "doc", "docx"];
