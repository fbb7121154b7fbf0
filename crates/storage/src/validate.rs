//! Upload validation rules.

use crate::constants::ALLOWED_FILE_TYPES;
use crate::{StorageError, StorageResult};
use std::ffi::OsStr;
use std::path::{Component, Path};

/// Validates that an uploaded filename is a plain leaf name.
///
/// Client filenames are untrusted: a name like `../../etc/cron.d/job` would
/// otherwise be joined straight into the storage path. Names containing
/// separators or `..` are rejected rather than stripped.
pub(crate) fn validate_leaf_name(name: &str) -> StorageResult<()> {
    if name.is_empty() || name.contains('\\') {
        return Err(StorageError::InvalidFileName(name.to_string()));
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(StorageError::InvalidFileName(name.to_string())),
    }
}

/// Checks an upload against the type allow-set.
///
/// Both checks must pass: the filename extension must be in
/// [`ALLOWED_FILE_TYPES`], and the declared content type must contain one of
/// the tokens as a substring.
pub(crate) fn validate_file_type(file_name: &str, content_type: &str) -> StorageResult<()> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(OsStr::to_str)
        .map(|e| e.to_ascii_lowercase());

    let extension_ok = match extension.as_deref() {
        Some(ext) => ALLOWED_FILE_TYPES.contains(&ext),
        None => false,
    };

    let mime = content_type.to_ascii_lowercase();
    let mime_ok = ALLOWED_FILE_TYPES.iter().any(|token| mime.contains(token));

    if extension_ok && mime_ok {
        Ok(())
    } else {
        Err(StorageError::DisallowedType)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name_plain() {
        assert!(validate_leaf_name("photo.jpg").is_ok());
        assert!(validate_leaf_name("visitor42-photo.jpg").is_ok());
        assert!(validate_leaf_name("report with spaces.pdf").is_ok());
    }

    #[test]
    fn test_leaf_name_traversal_rejected() {
        for name in ["../photo.jpg", "a/b.jpg", "/etc/passwd", "..", "", "a\\b.jpg"] {
            assert!(
                matches!(validate_leaf_name(name), Err(StorageError::InvalidFileName(_))),
                "expected rejection for {name:?}"
            );
        }
    }

    #[test]
    fn test_file_type_allowed() {
        assert!(validate_file_type("photo.jpg", "image/jpeg").is_ok());
        assert!(validate_file_type("photo.JPG", "image/jpeg").is_ok());
        assert!(validate_file_type("scan.png", "image/png").is_ok());
        assert!(validate_file_type("report.pdf", "application/pdf").is_ok());
        assert!(validate_file_type(
            "letter.docx",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        )
        .is_ok());
        assert!(validate_file_type(
            "letter.doc",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        )
        .is_ok());
    }

    #[test]
    fn test_file_type_both_checks_required() {
        // Good extension, bad content type
        assert!(matches!(
            validate_file_type("photo.jpg", "application/x-executable"),
            Err(StorageError::DisallowedType)
        ));
        // Bad extension, good content type
        assert!(matches!(
            validate_file_type("payload.exe", "image/jpeg"),
            Err(StorageError::DisallowedType)
        ));
        // No extension at all
        assert!(matches!(
            validate_file_type("README", "image/png"),
            Err(StorageError::DisallowedType)
        ));
        // Legacy Word MIME carries none of the allow-tokens
        assert!(matches!(
            validate_file_type("letter.doc", "application/msword"),
            Err(StorageError::DisallowedType)
        ));
    }
}
