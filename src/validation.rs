use crate::media_file::MediaFile;
use std::collections::HashMap;

/// Synchronous per-file gates run before any upload is dispatched. Each gate
/// is independent: one file's rejection never blocks the others.
pub struct UploadValidator;

impl UploadValidator {
    /// Type gate: the file's top-level MIME category must equal the
    /// uploader's allowed type. Files that fail this are not for this
    /// uploader at all and produce neither slot nor error.
    pub fn matches_type_category(file: &MediaFile, allowed_type: &str) -> bool {
        file.type_category() == allowed_type && file.mime_type.contains('/')
    }

    /// User-permission gate: when the site restricts uploads to an explicit
    /// set of MIME types, the file's exact type must be one of them. The
    /// allow-list maps extensions to MIME types; membership is on values.
    pub fn allowed_for_user(
        file: &MediaFile,
        allowed_mime_types: Option<&HashMap<String, String>>,
    ) -> bool {
        match allowed_mime_types {
            Some(allowed) => allowed.values().any(|mime| *mime == file.mime_type),
            None => true,
        }
    }

    /// Size gate: a limit of 0 means "no limit".
    pub fn within_size_limit(file: &MediaFile, max_upload_size: u64) -> bool {
        max_upload_size == 0 || file.size <= max_upload_size
    }
}
