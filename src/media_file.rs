use crate::errors::MediaResult;
use regex::Regex;
use std::path::Path;

/// A local media file selected for upload. The caller supplies it and the
/// pipeline never mutates it; `size` is carried separately from `contents`
/// so callers can describe files without materializing their bytes.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub contents: Vec<u8>,
}

impl MediaFile {
    pub fn from_bytes(name: &str, mime_type: &str, contents: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: contents.len() as u64,
            contents,
        }
    }

    /// Read a file from disk, detecting the MIME type from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> MediaResult<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let mime_type = path
            .extension()
            .and_then(|e| e.to_str())
            .map(mime_type_for_extension)
            .unwrap_or("application/octet-stream");

        Ok(Self::from_bytes(&name, mime_type, contents))
    }

    /// Top-level MIME category ("image" for "image/jpeg").
    pub fn type_category(&self) -> &str {
        self.mime_type.split('/').next().unwrap_or("")
    }

    /// MIME subtype ("jpeg" for "image/jpeg").
    pub fn subtype(&self) -> &str {
        self.mime_type.split('/').nth(1).unwrap_or("")
    }

    /// Filename to present to the media endpoint: the sanitized name, or a
    /// name synthesized from the MIME type when the file has none.
    pub fn upload_filename(&self) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            let subtype = self.subtype();
            if subtype.is_empty() {
                "unnamed".to_string()
            } else {
                format!("unnamed.{}", subtype)
            }
        } else {
            sanitize_filename(trimmed)
        }
    }
}

/// Detect MIME type from a file extension, lowercased.
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Remove or replace unsafe characters in filenames
pub fn sanitize_filename(filename: &str) -> String {
    let unsafe_chars = Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).unwrap();
    let sanitized = unsafe_chars.replace_all(filename.trim(), "_");

    // Limit length, backing off to a char boundary so multibyte names
    // cannot panic the saver task mid-upload
    if sanitized.len() > 255 {
        let mut cut = 252;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &sanitized[..cut])
    } else {
        sanitized.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_derives_size() {
        let file = MediaFile::from_bytes("a.png", "image/png", vec![0; 42]);
        assert_eq!(file.size, 42);
        assert_eq!(file.type_category(), "image");
        assert_eq!(file.subtype(), "png");
    }

    #[test]
    fn extension_detection_covers_common_media() {
        assert_eq!(mime_type_for_extension("JPG"), "image/jpeg");
        assert_eq!(mime_type_for_extension("webp"), "image/webp");
        assert_eq!(mime_type_for_extension("mp4"), "video/mp4");
        assert_eq!(mime_type_for_extension("xyz"), "application/octet-stream");
    }

    #[test]
    fn upload_filename_synthesizes_from_mime_when_unnamed() {
        let file = MediaFile::from_bytes("", "image/png", vec![]);
        assert_eq!(file.upload_filename(), "unnamed.png");

        let no_subtype = MediaFile::from_bytes("  ", "weird", vec![]);
        assert_eq!(no_subtype.upload_filename(), "unnamed");
    }

    #[test]
    fn upload_filename_sanitizes_unsafe_characters() {
        let file = MediaFile::from_bytes("shot<1>:\"two\".png", "image/png", vec![]);
        let name = file.upload_filename();
        assert!(!name.contains('<'));
        assert!(!name.contains(':'));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn long_multibyte_names_truncate_on_char_boundaries() {
        let long = format!("a{}.png", "é".repeat(130));
        assert!(long.len() > 255);

        let truncated = sanitize_filename(&long);
        assert!(truncated.len() <= 255);
        assert!(truncated.ends_with("..."));

        let file = MediaFile::from_bytes(&long, "image/png", vec![]);
        assert!(file.upload_filename().len() <= 255);
    }

    #[test]
    fn category_of_malformed_mime_is_whole_string() {
        let file = MediaFile::from_bytes("x", "notamime", vec![]);
        assert_eq!(file.type_category(), "notamime");
        assert_eq!(file.subtype(), "");
    }
}
