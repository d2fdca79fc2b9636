//! Client-side uploader for a remote media library.
//!
//! Files move through a per-file pipeline: synchronous validation gates
//! (type category, site allow-list, size limit), an optimistic placeholder
//! emitted to the caller, then a concurrent save against the media endpoint
//! whose outcome is reconciled back into a single ordered result list. All
//! progress and failures are delivered through callbacks; nothing is thrown
//! across the public entry point.

pub mod errors;
pub mod media_file;
pub mod settings;
pub mod uploader;
pub mod validation;

pub use errors::{MediaError, MediaResult, UploadError, UploadErrorCode};
pub use media_file::MediaFile;
pub use settings::{SettingsProvider, SiteSettings};
pub use uploader::{
    ImagePreloader, MediaClient, MediaItem, MediaRecord, MediaSaver, UploadOptions, Uploader,
};
