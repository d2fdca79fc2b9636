// Main uploader module - orchestrates media-library upload functionality
//
// This module coordinates per-file validation, optimistic placeholder state,
// and concurrent saves against the remote media endpoint.

pub mod media_client;
pub mod preload;
pub mod slots;
pub mod upload;

pub use media_client::{MediaClient, MediaRecord, MediaSaver};
pub use preload::ImagePreloader;
pub use slots::{MediaItem, Slot, SlotBoard};
pub use upload::{OnError, OnFileChange, UploadOptions, Uploader};
