use super::media_client::{MediaRecord, MediaSaver};
use super::slots::{MediaItem, Slot, SlotBoard};
use crate::errors::UploadError;
use crate::media_file::MediaFile;
use crate::settings::SettingsProvider;
use crate::validation::UploadValidator;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Full-state replace: every invocation carries the entire current compacted
/// list, never a diff.
pub type OnFileChange = Arc<dyn Fn(Vec<MediaItem>) + Send + Sync>;

pub type OnError = Arc<dyn Fn(UploadError) + Send + Sync>;

pub struct UploadOptions {
    /// Top-level MIME category this uploader accepts ("image", "video", ...).
    pub allowed_type: String,
    /// Extra fields forwarded verbatim to the media endpoint.
    pub additional_data: HashMap<String, String>,
    /// Candidate files, in caller order. Slot indices follow this order.
    pub files: Vec<MediaFile>,
    /// Per-call size limit in bytes. `None` falls back to the site setting;
    /// 0 means no limit.
    pub max_upload_size: Option<u64>,
    pub on_error: OnError,
    pub on_file_change: OnFileChange,
}

impl UploadOptions {
    pub fn new(allowed_type: &str, on_file_change: OnFileChange) -> Self {
        Self {
            allowed_type: allowed_type.to_string(),
            additional_data: HashMap::new(),
            files: Vec::new(),
            max_upload_size: None,
            on_error: Arc::new(|_| {}),
            on_file_change,
        }
    }
}

enum SlotEvent {
    Saved { index: usize, record: MediaRecord },
    Failed { index: usize, error: UploadError },
}

/// Temporary preview URL standing in for the file until its save settles.
/// Never revoked by the pipeline; callers that care hold on to the URLs from
/// the emitted placeholders and release them on teardown.
fn preview_url() -> String {
    format!("blob:{}", Uuid::new_v4())
}

/// Orchestrates uploads to the media library: validates each file through
/// the synchronous gates, emits an optimistic placeholder, fans out one save
/// task per file, and reconciles completions back into the ordered list.
pub struct Uploader {
    saver: Arc<dyn MediaSaver>,
    settings: Arc<dyn SettingsProvider>,
}

impl Uploader {
    pub fn new(saver: Arc<dyn MediaSaver>, settings: Arc<dyn SettingsProvider>) -> Self {
        Self { saver, settings }
    }

    /// Fire-and-forget: completion is observed only through the callbacks.
    /// Gate rejections and placeholder emissions happen before this returns,
    /// in input order; saves race independently after that and may settle in
    /// any order. Must be called within a Tokio runtime.
    pub fn upload(&self, options: UploadOptions) {
        let UploadOptions {
            allowed_type,
            additional_data,
            files,
            max_upload_size,
            on_error,
            on_file_change,
        } = options;

        if files.is_empty() {
            log::debug!("Upload requested with no files");
            return;
        }

        let max_upload_size =
            max_upload_size.unwrap_or_else(|| self.settings.max_upload_size());
        let allowed_mime_types = self.settings.allowed_mime_types();

        let mut board = SlotBoard::new(files.len());
        let mut pending: Vec<(usize, MediaFile)> = Vec::new();

        for (index, file) in files.into_iter().enumerate() {
            if !UploadValidator::matches_type_category(&file, &allowed_type) {
                // Not for this uploader. No slot, no error.
                log::debug!(
                    "Skipping {}: {} is not {}/*",
                    file.name,
                    file.mime_type,
                    allowed_type
                );
                continue;
            }

            if !UploadValidator::allowed_for_user(&file, allowed_mime_types.as_ref()) {
                log::warn!(
                    "Rejecting {}: {} is not in the site allow-list",
                    file.name,
                    file.mime_type
                );
                on_error(UploadError::not_allowed_for_user(file));
                continue;
            }

            if !UploadValidator::within_size_limit(&file, max_upload_size) {
                log::warn!(
                    "Rejecting {}: {} bytes exceeds the {} byte limit",
                    file.name,
                    file.size,
                    max_upload_size
                );
                on_error(UploadError::size_above_limit(file));
                continue;
            }

            board.set(index, Slot::Placeholder(preview_url()));
            on_file_change(board.compact());
            pending.push((index, file));
        }

        if pending.is_empty() {
            return;
        }

        log::info!("Dispatching {} media saves", pending.len());

        let (tx, rx) = mpsc::unbounded_channel();

        for (index, file) in pending {
            let tx = tx.clone();
            let saver = Arc::clone(&self.saver);
            let additional_data = additional_data.clone();

            tokio::spawn(async move {
                let event = match saver.save_media(&file, &additional_data).await {
                    Ok(record) => {
                        log::debug!("Saved {} as media item {}", file.name, record.id);
                        SlotEvent::Saved { index, record }
                    }
                    Err(e) => {
                        let class = if e.is_transient() {
                            "transient"
                        } else {
                            "permanent"
                        };
                        log::warn!("Save of {} failed ({}): {}", file.name, class, e);
                        SlotEvent::Failed {
                            index,
                            error: UploadError::general(file),
                        }
                    }
                };

                if tx.send(event).is_err() {
                    log::error!("Aggregator dropped before slot {} settled", index);
                }
            });
        }

        drop(tx);
        tokio::spawn(run_aggregator(board, rx, on_file_change, on_error));
    }
}

/// Sole writer of the slot board once saves are in flight. Applies each slot
/// event, re-emits the recompacted list, and for failures reports the error
/// after the state change so UI state and error reporting both fire, in that
/// order. Exits when every saver task has settled.
async fn run_aggregator(
    mut board: SlotBoard,
    mut rx: mpsc::UnboundedReceiver<SlotEvent>,
    on_file_change: OnFileChange,
    on_error: OnError,
) {
    let mut saved = 0usize;
    let mut failed = 0usize;

    while let Some(event) = rx.recv().await {
        match event {
            SlotEvent::Saved { index, record } => {
                board.set(index, Slot::Saved(record));
                saved += 1;
                on_file_change(board.compact());
            }
            SlotEvent::Failed { index, error } => {
                board.set(index, Slot::Failed);
                failed += 1;
                on_file_change(board.compact());
                on_error(error);
            }
        }
    }

    log::info!("All saves settled: {} saved, {} failed", saved, failed);
}
