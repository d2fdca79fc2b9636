use anyhow::{bail, Context, Result};
use media_uploader::{
    MediaClient, MediaFile, MediaItem, SiteSettings, UploadError, UploadOptions, Uploader,
};
use std::sync::Arc;
use tokio::sync::mpsc;

enum UploadEvent {
    Changed(Vec<MediaItem>),
    Errored(UploadError),
}

fn saved_count(items: &[MediaItem]) -> usize {
    items
        .iter()
        .filter(|item| matches!(item, MediaItem::Saved(_)))
        .count()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let (base_url, allowed_type) = match (args.next(), args.next()) {
        (Some(base_url), Some(allowed_type)) => (base_url, allowed_type),
        _ => bail!("usage: media-uploader <base-url> <allowed-type> <file>..."),
    };
    let paths: Vec<String> = args.collect();
    if paths.is_empty() {
        bail!("usage: media-uploader <base-url> <allowed-type> <file>...");
    }

    let mut files = Vec::new();
    for path in &paths {
        let file = MediaFile::from_path(path)
            .await
            .with_context(|| format!("Failed to read {}", path))?;
        files.push(file);
    }

    // Files the type gate excludes never produce a callback, so completion
    // is counted against the files that can actually settle.
    let category_prefix = format!("{}/", allowed_type);
    let expected = files
        .iter()
        .filter(|f| f.mime_type.starts_with(&category_prefix))
        .count();

    let settings = Arc::new(SiteSettings::load().context("Failed to load site settings")?);
    let client = Arc::new(MediaClient::new(&base_url).context("Failed to build media client")?);
    let uploader = Uploader::new(client, settings);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let change_tx = tx.clone();

    let mut options = UploadOptions::new(
        &allowed_type,
        Arc::new(move |items| {
            let _ = change_tx.send(UploadEvent::Changed(items));
        }),
    );
    options.on_error = Arc::new(move |err| {
        let _ = tx.send(UploadEvent::Errored(err));
    });
    options.files = files;

    log::info!("Uploading {} file(s) to {}", paths.len(), base_url);
    uploader.upload(options);

    let mut errors = 0usize;
    let mut current: Vec<MediaItem> = Vec::new();

    while saved_count(&current) + errors < expected {
        let Some(event) = rx.recv().await else { break };
        match event {
            UploadEvent::Changed(items) => {
                println!("{}", serde_json::to_string(&items)?);
                current = items;
            }
            UploadEvent::Errored(err) => {
                errors += 1;
                eprintln!("{:?}: {}", err.code, err.message);
            }
        }
    }

    log::info!(
        "Done: {} saved, {} failed out of {} eligible",
        saved_count(&current),
        errors,
        expected
    );

    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
