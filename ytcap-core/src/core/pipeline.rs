use std::path::Path;
use std::sync::Arc;

use crate::core::events::BatchObserver;
use crate::core::filename::caption_filename;
use crate::core::url_parser::extract_video_id;
use crate::error::{BatchError, ItemError};
use crate::models::captions;
use crate::models::history::HistoryRecord;
use crate::platforms::traits::{CaptionProvider, MetadataProvider};
use crate::storage::history::HistoryStore;

/// Terminal state of one batch item.
#[derive(Debug)]
pub enum ItemOutcome {
    Saved { video_id: String, filename: String },
    Skipped { video_id: String },
    Failed { error: ItemError },
}

/// Outcome of one batch run. `errors` carries one human-readable line per
/// skipped or failed item; `processed` counts every non-blank input line.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub errors: Vec<String>,
    pub processed: usize,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Pipeline {
    metadata: Arc<dyn MetadataProvider>,
    captions: Arc<dyn CaptionProvider>,
}

impl Pipeline {
    pub fn new(metadata: Arc<dyn MetadataProvider>, captions: Arc<dyn CaptionProvider>) -> Self {
        Self { metadata, captions }
    }

    /// Runs one URL through resolve, dedup, fetch, sanitize, write, record.
    /// Never panics and never aborts the batch; any failure settles as
    /// `ItemOutcome::Failed`. History gains an entry only after the caption
    /// file is on disk.
    async fn process_url(
        &self,
        url: &str,
        history: &mut HistoryStore,
        save_dir: &Path,
    ) -> ItemOutcome {
        let Some(video_id) = extract_video_id(url) else {
            return ItemOutcome::Failed {
                error: ItemError::InvalidUrl,
            };
        };

        if history.contains(&video_id) {
            return ItemOutcome::Skipped { video_id };
        }

        let title = match self.metadata.fetch_title(url).await {
            Ok(title) => title,
            Err(e) => {
                return ItemOutcome::Failed {
                    error: ItemError::Metadata(e),
                }
            }
        };

        let segments = match self.captions.fetch_captions(&video_id).await {
            Ok(segments) => segments,
            Err(e) => {
                return ItemOutcome::Failed {
                    error: ItemError::Captions(e),
                }
            }
        };

        let text = captions::full_text(&segments);
        let filename = caption_filename(&title, &video_id);
        let path = save_dir.join(&filename);
        if let Err(source) = tokio::fs::write(&path, &text).await {
            return ItemOutcome::Failed {
                error: ItemError::FileWrite { path, source },
            };
        }

        history.insert(
            video_id.clone(),
            HistoryRecord {
                url: url.to_string(),
                title,
                filename: filename.clone(),
            },
        );
        ItemOutcome::Saved { video_id, filename }
    }

    /// Processes a newline-delimited URL list in input order, one item at a
    /// time. The history store is saved exactly once, after the last item.
    pub async fn run_batch(
        &self,
        input: &str,
        history: &mut HistoryStore,
        save_dir: &Path,
        observer: &dyn BatchObserver,
    ) -> Result<BatchReport, BatchError> {
        let urls: Vec<&str> = input
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if urls.is_empty() {
            return Err(BatchError::EmptyInput);
        }

        let total = urls.len();
        let mut report = BatchReport::default();
        for (i, url) in urls.iter().enumerate() {
            let outcome = self.process_url(url, history, save_dir).await;
            match &outcome {
                ItemOutcome::Saved { video_id, filename } => {
                    tracing::debug!("saved captions for {video_id} as {filename}");
                }
                ItemOutcome::Skipped { .. } => {
                    report
                        .errors
                        .push(format!("Skipped {url}: Already processed before"));
                }
                ItemOutcome::Failed { error } => {
                    tracing::warn!("processing {url} failed: {error}");
                    report
                        .errors
                        .push(format!("Error processing {url}: {error}"));
                }
            }
            report.processed += 1;
            observer.on_item_complete(i + 1, total, url, &outcome);
        }

        history.save()?;
        Ok(report)
    }
}
