use async_trait::async_trait;

use crate::models::captions::CaptionSegment;

/// Source of video titles, keyed by the URL the user submitted.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_title(&self, url: &str) -> anyhow::Result<String>;
}

/// Source of caption tracks, keyed by resolved video id.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    async fn fetch_captions(&self, video_id: &str) -> anyhow::Result<Vec<CaptionSegment>>;
}
