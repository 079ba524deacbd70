use crate::core::pipeline::ItemOutcome;

/// Notified after each batch item settles. This is the seam the caller hangs
/// progress rendering on; the pipeline itself never touches a UI.
pub trait BatchObserver: Send + Sync {
    fn on_item_complete(&self, completed: usize, total: usize, url: &str, outcome: &ItemOutcome);
}

/// Observer for callers that do not render progress.
pub struct NullObserver;

impl BatchObserver for NullObserver {
    fn on_item_complete(&self, _completed: usize, _total: usize, _url: &str, _outcome: &ItemOutcome) {}
}
