pub mod core;
pub mod error;
pub mod fs_paths;
pub mod models;
pub mod platforms;
pub mod storage;

pub use crate::core::events::{BatchObserver, NullObserver};
pub use crate::core::pipeline::{BatchReport, ItemOutcome, Pipeline};
pub use crate::error::{BatchError, HistoryError, ItemError};
pub use crate::models::history::HistoryRecord;
pub use crate::storage::history::HistoryStore;
