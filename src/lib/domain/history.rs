//! History of send attempts.

mod record;
mod repository;
mod service;

pub mod errors;

pub use record::{HistoryEntry, HistoryRecord, SendStatus, PREVIEW_LENGTH};
pub use repository::HistoryRepository;
pub use service::{HistoryService, HistoryServiceImpl, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
