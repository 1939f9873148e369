use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a paging run.
///
/// Each variant is fatal for the run: the translator never retries and never
/// emits a partial record.
#[derive(Debug, Error)]
pub enum PagerError {
    #[error("unable to open input file {}", .path.display())]
    InputOpen { path: PathBuf, source: io::Error },

    #[error("line {line}: invalid logical address {token:?}")]
    InvalidAddress { line: usize, token: String },

    #[error("unable to open output file {}", .path.display())]
    OutputOpen { path: PathBuf, source: io::Error },

    #[error("failed to write report")]
    OutputWrite(#[from] io::Error),

    #[error("unable to open the backing store {}", .path.display())]
    BackingStoreOpen { path: PathBuf, source: io::Error },

    #[error("failed to load page {page} from the backing store")]
    BackingStore { page: usize, source: io::Error },

    #[error("logical address {raw} decodes to page {page}, outside the page table")]
    PageOutOfRange { raw: i32, page: i64 },

    #[error("no free frame for page {page}: all {capacity} frames are in use")]
    FrameExhausted { page: usize, capacity: usize },

    #[error("invalid paging configuration: {0}")]
    InvalidConfig(String),
}

impl PagerError {
    /// Process exit status for this failure, one per failed resource.
    pub fn exit_code(&self) -> i32 {
        match self {
            PagerError::InputOpen { .. } | PagerError::InvalidAddress { .. } => 1,
            PagerError::OutputOpen { .. } | PagerError::OutputWrite(_) => 2,
            PagerError::BackingStoreOpen { .. } | PagerError::BackingStore { .. } => 3,
            PagerError::PageOutOfRange { .. }
            | PagerError::FrameExhausted { .. }
            | PagerError::InvalidConfig(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, PagerError>;
