pub mod address;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod memory;
pub mod page_table;
pub mod translation;

// Re-export commonly used items for convenience
pub use config::{ExhaustionPolicy, PagingConfig};
pub use constants::*;
pub use error::{PagerError, Result};
pub use translation::{Statistics, TranslationRecord, Translator};
