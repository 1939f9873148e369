//! Default paging geometry.
//!
//! These are the values a [`PagingConfig`](crate::config::PagingConfig) starts
//! from; every one of them can be overridden at runtime.

pub const PAGE_BITS: u32 = 8;

pub const PAGE_SIZE: usize = 1 << PAGE_BITS;
pub const PAGE_TABLE_SIZE: usize = 256;
pub const FRAME_COUNT: usize = 256;
pub const PHYSICAL_MEMORY_SIZE: usize = FRAME_COUNT * PAGE_SIZE;

// Largest page_bits accepted by config validation
pub const MAX_PAGE_BITS: u32 = 16;

pub const DEFAULT_BACKING_STORE: &str = "BACKING_STORE.bin";
pub const DEFAULT_OUTPUT: &str = "output.txt";
