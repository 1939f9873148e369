//! Paging geometry and the frame exhaustion policy.
//!
//! A config file is plain TOML with every key optional:
//!
//! ```toml
//! page_bits = 8
//! page_table_size = 256
//! frame_count = 128
//! on_exhaustion = "fail"   # or "wrap"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::constants::*;
use crate::error::{PagerError, Result};

/// What the frame allocator does once every frame has been handed out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExhaustionPolicy {
    /// Stop the run with `FrameExhausted`.
    #[default]
    Fail,
    /// Wrap the frame counter around and overwrite frame 0, 1, ... while
    /// older page table entries keep pointing at them. Reproduces the
    /// 8-bit counter of the original tool.
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagingConfig {
    pub page_bits: u32,
    pub page_table_size: usize,
    pub frame_count: usize,
    pub on_exhaustion: ExhaustionPolicy,
}

impl Default for PagingConfig {
    fn default() -> Self {
        PagingConfig {
            page_bits: PAGE_BITS,
            page_table_size: PAGE_TABLE_SIZE,
            frame_count: FRAME_COUNT,
            on_exhaustion: ExhaustionPolicy::Fail,
        }
    }
}

impl PagingConfig {
    /// Load and validate a config from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            PagerError::InvalidConfig(format!("failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: PagingConfig =
            toml::from_str(content).map_err(|e| PagerError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_bits == 0 || self.page_bits > MAX_PAGE_BITS {
            return Err(PagerError::InvalidConfig(format!(
                "page_bits must be in 1..={}, got {}",
                MAX_PAGE_BITS, self.page_bits
            )));
        }
        if self.page_table_size == 0 {
            return Err(PagerError::InvalidConfig("page_table_size must be positive".into()));
        }
        if self.frame_count == 0 {
            return Err(PagerError::InvalidConfig("frame_count must be positive".into()));
        }

        // Every logical address must be representable as an i32
        let span = (self.page_table_size as u64) << self.page_bits;
        if span > i32::MAX as u64 + 1 {
            return Err(PagerError::InvalidConfig(format!(
                "{} pages of {} bytes exceed the 32-bit logical address space",
                self.page_table_size,
                self.page_size()
            )));
        }

        // Physical addresses are reported as (frame << page_bits) | offset
        let physical_span = (self.frame_count as u64) << self.page_bits;
        if physical_span > u32::MAX as u64 + 1 {
            return Err(PagerError::InvalidConfig(format!(
                "{} frames of {} bytes exceed the 32-bit physical address space",
                self.frame_count,
                self.page_size()
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        1 << self.page_bits
    }

    #[inline]
    pub fn offset_mask(&self) -> u32 {
        (1 << self.page_bits) - 1
    }

    #[inline]
    pub fn physical_memory_size(&self) -> usize {
        self.frame_count * self.page_size()
    }
}
