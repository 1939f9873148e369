use std::fmt;

use crate::config::PagingConfig;
use crate::constants::*;

/// A logical address split into page number and page offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalAddress {
    pub raw: i32,
    /// Arithmetic shift of `raw`, so negative input yields a negative page
    pub page_number: i32,
    pub page_offset: u32,
}

impl LogicalAddress {
    /// Page number as a page table index, if it is one at all
    pub fn page_index(&self) -> Option<usize> {
        usize::try_from(self.page_number).ok()
    }
}

impl fmt::Display for LogicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LA({}) = (page={}, offset={})", self.raw, self.page_number, self.page_offset)
    }
}

/// A physical address assembled from a frame number and a frame offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicalAddress {
    pub raw: usize,
    pub frame_number: usize,
    pub frame_offset: usize,
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PA({}) = (frame={}, offset={})", self.raw, self.frame_number, self.frame_offset)
    }
}

/// Splits and joins addresses for one page size.
///
/// Neither direction validates its input: a logical address past the page
/// table or a frame past physical memory decodes/encodes just the same, and
/// range checks belong to whoever indexes with the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressCodec {
    page_bits: u32,
    offset_mask: u32,
}

impl AddressCodec {
    pub fn new(page_bits: u32) -> Self {
        AddressCodec { page_bits, offset_mask: (1 << page_bits) - 1 }
    }

    pub fn from_config(config: &PagingConfig) -> Self {
        AddressCodec { page_bits: config.page_bits, offset_mask: config.offset_mask() }
    }

    /// page_number = raw >> page_bits, page_offset = raw & (page_size - 1)
    #[inline]
    pub fn decode_logical(&self, raw: i32) -> LogicalAddress {
        LogicalAddress {
            raw,
            page_number: raw >> self.page_bits,
            page_offset: raw as u32 & self.offset_mask,
        }
    }

    /// raw = (frame_number << page_bits) | frame_offset
    ///
    /// `frame_offset` must be below the page size; the translator only ever
    /// passes a logical page offset here, which is masked by construction.
    #[inline]
    pub fn encode_physical(&self, frame_number: usize, frame_offset: usize) -> PhysicalAddress {
        debug_assert!(frame_offset <= self.offset_mask as usize);
        PhysicalAddress {
            raw: (frame_number << self.page_bits) | frame_offset,
            frame_number,
            frame_offset,
        }
    }
}

impl Default for AddressCodec {
    fn default() -> Self {
        Self::new(PAGE_BITS)
    }
}
