use std::fmt;
use std::io::{Read, Seek};

use crate::address::{AddressCodec, LogicalAddress, PhysicalAddress};
use crate::config::PagingConfig;
use crate::error::{PagerError, Result};
use crate::memory::{BackingStore, FrameAllocator, PhysicalMemory};
use crate::page_table::{PageTable, PageTableEntry};

/// One reported translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationRecord {
    pub logical_raw: i32,
    pub physical_raw: usize,
    pub value: i8,
}

impl fmt::Display for TranslationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Virtual address: {} Physical address: {} Value: {}",
            self.logical_raw, self.physical_raw, self.value
        )
    }
}

/// Whether the page was already resident
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Hit,
    Fault,
}

/// Full outcome of translating one address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub logical: LogicalAddress,
    pub physical: PhysicalAddress,
    pub access: Access,
    pub value: i8,
}

impl Translation {
    pub fn record(&self) -> TranslationRecord {
        TranslationRecord {
            logical_raw: self.logical.raw,
            physical_raw: self.physical.raw,
            value: self.value,
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub fault_count: usize,
    pub address_count: usize,
}

impl Statistics {
    /// Faults per translated address, `None` before the first address
    pub fn fault_rate(&self) -> Option<f64> {
        if self.address_count == 0 {
            None
        } else {
            Some(self.fault_count as f64 / self.address_count as f64)
        }
    }
}

/// Demand-paging address translator.
///
/// Owns the page table, the frame allocator and physical memory for the whole
/// run. Each address is resolved in two states:
///
/// - **Hit**: the page table already maps the page; read through the frame.
/// - **Fault**: take the next frame, load the page from the backing store into
///   it, map it, then read through the frame as for a hit.
///
/// A fault either installs the mapping or fails the whole run; there is no
/// partial fault and no retry.
pub struct Translator<R> {
    codec: AddressCodec,
    page_table: PageTable,
    frames: FrameAllocator,
    memory: PhysicalMemory,
    store: BackingStore<R>,
    address_count: usize,
}

impl<R: Read + Seek> Translator<R> {
    /// Build a translator over `store`, whose pages must match the configured page size
    pub fn new(config: &PagingConfig, store: BackingStore<R>) -> Result<Self> {
        if store.page_size() != config.page_size() {
            return Err(PagerError::InvalidConfig(format!(
                "backing store pages are {} bytes, paging geometry expects {}",
                store.page_size(),
                config.page_size()
            )));
        }

        Ok(Translator {
            codec: AddressCodec::from_config(config),
            page_table: PageTable::new(config.page_table_size),
            frames: FrameAllocator::from_config(config),
            memory: PhysicalMemory::from_config(config),
            store,
            address_count: 0,
        })
    }

    /// Translate one logical address, faulting its page in if needed
    pub fn translate(&mut self, raw: i32) -> Result<Translation> {
        // Step 1: Split into page number and offset
        let logical = self.codec.decode_logical(raw);
        let page_number = logical
            .page_index()
            .filter(|&page| page < self.page_table.len())
            .ok_or(PagerError::PageOutOfRange { raw, page: logical.page_number as i64 })?;

        // Step 2: Look the page up, loading it on a miss
        let (frame_number, access) = match self.page_table.lookup(page_number) {
            Some(PageTableEntry::Mapped(frame)) => (frame, Access::Hit),
            _ => (self.handle_fault(page_number)?, Access::Fault),
        };

        // Step 3: Rebuild the physical address and read through it
        let frame_offset = logical.page_offset as usize;
        let physical = self.codec.encode_physical(frame_number, frame_offset);
        let value = self.memory.read_byte(frame_number, frame_offset);

        self.address_count += 1;

        log::debug!("{} -> {} value={} ({:?})", logical, physical, value, access);

        Ok(Translation { logical, physical, access, value })
    }

    /// Translate every address in order, stopping at the first fatal error
    pub fn translate_all<I>(&mut self, addresses: I) -> Result<Vec<TranslationRecord>>
    where
        I: IntoIterator<Item = i32>,
    {
        let addresses = addresses.into_iter();
        let mut records = Vec::with_capacity(addresses.size_hint().0);
        for raw in addresses {
            records.push(self.translate(raw)?.record());
        }
        Ok(records)
    }

    fn handle_fault(&mut self, page_number: usize) -> Result<usize> {
        self.page_table.record_fault();

        let frame_number = self.frames.allocate().ok_or(PagerError::FrameExhausted {
            page: page_number,
            capacity: self.frames.capacity(),
        })?;

        let bytes = self.store.read_page(page_number)?;
        self.memory.load_page(frame_number, &bytes);
        self.page_table.install(page_number, frame_number);

        log::debug!("page fault: page {} loaded into frame {}", page_number, frame_number);

        Ok(frame_number)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            fault_count: self.page_table.fault_count(),
            address_count: self.address_count,
        }
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frames(&self) -> &FrameAllocator {
        &self.frames
    }
}
