/// One page table slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageTableEntry {
    #[default]
    Unmapped,
    Mapped(usize),
}

impl PageTableEntry {
    pub fn frame(&self) -> Option<usize> {
        match *self {
            PageTableEntry::Mapped(frame) => Some(frame),
            PageTableEntry::Unmapped => None,
        }
    }
}

/// Single-level page table: page number -> frame number.
///
/// Entries go from `Unmapped` to `Mapped` once and stay there. The table also
/// keeps the run's page fault count, which only the translator bumps.
#[derive(Debug, Clone)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
    fault_count: usize,
}

impl PageTable {
    /// Create a table of `size` entries, all unmapped
    pub fn new(size: usize) -> Self {
        PageTable { entries: vec![PageTableEntry::Unmapped; size], fault_count: 0 }
    }

    /// Look up a page. Pages outside the table are reported as `None`.
    #[inline]
    pub fn lookup(&self, page_number: usize) -> Option<PageTableEntry> {
        self.entries.get(page_number).copied()
    }

    /// Map a page to a frame.
    ///
    /// # Panics
    /// If `page_number` is outside the table.
    pub fn install(&mut self, page_number: usize, frame_number: usize) {
        debug_assert_eq!(
            self.entries[page_number],
            PageTableEntry::Unmapped,
            "page {} installed twice",
            page_number
        );
        self.entries[page_number] = PageTableEntry::Mapped(frame_number);
    }

    pub fn record_fault(&mut self) {
        self.fault_count += 1;
    }

    pub fn fault_count(&self) -> usize {
        self.fault_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of pages currently mapped
    pub fn mapped_count(&self) -> usize {
        self.entries.iter().filter(|e| e.frame().is_some()).count()
    }

    /// All (page, frame) pairs in page order
    pub fn mappings(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(page, entry)| entry.frame().map(|frame| (page, frame)))
    }
}
