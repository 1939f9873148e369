use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::config::{ExhaustionPolicy, PagingConfig};
use crate::error::{PagerError, Result};

/// Byte-addressed physical memory made of equally sized frames
pub struct PhysicalMemory {
    data: Box<[i8]>,
    page_size: usize,
}

impl PhysicalMemory {
    /// Create a physical memory of `frame_count` frames, all zeroed
    pub fn new(frame_count: usize, page_size: usize) -> Self {
        PhysicalMemory {
            data: vec![0i8; frame_count * page_size].into_boxed_slice(),
            page_size,
        }
    }

    pub fn from_config(config: &PagingConfig) -> Self {
        Self::new(config.frame_count, config.page_size())
    }

    /// Copy one page into a frame, replacing whatever the frame held.
    ///
    /// # Panics
    /// If `frame_number` is past the last frame or `bytes` is not exactly one
    /// page long.
    pub fn load_page(&mut self, frame_number: usize, bytes: &[i8]) {
        let start = Self::frame_to_address(frame_number, self.page_size);
        self.data[start..start + self.page_size].copy_from_slice(bytes);
    }

    /// Read the byte at `frame_offset` within a frame.
    ///
    /// # Panics
    /// If the address falls outside physical memory.
    #[inline]
    pub fn read_byte(&self, frame_number: usize, frame_offset: usize) -> i8 {
        self.data[Self::frame_to_address(frame_number, self.page_size) + frame_offset]
    }

    /// Bytes of a whole frame
    pub fn frame(&self, frame_number: usize) -> &[i8] {
        let start = Self::frame_to_address(frame_number, self.page_size);
        &self.data[start..start + self.page_size]
    }

    /// Calculate the starting address of a frame
    #[inline]
    pub fn frame_to_address(frame_number: usize, page_size: usize) -> usize {
        frame_number * page_size
    }
}

/// Hands out frames in order 0, 1, 2, ... and never takes one back
#[derive(Debug, Clone)]
pub struct FrameAllocator {
    next_free: usize,
    capacity: usize,
    policy: ExhaustionPolicy,
}

impl FrameAllocator {
    pub fn new(capacity: usize, policy: ExhaustionPolicy) -> Self {
        FrameAllocator { next_free: 0, capacity, policy }
    }

    pub fn from_config(config: &PagingConfig) -> Self {
        Self::new(config.frame_count, config.on_exhaustion)
    }

    /// Take the next frame.
    ///
    /// Returns `None` once all frames are used under `ExhaustionPolicy::Fail`.
    /// Under `ExhaustionPolicy::Wrap` the counter keeps running and the frame
    /// index wraps, handing out frames that are still mapped.
    pub fn allocate(&mut self) -> Option<usize> {
        let frame = match self.policy {
            ExhaustionPolicy::Fail if self.next_free >= self.capacity => return None,
            ExhaustionPolicy::Fail => self.next_free,
            ExhaustionPolicy::Wrap => {
                let frame = self.next_free % self.capacity;
                if self.next_free >= self.capacity {
                    log::warn!(
                        "frame counter wrapped: reusing frame {} without unmapping it",
                        frame
                    );
                }
                frame
            }
        };
        self.next_free += 1;
        Some(frame)
    }

    /// Number of allocations made so far
    pub fn next_free(&self) -> usize {
        self.next_free
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_free >= self.capacity
    }
}

/// Paging disk: page `n` lives at byte offset `n * page_size`
pub struct BackingStore<R> {
    reader: R,
    page_size: usize,
    /// Known when the size of the store could be determined up front
    page_count: Option<usize>,
}

impl BackingStore<File> {
    /// Open a backing store file
    pub fn open<P: AsRef<Path>>(path: P, page_size: usize) -> Result<Self> {
        let path = path.as_ref();
        let open_err = |source| PagerError::BackingStoreOpen { path: path.to_path_buf(), source };

        let file = File::open(path).map_err(open_err)?;
        let len = file.metadata().map_err(open_err)?.len();
        let page_count = usize::try_from(len).ok().map(|len| len / page_size);

        Ok(BackingStore { reader: file, page_size, page_count })
    }
}

impl<R: Read + Seek> BackingStore<R> {
    pub fn new(reader: R, page_size: usize) -> Self {
        BackingStore { reader, page_size, page_count: None }
    }

    /// Bound page numbers to `page_count` before touching the reader
    pub fn with_page_count(mut self, page_count: usize) -> Self {
        self.page_count = Some(page_count);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> Option<usize> {
        self.page_count
    }

    /// Read exactly one page
    pub fn read_page(&mut self, page_number: usize) -> Result<Vec<i8>> {
        let load_err = |source| PagerError::BackingStore { page: page_number, source };

        if let Some(count) = self.page_count {
            if page_number >= count {
                return Err(load_err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("the backing store holds only {} pages", count),
                )));
            }
        }

        let offset = (page_number as u64) * (self.page_size as u64);
        self.reader.seek(SeekFrom::Start(offset)).map_err(load_err)?;

        let mut buffer = vec![0u8; self.page_size];
        self.reader.read_exact(&mut buffer).map_err(load_err)?;

        Ok(buffer.into_iter().map(|b| b as i8).collect())
    }
}
