use crate::CHUNK_SIZE;
use crate::progress::progress_fraction;

/// A contiguous slice of a file's content, the unit of one `put` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based chunk index.
    pub index: usize,
    /// Byte offset within the file (`index * chunk_size`).
    pub offset: u64,
    /// Raw chunk data.
    pub data: &'a [u8],
}

impl Chunk<'_> {
    /// Offset one past the last byte of this chunk.
    pub fn end(&self) -> u64 {
        self.offset + self.data.len() as u64
    }
}

// ---------------------------------------------------------------------------
// ChunkCursor
// ---------------------------------------------------------------------------

/// Walks one file's in-memory content in fixed-size chunks.
///
/// Lives only for the duration of one file upload. The caller sends
/// [`current`](Self::current), waits for the remote acknowledgement, then
/// calls [`advance`](Self::advance); there is never more than one chunk
/// in flight.
#[derive(Debug)]
pub struct ChunkCursor {
    content: Vec<u8>,
    chunk_index: usize,
    chunk_size: usize,
}

impl ChunkCursor {
    /// Creates a cursor using [`CHUNK_SIZE`].
    pub fn new(content: Vec<u8>) -> Self {
        Self::with_chunk_size(content, CHUNK_SIZE)
    }

    /// Creates a cursor with a custom chunk size.
    ///
    /// If `chunk_size` is 0, [`CHUNK_SIZE`] is used.
    pub fn with_chunk_size(content: Vec<u8>, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            content,
            chunk_index: 0,
            chunk_size,
        }
    }

    /// The chunk to send next, or `None` once the content is exhausted.
    pub fn current(&self) -> Option<Chunk<'_>> {
        let start = self.chunk_index.checked_mul(self.chunk_size)?;
        if start >= self.content.len() {
            return None;
        }
        let end = usize::min(self.content.len(), start + self.chunk_size);
        Some(Chunk {
            index: self.chunk_index,
            offset: start as u64,
            data: &self.content[start..end],
        })
    }

    /// Marks the current chunk as acknowledged and returns the new progress.
    pub fn advance(&mut self) -> f64 {
        self.chunk_index += 1;
        self.progress()
    }

    /// Fraction of the content acknowledged so far, `>= 1.0` when complete.
    ///
    /// Empty content is complete from the start.
    pub fn progress(&self) -> f64 {
        progress_fraction(self.acknowledged_bytes(), self.total_bytes())
    }

    /// Whether every chunk has been acknowledged.
    pub fn is_complete(&self) -> bool {
        self.acknowledged_bytes() >= self.total_bytes()
    }

    /// Total content length in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    /// Number of chunks needed for the whole content.
    pub fn chunk_count(&self) -> usize {
        self.content.len().div_ceil(self.chunk_size)
    }

    /// Index of the next chunk to send.
    pub fn chunk_index(&self) -> usize {
        self.chunk_index
    }

    fn acknowledged_bytes(&self) -> u64 {
        (self.chunk_index as u64).saturating_mul(self.chunk_size as u64)
    }
}
