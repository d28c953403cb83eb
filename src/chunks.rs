use std::slice::Chunks;

/// Maximum number of ids submitted in one search request.
pub const CHUNK_SIZE: usize = 1000;

/// Lazily partitions `ids` into contiguous, order-preserving chunks.
///
/// Every chunk except possibly the last has exactly `chunk_size` elements;
/// the last carries the remainder. An empty slice yields no chunks at all,
/// so callers must handle empty input upstream. `chunk_size` must be at
/// least 1.
pub fn chunks(ids: &[u64], chunk_size: usize) -> Chunks<'_, u64> {
    ids.chunks(chunk_size)
}
