//! Configuration constants for pagepool.

/// Size of a page in bytes (4KB).
///
/// Chosen to match the OS page size on most platforms and the sector
/// granularity that SSDs and Direct I/O (O_DIRECT) expect. The disk
/// backend and the buffer pool share this constant; it is not negotiated
/// at runtime.
pub const PAGE_SIZE: usize = 4096;

/// Maximum number of pages addressable with a u32 page id.
pub const MAX_PAGES: u64 = (u32::MAX as u64) + 1;

/// Maximum theoretical database size in bytes (16TB).
pub const MAX_DB_SIZE_BYTES: u64 = MAX_PAGES * PAGE_SIZE as u64;
