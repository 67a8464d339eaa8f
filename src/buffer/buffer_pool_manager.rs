//! Buffer Pool Manager - the core page caching layer.
//!
//! The [`BufferPoolManager`] mediates all access between pages on disk and
//! a bounded pool of in-memory frames:
//! - Page caching with pin-based protection
//! - Automatic dirty write-back on eviction
//! - Clock (second-chance) victim selection

use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::buffer::directory::PoolDirectory;
use crate::buffer::replacer::ClockReplacer;
use crate::buffer::{BufferPoolStats, Frame, PageHandle};
use crate::common::{Error, FrameId, PageId, Result};
use crate::recovery::LogManager;
use crate::storage::DiskManager;

/// Everything the pool mutates, owned together under one lock.
///
/// Frame metadata, the directory, the replacer, and the disk backend form
/// a single consistency domain: victim selection, write-back, and table
/// rebinding must be atomic with respect to every other frame-acquisition
/// attempt. Helpers on this type never touch the lock, so a public
/// operation holding it can compose them freely.
struct PoolInner {
    /// Fixed pool of frames allocated at startup.
    frames: Vec<Frame>,

    /// Free list + page table.
    directory: PoolDirectory,

    /// Eviction policy over unpinned occupied frames.
    replacer: ClockReplacer,

    /// Disk backend; all I/O happens while the pool lock is held.
    disk: DiskManager,
}

impl PoolInner {
    /// Write a dirty frame's content to disk under its own resident page
    /// id and clear the dirty flag.
    ///
    /// Shared by `flush_page`, the flush-all pass, and the eviction path.
    fn write_back(
        &mut self,
        frame_id: FrameId,
        page_id: PageId,
        stats: &BufferPoolStats,
    ) -> Result<()> {
        debug_assert_eq!(
            self.frames[frame_id.0].page_id(),
            page_id,
            "write-back must target the frame's own resident page"
        );
        self.disk
            .write_page(page_id, self.frames[frame_id.0].page())?;
        self.frames[frame_id.0].clear_dirty();
        stats.pages_written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Obtain an unoccupied frame: free list first, then a clock victim.
    ///
    /// On the eviction path the victim's dirty content is written back
    /// under the victim's id before the page table changes. If that write
    /// fails the victim is re-registered as evictable and nothing else has
    /// moved, so the caller can surface the error with prior state intact.
    fn acquire_frame(&mut self, stats: &BufferPoolStats) -> Result<FrameId> {
        if let Some(frame_id) = self.directory.take_free() {
            return Ok(frame_id);
        }

        let frame_id = self.replacer.victim().ok_or(Error::PoolExhausted)?;
        let victim_pid = self.frames[frame_id.0].page_id();
        debug_assert!(victim_pid.is_valid(), "victim frame holds no page");
        debug_assert_eq!(self.frames[frame_id.0].pin_count(), 0, "victim is pinned");

        if self.frames[frame_id.0].is_dirty() {
            if let Err(e) = self.write_back(frame_id, victim_pid, stats) {
                self.replacer.track(frame_id);
                return Err(e);
            }
        }

        self.directory.unbind(victim_pid);
        self.frames[frame_id.0].set_page_id(PageId::INVALID);
        stats.evictions.fetch_add(1, Ordering::Relaxed);
        Ok(frame_id)
    }
}

/// Manages a fixed pool of frames caching disk pages.
///
/// # Architecture
/// ```text
/// ┌────────────────────────────────────────────────────────────┐
/// │                     BufferPoolManager                      │
/// │  ┌───────────────── Mutex<PoolInner> ──────────────────┐   │
/// │  │ ┌────────────┐   ┌─────────────────────────────┐    │   │
/// │  │ │ directory  │   │     frames: Vec<Frame>      │    │   │
/// │  │ │ page table │──▶│ [Frame0] [Frame1] [Frame2]  │    │   │
/// │  │ │ free list  │   └─────────────────────────────┘    │   │
/// │  │ └────────────┘   ┌──────────────┐  ┌────────────┐   │   │
/// │  │                  │ClockReplacer │  │DiskManager │   │   │
/// │  │                  └──────────────┘  └────────────┘   │   │
/// │  └──────────────────────────────────────────────────────┘  │
/// │          stats: atomics        log_manager: Arc            │
/// └────────────────────────────────────────────────────────────┘
/// ```
///
/// # Concurrency
/// One exclusive, non-reentrant mutex guards the whole pool state; every
/// public operation holds it for its full duration, disk I/O included.
/// Buffer-pool operations are therefore strictly serializable. The lock is
/// a field of this value, never a process-wide singleton.
///
/// # Usage
/// ```ignore
/// let dm = DiskManager::create("test.db")?;
/// let pool = BufferPoolManager::new(10, dm, Arc::new(LogManager::new()));
///
/// let mut handle = pool.new_page()?;
/// handle.with_write(|data| data[0] = 0xAB);
/// // handle drops: dirty declared, page unpinned
///
/// let handle = pool.fetch_page(page_id)?;
/// let first = handle.with_read(|data| data[0]);
/// ```
pub struct BufferPoolManager {
    /// All mutable pool state.
    inner: Mutex<PoolInner>,

    /// Performance counters; atomics outside the lock.
    stats: BufferPoolStats,

    /// Write-ahead log collaborator. Wired in for recovery integration;
    /// not exercised by the core paths yet.
    log_manager: Arc<LogManager>,

    /// Number of frames in the pool (immutable after construction).
    pool_size: usize,
}

impl BufferPoolManager {
    /// Create a new buffer pool manager.
    ///
    /// # Panics
    /// Panics if `pool_size` is 0.
    pub fn new(pool_size: usize, disk_manager: DiskManager, log_manager: Arc<LogManager>) -> Self {
        assert!(pool_size > 0, "pool_size must be > 0");

        let inner = PoolInner {
            frames: (0..pool_size).map(|_| Frame::new()).collect(),
            directory: PoolDirectory::new(pool_size),
            replacer: ClockReplacer::new(pool_size),
            disk: disk_manager,
        };

        Self {
            inner: Mutex::new(inner),
            stats: BufferPoolStats::new(),
            log_manager,
            pool_size,
        }
    }

    // ========================================================================
    // Public API: the seven pool operations
    // ========================================================================

    /// Fetch a page, pinning it for the lifetime of the returned handle.
    ///
    /// A resident page is pinned without disk access. Otherwise a frame is
    /// obtained from the free list or by evicting a clock victim (writing
    /// it back first if dirty), and the page is loaded from disk.
    ///
    /// # Errors
    /// - `Error::PoolExhausted` if every frame is pinned
    /// - `Error::InvalidPageId` if the page was never allocated on disk
    /// - `Error::Io` from the disk backend
    pub fn fetch_page(&self, page_id: PageId) -> Result<PageHandle<'_>> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        // Hit: pin and withdraw from eviction candidacy.
        if let Some(frame_id) = inner.directory.frame_of(page_id) {
            inner.frames[frame_id.0].pin();
            inner.replacer.remove(frame_id);
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(PageHandle::new(self, frame_id, page_id));
        }

        // Miss: find a frame and load from disk.
        self.stats.cache_misses.fetch_add(1, Ordering::Relaxed);
        let frame_id = inner.acquire_frame(&self.stats)?;

        let page = match inner.disk.read_page(page_id) {
            Ok(page) => page,
            Err(e) => {
                // The frame is unoccupied at this point; hand it back.
                inner.directory.release(frame_id);
                return Err(e);
            }
        };
        self.stats.pages_read.fetch_add(1, Ordering::Relaxed);

        let frame = &mut inner.frames[frame_id.0];
        frame.page_mut().as_mut_slice().copy_from_slice(page.as_slice());
        frame.set_page_id(page_id);
        frame.clear_dirty();
        frame.pin();
        inner.directory.bind(page_id, frame_id);

        Ok(PageHandle::new(self, frame_id, page_id))
    }

    /// Allocate a fresh page on disk and pin it in a frame.
    ///
    /// The frame is zero-filled rather than read from disk. The new page
    /// id travels on the returned handle.
    ///
    /// # Errors
    /// - `Error::PoolExhausted` if every frame is pinned
    /// - `Error::Io` from disk allocation
    pub fn new_page(&self) -> Result<PageHandle<'_>> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let frame_id = inner.acquire_frame(&self.stats)?;

        let page_id = match inner.disk.allocate_page() {
            Ok(page_id) => page_id,
            Err(e) => {
                inner.directory.release(frame_id);
                return Err(e);
            }
        };

        let frame = &mut inner.frames[frame_id.0];
        frame.page_mut().reset();
        frame.set_page_id(page_id);
        frame.clear_dirty();
        frame.pin();
        inner.directory.bind(page_id, frame_id);

        Ok(PageHandle::new(self, frame_id, page_id))
    }

    /// Release one pin on a resident page.
    ///
    /// `is_dirty = true` declares a modification; the flag is monotonic
    /// and only a successful write-back clears it. When the pin count
    /// reaches zero the frame becomes an eviction candidate.
    ///
    /// # Errors
    /// - `Error::PageNotFound` if the page is not resident
    /// - `Error::DoubleUnpin` if the pin count is already zero
    pub fn unpin_page(&self, page_id: PageId, is_dirty: bool) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(frame_id) = inner.directory.frame_of(page_id) else {
            return Err(Error::PageNotFound(page_id));
        };

        let frame = &mut inner.frames[frame_id.0];
        if !frame.is_pinned() {
            return Err(Error::DoubleUnpin(page_id));
        }
        if is_dirty {
            frame.mark_dirty();
        }
        if frame.unpin() == 0 {
            inner.replacer.track(frame_id);
        }
        Ok(())
    }

    /// Write a resident page to disk if it is dirty.
    ///
    /// A clean resident page succeeds without a disk call.
    ///
    /// # Errors
    /// - `Error::PageNotFound` if the page is not resident
    /// - `Error::Io` from the disk write
    pub fn flush_page(&self, page_id: PageId) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(frame_id) = inner.directory.frame_of(page_id) else {
            return Err(Error::PageNotFound(page_id));
        };
        if inner.frames[frame_id.0].is_dirty() {
            inner.write_back(frame_id, page_id, &self.stats)?;
        }
        Ok(())
    }

    /// Write every dirty resident page to disk.
    ///
    /// A single pass under one lock acquisition; the shared write-back
    /// core never re-enters the lock. Stops at the first disk error;
    /// already-flushed pages stay clean, the failing page stays dirty.
    pub fn flush_all_pages(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let resident: Vec<(PageId, FrameId)> = inner.directory.resident().collect();
        for (page_id, frame_id) in resident {
            if inner.frames[frame_id.0].is_dirty() {
                inner.write_back(frame_id, page_id, &self.stats)?;
            }
        }
        Ok(())
    }

    /// Drop a page from the pool and deallocate it on disk.
    ///
    /// A non-resident page succeeds trivially. Eligibility for a resident
    /// page is decided by the pin count alone: any outstanding pin refuses
    /// the delete and leaves the page untouched. Dirty content of a
    /// deleted page is discarded, not written back.
    ///
    /// # Errors
    /// - `Error::PageInUse` if the page has outstanding pins
    pub fn delete_page(&self, page_id: PageId) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let Some(frame_id) = inner.directory.frame_of(page_id) else {
            return Ok(());
        };
        if inner.frames[frame_id.0].is_pinned() {
            return Err(Error::PageInUse(page_id));
        }

        inner.disk.deallocate_page(page_id)?;
        self.stats.pages_deallocated.fetch_add(1, Ordering::Relaxed);

        inner.directory.unbind(page_id);
        inner.replacer.remove(frame_id);
        inner.frames[frame_id.0].reset();
        inner.directory.release(frame_id);
        Ok(())
    }

    // ========================================================================
    // Public API: inspection
    // ========================================================================

    /// Buffer pool statistics.
    pub fn stats(&self) -> &BufferPoolStats {
        &self.stats
    }

    /// The injected write-ahead log collaborator.
    pub fn log_manager(&self) -> &Arc<LogManager> {
        &self.log_manager
    }

    /// Number of frames in the pool.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Number of frames currently holding no page.
    pub fn free_frame_count(&self) -> usize {
        self.inner.lock().directory.free_count()
    }

    /// Number of pages currently resident.
    pub fn resident_page_count(&self) -> usize {
        self.inner.lock().directory.resident_count()
    }

    /// Whether the page is currently resident.
    pub fn contains_page(&self, page_id: PageId) -> bool {
        self.inner.lock().directory.frame_of(page_id).is_some()
    }

    /// Pin count of a resident page, or `None` if not resident.
    pub fn pin_count(&self, page_id: PageId) -> Option<u32> {
        let inner = self.inner.lock();
        inner
            .directory
            .frame_of(page_id)
            .map(|frame_id| inner.frames[frame_id.0].pin_count())
    }

    // ========================================================================
    // Internal: called by PageHandle
    // ========================================================================

    /// Run `f` over a pinned frame.
    pub(crate) fn with_frame<R>(&self, frame_id: FrameId, f: impl FnOnce(&Frame) -> R) -> R {
        let inner = self.inner.lock();
        f(&inner.frames[frame_id.0])
    }

    /// Run `f` over a pinned frame mutably.
    pub(crate) fn with_frame_mut<R>(&self, frame_id: FrameId, f: impl FnOnce(&mut Frame) -> R) -> R {
        let mut inner = self.inner.lock();
        f(&mut inner.frames[frame_id.0])
    }

    /// Give back a handle's pin. Tolerates a pin already returned through
    /// [`BufferPoolManager::unpin_page`], so a handle drop after a manual
    /// unpin does not underflow.
    pub(crate) fn unpin_frame(&self, frame_id: FrameId, is_dirty: bool) {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let frame = &mut inner.frames[frame_id.0];
        if !frame.is_pinned() {
            return;
        }
        if is_dirty {
            frame.mark_dirty();
        }
        if frame.unpin() == 0 {
            inner.replacer.track(frame_id);
        }
    }

    /// Assert the frame partition invariant: every frame is exactly one of
    /// free, pinned, or evictable, and the page table mirrors occupancy.
    #[cfg(test)]
    fn check_invariants(&self) {
        let inner = self.inner.lock();
        for i in 0..self.pool_size {
            let frame_id = FrameId::new(i);
            let frame = &inner.frames[i];
            let free = inner.directory.is_free(frame_id);
            let tracked = inner.replacer.contains(frame_id);

            if free {
                assert!(
                    !frame.is_occupied() && !frame.is_pinned() && !tracked,
                    "free frame {frame_id} must be empty, unpinned, untracked"
                );
            } else if frame.is_pinned() {
                assert!(
                    frame.is_occupied() && !tracked,
                    "pinned frame {frame_id} must be occupied and untracked"
                );
            } else {
                assert!(
                    frame.is_occupied() && tracked,
                    "idle frame {frame_id} must be occupied and evictable"
                );
            }

            if frame.is_occupied() {
                assert_eq!(
                    inner.directory.frame_of(frame.page_id()),
                    Some(frame_id),
                    "page table must map {} to {frame_id}",
                    frame.page_id()
                );
            }
        }
        assert_eq!(
            inner.directory.free_count() + inner.directory.resident_count(),
            self.pool_size
        );
    }
}
