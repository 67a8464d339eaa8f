//! RAII handle for pinned pages.
//!
//! A [`PageHandle`] is what fetch/new hand back instead of a raw pointer
//! into the frame array. It names a frame by stable index, so page bytes
//! are only ever reachable while the pin is held; releasing the handle
//! (explicitly or on drop) performs the unpin.

use crate::common::{FrameId, PageId};

use super::buffer_pool_manager::BufferPoolManager;

/// A pinned page in the buffer pool.
///
/// While a handle exists, its frame cannot be evicted. Byte access goes
/// through [`PageHandle::with_read`] / [`PageHandle::with_write`], which
/// briefly acquire the pool lock for the duration of the closure.
///
/// Writing through the handle (or calling [`PageHandle::mark_dirty`])
/// records dirtiness locally; the frame's own dirty flag is set when the
/// handle releases, the same way an explicit
/// [`BufferPoolManager::unpin_page`] declares it. The flag is monotonic:
/// once a release declared the page dirty, only a write-back clears it.
///
/// # Deadlock
/// The pool lock is not re-entrant. Calling any `BufferPoolManager`
/// operation from inside an access closure deadlocks.
///
/// # Example
/// ```ignore
/// let mut handle = pool.new_page()?;
/// handle.with_write(|data| data[0] = 0xAB);
/// // handle drops: unpinned, dirty declared
/// ```
pub struct PageHandle<'a> {
    /// Owning pool, used for access and the final unpin.
    pool: &'a BufferPoolManager,
    /// Frame holding this page.
    frame_id: FrameId,
    /// Page id, fixed for the lifetime of the pin.
    page_id: PageId,
    /// Dirtiness declared so far through this handle.
    dirty: bool,
    /// Set once the pin has been given back.
    released: bool,
}

impl<'a> PageHandle<'a> {
    /// Called by the pool with the pin already taken.
    pub(crate) fn new(pool: &'a BufferPoolManager, frame_id: FrameId, page_id: PageId) -> Self {
        Self {
            pool,
            frame_id,
            page_id,
            dirty: false,
            released: false,
        }
    }

    /// Id of the pinned page.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Frame holding the pinned page.
    #[inline]
    pub fn frame_id(&self) -> FrameId {
        self.frame_id
    }

    /// Run `f` over the page's bytes.
    pub fn with_read<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        self.pool
            .with_frame(self.frame_id, |frame| f(frame.page().as_slice()))
    }

    /// Run `f` over the page's bytes mutably and record the modification.
    pub fn with_write<R>(&mut self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        self.dirty = true;
        self.pool
            .with_frame_mut(self.frame_id, |frame| f(frame.page_mut().as_mut_slice()))
    }

    /// Declare the page modified without writing through this handle.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Release the pin now. Subsequent calls (and the eventual drop) are
    /// no-ops.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.pool.unpin_frame(self.frame_id, self.dirty);
    }
}

impl Drop for PageHandle<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
