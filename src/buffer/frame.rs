//! Frame - a slot in the buffer pool.
//!
//! A [`Frame`] holds one page's bytes plus the metadata the pool needs to
//! manage it: which page is resident, how many holders have it pinned, and
//! whether the in-memory copy differs from disk.

use crate::common::PageId;
use crate::storage::Page;

/// A frame in the buffer pool.
///
/// Frames are allocated once at pool construction and never reallocated;
/// only their occupancy changes. A frame is unoccupied exactly when its
/// page id is [`PageId::INVALID`].
///
/// `Frame` is plain data. The buffer pool keeps the whole frame array
/// behind its single lock, so no interior mutability is needed here.
pub struct Frame {
    /// Resident page, or `PageId::INVALID` when the frame is empty.
    page_id: PageId,

    /// Number of active holders of this page's content.
    pin_count: u32,

    /// True once a holder declared a modification; cleared only by a
    /// successful write-back.
    dirty: bool,

    /// The page data, owned exclusively by this frame.
    page: Page,
}

impl Frame {
    /// Create a new empty frame.
    pub fn new() -> Self {
        Self {
            page_id: PageId::INVALID,
            pin_count: 0,
            dirty: false,
            page: Page::new(),
        }
    }

    /// Resident page id, or `PageId::INVALID` when empty.
    #[inline]
    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    /// Set the resident page id.
    #[inline]
    pub fn set_page_id(&mut self, page_id: PageId) {
        self.page_id = page_id;
    }

    /// Whether a page is resident in this frame.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.page_id.is_valid()
    }

    /// Access the page data.
    #[inline]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Access the page data mutably.
    #[inline]
    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Increment the pin count. Returns the new pin count.
    #[inline]
    pub fn pin(&mut self) -> u32 {
        self.pin_count += 1;
        self.pin_count
    }

    /// Decrement the pin count. Returns the new pin count.
    ///
    /// # Panics
    /// Panics if the pin count is already 0. Callers check with
    /// [`Frame::is_pinned`] first; the pool reports that case as a
    /// `DoubleUnpin` error instead of reaching this.
    #[inline]
    pub fn unpin(&mut self) -> u32 {
        assert!(self.pin_count > 0, "pin count underflow");
        self.pin_count -= 1;
        self.pin_count
    }

    /// Current pin count.
    #[inline]
    pub fn pin_count(&self) -> u32 {
        self.pin_count
    }

    /// Whether the frame has any outstanding pins.
    #[inline]
    pub fn is_pinned(&self) -> bool {
        self.pin_count > 0
    }

    /// Mark the frame's content as modified.
    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag after a successful write-back.
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Whether the in-memory content differs from disk.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Reset the frame to its empty state: zeroed buffer, no page, no
    /// pins, clean.
    pub fn reset(&mut self) {
        self.page.reset();
        self.page_id = PageId::INVALID;
        self.pin_count = 0;
        self.dirty = false;
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}
