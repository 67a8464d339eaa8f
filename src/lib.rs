//! pagepool - a buffer pool manager for disk-backed storage engines.
//!
//! The crate mediates all access between fixed-size pages persisted on
//! disk and a bounded set of in-memory frames: it decides which pages are
//! resident, guarantees that pinned pages are never evicted, and picks
//! clock (second-chance) victims when the pool is full.
//!
//! # Architecture
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                        pagepool                           │
//! ├───────────────────────────────────────────────────────────┤
//! │  ┌────────────────────────────────────────────────────┐   │
//! │  │           Buffer Pool (buffer/)                    │   │
//! │  │  BufferPoolManager + Frame + PoolDirectory         │   │
//! │  │  ClockReplacer + PageHandle + Statistics           │   │
//! │  └────────────────────────────────────────────────────┘   │
//! │                           ↓                               │
//! │  ┌────────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                 │   │
//! │  │           DiskManager + Page                       │   │
//! │  └────────────────────────────────────────────────────┘   │
//! │                                                           │
//! │  recovery/: LogManager (WAL integration pending)          │
//! └───────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - Buffer pool management and eviction policy
//! - [`storage`] - Disk I/O and the page buffer type
//! - [`recovery`] - Write-ahead logging collaborator
//!
//! # Quick Start
//! ```no_run
//! use std::sync::Arc;
//!
//! use pagepool::{BufferPoolManager, DiskManager, LogManager};
//!
//! let dm = DiskManager::create("my_database.db").unwrap();
//! let pool = BufferPoolManager::new(16, dm, Arc::new(LogManager::new()));
//!
//! // Allocate a page and write into it through the pin handle.
//! let mut handle = pool.new_page().unwrap();
//! handle.with_write(|data| data[0] = 0xAB);
//! let page_id = handle.page_id();
//! drop(handle); // unpins, declares the modification
//!
//! pool.flush_page(page_id).unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod recovery;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, FrameId, PageId, Result};

pub use buffer::{BufferPoolManager, BufferPoolStats, Frame, PageHandle, StatsSnapshot};
pub use recovery::LogManager;
pub use storage::{DiskManager, Page};
