//! Log manager - the write-ahead-log collaborator of the buffer pool.

use std::sync::atomic::{AtomicU64, Ordering};

/// Log sequence number.
pub type Lsn = u64;

/// Hands out monotonically increasing LSNs and tracks the durable
/// watermark.
///
/// The buffer pool takes a `LogManager` at construction so the wiring for
/// recovery exists, but the core paths do not emit log records yet. Once
/// WAL lands, dirty write-back will first wait for `persistent_lsn` to
/// cover the page's last modification.
pub struct LogManager {
    /// Next LSN to hand out.
    next_lsn: AtomicU64,

    /// Highest LSN known to be durable on the log device.
    persistent_lsn: AtomicU64,
}

impl LogManager {
    /// Create a log manager starting at LSN 0.
    pub fn new() -> Self {
        Self {
            next_lsn: AtomicU64::new(0),
            persistent_lsn: AtomicU64::new(0),
        }
    }

    /// Claim the next LSN.
    pub fn next_lsn(&self) -> Lsn {
        self.next_lsn.fetch_add(1, Ordering::Relaxed)
    }

    /// Highest LSN known durable.
    pub fn persistent_lsn(&self) -> Lsn {
        self.persistent_lsn.load(Ordering::Relaxed)
    }

    /// Advance the durable watermark.
    pub fn set_persistent_lsn(&self, lsn: Lsn) {
        self.persistent_lsn.store(lsn, Ordering::Relaxed);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lsns_are_monotonic() {
        let lm = LogManager::new();
        let a = lm.next_lsn();
        let b = lm.next_lsn();
        let c = lm.next_lsn();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_persistent_lsn_watermark() {
        let lm = LogManager::new();
        assert_eq!(lm.persistent_lsn(), 0);

        lm.set_persistent_lsn(41);
        assert_eq!(lm.persistent_lsn(), 41);
    }
}
