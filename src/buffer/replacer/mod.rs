//! Eviction policy implementations (replacers).
//!
//! The pool ships the clock (second-chance) policy:
//! - [`ClockReplacer`] - circular scan with per-frame recency bits

mod clock;

pub use clock::ClockReplacer;
