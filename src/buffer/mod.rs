//! Byte buffer subsystem.
//!
//! # Responsibilities
//! - Hold up to `capacity` bytes between source reads and sink flushes
//! - Track the fill level; expose the writable tail for readiness-driven reads
//! - Drain, resize, and extract whole lines
//!
//! # Design Decisions
//! - Single-owner: only the stream engine touches a buffer, so there is no
//!   internal locking
//! - `left()` and `is_full()` are derived from `capacity` and `level`, never
//!   stored separately
//! - `resize` discards contents by contract; the engine drains first

pub mod bytes;

pub use bytes::Buffer;
