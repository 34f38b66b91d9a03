//! Stream engine subsystem.
//!
//! # Data Flow
//! ```text
//! source fd ──readiness──▶ stream.rs ──▶ buffer ──drain──▶ sink fd
//!                             ▲
//!                             │ command records
//!                      command channel (read end)
//! ```
//!
//! # Design Decisions
//! - One task owns the buffer; commands mutate it only from that task
//! - Readiness multiplexing over exactly two descriptors, no timeouts
//! - Data-path failures are handled locally: flush what is buffered, start
//!   shutdown, never propagate across the thread boundary

pub mod stream;

pub use stream::StreamEngine;
