//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     terminate signal observed by listener → flag set
//!     → engine exits its loop at the next iteration boundary
//!     → final drain-and-flush → process exit
//! ```
//!
//! # Design Decisions
//! - Shutdown is cooperative: the flag is polled between loop iterations,
//!   never preempting an in-flight read or write
//! - The flag is set once and never reset

pub mod shutdown;

pub use shutdown::Shutdown;
