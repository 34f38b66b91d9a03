//! Relay protocol codec.
//!
//! # Data Flow
//! ```text
//! Operator input ("4KiB", "512MB"):
//!     → size.rs (split into magnitude + unit, derive byte count)
//!     → initial buffer capacity / resize request
//!
//! Resize request (relay-ctl → engine process):
//!     → payload.rs (pack unit + magnitude into one 32-bit word)
//!     → carried as the sigqueue(3) value of SIGUSR1
//!     → payload.rs (unpack on the receiving side)
//! ```
//!
//! # Design Decisions
//! - Both encodings are pure functions, testable without any I/O
//! - The 28-bit payload magnitude cap is a transport artifact; it never
//!   constrains the buffer's own capacity type

pub mod payload;
pub mod size;

pub use payload::{decode_payload, encode_payload, PayloadError, MAGNITUDE_MASK};
pub use size::{parse_size, split_size_spec, SizeError, SizeSpec, Unit};
