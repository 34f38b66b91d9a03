//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! argv (clap)
//!     → schema.rs (RelayConfig)
//!     → validation.rs (semantic checks)
//!     → engine (immutable for the process lifetime; capacity changes
//!       arrive as resize commands instead)
//! ```
//!
//! # Design Decisions
//! - The only configuration surface is argv; there is no config file
//! - Validation rejects degenerate capacities before a buffer exists

pub mod schema;
pub mod validation;

pub use schema::RelayConfig;
pub use validation::ConfigError;
