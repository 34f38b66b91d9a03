//! Signal-controlled streaming byte relay.
//!
//! Sits between a producer descriptor and a consumer descriptor,
//! accumulating bytes into a bounded buffer and flushing downstream when
//! the buffer fills, when a line delimiter is seen (optional mode), or when
//! commanded at runtime through POSIX signals.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!                  │                 stream-relay                  │
//!                  │                                               │
//!   source fd ─────┼─▶ engine ──▶ buffer ──drain+flush──▶ sink fd ─┼─▶
//!                  │      ▲                                        │
//!                  │      │ command records                        │
//!                  │   control channel (pipe)                      │
//!                  │      ▲                                        │
//!                  │   signal listener thread                      │
//!                  └──────┼────────────────────────────────────────┘
//!                         │
//!       SIGHUP (flush) / SIGUSR1 + payload (resize) / SIGTERM & co.
//!                         │
//!                     relay-ctl (separate process)
//! ```
//!
//! Data flows only inside the engine; control flows signal → listener →
//! channel → engine. The buffer has exactly one owner and the shutdown flag
//! is the only other shared state.

// Core subsystems
pub mod buffer;
pub mod codec;
pub mod control;
pub mod engine;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;

pub use buffer::Buffer;
pub use config::RelayConfig;
pub use control::{Command, CommandReceiver, CommandSender, SignalListener};
pub use engine::StreamEngine;
pub use lifecycle::Shutdown;
