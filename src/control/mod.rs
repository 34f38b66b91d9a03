//! Runtime control subsystem.
//!
//! # Data Flow
//! ```text
//! relay-ctl (separate process)
//!     → SIGHUP (flush) / SIGUSR1 + packed payload (resize)
//!     → listener.rs (dedicated thread, synchronous sigwaitinfo)
//!     → command.rs (fixed-format command records)
//!     → channel.rs (ordered, reliable pipe)
//!     → stream engine (sole consumer, applies the command)
//!
//! SIGINT / SIGTERM / SIGPIPE / SIGQUIT
//!     → listener.rs sets the shutdown flag and wakes the engine
//! ```
//!
//! # Design Decisions
//! - No work happens in asynchronous-signal context: the control set is
//!   blocked on every thread and collected synchronously on one thread
//! - The channel is the only cross-thread resource besides the shutdown
//!   flag; all buffer mutation stays on the engine
//! - Commands are queued, never preemptive; FIFO order matches signal
//!   observation order

pub mod channel;
pub mod command;
pub mod listener;

pub use channel::{command_channel, CommandReceiver, CommandSender};
pub use command::Command;
pub use listener::SignalListener;
