//! The signal listener thread.
//!
//! # Responsibilities
//! - Synchronously collect the control signal set with sigwaitinfo(2)
//! - Decode the SIGUSR1 resize payload and enqueue command records
//! - Set the shutdown flag on terminate signals and wake the engine
//!
//! # Design Decisions
//! - A dedicated thread instead of installed handlers: signal-handler
//!   context forbids most work, while a thread waiting synchronously can run
//!   ordinary sequential code
//! - The control set must be blocked on every thread of the process before
//!   this thread starts, or delivery races the wait

use std::thread;

use nix::sys::signal::{SigSet, Signal};

use crate::codec::payload::decode_payload;
use crate::control::channel::CommandSender;
use crate::control::command::Command;
use crate::lifecycle::Shutdown;

/// The signals the listener waits for.
///
/// SIGHUP requests a flush, SIGUSR1 carries a packed resize payload, and
/// the rest request shutdown.
pub fn control_sigset() -> SigSet {
    let mut set = SigSet::empty();
    set.add(Signal::SIGHUP);
    set.add(Signal::SIGINT);
    set.add(Signal::SIGTERM);
    set.add(Signal::SIGPIPE);
    set.add(Signal::SIGQUIT);
    set.add(Signal::SIGUSR1);
    set
}

/// Block the control set on the calling thread.
///
/// Must run on the main thread before any other thread exists (runtime
/// workers and the listener inherit the mask), so asynchronous delivery is
/// ruled out everywhere and sigwaitinfo on the listener is the only way a
/// control signal is consumed.
pub fn block_control_signals() -> nix::Result<()> {
    control_sigset().thread_block()
}

/// Translates OS signals into command records for the engine.
pub struct SignalListener {
    sender: CommandSender,
    shutdown: Shutdown,
}

impl SignalListener {
    pub fn new(sender: CommandSender, shutdown: Shutdown) -> Self {
        Self { sender, shutdown }
    }

    /// Spawn the listener on its own thread.
    pub fn spawn(self) -> std::io::Result<thread::JoinHandle<()>> {
        thread::Builder::new()
            .name("signal-listener".to_string())
            .spawn(move || self.run())
    }

    fn run(self) {
        let mask = control_sigset();

        while !self.shutdown.is_triggered() {
            let mut info = std::mem::MaybeUninit::<libc::siginfo_t>::uninit();
            // Safety: the mask outlives the call and info is written by the
            // kernel before we read it (only on success).
            let signo = unsafe { libc::sigwaitinfo(mask.as_ref(), info.as_mut_ptr()) };
            if signo <= 0 {
                // Interrupted or spurious wait; not an error.
                continue;
            }

            match signo {
                libc::SIGHUP => {
                    tracing::debug!("flush requested");
                    if self.sender.send(&Command::Flush).is_err() {
                        break;
                    }
                }
                libc::SIGUSR1 => {
                    let info = unsafe { info.assume_init() };
                    let payload = unsafe { info.si_value().sival_ptr } as usize as u32;
                    match decode_payload(payload) {
                        Ok((unit, magnitude)) => {
                            tracing::debug!(%unit, magnitude, "resize requested");
                            let command = Command::Resize { unit, magnitude };
                            if self.sender.send(&command).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(payload, error = %e, "dropping resize request");
                        }
                    }
                }
                _ => {
                    tracing::debug!(signal = signo, "shutdown requested");
                    self.shutdown.trigger();
                    // Nop exists purely to wake the engine out of its
                    // readiness wait so it observes the flag.
                    let _ = self.sender.send(&Command::Nop);
                    break;
                }
            }
        }
    }
}
