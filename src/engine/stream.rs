//! The readiness-driven relay loop.
//!
//! # Responsibilities
//! - Read available bytes from the source into the buffer
//! - Apply the flush policy: buffer full, line delimiter seen, or commanded
//! - Apply resize commands without losing buffered bytes
//! - Terminate on EOF, read error, or the shutdown flag, flushing first
//!
//! # State Machine
//! ```text
//! Running --[EOF | read error | shutdown flag]--> Draining --> Terminated
//! ```
//! No transition re-enters Running.

use std::io;
use std::os::fd::OwnedFd;

use nix::errno::Errno;
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;

use crate::buffer::Buffer;
use crate::codec::size::Unit;
use crate::config::RelayConfig;
use crate::control::channel::{set_nonblocking, CommandReceiver};
use crate::control::command::{Command, RESIZE_BODY_LEN};
use crate::lifecycle::Shutdown;

/// The relay between a source descriptor and a sink descriptor.
///
/// Sole owner of the buffer: every mutation happens on the task running
/// [`StreamEngine::run`], so resize requests arriving from the listener can
/// never race a read in flight.
pub struct StreamEngine {
    source: AsyncFd<OwnedFd>,
    sink: OwnedFd,
    commands: AsyncFd<OwnedFd>,
    buffer: Buffer,
    line_delimiter: Option<u8>,
    shutdown: Shutdown,
}

impl StreamEngine {
    /// Set up the engine over the given descriptors.
    ///
    /// The source is switched to non-blocking so reads only happen on
    /// readiness; the sink stays blocking, because flushing synchronously
    /// is the backpressure policy.
    pub fn new(
        source: OwnedFd,
        sink: OwnedFd,
        commands: CommandReceiver,
        config: &RelayConfig,
        shutdown: Shutdown,
    ) -> io::Result<Self> {
        let capacity = usize::try_from(config.capacity)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "capacity not addressable"))?;

        set_nonblocking(&source)?;

        Ok(Self {
            source: AsyncFd::with_interest(source, Interest::READABLE)?,
            sink,
            commands: AsyncFd::with_interest(commands.into_fd(), Interest::READABLE)?,
            buffer: Buffer::new(capacity),
            line_delimiter: config.line_delimiter,
            shutdown,
        })
    }

    /// Drive the relay until EOF, a fatal error, or shutdown.
    ///
    /// On every exit path the engine performs one last best-effort read and
    /// an unconditional drain-and-flush, so no byte accepted from the
    /// source is silently dropped.
    pub async fn run(self) -> io::Result<()> {
        let StreamEngine {
            source,
            sink,
            commands,
            mut buffer,
            line_delimiter,
            shutdown,
        } = self;

        let mut outcome = Ok(());

        'relay: while !shutdown.is_triggered() {
            tokio::select! {
                ready = source.readable() => {
                    let mut guard = match ready {
                        Ok(guard) => guard,
                        Err(e) => {
                            tracing::error!(error = %e, "readiness wait failed");
                            shutdown.trigger();
                            outcome = Err(e);
                            break 'relay;
                        }
                    };
                    match guard.try_io(|fd| read_into(fd.get_ref(), &mut buffer)) {
                        Err(_would_block) => continue,
                        Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Ok(Ok(0)) => {
                            // Graceful end of stream, not an error.
                            tracing::info!("source closed");
                            shutdown.trigger();
                            break 'relay;
                        }
                        Ok(Ok(n)) => {
                            buffer.grow(n);
                            if let Err(e) = apply_fill_policy(&sink, &mut buffer, line_delimiter) {
                                tracing::error!(error = %e, "sink write failed");
                                shutdown.trigger();
                                outcome = Err(e);
                                break 'relay;
                            }
                        }
                        Ok(Err(e)) => {
                            tracing::error!(error = %e, "source read failed");
                            shutdown.trigger();
                            outcome = Err(e);
                            break 'relay;
                        }
                    }
                }
                ready = commands.readable() => {
                    let mut guard = match ready {
                        Ok(guard) => guard,
                        Err(e) => {
                            tracing::error!(error = %e, "readiness wait failed");
                            shutdown.trigger();
                            outcome = Err(e);
                            break 'relay;
                        }
                    };
                    let mut tag = [0u8; 1];
                    match guard.try_io(|fd| {
                        nix::unistd::read(fd.get_ref(), &mut tag).map_err(io::Error::from)
                    }) {
                        Err(_would_block) => continue,
                        Ok(Err(e)) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Ok(Ok(0)) => {
                            // Every sender is gone; the relay can no longer
                            // be controlled, so stop.
                            tracing::warn!("command channel closed");
                            shutdown.trigger();
                            break 'relay;
                        }
                        Ok(Ok(_)) => {
                            let command = match read_body(commands.get_ref(), tag[0]) {
                                Ok(command) => command,
                                Err(e) => {
                                    tracing::error!(error = %e, "command channel read failed");
                                    shutdown.trigger();
                                    outcome = Err(e);
                                    break 'relay;
                                }
                            };
                            if let Err(e) = apply_command(&sink, &mut buffer, command) {
                                tracing::error!(error = %e, "sink write failed");
                                shutdown.trigger();
                                outcome = Err(e);
                                break 'relay;
                            }
                        }
                        Ok(Err(e)) => {
                            tracing::error!(error = %e, "command channel read failed");
                            shutdown.trigger();
                            outcome = Err(e);
                            break 'relay;
                        }
                    }
                }
            }
        }

        // Draining: whatever is already in the source pipe gets one
        // non-blocking read, then everything buffered goes to the sink.
        if buffer.left() > 0 {
            if let Ok(n) = nix::unistd::read(source.get_ref(), buffer.writable()) {
                buffer.grow(n);
            }
        }
        let drained = buffer.drain();
        let _ = flush(&sink, &drained);
        tracing::debug!("engine terminated");

        outcome
    }
}

/// Read from the source into the buffer's writable tail.
fn read_into(source: &OwnedFd, buffer: &mut Buffer) -> io::Result<usize> {
    // The engine flushes whenever the buffer fills, so there is always room
    // here; a zero-length read would be indistinguishable from EOF.
    debug_assert!(buffer.left() > 0);
    nix::unistd::read(source, buffer.writable()).map_err(io::Error::from)
}

/// Flush on fill, or on a complete line in line-buffered mode.
fn apply_fill_policy(
    sink: &OwnedFd,
    buffer: &mut Buffer,
    line_delimiter: Option<u8>,
) -> io::Result<()> {
    if buffer.is_full() {
        let drained = buffer.drain();
        flush(sink, &drained)?;
        return Ok(());
    }

    if let Some(delimiter) = line_delimiter {
        if let Some(mut line) = buffer.get_line(delimiter) {
            line.push(delimiter);
            flush(sink, &line)?;
        }
    }

    Ok(())
}

/// Apply one command from the channel.
fn apply_command(sink: &OwnedFd, buffer: &mut Buffer, command: Command) -> io::Result<()> {
    match command {
        Command::Flush => {
            tracing::debug!("flush commanded");
            let drained = buffer.drain();
            flush(sink, &drained)?;
        }
        Command::Resize { unit, magnitude } => {
            // Drain before the capacity change or the buffered bytes would
            // be lost with the old storage.
            let drained = buffer.drain();
            flush(sink, &drained)?;
            apply_resize(buffer, unit, magnitude);
        }
        Command::Nop => {}
    }
    Ok(())
}

/// Reallocate the buffer at `magnitude × unit` bytes. Degenerate requests
/// are logged and ignored; the buffer keeps its current capacity.
fn apply_resize(buffer: &mut Buffer, unit: Unit, magnitude: u32) {
    let bytes = u64::from(magnitude).checked_mul(unit.in_bytes());
    let new_capacity = match bytes.and_then(|b| usize::try_from(b).ok()) {
        Some(capacity) if capacity > 0 => capacity,
        _ => {
            tracing::warn!(magnitude, %unit, "ignoring resize to degenerate capacity");
            return;
        }
    };
    let old_capacity = buffer.resize(new_capacity);
    tracing::info!(old_capacity, new_capacity, "buffer resized");
}

/// Read the fixed-size body that follows `tag`, if the command has one.
fn read_body(commands: &OwnedFd, tag: u8) -> io::Result<Command> {
    let len = Command::body_len(tag);
    let mut body = [0u8; RESIZE_BODY_LEN];
    let mut have = 0;
    while have < len {
        match nix::unistd::read(commands, &mut body[have..len]) {
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => have += n,
            // Records are written in one write well under PIPE_BUF: once
            // the tag is readable the body already is too.
            Err(Errno::EINTR) | Err(Errno::EAGAIN) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(Command::decode(tag, &body[..len]))
}

/// Write a drained byte sequence to the sink in full.
fn flush(sink: &OwnedFd, bytes: &[u8]) -> io::Result<()> {
    let mut written = 0;
    while written < bytes.len() {
        match nix::unistd::write(sink, &bytes[written..]) {
            Ok(n) => written += n,
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    if written > 0 {
        tracing::debug!(bytes = written, "flushed");
    }
    Ok(())
}
