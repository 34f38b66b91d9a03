//! The command channel: an OS pipe used as a cross-thread mailbox.
//!
//! The write end lives on the signal listener thread, the read end on the
//! engine. The pipe gives FIFO delivery and a pollable descriptor for free,
//! which is exactly what the engine's readiness loop needs.

use std::io;
use std::os::fd::OwnedFd;

use nix::errno::Errno;
use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::unistd::pipe2;

use crate::control::command::Command;

/// Write half of the command channel, owned by the signal listener.
#[derive(Debug)]
pub struct CommandSender {
    fd: OwnedFd,
}

impl CommandSender {
    /// Write one encoded command record.
    ///
    /// Records are at most 6 bytes, far below PIPE_BUF, so the single write
    /// lands atomically and the reader never sees a torn record.
    pub fn send(&self, command: &Command) -> io::Result<()> {
        let record = command.encode();
        let mut written = 0;
        while written < record.len() {
            match nix::unistd::write(&self.fd, &record[written..]) {
                Ok(n) => written += n,
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

/// Read half of the command channel, owned by the stream engine.
///
/// The descriptor is non-blocking so the engine can wait for readiness
/// rather than in read(2).
#[derive(Debug)]
pub struct CommandReceiver {
    fd: OwnedFd,
}

impl CommandReceiver {
    /// Surrender the underlying descriptor for registration with the
    /// engine's readiness loop.
    pub fn into_fd(self) -> OwnedFd {
        self.fd
    }
}

/// Create a connected sender/receiver pair.
pub fn command_channel() -> io::Result<(CommandSender, CommandReceiver)> {
    let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC)?;
    set_nonblocking(&read_end)?;
    Ok((
        CommandSender { fd: write_end },
        CommandReceiver { fd: read_end },
    ))
}

/// Add O_NONBLOCK to a descriptor's status flags.
pub fn set_nonblocking(fd: &OwnedFd) -> io::Result<()> {
    let flags = OFlag::from_bits_retain(fcntl(fd, FcntlArg::F_GETFL)?);
    fcntl(fd, FcntlArg::F_SETFL(flags | OFlag::O_NONBLOCK))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::size::Unit;

    #[test]
    fn sent_records_appear_in_order() {
        let (sender, receiver) = command_channel().unwrap();
        sender.send(&Command::Flush).unwrap();
        sender
            .send(&Command::Resize {
                unit: Unit::B,
                magnitude: 7,
            })
            .unwrap();

        let mut bytes = [0u8; 16];
        let n = nix::unistd::read(&receiver.fd, &mut bytes).unwrap();
        assert_eq!(&bytes[..n], &[1, 2, 1, 7, 0, 0, 0]);
    }

    #[test]
    fn empty_channel_reads_would_block() {
        let (_sender, receiver) = command_channel().unwrap();
        let mut bytes = [0u8; 1];
        assert_eq!(
            nix::unistd::read(&receiver.fd, &mut bytes),
            Err(Errno::EAGAIN)
        );
    }
}
