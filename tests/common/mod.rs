//! Shared utilities for relay integration tests.
//!
//! Wires a [`StreamEngine`] between two real pipes and exposes the far ends
//! to the test, plus the command channel's write half so tests can inject
//! the exact records the signal listener would produce.

use std::io::Read;
use std::os::fd::OwnedFd;
use std::time::Duration;

use nix::fcntl::OFlag;
use nix::unistd::pipe2;

use stream_relay::control::{command_channel, CommandSender};
use stream_relay::engine::StreamEngine;
use stream_relay::lifecycle::Shutdown;
use stream_relay::{Command, RelayConfig};

pub struct Relay {
    source_tx: Option<OwnedFd>,
    sink_rx: OwnedFd,
    commands: CommandSender,
    pub shutdown: Shutdown,
    pub engine: tokio::task::JoinHandle<std::io::Result<()>>,
}

/// Spawn an engine over fresh pipes on the current runtime.
pub fn spawn_relay(capacity: u64, line_delimiter: Option<u8>) -> Relay {
    let (source_rx, source_tx) = pipe2(OFlag::O_CLOEXEC).unwrap();
    let (sink_rx, sink_tx) = pipe2(OFlag::O_CLOEXEC).unwrap();
    let (commands, receiver) = command_channel().unwrap();
    let shutdown = Shutdown::new();

    let config = RelayConfig {
        capacity,
        line_delimiter,
    };
    let engine =
        StreamEngine::new(source_rx, sink_tx, receiver, &config, shutdown.clone()).unwrap();

    Relay {
        source_tx: Some(source_tx),
        sink_rx,
        commands,
        shutdown,
        engine: tokio::spawn(engine.run()),
    }
}

impl Relay {
    /// Write bytes into the engine's source pipe.
    pub fn write_source(&self, bytes: &[u8]) {
        let fd = self.source_tx.as_ref().expect("source already closed");
        let mut written = 0;
        while written < bytes.len() {
            written += nix::unistd::write(fd, &bytes[written..]).unwrap();
        }
    }

    /// Close the source's write end, delivering EOF to the engine.
    pub fn close_source(&mut self) {
        self.source_tx.take();
    }

    /// Inject a command record, exactly as the signal listener would.
    pub fn send(&self, command: &Command) {
        self.commands.send(command).unwrap();
    }

    /// Read exactly `n` bytes from the sink, off the runtime thread.
    pub async fn read_sink(&self, n: usize) -> Vec<u8> {
        let fd = self.sink_rx.try_clone().unwrap();
        let read = tokio::task::spawn_blocking(move || {
            let mut file = std::fs::File::from(fd);
            let mut bytes = vec![0u8; n];
            file.read_exact(&mut bytes).unwrap();
            bytes
        });
        tokio::time::timeout(Duration::from_secs(5), read)
            .await
            .expect("timed out waiting for sink bytes")
            .unwrap()
    }

    /// Read whatever remains on the sink until EOF. Callers await the
    /// engine first; EOF needs its write end dropped.
    pub async fn read_sink_to_eof(&self) -> Vec<u8> {
        let fd = self.sink_rx.try_clone().unwrap();
        let read = tokio::task::spawn_blocking(move || {
            let mut file = std::fs::File::from(fd);
            let mut bytes = Vec::new();
            file.read_to_end(&mut bytes).unwrap();
            bytes
        });
        tokio::time::timeout(Duration::from_secs(5), read)
            .await
            .expect("timed out waiting for sink EOF")
            .unwrap()
    }
}

/// Give the engine a moment to pick up readiness before the next step
/// changes the picture.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
