//! stream-relay: buffer bytes from stdin to stdout, controlled at runtime
//! through POSIX signals (see `relay-ctl`).

use std::os::fd::AsFd;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stream_relay::codec::parse_size;
use stream_relay::config::schema::DEFAULT_SIZE_SPEC;
use stream_relay::control::listener::block_control_signals;
use stream_relay::control::{command_channel, SignalListener};
use stream_relay::engine::StreamEngine;
use stream_relay::lifecycle::Shutdown;
use stream_relay::RelayConfig;

#[derive(Parser)]
#[command(name = "stream-relay")]
#[command(version, about = "Buffer data from standard input", long_about = None)]
struct Cli {
    /// Flush each time a complete line is buffered.
    #[arg(long)]
    line: bool,

    /// Line delimiter used with --line; ignored otherwise.
    #[arg(long, default_value_t = '\n')]
    delimiter: char,

    /// Initial buffer capacity, e.g. "4KiB" or "512MB".
    #[arg(default_value = DEFAULT_SIZE_SPEC)]
    size: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Stdout carries relayed data; diagnostics must stay out of it.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stream_relay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let capacity = match parse_size(&cli.size) {
        Ok(capacity) => capacity,
        Err(e) => {
            tracing::error!(spec = %cli.size, error = %e, "invalid size spec");
            return Err(e.into());
        }
    };

    let line_delimiter = if cli.line {
        let delimiter = u8::try_from(cli.delimiter)
            .map_err(|_| format!("delimiter {:?} is not a single byte", cli.delimiter))?;
        Some(delimiter)
    } else {
        None
    };

    let config = RelayConfig {
        capacity,
        line_delimiter,
    };
    if let Err(e) = config.validate() {
        tracing::error!(spec = %cli.size, error = %e, "invalid size spec");
        return Err(e.into());
    }

    tracing::info!(
        capacity = config.capacity,
        line_buffered = config.line_delimiter.is_some(),
        "configuration loaded"
    );

    // The mask must be in place before the runtime or the listener spawn
    // any thread: every thread inherits it, leaving sigwaitinfo on the
    // listener as the only consumer of control signals.
    block_control_signals()?;

    let shutdown = Shutdown::new();
    let (sender, receiver) = command_channel()?;
    let listener = SignalListener::new(sender, shutdown.clone()).spawn()?;

    let source = std::io::stdin().as_fd().try_clone_to_owned()?;
    let sink = std::io::stdout().as_fd().try_clone_to_owned()?;
    let engine = StreamEngine::new(source, sink, receiver, &config, shutdown.clone())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()?;
    let result = runtime.block_on(engine.run());

    // Wake the listener out of sigwaitinfo so it observes the shutdown
    // flag; a pending-but-unconsumed SIGQUIT vanishes at process exit.
    let _ = nix::sys::signal::raise(nix::sys::signal::Signal::SIGQUIT);
    if listener.join().is_err() {
        tracing::warn!("signal listener panicked");
    }

    tracing::info!("shutdown complete");
    result.map_err(Into::into)
}
