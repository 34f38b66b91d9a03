//! relay-ctl: control a running stream-relay process.
//!
//! Speaks the relay's signal protocol: SIGHUP for flush, SIGUSR1 with a
//! packed 32-bit payload for resize. The OS permission model decides who
//! may send; the relay performs no further authentication.

use clap::{Parser, Subcommand};
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use stream_relay::codec::{encode_payload, split_size_spec};

#[derive(Parser)]
#[command(name = "relay-ctl")]
#[command(version, about = "Control stream-relay processes", long_about = None)]
struct Cli {
    /// Process id of the target relay.
    pid: i32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Flush the relay's buffer to its sink immediately.
    Flush,
    /// Resize the relay's buffer; buffered bytes are flushed first.
    Resize {
        /// New capacity, e.g. "4KiB" or "512MB".
        size: String,
    },
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let pid = Pid::from_raw(cli.pid);

    match cli.command {
        Commands::Flush => {
            eprintln!("flushing buffer of {}", pid);
            kill(pid, Signal::SIGHUP)?;
        }
        Commands::Resize { size } => {
            let spec = split_size_spec(&size)?;
            let bytes = spec.in_bytes()?;
            if bytes == 0 {
                return Err(format!("refusing to resize {} to zero bytes", pid).into());
            }
            // Magnitudes beyond 28 bits do not fit the signal payload and
            // are rejected here, never truncated.
            let payload = encode_payload(&spec)?;

            eprintln!("resizing buffer of {} to {} ({} bytes)", pid, spec, bytes);

            let value = libc::sigval {
                sival_ptr: payload as usize as *mut libc::c_void,
            };
            // sigqueue(3) has no nix wrapper; the payload rides in si_value.
            let rc = unsafe { libc::sigqueue(pid.as_raw(), libc::SIGUSR1, value) };
            if rc == -1 {
                return Err(std::io::Error::last_os_error().into());
            }
        }
    }

    Ok(())
}
