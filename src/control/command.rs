//! Command records carried by the command channel.
//!
//! Wire format: one tag byte, followed by a fixed-size body for commands
//! that carry one. `Resize` has a 5-byte body: the unit ordinal, then the
//! magnitude as a little-endian u32. Records are written in a single write
//! so a reader never observes a tag without its body.

use crate::codec::size::Unit;

const TAG_NOP: u8 = 0;
const TAG_FLUSH: u8 = 1;
const TAG_RESIZE: u8 = 2;

/// Body length of a `Resize` record: unit ordinal + u32 magnitude.
pub const RESIZE_BODY_LEN: usize = 5;

/// A control command, constructed once by the signal listener and consumed
/// once by the stream engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Wake the engine without doing anything.
    Nop,
    /// Drain the buffer and write its contents to the sink.
    Flush,
    /// Flush, then reallocate the buffer at `magnitude × unit` bytes.
    Resize { unit: Unit, magnitude: u32 },
}

impl Command {
    /// Wire tag of this command.
    pub fn tag(&self) -> u8 {
        match self {
            Command::Nop => TAG_NOP,
            Command::Flush => TAG_FLUSH,
            Command::Resize { .. } => TAG_RESIZE,
        }
    }

    /// Body length that follows `tag` on the wire.
    pub fn body_len(tag: u8) -> usize {
        match tag {
            TAG_RESIZE => RESIZE_BODY_LEN,
            _ => 0,
        }
    }

    /// Encode the command as one wire record.
    pub fn encode(&self) -> Vec<u8> {
        let mut record = vec![self.tag()];
        if let Command::Resize { unit, magnitude } = self {
            record.push(unit.ordinal());
            record.extend_from_slice(&magnitude.to_le_bytes());
        }
        record
    }

    /// Decode a record from its tag and body.
    ///
    /// Unrecognized tags and malformed bodies decode to `Nop`: the channel
    /// is process-internal, so anything unexpected on it is a programming
    /// error best ignored at this layer and caught by tests.
    pub fn decode(tag: u8, body: &[u8]) -> Command {
        match tag {
            TAG_FLUSH => Command::Flush,
            TAG_RESIZE => {
                if body.len() != RESIZE_BODY_LEN {
                    return Command::Nop;
                }
                let Some(unit) = Unit::from_ordinal(body[0]) else {
                    return Command::Nop;
                };
                let magnitude = u32::from_le_bytes([body[1], body[2], body[3], body[4]]);
                Command::Resize { unit, magnitude }
            }
            _ => Command::Nop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(command: Command) -> Command {
        let record = command.encode();
        let (tag, body) = record.split_first().unwrap();
        assert_eq!(body.len(), Command::body_len(*tag));
        Command::decode(*tag, body)
    }

    #[test]
    fn nop_and_flush_are_bare_tags() {
        assert_eq!(Command::Nop.encode(), vec![0]);
        assert_eq!(Command::Flush.encode(), vec![1]);
        assert_eq!(round_trip(Command::Nop), Command::Nop);
        assert_eq!(round_trip(Command::Flush), Command::Flush);
    }

    #[test]
    fn resize_round_trip() {
        let command = Command::Resize {
            unit: Unit::MiB,
            magnitude: 0x0123_4567,
        };
        assert_eq!(round_trip(command), command);
    }

    #[test]
    fn resize_record_layout() {
        let record = Command::Resize {
            unit: Unit::KiB,
            magnitude: 16,
        }
        .encode();
        assert_eq!(record, vec![2, 3, 16, 0, 0, 0]);
    }

    #[test]
    fn unknown_tag_decodes_to_nop() {
        assert_eq!(Command::decode(0xff, &[]), Command::Nop);
    }

    #[test]
    fn resize_with_bad_unit_decodes_to_nop() {
        assert_eq!(Command::decode(2, &[0, 1, 0, 0, 0]), Command::Nop);
        assert_eq!(Command::decode(2, &[12, 1, 0, 0, 0]), Command::Nop);
    }
}
