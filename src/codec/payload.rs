//! Packed resize payload.
//!
//! A resize request travels between processes as the 32-bit value attached
//! to SIGUSR1 via sigqueue(3): bits [31:28] carry the unit ordinal (1..=11,
//! never 0), bits [27:0] carry the magnitude. The sender must reject
//! magnitudes that do not fit rather than truncate them.

use thiserror::Error;

use crate::codec::size::{SizeSpec, Unit};

/// Mask selecting the magnitude bits of a packed payload.
pub const MAGNITUDE_MASK: u32 = 0x0fff_ffff;

/// Bit position of the unit ordinal.
const UNIT_SHIFT: u32 = 28;

/// Errors from payload packing and unpacking.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The magnitude does not fit in the payload's 28 magnitude bits.
    #[error("magnitude {0} too large to encode: maximum is 268435455 units")]
    MagnitudeTooLarge(u64),

    /// The unit ordinal of a received payload is outside 1..=11.
    #[error("payload carries unknown unit ordinal {0}")]
    UnknownUnit(u8),
}

/// Pack a size spec into a payload word.
pub fn encode_payload(spec: &SizeSpec) -> Result<u32, PayloadError> {
    if spec.magnitude & u64::from(MAGNITUDE_MASK) != spec.magnitude {
        return Err(PayloadError::MagnitudeTooLarge(spec.magnitude));
    }
    Ok(u32::from(spec.unit.ordinal()) << UNIT_SHIFT | spec.magnitude as u32)
}

/// Unpack a payload word received from a control signal.
pub fn decode_payload(payload: u32) -> Result<(Unit, u32), PayloadError> {
    let ordinal = (payload >> UNIT_SHIFT) as u8;
    let unit = Unit::from_ordinal(ordinal).ok_or(PayloadError::UnknownUnit(ordinal))?;
    Ok((unit, payload & MAGNITUDE_MASK))
}
