//! Human-readable size specifications.
//!
//! A size spec is a run of decimal digits followed by an optional unit
//! suffix: `4KiB`, `512MB`, `10`. Decimal units are powers of 1000, binary
//! (`i`) units are powers of 1024. Suffixes are case-sensitive; no suffix
//! means bytes.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from size-spec parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    /// The unit suffix is not one of the recognized names.
    #[error("invalid size unit: {0:?}")]
    InvalidUnit(String),

    /// The magnitude is missing or not a decimal number.
    #[error("invalid size magnitude: {0:?}")]
    InvalidMagnitude(String),

    /// The derived byte count does not fit in 64 bits.
    #[error("size overflows: {magnitude} {unit}")]
    Overflow { magnitude: u64, unit: Unit },
}

/// Result type for size-spec parsing.
pub type SizeResult<T> = Result<T, SizeError>;

/// A byte-size unit. Ordinals start at 1 so that 0 never appears in the
/// packed resize payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Unit {
    B = 1,
    KB,
    KiB,
    MB,
    MiB,
    GB,
    GiB,
    TB,
    TiB,
    PB,
    PiB,
}

impl Unit {
    /// All units, in ordinal order.
    pub const ALL: [Unit; 11] = [
        Unit::B,
        Unit::KB,
        Unit::KiB,
        Unit::MB,
        Unit::MiB,
        Unit::GB,
        Unit::GiB,
        Unit::TB,
        Unit::TiB,
        Unit::PB,
        Unit::PiB,
    ];

    /// Size of one unit in bytes.
    pub fn in_bytes(self) -> u64 {
        const KB: u64 = 1000;
        const KIB: u64 = 1024;
        match self {
            Unit::B => 1,
            Unit::KB => KB,
            Unit::KiB => KIB,
            Unit::MB => KB * KB,
            Unit::MiB => KIB * KIB,
            Unit::GB => KB * KB * KB,
            Unit::GiB => KIB * KIB * KIB,
            Unit::TB => KB * KB * KB * KB,
            Unit::TiB => KIB * KIB * KIB * KIB,
            Unit::PB => KB * KB * KB * KB * KB,
            Unit::PiB => KIB * KIB * KIB * KIB * KIB,
        }
    }

    /// Wire ordinal of this unit (1..=11).
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Reverse of [`Unit::ordinal`]. Returns `None` for ordinals outside
    /// 1..=11.
    pub fn from_ordinal(ordinal: u8) -> Option<Unit> {
        Unit::ALL.get(usize::from(ordinal).checked_sub(1)?).copied()
    }
}

impl FromStr for Unit {
    type Err = SizeError;

    fn from_str(s: &str) -> SizeResult<Unit> {
        match s {
            "B" => Ok(Unit::B),
            "KB" => Ok(Unit::KB),
            "KiB" => Ok(Unit::KiB),
            "MB" => Ok(Unit::MB),
            "MiB" => Ok(Unit::MiB),
            "GB" => Ok(Unit::GB),
            "GiB" => Ok(Unit::GiB),
            "TB" => Ok(Unit::TB),
            "TiB" => Ok(Unit::TiB),
            "PB" => Ok(Unit::PB),
            "PiB" => Ok(Unit::PiB),
            other => Err(SizeError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Unit::B => "B",
            Unit::KB => "KB",
            Unit::KiB => "KiB",
            Unit::MB => "MB",
            Unit::MiB => "MiB",
            Unit::GB => "GB",
            Unit::GiB => "GiB",
            Unit::TB => "TB",
            Unit::TiB => "TiB",
            Unit::PB => "PB",
            Unit::PiB => "PiB",
        };
        write!(f, "{}", name)
    }
}

/// A parsed size specification: magnitude in units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeSpec {
    pub magnitude: u64,
    pub unit: Unit,
}

impl SizeSpec {
    /// Derived byte count, `magnitude × unit`.
    pub fn in_bytes(&self) -> SizeResult<u64> {
        self.magnitude
            .checked_mul(self.unit.in_bytes())
            .ok_or(SizeError::Overflow {
                magnitude: self.magnitude,
                unit: self.unit,
            })
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}

/// Split a size spec into its magnitude and unit.
pub fn split_size_spec(spec: &str) -> SizeResult<SizeSpec> {
    let sep = spec
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(spec.len());
    let (digits, suffix) = spec.split_at(sep);

    let magnitude = digits
        .parse::<u64>()
        .map_err(|_| SizeError::InvalidMagnitude(digits.to_string()))?;
    let unit = if suffix.is_empty() {
        Unit::B
    } else {
        suffix.parse()?
    };

    Ok(SizeSpec { magnitude, unit })
}

/// Parse a size spec all the way down to a byte count.
pub fn parse_size(spec: &str) -> SizeResult<u64> {
    split_size_spec(spec)?.in_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_suffix() {
        let spec = split_size_spec("4KiB").unwrap();
        assert_eq!(spec.magnitude, 4);
        assert_eq!(spec.unit, Unit::KiB);
        assert_eq!(spec.in_bytes().unwrap(), 4096);
    }

    #[test]
    fn decimal_suffix() {
        assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
        assert_eq!(parse_size("2GB").unwrap(), 2_000_000_000);
    }

    #[test]
    fn no_suffix_means_bytes() {
        let spec = split_size_spec("10").unwrap();
        assert_eq!(spec.unit, Unit::B);
        assert_eq!(spec.in_bytes().unwrap(), 10);
    }

    #[test]
    fn unknown_suffix_rejected() {
        assert_eq!(
            split_size_spec("5XYZ"),
            Err(SizeError::InvalidUnit("XYZ".to_string()))
        );
    }

    #[test]
    fn suffix_is_case_sensitive() {
        assert!(matches!(
            split_size_spec("4kib"),
            Err(SizeError::InvalidUnit(_))
        ));
    }

    #[test]
    fn missing_magnitude_rejected() {
        assert!(matches!(
            split_size_spec("KiB"),
            Err(SizeError::InvalidMagnitude(_))
        ));
        assert!(matches!(
            split_size_spec(""),
            Err(SizeError::InvalidMagnitude(_))
        ));
    }

    #[test]
    fn overflowing_byte_count_rejected() {
        assert!(matches!(
            parse_size("99999999999PiB"),
            Err(SizeError::Overflow { .. })
        ));
    }

    #[test]
    fn ordinal_round_trip() {
        for unit in Unit::ALL {
            assert_eq!(Unit::from_ordinal(unit.ordinal()), Some(unit));
        }
        assert_eq!(Unit::from_ordinal(0), None);
        assert_eq!(Unit::from_ordinal(12), None);
    }
}
