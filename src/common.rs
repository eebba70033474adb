//! Types needed in multiple modules

use std::ops::{BitAnd, BitXor, Not};

/// Enumeration of binary symbol values
#[derive(Clone, Eq, PartialEq, Hash, Debug, Copy, Default)]
pub enum Bit {
    /// Binary symbol `0`
    #[default]
    Zero = 0,
    /// Binary symbol `1`
    One = 1,
}

impl Bit {
    /// Returns `true` if the bit is `One`.
    #[must_use]
    pub fn is_one(self) -> bool {
        self == Bit::One
    }
}

impl BitXor for Bit {
    type Output = Bit;

    fn bitxor(self, rhs: Bit) -> Bit {
        if self == rhs {
            Bit::Zero
        } else {
            Bit::One
        }
    }
}

impl BitAnd for Bit {
    type Output = Bit;

    fn bitand(self, rhs: Bit) -> Bit {
        if self.is_one() && rhs.is_one() {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl Not for Bit {
    type Output = Bit;

    fn not(self) -> Bit {
        self ^ Bit::One
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl TryFrom<i64> for Bit {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self, Error> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            _ => Err(Error::InvalidInput(format!(
                "Expected bit value 0 or 1, found {value}"
            ))),
        }
    }
}

impl std::fmt::Display for Bit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bit::Zero => write!(f, "0"),
            Bit::One => write!(f, "1"),
        }
    }
}

/// Custom error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Operands of an elementwise operation differ in length
    #[error("Length mismatch (expected {expected}, found {found})")]
    LengthMismatch {
        /// Length required by the operation
        expected: usize,
        /// Length actually supplied
        found: usize,
    },
    /// Matrix or pattern does not have the size implied by the parameter set
    #[error("Shape mismatch in {what} (expected {expected}, found {found})")]
    ShapeMismatch {
        /// Name of the offending dimension
        what: &'static str,
        /// Size implied by the parameter set
        expected: usize,
        /// Size actually supplied
        found: usize,
    },
    /// Pattern value outside the bounds of the source sequence
    #[error("Index {index} out of range [0, {len})")]
    IndexOutOfRange {
        /// Offending pattern value
        index: i64,
        /// Length of the source sequence
        len: usize,
    },
    /// Number of scattered values differs from number of active mask positions
    #[error("Mask has {active} active positions, but {values} values were supplied")]
    ArityMismatch {
        /// Number of positive mask entries
        active: usize,
        /// Number of values to be scattered
        values: usize,
    },
    /// Invalid input error
    #[error("{0}")]
    InvalidInput(String),
    /// File read/write error
    #[error("{0}")]
    FileReadWriteError(#[from] std::io::Error),
    /// Serde read/write error
    #[error("{0}")]
    SerdeReadWriteError(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_bit_ops() {
        assert_eq!(Zero ^ Zero, Zero);
        assert_eq!(Zero ^ One, One);
        assert_eq!(One ^ Zero, One);
        assert_eq!(One ^ One, Zero);
        assert_eq!(Zero & One, Zero);
        assert_eq!(One & One, One);
        assert_eq!(!One, Zero);
        assert_eq!(Bit::from(true), One);
        assert_eq!(Bit::default(), Zero);
    }

    #[test]
    fn test_try_from() {
        // Invalid input
        assert!(Bit::try_from(2).is_err());
        assert!(Bit::try_from(-1).is_err());
        // Valid input
        assert_eq!(Bit::try_from(0).unwrap(), Zero);
        assert_eq!(Bit::try_from(1).unwrap(), One);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{One}{Zero}"), "10");
        let err = Error::IndexOutOfRange { index: 9, len: 4 };
        assert_eq!(err.to_string(), "Index 9 out of range [0, 4)");
    }
}
