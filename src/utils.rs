//! # Helpers for bit sequences and their verification
//!
//! The [`verify`] function counts the positions in which a computed sequence differs from a
//! reference sequence; [`bits_from_values`] and [`indices_from_values`] convert the flat integer
//! sequences of reference files into bits and pattern indices; [`random_bits`] returns a given
//! number of random bits; and [`bit_string`] formats bits compactly for logging.
//!
//! # Examples
//!
//! ```
//! use dlenc::utils;
//!
//! let reference = utils::bits_from_values(&[1, 0, 1, 1])?;
//! let mut computed = reference.clone();
//! assert_eq!(utils::verify(&computed, &reference)?, 0);
//! computed[2] = !computed[2];
//! assert_eq!(utils::verify(&computed, &reference)?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use itertools::Itertools;
use rand::Rng;

use crate::{gf2, Bit, Error};

/// Returns number of positions in which a sequence differs from a reference sequence.
///
/// # Parameters
///
/// - `computed`: Sequence to be checked.
///
/// - `reference`: Reference sequence.
///
/// # Returns
///
/// - `num_diff_bits`: Number of positions in which the two sequences differ (`0` if and only if
///   `computed` reproduces `reference` exactly).
///
/// # Errors
///
/// Returns an error if the two sequences are of different lengths.
pub fn verify(computed: &[Bit], reference: &[Bit]) -> Result<usize, Error> {
    if computed.len() != reference.len() {
        return Err(Error::LengthMismatch {
            expected: reference.len(),
            found: computed.len(),
        });
    }
    Ok(gf2::weight(&gf2::xor(computed, reference)?))
}

/// Returns bits corresponding to a sequence of `0`/`1` integers.
///
/// # Errors
///
/// Returns an error if any value is neither `0` nor `1`.
pub fn bits_from_values(values: &[i64]) -> Result<Vec<Bit>, Error> {
    values.iter().map(|&v| Bit::try_from(v)).collect()
}

/// Returns pattern indices corresponding to a sequence of integers.
///
/// # Parameters
///
/// - `values`: Pattern values.
///
/// - `source_len`: Length of the sequence the pattern will index into (reported on error).
///
/// # Errors
///
/// Returns an error if any value is negative. Values beyond `source_len` are left for
/// [`gf2::gather`] to reject.
pub fn indices_from_values(values: &[i64], source_len: usize) -> Result<Vec<usize>, Error> {
    values
        .iter()
        .map(|&v| {
            usize::try_from(v).map_err(|_| Error::IndexOutOfRange {
                index: v,
                len: source_len,
            })
        })
        .collect()
}

/// Returns given number of random bits.
#[must_use]
pub fn random_bits(num_bits: usize) -> Vec<Bit> {
    let mut rng = rand::rng();
    (0 .. num_bits)
        .map(|_| Bit::from(rng.random_bool(0.5)))
        .collect()
}

/// Returns bits as a string of `0`/`1` characters.
#[must_use]
pub fn bit_string(bits: &[Bit]) -> String {
    bits.iter().join("")
}
