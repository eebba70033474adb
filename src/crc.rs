//! CRC generator polynomials and the matrices that compute CRC bits by a mod-2 product

use crate::{gf2::BitMatrix, Bit, Error};

/// CRC generator polynomial of a given degree
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub struct CrcPolynomial {
    /// Degree `P` of the polynomial (number of CRC bits)
    degree: usize,
    /// Coefficients of `x^(P-1), ..., x, 1` (MSB first); the leading `x^P` term is implicit
    mask: u64,
}

impl CrcPolynomial {
    /// `CRC24C`: `x^24 + x^23 + x^21 + x^20 + x^17 + x^15 + x^13 + x^12 + x^8 + x^4 + x^2 + x + 1`
    pub const CRC24C: Self = Self {
        degree: 24,
        mask: 0xB2_B117,
    };

    /// `CRC11`: `x^11 + x^10 + x^9 + x^5 + 1`
    pub const CRC11: Self = Self {
        degree: 11,
        mask: 0x621,
    };

    /// `CRC6`: `x^6 + x^5 + 1`
    pub const CRC6: Self = Self {
        degree: 6,
        mask: 0x21,
    };

    /// Returns polynomial of given degree with given lower-order coefficients.
    ///
    /// # Parameters
    ///
    /// - `degree`: Degree `P` of the polynomial. Must be in `[1, 63]`.
    ///
    /// - `mask`: Coefficients of `x^(P-1), ..., x, 1`, with the coefficient of `x^(P-1)` as the
    ///   MSB. Must be less than `2^P`.
    ///
    /// # Errors
    ///
    /// Returns an error if `degree` or `mask` is out of range.
    pub fn new(degree: usize, mask: u64) -> Result<Self, Error> {
        if degree == 0 || degree > 63 || mask >> degree != 0 {
            return Err(Error::InvalidInput(format!(
                "Invalid CRC polynomial (degree {degree}, mask {mask:#x})"
            )));
        }
        Ok(Self { degree, mask })
    }

    /// Returns degree of the polynomial.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.degree
    }
}

/// Returns CRC generator matrix for inputs of given length.
///
/// # Parameters
///
/// - `poly`: CRC generator polynomial, of degree `P`.
///
/// - `k`: Length of the sequence whose CRC bits the matrix computes.
///
/// # Returns
///
/// - `crc_gen_matrix`: `k x P` matrix `M` such that `gf2::dot_mod2(u, &M)` holds the coefficients
///   (highest degree first) of the remainder of `u(x) * x^P` modulo `poly`, where `u[0]` is the
///   coefficient of `x^(k-1)` in `u(x)`.
///
/// # Errors
///
/// Returns an error if `k` is less than `P`.
///
/// # Examples
///
/// ```
/// use dlenc::{crc, gf2, Bit};
/// use Bit::{One, Zero};
///
/// let m = crc::crc_generator_matrix(crc::CrcPolynomial::CRC6, 8)?;
/// assert_eq!((m.rows(), m.cols()), (8, 6));
/// // x^6 mod (x^6 + x^5 + 1) = x^5 + 1
/// assert_eq!(m.row(7), [One, Zero, Zero, Zero, Zero, One]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn crc_generator_matrix(poly: CrcPolynomial, k: usize) -> Result<BitMatrix, Error> {
    let p = poly.degree;
    if k < p {
        return Err(Error::InvalidInput(format!(
            "CRC input length {k} is less than CRC length {p}"
        )));
    }
    let top = 1u64 << p;
    let mut rows = vec![Vec::with_capacity(p); k];
    // Row `i` is x^(P + k - 1 - i) mod poly, built from the last row upwards.
    let mut reg = poly.mask;
    for row in rows.iter_mut().rev() {
        row.extend((0 .. p).rev().map(|j| Bit::from((reg >> j) & 1 == 1)));
        reg <<= 1;
        if reg & top != 0 {
            reg ^= top | poly.mask;
        }
    }
    BitMatrix::new(k, p, rows.concat())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{gf2, utils::random_bits};
    use Bit::{One, Zero};

    /// Bit-serial CRC division register, for comparison with the matrix form.
    fn crc_by_division(poly: CrcPolynomial, bits: &[Bit]) -> Vec<Bit> {
        let p = poly.degree;
        let width = (1u64 << p) - 1;
        let mut reg = 0u64;
        for &b in bits {
            let feedback = ((reg >> (p - 1)) & 1 == 1) ^ b.is_one();
            reg = (reg << 1) & width;
            if feedback {
                reg ^= poly.mask;
            }
        }
        (0 .. p).rev().map(|j| Bit::from((reg >> j) & 1 == 1)).collect()
    }

    #[test]
    fn test_new() {
        // Invalid input
        assert!(CrcPolynomial::new(0, 0).is_err());
        assert!(CrcPolynomial::new(64, 1).is_err());
        assert!(CrcPolynomial::new(6, 0x40).is_err());
        // Valid input
        assert_eq!(CrcPolynomial::new(6, 0x21).unwrap(), CrcPolynomial::CRC6);
        assert_eq!(CrcPolynomial::CRC24C.degree(), 24);
    }

    #[test]
    fn test_crc_generator_matrix() {
        // Invalid input
        assert!(crc_generator_matrix(CrcPolynomial::CRC11, 10).is_err());
        // Valid input
        let m = crc_generator_matrix(CrcPolynomial::CRC6, 7).unwrap();
        // x^7 mod (x^6 + x^5 + 1) = x^5 + x + 1
        assert_eq!(m.row(5), [One, Zero, Zero, Zero, One, One]);
        assert_eq!(m.row(6), [One, Zero, Zero, Zero, Zero, One]);
    }

    #[test]
    fn test_matrix_matches_division() {
        for poly in [
            CrcPolynomial::CRC24C,
            CrcPolynomial::CRC11,
            CrcPolynomial::CRC6,
        ] {
            let k = 40 + poly.degree();
            let m = crc_generator_matrix(poly, k).unwrap();
            for _ in 0 .. 10 {
                let u = random_bits(k);
                assert_eq!(gf2::dot_mod2(&u, &m).unwrap(), crc_by_division(poly, &u));
            }
        }
    }

    #[test]
    fn test_codeword_has_zero_remainder() {
        let poly = CrcPolynomial::CRC24C;
        let u = random_bits(56);
        let crc_bits = gf2::dot_mod2(&u, &crc_generator_matrix(poly, 56).unwrap()).unwrap();
        let codeword = gf2::concat(&[&u, &crc_bits]);
        let m = crc_generator_matrix(poly, codeword.len()).unwrap();
        assert_eq!(gf2::weight(&gf2::dot_mod2(&codeword, &m).unwrap()), 0);
    }
}
