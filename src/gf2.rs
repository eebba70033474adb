//! # Linear algebra over GF(2)
//!
//! Bit sequences are plain slices of [`Bit`], and binary matrices are held in a [`BitMatrix`].
//! The [`xor`], [`concat`], [`gather`] and [`scatter`] functions manipulate sequences, while
//! [`dot_mod2`] and [`BitMatrix::mul_vec`] compute mod-2 vector-matrix and matrix-vector
//! products by XOR-AND accumulation.
//!
//! # Examples
//!
//! ```
//! use dlenc::{gf2, Bit};
//! use Bit::{One, Zero};
//!
//! let m = gf2::BitMatrix::new(2, 3, vec![One, Zero, One, Zero, One, One])?;
//! assert_eq!(gf2::dot_mod2(&[One, One], &m)?, [One, One, Zero]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use itertools::Itertools;

use crate::{Bit, Error};

/// Binary matrix of fixed dimensions, stored row-major
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct BitMatrix {
    /// Number of rows
    rows: usize,
    /// Number of columns
    cols: usize,
    /// Entries in row-major order
    entries: Vec<Bit>,
}

impl BitMatrix {
    /// Returns matrix with given dimensions and row-major entries.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows * cols` overflows or if `entries.len()` is not equal to
    /// `rows * cols`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlenc::{gf2::BitMatrix, Bit};
    /// use Bit::{One, Zero};
    ///
    /// let m = BitMatrix::new(2, 2, vec![One, Zero, One, One])?;
    /// assert_eq!(m.get(1, 0), One);
    /// assert!(BitMatrix::new(2, 2, vec![One, Zero, One]).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(rows: usize, cols: usize, entries: Vec<Bit>) -> Result<Self, Error> {
        let num_entries = num_entries(rows, cols)?;
        if entries.len() != num_entries {
            return Err(Error::ShapeMismatch {
                what: "matrix entries",
                expected: num_entries,
                found: entries.len(),
            });
        }
        Ok(Self {
            rows,
            cols,
            entries,
        })
    }

    /// Returns `rows x cols` matrix whose entries are given column by column, i.e., `entries` is
    /// the row-major layout of the transposed `cols x rows` matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows * cols` overflows or if `entries.len()` is not equal to
    /// `rows * cols`.
    pub fn from_transposed(rows: usize, cols: usize, entries: &[Bit]) -> Result<Self, Error> {
        Ok(Self::new(cols, rows, entries.to_vec())?.transpose())
    }

    /// Returns all-zero matrix of given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if `rows * cols` overflows.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, Error> {
        Ok(Self {
            rows,
            cols,
            entries: vec![Bit::Zero; num_entries(rows, cols)?],
        })
    }

    /// Returns `n x n` identity matrix.
    ///
    /// # Errors
    ///
    /// Returns an error if `n * n` overflows.
    pub fn identity(n: usize) -> Result<Self, Error> {
        let mut m = Self::zeros(n, n)?;
        for i in 0 .. n {
            m.entries[i * n + i] = Bit::One;
        }
        Ok(m)
    }

    /// Returns the `n x n` Kronecker power of the kernel `[[1, 0], [1, 1]]`.
    ///
    /// # Parameters
    ///
    /// - `n`: Matrix size. Must be a positive power of `2`.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` is not a positive power of `2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlenc::{gf2::BitMatrix, Bit};
    /// use Bit::{One, Zero};
    ///
    /// let g = BitMatrix::kronecker_power(4)?;
    /// assert_eq!(g.row(2), [One, Zero, One, Zero]);
    /// assert_eq!(g.row(3), [One, One, One, One]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn kronecker_power(n: usize) -> Result<Self, Error> {
        if !n.is_power_of_two() {
            return Err(Error::InvalidInput(format!(
                "Transform size must be a positive power of 2 (found {n})"
            )));
        }
        let mut g = Self::identity(1)?;
        while g.rows < n {
            let m = g.rows;
            let mut next = Self::zeros(2 * m, 2 * m)?;
            for i in 0 .. 2 * m {
                for j in 0 .. 2 * m {
                    // Kernel entry is zero only in its upper-right corner.
                    if i < m && j >= m {
                        continue;
                    }
                    next.entries[i * 2 * m + j] = g.get(i % m, j % m);
                }
            }
            g = next;
        }
        Ok(g)
    }

    /// Returns number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns entry in given row and column.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()` or `col >= self.cols()`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Bit {
        assert!(row < self.rows && col < self.cols);
        self.entries[row * self.cols + col]
    }

    /// Returns given row.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[Bit] {
        &self.entries[row * self.cols .. (row + 1) * self.cols]
    }

    /// Returns transposed matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut entries = Vec::with_capacity(self.entries.len());
        for col in 0 .. self.cols {
            for row in 0 .. self.rows {
                entries.push(self.get(row, col));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            entries,
        }
    }

    /// Returns mod-2 matrix-vector product `M * v`.
    ///
    /// # Errors
    ///
    /// Returns an error if `v.len()` is not equal to `self.cols()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use dlenc::{gf2::BitMatrix, Bit};
    /// use Bit::{One, Zero};
    ///
    /// let m = BitMatrix::new(2, 3, vec![One, Zero, One, Zero, One, One])?;
    /// assert_eq!(m.mul_vec(&[One, One, One])?, [Zero, Zero]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn mul_vec(&self, v: &[Bit]) -> Result<Vec<Bit>, Error> {
        if v.len() != self.cols {
            return Err(Error::LengthMismatch {
                expected: self.cols,
                found: v.len(),
            });
        }
        Ok((0 .. self.rows)
            .map(|row| {
                self.row(row)
                    .iter()
                    .zip_eq(v)
                    .fold(Bit::Zero, |acc, (&m, &x)| acc ^ (m & x))
            })
            .collect())
    }
}

/// Returns number of entries of a `rows x cols` matrix.
fn num_entries(rows: usize, cols: usize) -> Result<usize, Error> {
    rows.checked_mul(cols).ok_or_else(|| {
        Error::InvalidInput(format!("Matrix dimensions {rows} x {cols} are too large"))
    })
}

/// Returns elementwise exclusive-or of two sequences.
///
/// # Errors
///
/// Returns an error if `a.len()` is not equal to `b.len()`.
///
/// # Examples
///
/// ```
/// use dlenc::{gf2, Bit};
/// use Bit::{One, Zero};
///
/// assert_eq!(gf2::xor(&[One, One, Zero], &[Zero, One, Zero])?, [One, Zero, Zero]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn xor(a: &[Bit], b: &[Bit]) -> Result<Vec<Bit>, Error> {
    if a.len() != b.len() {
        return Err(Error::LengthMismatch {
            expected: a.len(),
            found: b.len(),
        });
    }
    Ok(a.iter().zip_eq(b).map(|(&x, &y)| x ^ y).collect())
}

/// Returns mod-2 vector-matrix product `v * M`.
///
/// Output bit `j` is the parity of the AND of `v` with column `j` of `m`.
///
/// # Errors
///
/// Returns an error if `v.len()` is not equal to `m.rows()`.
pub fn dot_mod2(v: &[Bit], m: &BitMatrix) -> Result<Vec<Bit>, Error> {
    if v.len() != m.rows() {
        return Err(Error::LengthMismatch {
            expected: m.rows(),
            found: v.len(),
        });
    }
    let mut out = vec![Bit::Zero; m.cols()];
    for (row, _) in v.iter().enumerate().filter(|(_, x)| x.is_one()) {
        for (acc, &entry) in out.iter_mut().zip(m.row(row)) {
            *acc = *acc ^ entry;
        }
    }
    Ok(out)
}

/// Returns concatenation of given sequences, in order.
#[must_use]
pub fn concat(parts: &[&[Bit]]) -> Vec<Bit> {
    parts.iter().flat_map(|part| part.iter().copied()).collect()
}

/// Returns sequence read from `source` at the positions listed in `pattern`.
///
/// Output element `i` is `source[pattern[i]]`. Pattern values may repeat or skip positions.
///
/// # Errors
///
/// Returns an error if any pattern value is not in `[0, source.len())`.
///
/// # Examples
///
/// ```
/// use dlenc::gf2;
///
/// assert_eq!(gf2::gather(&['a', 'b', 'c'], &[2, 2, 0])?, ['c', 'c', 'a']);
/// assert!(gf2::gather(&['a', 'b', 'c'], &[3]).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn gather<T: Copy>(source: &[T], pattern: &[usize]) -> Result<Vec<T>, Error> {
    pattern
        .iter()
        .map(|&index| {
            source
                .get(index)
                .copied()
                .ok_or_else(|| Error::IndexOutOfRange {
                    index: i64::try_from(index).unwrap_or(i64::MAX),
                    len: source.len(),
                })
        })
        .collect()
}

/// Returns sequence of length `mask.len()` holding `values` at the positive mask positions (in
/// ascending order) and the default value everywhere else.
///
/// # Errors
///
/// Returns an error if the number of positive entries in `mask` is not equal to `values.len()`.
///
/// # Examples
///
/// ```
/// use dlenc::{gf2, Bit};
/// use Bit::{One, Zero};
///
/// assert_eq!(gf2::scatter(&[0, 1, 0, 1], &[One, One])?, [Zero, One, Zero, One]);
/// assert!(gf2::scatter(&[0, 1, 0, 1], &[One]).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn scatter<T: Copy + Default>(mask: &[i64], values: &[T]) -> Result<Vec<T>, Error> {
    let active = num_active(mask);
    if active != values.len() {
        return Err(Error::ArityMismatch {
            active,
            values: values.len(),
        });
    }
    let mut out = vec![T::default(); mask.len()];
    let mut remaining = values.iter();
    for (slot, &m) in out.iter_mut().zip(mask) {
        if m > 0 {
            if let Some(&value) = remaining.next() {
                *slot = value;
            }
        }
    }
    Ok(out)
}

/// Returns number of positive entries in a mask.
#[must_use]
pub fn num_active(mask: &[i64]) -> usize {
    mask.iter().filter(|&&m| m > 0).count()
}

/// Returns number of ones in a sequence.
#[must_use]
pub fn weight(v: &[Bit]) -> usize {
    v.iter().filter(|b| b.is_one()).count()
}

#[cfg(test)]
mod tests_of_bit_matrix {
    use super::*;
    use crate::utils::random_bits;
    use Bit::{One, Zero};

    #[test]
    fn test_new() {
        // Invalid input
        assert!(BitMatrix::new(2, 3, vec![Zero; 5]).is_err());
        assert!(matches!(
            BitMatrix::new(usize::MAX, 2, Vec::new()),
            Err(Error::InvalidInput(_))
        ));
        // Valid input
        let m = BitMatrix::new(2, 3, vec![One, Zero, Zero, Zero, One, One]).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(m.row(1), [Zero, One, One]);
    }

    #[test]
    fn test_from_transposed() {
        let m = BitMatrix::from_transposed(3, 2, &[One, Zero, Zero, Zero, One, One]).unwrap();
        assert_eq!((m.rows(), m.cols()), (3, 2));
        assert_eq!(m.row(0), [One, Zero]);
        assert_eq!(m.row(1), [Zero, One]);
        assert_eq!(m.row(2), [Zero, One]);
        assert!(BitMatrix::from_transposed(3, 2, &[One; 7]).is_err());
        assert!(matches!(
            BitMatrix::from_transposed(1 << 32, 1 << 32, &[]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zeros() {
        // Invalid input
        assert!(BitMatrix::zeros(usize::MAX, 3).is_err());
        assert!(BitMatrix::identity(1 << 33).is_err());
        // Valid input
        let m = BitMatrix::zeros(2, 3).unwrap();
        assert_eq!((m.rows(), m.cols()), (2, 3));
        assert_eq!(weight(m.row(0)) + weight(m.row(1)), 0);
        let m = BitMatrix::zeros(0, 4).unwrap();
        assert_eq!((m.rows(), m.cols()), (0, 4));
    }

    #[test]
    fn test_identity() {
        let m = BitMatrix::identity(3).unwrap();
        let v = [One, Zero, One];
        assert_eq!(dot_mod2(&v, &m).unwrap(), v);
        assert_eq!(m.mul_vec(&v).unwrap(), v);
        assert_eq!(m.transpose(), m);
    }

    #[test]
    fn test_kronecker_power() {
        // Invalid input
        assert!(BitMatrix::kronecker_power(0).is_err());
        assert!(BitMatrix::kronecker_power(6).is_err());
        // Valid input
        assert_eq!(BitMatrix::kronecker_power(1).unwrap(), BitMatrix::identity(1).unwrap());
        let g = BitMatrix::kronecker_power(2).unwrap();
        assert_eq!(g, BitMatrix::new(2, 2, vec![One, Zero, One, One]).unwrap());
        let g = BitMatrix::kronecker_power(8).unwrap();
        assert_eq!(g.row(0), [One, Zero, Zero, Zero, Zero, Zero, Zero, Zero]);
        assert_eq!(g.row(5), [One, One, Zero, Zero, One, One, Zero, Zero]);
        assert_eq!(g.row(7), [One; 8]);
    }

    #[test]
    fn test_kronecker_power_is_involution() {
        let g = BitMatrix::kronecker_power(32).unwrap();
        for _ in 0 .. 10 {
            let u = random_bits(32);
            let x = dot_mod2(&u, &g).unwrap();
            assert_eq!(dot_mod2(&x, &g).unwrap(), u);
        }
    }

    #[test]
    fn test_mul_vec() {
        let m = BitMatrix::new(2, 3, vec![One, One, Zero, Zero, One, One]).unwrap();
        // Invalid input
        assert!(m.mul_vec(&[One, One]).is_err());
        // Valid input
        assert_eq!(m.mul_vec(&[One, Zero, One]).unwrap(), [One, One]);
        // Matrix-vector product is the vector-matrix product with the transpose.
        let v = [Zero, One, One];
        assert_eq!(m.mul_vec(&v).unwrap(), dot_mod2(&v, &m.transpose()).unwrap());
    }
}
