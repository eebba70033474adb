//! Code parameters fixing the sizes of every stage in the encoding chain

use serde::{Deserialize, Serialize};

use crate::Error;

/// Sizes of the sequences handled by the encoding chain
#[derive(Clone, Eq, PartialEq, Debug, Copy, Deserialize, Serialize)]
#[allow(non_snake_case)]
pub struct ParameterSet {
    /// Number of information bits
    pub A: usize,
    /// Number of CRC bits
    pub P: usize,
    /// Number of information and CRC bits (`A + P`)
    pub K: usize,
    /// Number of rate-matched output bits
    pub E: usize,
    /// Encoded block length (at least `K`)
    pub N: usize,
}

impl ParameterSet {
    /// Returns parameter set read from a flat integer sequence `A, P, K, E, N`.
    ///
    /// Values beyond the fifth are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than five values are given, if any of them is negative, or if
    /// the resulting parameter set fails [`ParameterSet::check`].
    ///
    /// # Examples
    ///
    /// ```
    /// use dlenc::ParameterSet;
    ///
    /// let params = ParameterSet::from_values(&[4, 3, 7, 6, 8])?;
    /// assert_eq!(params.K, 7);
    /// assert!(ParameterSet::from_values(&[4, 3, 8, 6, 8]).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_values(values: &[i64]) -> Result<Self, Error> {
        if values.len() < 5 {
            return Err(Error::InvalidInput(format!(
                "Expected 5 parameter values (A, P, K, E, N), found {}",
                values.len()
            )));
        }
        let mut sizes = [0usize; 5];
        for (size, &value) in sizes.iter_mut().zip(values) {
            *size = usize::try_from(value).map_err(|_| {
                Error::InvalidInput(format!("Parameter value {value} cannot be negative"))
            })?;
        }
        let [a, p, k, e, n] = sizes;
        let params = Self {
            A: a,
            P: p,
            K: k,
            E: e,
            N: n,
        };
        params.check()?;
        Ok(params)
    }

    /// Checks consistency of the parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if `K` is not equal to `A + P`, or if `N` is less than `K`.
    pub fn check(&self) -> Result<(), Error> {
        if self.A.checked_add(self.P) != Some(self.K) {
            return Err(Error::InvalidInput(format!(
                "K ({}) must equal A + P ({} + {})",
                self.K, self.A, self.P
            )));
        }
        if self.N < self.K {
            return Err(Error::InvalidInput(format!(
                "N ({}) cannot be less than K ({})",
                self.N, self.K
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for ParameterSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A = {}, P = {}, K = {}, E = {}, N = {}",
            self.A, self.P, self.K, self.E, self.N
        )
    }
}
