//! Downlink encoding chain: CRC, scrambling, attachment, interleaving, frozen-bit insertion,
//! encoding and rate matching

use std::fmt;

use crate::{
    gf2::{self, BitMatrix},
    utils, Bit, Error, Interleaver, ParameterSet,
};

/// Enumeration of encoding chain stages, in execution order
#[derive(Clone, Eq, PartialEq, Hash, Debug, Copy)]
pub enum Stage {
    /// CRC computation
    Crc,
    /// CRC scrambling with identifier bits
    Scramble,
    /// CRC attachment to information bits
    Attach,
    /// CRC interleaving
    Interleave,
    /// Frozen-bit insertion
    FreezeInsert,
    /// Linear block encoding
    Encode,
    /// Rate matching
    RateMatch,
}

impl Stage {
    /// All stages, in execution order.
    pub const ALL: [Stage; 7] = [
        Stage::Crc,
        Stage::Scramble,
        Stage::Attach,
        Stage::Interleave,
        Stage::FreezeInsert,
        Stage::Encode,
        Stage::RateMatch,
    ];

    /// Returns the name of the sequence output by the stage.
    #[must_use]
    pub fn output_name(self) -> &'static str {
        match self {
            Stage::Crc => "crc_bits",
            Stage::Scramble => "scr_bits",
            Stage::Attach => "info_crc_bits",
            Stage::Interleave => "intrl_bits",
            Stage::FreezeInsert => "frozen_bits",
            Stage::Encode => "enc_bits",
            Stage::RateMatch => "rm_bits",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.output_name())
    }
}

/// Receiver of every intermediate sequence produced by [`encode`]
pub trait StageObserver {
    /// Called once per stage, in execution order, with the output of that stage.
    fn observe(&mut self, stage: Stage, bits: &[Bit]);
}

impl StageObserver for () {
    fn observe(&mut self, _stage: Stage, _bits: &[Bit]) {}
}

/// Observer emitting one `tracing` debug event per stage
#[derive(Clone, Eq, PartialEq, Debug, Copy, Default)]
pub struct TraceObserver;

impl StageObserver for TraceObserver {
    fn observe(&mut self, stage: Stage, bits: &[Bit]) {
        tracing::debug!(
            %stage,
            len = bits.len(),
            bits = %utils::bit_string(bits),
            "stage output"
        );
    }
}

/// Observer keeping a copy of every intermediate sequence
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct StageRecorder {
    /// Stage outputs, in the order observed
    outputs: Vec<(Stage, Vec<Bit>)>,
}

impl StageRecorder {
    /// Returns new, empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns output of given stage, if it has been observed.
    #[must_use]
    pub fn output(&self, stage: Stage) -> Option<&[Bit]> {
        self.outputs
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, bits)| bits.as_slice())
    }

    /// Returns stages observed so far, in order.
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.outputs.iter().map(|(s, _)| *s)
    }
}

impl StageObserver for StageRecorder {
    fn observe(&mut self, stage: Stage, bits: &[Bit]) {
        self.outputs.push((stage, bits.to_vec()));
    }
}

/// Static configuration of the encoding chain, fixed for a run
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Artifacts {
    /// CRC generator matrix (`K x P`)
    pub crc_gen_matrix: BitMatrix,
    /// Identifier bits scrambling the CRC (at most `P` of them)
    pub rnti_bits: Vec<Bit>,
    /// CRC interleaver pattern (permutation of `[0, K)`)
    pub crc_interleaver_pattern: Vec<usize>,
    /// Information bit mask (length `N`, with `K` positive entries)
    pub info_bit_pattern: Vec<i64>,
    /// Encoder generator matrix (`N x N`)
    pub enc_gen_matrix: BitMatrix,
    /// Rate matching pattern (length `E`, values in `[0, N)`)
    pub rate_matching_pattern: Vec<usize>,
}

impl Artifacts {
    /// Checks that every matrix and pattern has the size implied by given parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if any size differs from the one implied by `params`, or if the number
    /// of positive entries in the information bit mask is not `K`.
    pub fn check(&self, params: &ParameterSet) -> Result<(), Error> {
        check_size("CRC generator matrix rows", params.K, self.crc_gen_matrix.rows())?;
        check_size("CRC generator matrix columns", params.P, self.crc_gen_matrix.cols())?;
        if self.rnti_bits.len() > params.P {
            return Err(Error::ShapeMismatch {
                what: "RNTI bits (at most P)",
                expected: params.P,
                found: self.rnti_bits.len(),
            });
        }
        check_size(
            "CRC interleaver pattern",
            params.K,
            self.crc_interleaver_pattern.len(),
        )?;
        check_size("information bit pattern", params.N, self.info_bit_pattern.len())?;
        let active = gf2::num_active(&self.info_bit_pattern);
        if active != params.K {
            return Err(Error::ArityMismatch {
                active,
                values: params.K,
            });
        }
        check_size("encoder generator matrix rows", params.N, self.enc_gen_matrix.rows())?;
        check_size("encoder generator matrix columns", params.N, self.enc_gen_matrix.cols())?;
        check_size(
            "rate matching pattern",
            params.E,
            self.rate_matching_pattern.len(),
        )?;
        Ok(())
    }
}

/// Returns rate-matched bits for given information bits.
///
/// All shapes are checked before the first stage runs; after that, the stages run in the order
/// of [`Stage::ALL`], and the first error aborts the remaining ones. The observer is called with
/// the output of every stage that completes.
///
/// # Parameters
///
/// - `params`: Code parameters.
///
/// - `info_bits`: Information bits (`A` of them).
///
/// - `artifacts`: Matrices and patterns configuring the stages.
///
/// - `observer`: Receiver of intermediate sequences (use `&mut ()` to discard them).
///
/// # Returns
///
/// - `rm_bits`: Rate-matched bits (`E` of them).
///
/// # Errors
///
/// Returns an error if `params` is inconsistent, if any input has the wrong size, or if a
/// pattern references a position outside the sequence it reads from.
///
/// # Examples
///
/// ```
/// use dlenc::{gf2::BitMatrix, pipeline, Artifacts, Bit, ParameterSet};
/// use Bit::{One, Zero};
///
/// let params = ParameterSet::from_values(&[1, 1, 2, 3, 2])?;
/// let artifacts = Artifacts {
///     crc_gen_matrix: BitMatrix::new(2, 1, vec![One, One])?,
///     rnti_bits: vec![],
///     crc_interleaver_pattern: vec![1, 0],
///     info_bit_pattern: vec![1, 1],
///     enc_gen_matrix: BitMatrix::kronecker_power(2)?,
///     rate_matching_pattern: vec![0, 1, 0],
/// };
/// let rm_bits = pipeline::encode(&params, &[One], &artifacts, &mut ())?;
/// assert_eq!(rm_bits, [One, One, One]);
/// let rm_bits = pipeline::encode(&params, &[Zero], &artifacts, &mut ())?;
/// assert_eq!(rm_bits, [One, Zero, One]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encode<O: StageObserver + ?Sized>(
    params: &ParameterSet,
    info_bits: &[Bit],
    artifacts: &Artifacts,
    observer: &mut O,
) -> Result<Vec<Bit>, Error> {
    params.check()?;
    check_size("information bits", params.A, info_bits.len())?;
    artifacts.check(params)?;

    let crc = crc_bits(info_bits, &artifacts.crc_gen_matrix)?;
    observer.observe(Stage::Crc, &crc);
    let scr_bits = scramble(&crc, &artifacts.rnti_bits)?;
    observer.observe(Stage::Scramble, &scr_bits);
    let info_crc_bits = attach(info_bits, &scr_bits);
    observer.observe(Stage::Attach, &info_crc_bits);
    let intrl_bits = interleave(&info_crc_bits, &artifacts.crc_interleaver_pattern)?;
    observer.observe(Stage::Interleave, &intrl_bits);
    let frozen_bits = insert_frozen_bits(&intrl_bits, &artifacts.info_bit_pattern)?;
    observer.observe(Stage::FreezeInsert, &frozen_bits);
    let enc_bits = encode_block(&frozen_bits, &artifacts.enc_gen_matrix)?;
    observer.observe(Stage::Encode, &enc_bits);
    let rm_bits = rate_match(&enc_bits, &artifacts.rate_matching_pattern)?;
    observer.observe(Stage::RateMatch, &rm_bits);
    Ok(rm_bits)
}

/// Returns CRC bits for given information bits.
///
/// The CRC register starts from all ones, which is modelled by prepending `P` one bits to the
/// information bits before the product with the `(A + P) x P` generator matrix.
///
/// # Errors
///
/// Returns an error if `info_bits.len() + P` is not the number of matrix rows.
pub fn crc_bits(info_bits: &[Bit], crc_gen_matrix: &BitMatrix) -> Result<Vec<Bit>, Error> {
    let ones = vec![Bit::One; crc_gen_matrix.cols()];
    gf2::dot_mod2(&gf2::concat(&[&ones, info_bits]), crc_gen_matrix)
}

/// Returns CRC bits scrambled with identifier bits, which are zero-padded on the left to the
/// CRC length.
///
/// # Errors
///
/// Returns an error if there are more identifier bits than CRC bits.
pub fn scramble(crc_bits: &[Bit], rnti_bits: &[Bit]) -> Result<Vec<Bit>, Error> {
    if rnti_bits.len() > crc_bits.len() {
        return Err(Error::ShapeMismatch {
            what: "RNTI bits (at most P)",
            expected: crc_bits.len(),
            found: rnti_bits.len(),
        });
    }
    let padding = vec![Bit::Zero; crc_bits.len() - rnti_bits.len()];
    gf2::xor(crc_bits, &gf2::concat(&[&padding, rnti_bits]))
}

/// Returns information bits followed by scrambled CRC bits.
#[must_use]
pub fn attach(info_bits: &[Bit], scr_bits: &[Bit]) -> Vec<Bit> {
    gf2::concat(&[info_bits, scr_bits])
}

/// Returns bits permuted by the CRC interleaver pattern.
///
/// # Errors
///
/// Returns an error if `pattern` is not a permutation of `[0, info_crc_bits.len())`.
pub fn interleave(info_crc_bits: &[Bit], pattern: &[usize]) -> Result<Vec<Bit>, Error> {
    let interleaver = Interleaver::new(pattern)?;
    let mut intrl_bits = Vec::with_capacity(interleaver.len());
    interleaver.interleave(info_crc_bits, &mut intrl_bits)?;
    Ok(intrl_bits)
}

/// Returns `N` bits holding the interleaved bits at the positive positions of the information
/// bit mask and frozen zeros elsewhere.
///
/// # Errors
///
/// Returns an error if the number of positive mask entries is not `intrl_bits.len()`.
pub fn insert_frozen_bits(
    intrl_bits: &[Bit],
    info_bit_pattern: &[i64],
) -> Result<Vec<Bit>, Error> {
    gf2::scatter(info_bit_pattern, intrl_bits)
}

/// Returns code bits for given frozen-inserted bits.
///
/// # Errors
///
/// Returns an error if `frozen_bits.len()` is not the number of matrix rows.
pub fn encode_block(frozen_bits: &[Bit], enc_gen_matrix: &BitMatrix) -> Result<Vec<Bit>, Error> {
    gf2::dot_mod2(frozen_bits, enc_gen_matrix)
}

/// Returns code bits selected by the rate matching pattern, which may repeat or skip positions.
///
/// # Errors
///
/// Returns an error if any pattern value is not in `[0, enc_bits.len())`.
pub fn rate_match(enc_bits: &[Bit], pattern: &[usize]) -> Result<Vec<Bit>, Error> {
    gf2::gather(enc_bits, pattern)
}

/// Checks that a size matches the one implied by the parameters.
fn check_size(what: &'static str, expected: usize, found: usize) -> Result<(), Error> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            what,
            expected,
            found,
        })
    }
}
