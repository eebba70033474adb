//! This crate implements the downlink channel-coding chain of a polar-coded control or broadcast
//! channel, and checks its output against reference bit vectors. Information bits pass through
//! CRC computation, CRC scrambling with identifier bits, CRC attachment, CRC interleaving,
//! frozen-bit insertion, encoding by a square generator matrix, and rate matching. Every stage is
//! a pure function of its input sequence and one matrix or pattern; all arithmetic is over GF(2).
//!
//! # Examples
//!
//! ```
//! use dlenc::{crc, gf2::BitMatrix, pipeline, utils, Artifacts, ParameterSet};
//!
//! let params = ParameterSet::from_values(&[8, 6, 14, 20, 16])?;
//! let artifacts = Artifacts {
//!     crc_gen_matrix: crc::crc_generator_matrix(crc::CrcPolynomial::CRC6, 14)?,
//!     rnti_bits: utils::bits_from_values(&[1, 0, 1])?,
//!     crc_interleaver_pattern: (0 .. 14).rev().collect(),
//!     info_bit_pattern: (0 .. 16).map(|i| i64::from(i >= 2)).collect(),
//!     enc_gen_matrix: BitMatrix::kronecker_power(16)?,
//!     rate_matching_pattern: (0 .. 20).map(|i| i % 16).collect(),
//! };
//! let info_bits = utils::random_bits(8);
//! let rm_bits = pipeline::encode(&params, &info_bits, &artifacts, &mut ())?;
//! assert_eq!(utils::verify(&rm_bits, &rm_bits)?, 0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

mod common;
pub mod crc;
pub mod gf2;
mod interleaver;
mod params;
pub mod pipeline;
pub mod testcase;
pub mod utils;

pub use common::{Bit, Error};
pub use interleaver::Interleaver;
pub use params::ParameterSet;
pub use pipeline::{encode, Artifacts, Stage, StageObserver};
