//! Reference test cases: loading from directories, running, and saving results
//!
//! A test case directory holds one file per artifact, each a flat list of integers separated by
//! commas and/or whitespace. Generator matrices are stored transposed (`crc_gen_m.txt` holds the
//! `P x K` transpose of the CRC generator matrix, and `enc_gen_m.txt` the transpose of the
//! encoder generator matrix).

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::{gf2::BitMatrix, pipeline, utils, Artifacts, Bit, Error, ParameterSet};

/// Parameter file name
pub const PARAMS_FILE: &str = "params.txt";
/// Information bits file name
pub const INFO_BITS_FILE: &str = "info_bits.txt";
/// CRC generator matrix file name
pub const CRC_GEN_MATRIX_FILE: &str = "crc_gen_m.txt";
/// Identifier bits file name
pub const RNTI_BITS_FILE: &str = "rnti_bits.txt";
/// CRC interleaver pattern file name
pub const CRC_INTERLEAVER_PATTERN_FILE: &str = "crc_interleaver_pattern.txt";
/// Information bit mask file name
pub const INFO_BIT_PATTERN_FILE: &str = "info_bit_pattern.txt";
/// Encoder generator matrix file name
pub const ENC_GEN_MATRIX_FILE: &str = "enc_gen_m.txt";
/// Rate matching pattern file name
pub const RATE_MATCHING_PATTERN_FILE: &str = "rate_matching_pattern.txt";
/// Reference rate-matched bits file name
pub const RM_BITS_FILE: &str = "rm_bits.txt";

/// Everything needed to encode one block and check it against its reference
#[derive(Clone, PartialEq, Debug)]
pub struct TestCase {
    /// Name of the test case (its directory name)
    pub name: String,
    /// Code parameters
    pub params: ParameterSet,
    /// Information bits
    pub info_bits: Vec<Bit>,
    /// Matrices and patterns configuring the encoding chain
    pub artifacts: Artifacts,
    /// Reference rate-matched bits
    pub rm_ref_bits: Vec<Bit>,
}

/// Outcome of running a test case
#[derive(Clone, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct TestCaseReport {
    /// Name of the test case
    pub name: String,
    /// Code parameters
    pub params: ParameterSet,
    /// Number of rate-matched bits differing from the reference
    pub num_diff_bits: usize,
    /// Whether the reference was reproduced exactly
    pub passed: bool,
}

impl TestCase {
    /// Returns test case loaded from given directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read or parsed, if any bit value is neither `0`
    /// nor `1`, if any pattern value is negative, or if any artifact has the wrong size for
    /// the parameters in the directory.
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let params = ParameterSet::from_values(&read_values(&dir.join(PARAMS_FILE))?)?;
        let info_bits = read_bits(&dir.join(INFO_BITS_FILE))?;
        let crc_gen_matrix = BitMatrix::from_transposed(
            params.K,
            params.P,
            &read_bits(&dir.join(CRC_GEN_MATRIX_FILE))?,
        )?;
        let rnti_bits = read_bits(&dir.join(RNTI_BITS_FILE))?;
        let crc_interleaver_pattern = utils::indices_from_values(
            &read_values(&dir.join(CRC_INTERLEAVER_PATTERN_FILE))?,
            params.K,
        )?;
        let info_bit_pattern = read_values(&dir.join(INFO_BIT_PATTERN_FILE))?;
        let enc_gen_matrix = BitMatrix::from_transposed(
            params.N,
            params.N,
            &read_bits(&dir.join(ENC_GEN_MATRIX_FILE))?,
        )?;
        let rate_matching_pattern = utils::indices_from_values(
            &read_values(&dir.join(RATE_MATCHING_PATTERN_FILE))?,
            params.N,
        )?;
        let rm_ref_bits = read_bits(&dir.join(RM_BITS_FILE))?;
        let artifacts = Artifacts {
            crc_gen_matrix,
            rnti_bits,
            crc_interleaver_pattern,
            info_bit_pattern,
            enc_gen_matrix,
            rate_matching_pattern,
        };
        artifacts.check(&params)?;
        if rm_ref_bits.len() != params.E {
            return Err(Error::ShapeMismatch {
                what: "reference rate-matched bits",
                expected: params.E,
                found: rm_ref_bits.len(),
            });
        }
        Ok(Self {
            name: dir
                .file_name()
                .map_or_else(|| dir.display().to_string(), |s| s.to_string_lossy().into()),
            params,
            info_bits,
            artifacts,
            rm_ref_bits,
        })
    }

    /// Encodes the information bits and compares the result with the reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoding chain fails.
    pub fn run(&self) -> Result<TestCaseReport, Error> {
        let span = tracing::info_span!("test_case", name = %self.name);
        let _guard = span.enter();
        tracing::debug!(params = %self.params, "encoding");
        let rm_bits = pipeline::encode(
            &self.params,
            &self.info_bits,
            &self.artifacts,
            &mut pipeline::TraceObserver,
        )?;
        let num_diff_bits = utils::verify(&rm_bits, &self.rm_ref_bits)?;
        if num_diff_bits == 0 {
            tracing::info!("reference reproduced");
        } else {
            tracing::warn!(num_diff_bits, "mismatch with reference");
        }
        Ok(TestCaseReport {
            name: self.name.clone(),
            params: self.params,
            num_diff_bits,
            passed: num_diff_bits == 0,
        })
    }
}

/// Runs test cases from given directories in parallel and saves their reports to a JSON file.
///
/// # Parameters
///
/// - `dirs`: Test case directories.
///
/// - `json_filename`: Name of JSON file to which reports must be saved.
///
/// # Returns
///
/// - `reports`: Reports for all test cases, in the order of `dirs`.
///
/// # Errors
///
/// Returns the first error encountered in loading or running a test case, or an error in
/// writing the JSON file.
pub fn run_test_cases(
    dirs: &[PathBuf],
    json_filename: &str,
) -> Result<Vec<TestCaseReport>, Error> {
    let reports = dirs
        .par_iter()
        .map(|dir| {
            TestCase::load(dir)
                .and_then(|case| case.run())
                .inspect_err(|err| {
                    tracing::error!(dir = %dir.display(), %err, "test case failed");
                })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    save_reports(&reports, json_filename)?;
    Ok(reports)
}

/// Saves test case reports to a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save_reports(reports: &[TestCaseReport], json_filename: &str) -> Result<(), Error> {
    let writer = BufWriter::new(File::create(json_filename)?);
    serde_json::to_writer_pretty(writer, reports)?;
    Ok(())
}

/// Returns integers in a file, separated by commas and/or whitespace.
fn read_values(path: &Path) -> Result<Vec<i64>, Error> {
    let text = std::fs::read_to_string(path)?;
    parse_values(&text).map_err(|err| Error::InvalidInput(format!("{}: {err}", path.display())))
}

/// Returns bits in a file.
fn read_bits(path: &Path) -> Result<Vec<Bit>, Error> {
    utils::bits_from_values(&read_values(path)?)
        .map_err(|err| Error::InvalidInput(format!("{}: {err}", path.display())))
}

/// Returns integers in a string, separated by commas and/or whitespace.
fn parse_values(text: &str) -> Result<Vec<i64>, std::num::ParseIntError> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use std::fs;

    /// Writes the files of a small test case (`A = 4, P = 3, N = 8, E = 6`) and returns its
    /// directory.
    fn write_small_case(name: &str, rm_bits: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dlenc-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        // Transpose of the 7 x 3 CRC generator matrix with a single one in row 3, column 1.
        let mut crc_gen = vec![0; 21];
        crc_gen[7 + 3] = 1;
        let identity = (0 .. 64).map(|i| i64::from(i % 9 == 0)).collect::<Vec<_>>();
        let files = [
            (PARAMS_FILE, "4,3,7,6,8\n".to_string()),
            (INFO_BITS_FILE, "1\n0\n1\n1\n".to_string()),
            (CRC_GEN_MATRIX_FILE, crc_gen.iter().join(",")),
            (RNTI_BITS_FILE, "1".to_string()),
            (CRC_INTERLEAVER_PATTERN_FILE, "0 1 2 3 4 5 6".to_string()),
            (INFO_BIT_PATTERN_FILE, "1,1,1,1,1,1,1,0".to_string()),
            (ENC_GEN_MATRIX_FILE, identity.iter().join(", ")),
            (RATE_MATCHING_PATTERN_FILE, "0,1,2,3,4,5".to_string()),
            (RM_BITS_FILE, rm_bits.to_string()),
        ];
        for (file, contents) in files {
            fs::write(dir.join(file), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_parse_values() {
        assert!(parse_values("").unwrap().is_empty());
        assert_eq!(parse_values("1, 0,\n-2\t3,").unwrap(), [1, 0, -2, 3]);
        assert!(parse_values("1, x").is_err());
    }

    #[test]
    fn test_load_and_run() {
        let dir = write_small_case("load-and-run", "1,0,1,1,0,1");
        let case = TestCase::load(&dir).unwrap();
        assert_eq!(case.params.N, 8);
        assert_eq!(case.artifacts.crc_gen_matrix.get(3, 1), Bit::One);
        assert_eq!(case.artifacts.enc_gen_matrix, BitMatrix::identity(8).unwrap());
        let report = case.run().unwrap();
        assert_eq!(report.num_diff_bits, 0);
        assert!(report.passed);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_single_bit_mismatch() {
        let dir = write_small_case("single-bit-mismatch", "1,0,1,1,0,0");
        let report = TestCase::load(&dir).unwrap().run().unwrap();
        assert_eq!(report.num_diff_bits, 1);
        assert!(!report.passed);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_load_errors() {
        // Reference of wrong length
        let dir = write_small_case("bad-reference", "1,0,1,1,0");
        assert!(matches!(
            TestCase::load(&dir),
            Err(Error::ShapeMismatch { .. })
        ));
        // CRC generator matrix with a missing row
        fs::write(dir.join(RM_BITS_FILE), "1,0,1,1,0,1").unwrap();
        fs::write(dir.join(CRC_GEN_MATRIX_FILE), vec!["0"; 18].join(",")).unwrap();
        assert!(matches!(
            TestCase::load(&dir),
            Err(Error::ShapeMismatch { .. })
        ));
        // Non-binary information bit
        fs::write(dir.join(CRC_GEN_MATRIX_FILE), vec!["0"; 21].join(",")).unwrap();
        fs::write(dir.join(INFO_BITS_FILE), "1,0,2,1").unwrap();
        assert!(matches!(TestCase::load(&dir), Err(Error::InvalidInput(_))));
        // Negative rate matching index
        fs::write(dir.join(INFO_BITS_FILE), "1,0,1,1").unwrap();
        fs::write(dir.join(RATE_MATCHING_PATTERN_FILE), "0,1,2,3,4,-5").unwrap();
        assert!(matches!(
            TestCase::load(&dir),
            Err(Error::IndexOutOfRange { index: -5, len: 8 })
        ));
        // Encoder size whose square overflows
        fs::write(dir.join(PARAMS_FILE), "4,3,7,6,4294967296").unwrap();
        fs::write(dir.join(ENC_GEN_MATRIX_FILE), "").unwrap();
        assert!(matches!(TestCase::load(&dir), Err(Error::InvalidInput(_))));
        // Missing file
        fs::remove_file(dir.join(PARAMS_FILE)).unwrap();
        assert!(matches!(
            TestCase::load(&dir),
            Err(Error::FileReadWriteError(_))
        ));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_run_test_cases() {
        let dirs = vec![
            write_small_case("batch-pass", "1,0,1,1,0,1"),
            write_small_case("batch-fail", "0,1,0,0,1,0"),
        ];
        let json_filename = std::env::temp_dir()
            .join(format!("dlenc-{}-batch.json", std::process::id()))
            .display()
            .to_string();
        let reports = run_test_cases(&dirs, &json_filename).unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].passed);
        assert_eq!(reports[1].num_diff_bits, 6);
        let saved: Vec<TestCaseReport> =
            serde_json::from_reader(File::open(&json_filename).unwrap()).unwrap();
        assert_eq!(saved, reports);
        // A broken case fails the whole batch.
        fs::remove_file(dirs[1].join(INFO_BITS_FILE)).unwrap();
        assert!(run_test_cases(&dirs, &json_filename).is_err());
        for dir in dirs {
            fs::remove_dir_all(dir).unwrap();
        }
        fs::remove_file(json_filename).unwrap();
    }
}
