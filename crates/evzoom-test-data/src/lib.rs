//! evzoom-test-data
//!
//! Example coupling datasets embedded in the crate for use in testing.
//!
//! The datasets are represented as `TestFile` objects which package the raw JSON
//! and create temporary files for programs to operate on.
use std::fs;
use tempfile::{Builder, NamedTempFile};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use evzoom_test_data::TestFile;
/// let (data_file, _temp) = TestFile::couplings_01().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    suffix: &'static str,
}

impl TestFile {
    /// 30 positions, 16 couplings with full 20x20 substitution matrices.
    pub fn couplings_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/couplings_01.json"),
            suffix: "json",
        }
    }
    /// 10 positions, two couplings with 1x1 matrices, stored in ascending score order.
    pub fn couplings_02() -> Self {
        Self {
            filebinary: include_bytes!("../data/couplings_02.json"),
            suffix: "json",
        }
    }
    /// Truncated JSON.
    pub fn malformed_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/malformed.json"),
            suffix: "json",
        }
    }

    /// Raw file contents.
    pub fn bytes(&self) -> &'static [u8] {
        self.filebinary
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }
}
