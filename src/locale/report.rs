use std::fmt;
use std::time::Duration;

/// How one translation file compares with the reference file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Same keys in the same order.
    Identical,

    /// Keys or their order differ. Both lists are empty when only the
    /// order differs.
    Different {
        /// In the reference, not in this file.
        missing: Vec<String>,
        /// In this file, not in the reference.
        extra: Vec<String>,
    },

    /// The file was configured but not found in the locales directory.
    Absent,
}

/// The output of a completed check.
///
/// Soft findings only: anything here was recorded without stopping the scan.
#[derive(Debug, Clone)]
pub struct Report {
    /// Name of the reference file.
    pub reference_file: String,

    /// One comparison per configured translation file, in config order.
    pub comparisons: Vec<(String, Comparison)>,

    /// Unknown keys, empty source files, and a scan-ending I/O error if
    /// there was one.
    pub errors: Vec<String>,

    /// Reference keys no source file uses, in reference order.
    pub orphans: Vec<String>,

    /// Names of the source files scanned.
    pub files: Vec<String>,

    /// Wall-clock time of the source scan.
    pub duration: Duration,
}

impl Report {
    /// No unknown keys, no orphans, every translation identical.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
            && self.orphans.is_empty()
            && self
                .comparisons
                .iter()
                .all(|(_, c)| *c == Comparison::Identical)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Reference file is {}", self.reference_file)?;
        for (file, comparison) in &self.comparisons {
            match comparison {
                Comparison::Identical => writeln!(f, "OK for {file}")?,
                Comparison::Absent => writeln!(f, "Missing {file}")?,
                Comparison::Different { missing, extra } => {
                    writeln!(f, "Different list between {} and {file}", self.reference_file)?;
                    writeln!(f, "In {}, not in {file}: {missing:?}", self.reference_file)?;
                    writeln!(f, "In {file}, not in {}: {extra:?}", self.reference_file)?;
                }
            }
        }

        writeln!(
            f,
            "Check finished: {} files in {:.3}s",
            self.files.len(),
            self.duration.as_secs_f64()
        )?;
        writeln!(f, "Errors")?;
        for error in &self.errors {
            writeln!(f, "  {error}")?;
        }
        writeln!(f, "Orphans")?;
        for key in &self.orphans {
            writeln!(f, "  {key}")?;
        }
        Ok(())
    }
}
