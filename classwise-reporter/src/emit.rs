// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writes per-class reports to disk.

use crate::{aggregate::TestClassResults, errors::WriteReportError, render::ClassReportRenderer};
use camino::{Utf8Path, Utf8PathBuf};
use classwise_metadata::TestClassId;
use std::io;
use tracing::debug;

/// The directory under the output root that reports are written to.
pub static REPORT_DIRECTORY: &str = "xml";

/// Appended to the class name to form a report file name.
pub static RESULTS_FILE_SUFFIX: &str = "_results.xml";

/// A report that was written to disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmittedReport {
    /// The class the report is for.
    pub test_class: TestClassId,

    /// The path the report was written to.
    pub path: Utf8PathBuf,

    /// The number of records reported as failures.
    pub failed: usize,

    /// The number of records reported as skipped.
    pub skipped: usize,

    /// The number of records reported as passes.
    pub passed: usize,

    /// The total time spent in the class, in milliseconds.
    pub duration_millis: i64,
}

/// Writes one report file per test class under an output root.
#[derive(Debug)]
pub struct ReportEmitter<'r, R> {
    output_root: Utf8PathBuf,
    renderer: &'r R,
}

impl<'r, R: ClassReportRenderer> ReportEmitter<'r, R> {
    /// Creates a new emitter writing under `output_root`.
    pub fn new(output_root: impl Into<Utf8PathBuf>, renderer: &'r R) -> Self {
        Self {
            output_root: output_root.into(),
            renderer,
        }
    }

    /// Returns the output root.
    pub fn output_root(&self) -> &Utf8Path {
        &self.output_root
    }

    /// Returns the directory reports are written to.
    pub fn report_dir(&self) -> Utf8PathBuf {
        self.output_root.join(REPORT_DIRECTORY)
    }

    /// Returns the path the report for `test_class` is written to.
    ///
    /// Only the class name is used: classes with the same name overwrite each other's reports.
    /// The name is joined as is. [`Self::emit`] rejects names that contain path separators.
    pub fn report_path(&self, test_class: &TestClassId) -> Utf8PathBuf {
        self.report_dir()
            .join(format!("{}{}", test_class.name(), RESULTS_FILE_SUFFIX))
    }

    /// Clears stale empty directories, creates the report directory, and writes a report for each
    /// class.
    ///
    /// Stops at the first error. Reports written before the error are left on disk.
    pub fn emit<'a>(
        &self,
        results: impl IntoIterator<Item = TestClassResults<'a>>,
    ) -> Result<Vec<EmittedReport>, WriteReportError> {
        remove_empty_directories(&self.output_root)?;

        let report_dir = self.report_dir();
        std::fs::create_dir_all(&report_dir).map_err(|error| WriteReportError::Fs {
            file: report_dir.clone(),
            error,
        })?;

        results
            .into_iter()
            .map(|results| self.emit_one(results))
            .collect()
    }

    fn emit_one(&self, results: TestClassResults<'_>) -> Result<EmittedReport, WriteReportError> {
        let test_class = results.test_class();
        if !is_valid_file_stem(test_class.name()) {
            return Err(WriteReportError::InvalidClassName {
                test_class: test_class.clone(),
            });
        }

        let document =
            self.renderer
                .render(&results)
                .map_err(|error| WriteReportError::Render {
                    test_class: test_class.clone(),
                    error: Box::new(error),
                })?;

        let path = self.report_path(test_class);
        std::fs::write(&path, document).map_err(|error| WriteReportError::WriteFile {
            test_class: test_class.clone(),
            file: path.clone(),
            error,
        })?;
        debug!(%test_class, %path, "wrote class report");

        Ok(EmittedReport {
            test_class: test_class.clone(),
            path,
            failed: results.failed().len(),
            skipped: results.skipped().len(),
            passed: results.passed().len(),
            duration_millis: results.duration_millis(),
        })
    }
}

// Report files must land directly in the report directory.
fn is_valid_file_stem(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\', '\0'])
}

/// Removes empty directories directly beneath `dir`, returning the number removed.
///
/// Files and non-empty directories are left alone. It is not an error for `dir` to not exist.
pub fn remove_empty_directories(dir: &Utf8Path) -> Result<usize, WriteReportError> {
    let fs_error = |file: &Utf8Path| {
        let file = file.to_owned();
        move |error| WriteReportError::Fs { file, error }
    };

    let entries = match dir.read_dir_utf8() {
        Ok(entries) => entries,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(error) => return Err(fs_error(dir)(error)),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(fs_error(dir))?;
        let path = entry.path();
        if !entry.file_type().map_err(fs_error(path))?.is_dir() {
            continue;
        }

        let is_empty = path
            .read_dir_utf8()
            .map_err(fs_error(path))?
            .next()
            .is_none();
        if is_empty {
            std::fs::remove_dir(path).map_err(fs_error(path))?;
            debug!(%path, "removed stale empty directory");
            removed += 1;
        }
    }

    Ok(removed)
}
