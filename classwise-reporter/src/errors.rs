// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by classwise.

use camino::Utf8PathBuf;
use classwise_metadata::{OutcomeContext, ParseError, RecordStatus, TestClassId};
use config::ConfigError;
use std::{error, fmt};
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse classwise config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    kind: ConfigParseErrorKind,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, kind: ConfigParseErrorKind) -> Self {
        Self {
            config_file: config_file.into(),
            kind,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }

    /// Returns the kind of error this is.
    pub fn kind(&self) -> &ConfigParseErrorKind {
        &self.kind
    }
}

/// The kind of a [`ConfigParseError`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigParseErrorKind {
    /// An error occurred while building the config.
    #[error(transparent)]
    BuildError(Box<ConfigError>),

    /// An error occurred while deserializing the config.
    #[error(transparent)]
    DeserializeError(Box<serde_path_to_error::Error<ConfigError>>),
}

/// An error that occurs while flattening suite results by test class.
///
/// This indicates that the test execution engine broke its contract: every record handed over for
/// reporting must describe a finished test.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum FlattenError {
    /// A record had a status that can't be classified as passed, failed or skipped.
    #[error(
        "unclassifiable status `{status}` for `{test_name}` in class `{test_class}` \
         (suite `{suite}`, {context})"
    )]
    UnclassifiableStatus {
        /// The suite the record was found in.
        suite: String,

        /// The outcome context the record was found in.
        context: OutcomeContext,

        /// The class the record belongs to.
        test_class: TestClassId,

        /// The name of the test or configuration method.
        test_name: String,

        /// The status that couldn't be classified.
        status: RecordStatus,
    },
}

/// An error that occurs while writing per-class reports to disk.
///
/// Any of these aborts report generation: reports written before the error are left in place.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while operating on the file system.
    #[error("error operating on path {file}")]
    Fs {
        /// The file or directory being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// A class name can't be used as a report file name.
    #[error("class name `{}` can't be used as a report file name", test_class.name())]
    InvalidClassName {
        /// The class with the unusable name.
        test_class: TestClassId,
    },

    /// An error occurred while rendering the report for a class.
    #[error("error rendering report for class `{test_class}`")]
    Render {
        /// The class whose report couldn't be rendered.
        test_class: TestClassId,

        /// The underlying error.
        #[source]
        error: Box<dyn error::Error + Send + Sync>,
    },

    /// An error occurred while writing a rendered report.
    #[error("error writing report for class `{test_class}` to {file}")]
    WriteFile {
        /// The class whose report couldn't be written.
        test_class: TestClassId,

        /// The output file.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },
}

/// An error that occurs while reading suite execution results from disk.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadSuitesError {
    /// The file couldn't be read.
    #[error("error reading suite results from {file}")]
    Read {
        /// The file being read.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// The file couldn't be parsed.
    #[error("error parsing suite results in {file}")]
    Parse {
        /// The file being parsed.
        file: Utf8PathBuf,

        /// The underlying parse error.
        #[source]
        error: ParseError,
    },
}

/// An error that occurs while generating per-class reports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerateReportError {
    /// The suite results couldn't be flattened.
    #[error("failed to organize suite results by test class")]
    Flatten(#[from] FlattenError),

    /// The reports couldn't be written.
    #[error("failed generating JUnit XML reports")]
    Write(#[from] WriteReportError),
}

/// Displays an error along with all of the errors that caused it.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E> fmt::Display for DisplayErrorChain<E>
where
    E: error::Error,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        if source.is_some() {
            write!(f, "\n  caused by:")?;
        }
        while let Some(err) = source {
            write!(f, "\n  - {err}")?;
            source = err.source();
        }

        Ok(())
    }
}
