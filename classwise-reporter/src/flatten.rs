// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reorganizes suite execution results by test class.
//!
//! Test execution engines organize results by suite, then by test context within a suite, then by
//! outcome. Per-class reports need the opposite view: every record for a class, wherever it was
//! run. [`ResultFlattener`] strips away the suite structure and merges records by
//! [`TestClassId`].

use crate::{
    aggregate::{Destination, TestClassResults},
    config::ReportConfig,
    errors::FlattenError,
};
use classwise_metadata::{
    ExecutionRecord, OutcomeContext, RecordStatus, SuiteExecutionResult, TestClassId,
};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Determines where a record ends up, given the context it was reported in and its own status.
///
/// Returns `None` if the status doesn't describe a finished test.
///
/// Configuration steps that failed or were skipped are always reported as failures against their
/// class, whatever their own status. Skipped tests are reported as failures if
/// `allow_skipped_in_output` is false.
pub fn classify(
    context: OutcomeContext,
    status: RecordStatus,
    allow_skipped_in_output: bool,
) -> Option<Destination> {
    let by_status = match status {
        RecordStatus::Passed => Destination::Passed,
        RecordStatus::Failed | RecordStatus::SuccessPercentageFailure => Destination::Failed,
        RecordStatus::Skipped if allow_skipped_in_output => Destination::Skipped,
        RecordStatus::Skipped => Destination::Failed,
        RecordStatus::Created | RecordStatus::Started => return None,
    };

    if context.is_configuration() {
        Some(Destination::Failed)
    } else {
        Some(by_status)
    }
}

/// Flattens suite execution results into per-class results.
#[derive(Copy, Clone, Debug)]
pub struct ResultFlattener {
    allow_skipped_in_output: bool,
}

impl ResultFlattener {
    /// Creates a new flattener.
    pub fn new(allow_skipped_in_output: bool) -> Self {
        Self {
            allow_skipped_in_output,
        }
    }

    /// Creates a new flattener using the skip policy in the given config.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.allow_skipped_in_output())
    }

    /// Returns true if skipped tests are kept as skipped.
    pub fn allow_skipped_in_output(&self) -> bool {
        self.allow_skipped_in_output
    }

    /// Flattens the given suites, merging records for the same class across suites.
    ///
    /// Fails on the first record with a status that can't be classified, in which case no results
    /// are produced.
    pub fn flatten<'a, I>(&self, suites: I) -> Result<FlattenedResults<'a>, FlattenError>
    where
        I: IntoIterator<Item = &'a SuiteExecutionResult>,
    {
        let mut flattened = FlattenedResults::default();

        for suite in suites {
            debug!(
                suite = %suite.name,
                results = suite.results.len(),
                "flattening suite results",
            );
            for suite_result in suite.results.values() {
                // Passed configuration steps are never reported.
                for context in OutcomeContext::FLATTEN_ORDER {
                    for record in suite_result.records(context) {
                        let destination =
                            classify(context, record.status, self.allow_skipped_in_output)
                                .ok_or_else(|| FlattenError::UnclassifiableStatus {
                                    suite: suite.name.clone(),
                                    context,
                                    test_class: record.test_class.clone(),
                                    test_name: record.name.clone(),
                                    status: record.status,
                                })?;
                        flattened.add_record(record, destination);
                    }
                }
            }
        }

        debug!(classes = flattened.len(), "flattened suite results");
        Ok(flattened)
    }
}

/// Suite execution results, organized by test class.
///
/// Iteration order is the order in which classes were first encountered.
#[derive(Clone, Debug, Default)]
pub struct FlattenedResults<'a> {
    by_class: IndexMap<&'a TestClassId, TestClassResults<'a>>,
}

impl<'a> FlattenedResults<'a> {
    fn add_record(&mut self, record: &'a ExecutionRecord, destination: Destination) {
        if record.end_millis < record.start_millis {
            warn!(
                test_class = %record.test_class,
                test_name = %record.name,
                start_millis = record.start_millis,
                end_millis = record.end_millis,
                "record ends before it starts",
            );
        }

        self.by_class
            .entry(&record.test_class)
            .or_insert_with(|| {
                debug!(test_class = %record.test_class, "found new test class");
                TestClassResults::new(&record.test_class)
            })
            .add_record(record, destination);
    }

    /// Returns the number of classes.
    pub fn len(&self) -> usize {
        self.by_class.len()
    }

    /// Returns true if there are no classes.
    pub fn is_empty(&self) -> bool {
        self.by_class.is_empty()
    }

    /// Returns the results for the given class, if any records were found for it.
    pub fn get(&self, test_class: &TestClassId) -> Option<&TestClassResults<'a>> {
        self.by_class.get(test_class)
    }

    /// Iterates over the results for each class.
    pub fn iter(&self) -> impl Iterator<Item = &TestClassResults<'a>> + '_ {
        self.by_class.values()
    }
}

impl<'a> IntoIterator for FlattenedResults<'a> {
    type Item = TestClassResults<'a>;
    type IntoIter = indexmap::map::IntoValues<&'a TestClassId, TestClassResults<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.by_class.into_values()
    }
}
