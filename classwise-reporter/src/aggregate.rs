// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-class results.

use classwise_metadata::{ExecutionRecord, TestClassId};
use std::fmt;

/// Where a classified record ends up within a [`TestClassResults`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Destination {
    /// The record is reported as a failure.
    Failed,

    /// The record is reported as skipped.
    Skipped,

    /// The record is reported as a pass.
    Passed,
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
            Self::Passed => write!(f, "passed"),
        }
    }
}

/// All of the results for the methods of a single test class, gathered across suites.
///
/// Records are borrowed from the suite results they were flattened from.
#[derive(Clone, Debug)]
pub struct TestClassResults<'a> {
    test_class: &'a TestClassId,
    failed: Vec<&'a ExecutionRecord>,
    skipped: Vec<&'a ExecutionRecord>,
    passed: Vec<&'a ExecutionRecord>,
    duration_millis: i64,
}

impl<'a> TestClassResults<'a> {
    pub(crate) fn new(test_class: &'a TestClassId) -> Self {
        Self {
            test_class,
            failed: Vec::new(),
            skipped: Vec::new(),
            passed: Vec::new(),
            duration_millis: 0,
        }
    }

    /// Adds a classified record, and counts its execution time towards the class total.
    ///
    /// The total wraps around on overflow, so it always equals the wrapping sum of the spans.
    pub(crate) fn add_record(&mut self, record: &'a ExecutionRecord, destination: Destination) {
        match destination {
            Destination::Failed => self.failed.push(record),
            Destination::Skipped => self.skipped.push(record),
            Destination::Passed => self.passed.push(record),
        }
        self.duration_millis = self.duration_millis.wrapping_add(record.elapsed_millis());
    }

    /// Returns the class these results are for.
    pub fn test_class(&self) -> &'a TestClassId {
        self.test_class
    }

    /// Returns records reported as failures.
    pub fn failed(&self) -> &[&'a ExecutionRecord] {
        &self.failed
    }

    /// Returns records reported as skipped.
    pub fn skipped(&self) -> &[&'a ExecutionRecord] {
        &self.skipped
    }

    /// Returns records reported as passes.
    pub fn passed(&self) -> &[&'a ExecutionRecord] {
        &self.passed
    }

    /// Returns the records at the given destination.
    pub fn records(&self, destination: Destination) -> &[&'a ExecutionRecord] {
        match destination {
            Destination::Failed => &self.failed,
            Destination::Skipped => &self.skipped,
            Destination::Passed => &self.passed,
        }
    }

    /// Returns the total number of records across all destinations.
    pub fn total(&self) -> usize {
        self.failed.len() + self.skipped.len() + self.passed.len()
    }

    /// Returns the total time spent in every record of this class, in milliseconds.
    ///
    /// Configuration steps count towards this total.
    pub fn duration_millis(&self) -> i64 {
        self.duration_millis
    }
}
