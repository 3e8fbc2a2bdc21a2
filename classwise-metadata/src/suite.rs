// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::ParseError;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{collections::BTreeMap, fmt};

/// The identity of a test class, as assigned by the test execution engine.
///
/// Two records belong to the same class if and only if their `TestClassId`s are equal. The
/// `name` alone is not an identity: the same fully qualified name may be loaded from two
/// different modules.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestClassId {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    module: Option<SmolStr>,
    name: SmolStr,
}

impl TestClassId {
    /// Creates a new `TestClassId` for a class that isn't associated with a module.
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            module: None,
            name: name.into(),
        }
    }

    /// Creates a new `TestClassId` for a class loaded from the given module.
    pub fn with_module(module: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            module: Some(module.into()),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name of the class.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the module the class was loaded from, if any.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }
}

impl fmt::Display for TestClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}::{}", module, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// The status of an execution record.
///
/// Only [`Passed`](Self::Passed), [`Failed`](Self::Failed), [`Skipped`](Self::Skipped) and
/// [`SuccessPercentageFailure`](Self::SuccessPercentageFailure) describe a finished test. The
/// remaining statuses are lifecycle states that should never show up in finished results.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    /// The record was created but never started.
    Created,

    /// The record was started but never finished.
    Started,

    /// The test passed.
    Passed,

    /// The test failed.
    Failed,

    /// The test was skipped.
    Skipped,

    /// The test was invoked several times and passed fewer times than its required success
    /// percentage.
    SuccessPercentageFailure,
}

impl RecordStatus {
    /// Returns true if this status describes a finished test.
    pub fn is_classifiable(self) -> bool {
        matches!(
            self,
            Self::Passed | Self::Failed | Self::Skipped | Self::SuccessPercentageFailure
        )
    }

    /// Returns the string form of this status, as used in JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::SuccessPercentageFailure => "success-percentage-failure",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details about why a test or configuration step did not pass.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FailureDetail {
    /// A one-line failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The kind of failure, typically the type of the exception that was thrown.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub ty: Option<String>,

    /// A longer description, typically a stack trace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single finished execution of a test method or configuration step.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExecutionRecord {
    /// The class this record belongs to.
    pub test_class: TestClassId,

    /// The name of the test or configuration method.
    pub name: String,

    /// The status reported by the execution engine.
    pub status: RecordStatus,

    /// The time at which execution started, in milliseconds.
    pub start_millis: i64,

    /// The time at which execution ended, in milliseconds.
    pub end_millis: i64,

    /// Parameters the method was invoked with, for data-driven tests.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,

    /// Failure details, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureDetail>,

    /// Output captured while the method ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl ExecutionRecord {
    /// Creates a new record with no parameters, failure details or output.
    pub fn new(
        test_class: TestClassId,
        name: impl Into<String>,
        status: RecordStatus,
        start_millis: i64,
        end_millis: i64,
    ) -> Self {
        Self {
            test_class,
            name: name.into(),
            status,
            start_millis,
            end_millis,
            parameters: Vec::new(),
            failure: None,
            output: None,
        }
    }

    /// Returns the time spent executing this record, in milliseconds.
    ///
    /// This is negative if the execution engine reported an end time before the start time.
    /// Spans too large for an `i64` wrap around.
    pub fn elapsed_millis(&self) -> i64 {
        self.end_millis.wrapping_sub(self.start_millis)
    }
}

/// A partition of the records in a [`SuiteResult`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum OutcomeContext {
    /// Configuration (setup/teardown) steps that failed.
    FailedConfiguration,

    /// Configuration steps that were skipped.
    SkippedConfiguration,

    /// Tests that failed.
    FailedTest,

    /// Tests that were skipped.
    SkippedTest,

    /// Tests that passed.
    PassedTest,
}

impl OutcomeContext {
    /// The order in which contexts are visited while flattening a suite result.
    pub const FLATTEN_ORDER: [Self; 5] = [
        Self::FailedConfiguration,
        Self::SkippedConfiguration,
        Self::FailedTest,
        Self::SkippedTest,
        Self::PassedTest,
    ];

    /// Returns true if records in this context are configuration steps rather than tests.
    pub fn is_configuration(self) -> bool {
        matches!(self, Self::FailedConfiguration | Self::SkippedConfiguration)
    }

    /// Returns the string form of this context, matching the JSON key it is read from.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailedConfiguration => "failed-configurations",
            Self::SkippedConfiguration => "skipped-configurations",
            Self::FailedTest => "failed-tests",
            Self::SkippedTest => "skipped-tests",
            Self::PassedTest => "passed-tests",
        }
    }
}

impl fmt::Display for OutcomeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The results of one test context within a suite, partitioned by outcome.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuiteResult {
    /// The name of the test context.
    pub name: String,

    /// Configuration steps that failed.
    #[serde(default)]
    pub failed_configurations: Vec<ExecutionRecord>,

    /// Configuration steps that were skipped.
    #[serde(default)]
    pub skipped_configurations: Vec<ExecutionRecord>,

    /// Configuration steps that passed. These are never reported.
    #[serde(default)]
    pub passed_configurations: Vec<ExecutionRecord>,

    /// Tests that failed.
    #[serde(default)]
    pub failed_tests: Vec<ExecutionRecord>,

    /// Tests that were skipped.
    #[serde(default)]
    pub skipped_tests: Vec<ExecutionRecord>,

    /// Tests that passed.
    #[serde(default)]
    pub passed_tests: Vec<ExecutionRecord>,
}

impl SuiteResult {
    /// Creates a new, empty suite result.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Returns the records for the given outcome context.
    pub fn records(&self, context: OutcomeContext) -> &[ExecutionRecord] {
        match context {
            OutcomeContext::FailedConfiguration => &self.failed_configurations,
            OutcomeContext::SkippedConfiguration => &self.skipped_configurations,
            OutcomeContext::FailedTest => &self.failed_tests,
            OutcomeContext::SkippedTest => &self.skipped_tests,
            OutcomeContext::PassedTest => &self.passed_tests,
        }
    }

    /// Returns a mutable reference to the records for the given outcome context.
    pub fn records_mut(&mut self, context: OutcomeContext) -> &mut Vec<ExecutionRecord> {
        match context {
            OutcomeContext::FailedConfiguration => &mut self.failed_configurations,
            OutcomeContext::SkippedConfiguration => &mut self.skipped_configurations,
            OutcomeContext::FailedTest => &mut self.failed_tests,
            OutcomeContext::SkippedTest => &mut self.skipped_tests,
            OutcomeContext::PassedTest => &mut self.passed_tests,
        }
    }

    /// Returns the number of records across all reported outcome contexts.
    pub fn reported_record_count(&self) -> usize {
        OutcomeContext::FLATTEN_ORDER
            .iter()
            .map(|&context| self.records(context).len())
            .sum()
    }
}

/// The results of executing a single suite.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SuiteExecutionResult {
    /// The name of the suite.
    pub name: String,

    /// The results of each test context in the suite, keyed by context name.
    #[serde(default)]
    pub results: BTreeMap<String, SuiteResult>,
}

impl SuiteExecutionResult {
    /// Creates a new suite with no results.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            results: BTreeMap::new(),
        }
    }

    /// Adds a suite result, keyed by its name. Replaces any earlier result with the same name.
    pub fn add_result(&mut self, result: SuiteResult) -> &mut Self {
        self.results.insert(result.name.clone(), result);
        self
    }

    /// Parses a single suite from JSON.
    pub fn parse_json(json: impl AsRef<str>) -> Result<Self, ParseError> {
        serde_json::from_str(json.as_ref()).map_err(ParseError::Json)
    }

    /// Parses a list of suites from JSON.
    pub fn parse_json_list(json: impl AsRef<str>) -> Result<Vec<Self>, ParseError> {
        serde_json::from_str(json.as_ref()).map_err(ParseError::Json)
    }

    /// Serializes this suite to JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .expect("suite execution results can always be serialized")
    }
}
