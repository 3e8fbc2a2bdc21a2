// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of per-class results into report documents.

use crate::{
    aggregate::{Destination, TestClassResults},
    config::ReportConfig,
};
use classwise_metadata::{ExecutionRecord, RecordStatus};
use quick_junit::{NonSuccessKind, Report, SerializeError, TestCase, TestCaseStatus, TestSuite};
use std::{error, time::Duration};

/// Renders the results for a single class into a document.
///
/// The emitter writes whatever this returns to the class's report file, and knows nothing about
/// the document's schema.
pub trait ClassReportRenderer {
    /// The error returned if rendering fails.
    type Error: error::Error + Send + Sync + 'static;

    /// Renders `results` into a document.
    fn render(&self, results: &TestClassResults<'_>) -> Result<String, Self::Error>;
}

/// Renders per-class results as JUnit XML.
///
/// Each class becomes a report with a single test suite named after the class. Failed records
/// come first, followed by skipped and passed records.
#[derive(Copy, Clone, Debug)]
pub struct JunitRenderer {
    store_output: bool,
}

impl JunitRenderer {
    /// Creates a new renderer.
    pub fn new(store_output: bool) -> Self {
        Self { store_output }
    }

    /// Creates a new renderer with the output settings from the given config.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.store_output())
    }

    fn test_case(&self, record: &ExecutionRecord, destination: Destination) -> TestCase {
        let status = match destination {
            Destination::Passed => TestCaseStatus::success(),
            Destination::Skipped => {
                let mut status = TestCaseStatus::skipped();
                if let Some(message) = record
                    .failure
                    .as_ref()
                    .and_then(|failure| failure.message.as_deref())
                {
                    status.set_message(message);
                }
                status
            }
            Destination::Failed => {
                let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
                // Records promoted to failures (configuration steps, folded skips) keep their
                // own status as the failure type, unless the engine provided one.
                if record.status != RecordStatus::Failed {
                    status.set_type(record.status.as_str());
                }
                if let Some(failure) = &record.failure {
                    if let Some(message) = &failure.message {
                        status.set_message(message.as_str());
                    }
                    if let Some(ty) = &failure.ty {
                        status.set_type(ty.as_str());
                    }
                    if let Some(description) = &failure.description {
                        status.set_description(description.as_str());
                    }
                }
                status
            }
        };

        let mut test_case = TestCase::new(test_case_name(record), status);
        test_case
            .set_classname(record.test_class.name())
            .set_time(millis_to_duration(record.elapsed_millis()));
        if let Some(output) = record.output.as_ref().filter(|_| self.store_output) {
            test_case.set_system_out(output.as_str());
        }
        test_case
    }
}

impl ClassReportRenderer for JunitRenderer {
    type Error = SerializeError;

    fn render(&self, results: &TestClassResults<'_>) -> Result<String, Self::Error> {
        let test_class = results.test_class();
        let time = millis_to_duration(results.duration_millis());

        let mut test_suite = TestSuite::new(test_class.name());
        test_suite.set_time(time);
        if let Some(module) = test_class.module() {
            test_suite.add_property(("module", module));
        }
        for destination in [Destination::Failed, Destination::Skipped, Destination::Passed] {
            for record in results.records(destination) {
                test_suite.add_test_case(self.test_case(record, destination));
            }
        }

        let mut report = Report::new(test_class.name());
        report.set_time(time).add_test_suite(test_suite);
        report.to_string()
    }
}

fn test_case_name(record: &ExecutionRecord) -> String {
    if record.parameters.is_empty() {
        record.name.clone()
    } else {
        format!("{}({})", record.name, record.parameters.join(", "))
    }
}

// Negative spans (end before start) are clamped to zero.
fn millis_to_duration(millis: i64) -> Duration {
    Duration::from_millis(u64::try_from(millis).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::ResultFlattener;
    use classwise_metadata::{FailureDetail, SuiteExecutionResult, SuiteResult, TestClassId};

    fn login_suite() -> SuiteExecutionResult {
        let class = TestClassId::with_module("core", "org.example.LoginTest");
        let mut result = SuiteResult::new("smoke");

        let mut failed = ExecutionRecord::new(
            class.clone(),
            "rejectsBadPassword",
            RecordStatus::Failed,
            100,
            142,
        );
        failed.failure = Some(FailureDetail {
            message: Some("expected 401".to_owned()),
            ty: Some("java.lang.AssertionError".to_owned()),
            description: Some("at LoginTest.rejectsBadPassword(LoginTest.java:42)".to_owned()),
        });
        result.failed_tests.push(failed);

        result.skipped_tests.push(ExecutionRecord::new(
            class.clone(),
            "usesSso",
            RecordStatus::Skipped,
            142,
            142,
        ));

        let mut passed =
            ExecutionRecord::new(class.clone(), "acceptsPassword", RecordStatus::Passed, 0, 100);
        passed.parameters = vec!["alice".to_owned(), "hunter2".to_owned()];
        passed.output = Some("logged in as alice".to_owned());
        result.passed_tests.push(passed);

        result.skipped_configurations.push(ExecutionRecord::new(
            class,
            "tearDown",
            RecordStatus::Skipped,
            142,
            150,
        ));

        let mut suite = SuiteExecutionResult::new("regression");
        suite.add_result(result);
        suite
    }

    fn render_login_suite(allow_skipped_in_output: bool, store_output: bool) -> String {
        let suites = [login_suite()];
        let flattened = ResultFlattener::new(allow_skipped_in_output)
            .flatten(&suites)
            .expect("suites flatten");
        let results = flattened
            .iter()
            .next()
            .expect("one class was flattened");
        JunitRenderer::new(store_output)
            .render(results)
            .expect("rendering succeeds")
    }

    #[test]
    fn renders_every_destination() {
        let xml = render_login_suite(true, true);

        assert!(xml.contains(r#"name="org.example.LoginTest""#), "{xml}");
        assert!(xml.contains(r#"tests="4""#), "{xml}");
        // The failed test and the skipped tearDown step.
        assert!(xml.contains(r#"failures="2""#), "{xml}");
        assert!(xml.contains(r#"message="expected 401""#), "{xml}");
        assert!(xml.contains(r#"type="java.lang.AssertionError""#), "{xml}");
        assert!(xml.contains(r#"type="skipped""#), "{xml}");
        assert!(xml.contains("<skipped"), "{xml}");
        assert!(xml.contains("acceptsPassword(alice, hunter2)"), "{xml}");
        assert!(xml.contains("logged in as alice"), "{xml}");
        assert!(xml.contains(r#"name="module""#), "{xml}");
        assert!(xml.contains(r#"value="core""#), "{xml}");
        // 42 + 0 + 100 + 8 milliseconds.
        assert!(xml.contains(r#"time="0.150""#), "{xml}");
    }

    #[test]
    fn folded_skips_render_as_failures() {
        let xml = render_login_suite(false, true);

        assert!(!xml.contains("<skipped"), "{xml}");
        assert!(xml.contains(r#"failures="3""#), "{xml}");
    }

    #[test]
    fn output_is_omitted_when_not_stored() {
        let xml = render_login_suite(true, false);

        assert!(!xml.contains("logged in as alice"), "{xml}");
        assert!(!xml.contains("<system-out"), "{xml}");
    }

    #[test]
    fn failed_records_come_first() {
        let xml = render_login_suite(true, true);

        let failed = xml.find("rejectsBadPassword").expect("failed test rendered");
        let skipped = xml.find("usesSso").expect("skipped test rendered");
        let passed = xml.find("acceptsPassword").expect("passed test rendered");
        assert!(failed < skipped && skipped < passed, "{xml}");
    }

    #[test]
    fn negative_durations_clamp_to_zero() {
        assert_eq!(millis_to_duration(-5), Duration::ZERO);
        assert_eq!(millis_to_duration(1500), Duration::from_millis(1500));
    }

    #[test]
    fn skipped_configuration_keeps_its_context_in_the_type() {
        let xml = render_login_suite(true, true);
        let tear_down = xml.find("tearDown").expect("tearDown rendered");
        let rest = &xml[tear_down..];
        let end = rest.find("</testcase>").expect("tearDown test case closed");
        assert!(rest[..end].contains(r#"type="skipped""#), "{xml}");
    }
}
