// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The top-level entry point: flattens suite results and writes one report per class.

use crate::{
    config::ReportConfig,
    emit::{EmittedReport, ReportEmitter},
    errors::{DisplayErrorChain, GenerateReportError, ReadSuitesError},
    flatten::ResultFlattener,
    render::{ClassReportRenderer, JunitRenderer},
};
use camino::{Utf8Path, Utf8PathBuf};
use classwise_metadata::SuiteExecutionResult;
use tracing::{debug, warn};

/// Generates per-class reports from suite execution results.
#[derive(Clone, Debug)]
pub struct ClassReporter<R> {
    flattener: ResultFlattener,
    renderer: R,
}

impl ClassReporter<JunitRenderer> {
    /// Creates a reporter that writes JUnit XML, configured by `config`.
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config, JunitRenderer::from_config(config))
    }
}

impl<R: ClassReportRenderer> ClassReporter<R> {
    /// Creates a reporter that renders reports with `renderer`.
    pub fn new(config: &ReportConfig, renderer: R) -> Self {
        Self {
            flattener: ResultFlattener::from_config(config),
            renderer,
        }
    }

    /// Returns the renderer in use.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Flattens `suites` by test class and writes a report for each class under `output_root`.
    ///
    /// Nothing is written to disk if the suites can't be flattened.
    pub fn generate_report<'a>(
        &self,
        suites: impl IntoIterator<Item = &'a SuiteExecutionResult>,
        output_root: &Utf8Path,
    ) -> Result<ReportSummary, GenerateReportError> {
        debug!(
            %output_root,
            allow_skipped_in_output = self.flattener.allow_skipped_in_output(),
            "generating per-class reports",
        );

        let reports = self
            .flattener
            .flatten(suites)
            .map_err(GenerateReportError::from)
            .and_then(|flattened| {
                ReportEmitter::new(output_root, &self.renderer)
                    .emit(flattened)
                    .map_err(GenerateReportError::from)
            })
            .inspect_err(|error| warn!("{}", DisplayErrorChain::new(error)))?;
        let summary = ReportSummary::new(reports);

        debug!(
            reports = summary.reports.len(),
            failed = summary.failed,
            skipped = summary.skipped,
            passed = summary.passed,
            "generated per-class reports",
        );
        Ok(summary)
    }
}

/// A summary of the reports written by [`ClassReporter::generate_report`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReportSummary {
    /// The reports that were written, in the order they were written.
    pub reports: Vec<EmittedReport>,

    /// The number of records reported as failures, across all classes.
    pub failed: usize,

    /// The number of records reported as skipped, across all classes.
    pub skipped: usize,

    /// The number of records reported as passes, across all classes.
    pub passed: usize,
}

impl ReportSummary {
    fn new(reports: Vec<EmittedReport>) -> Self {
        let mut summary = Self::default();
        for report in &reports {
            summary.failed += report.failed;
            summary.skipped += report.skipped;
            summary.passed += report.passed;
        }
        summary.reports = reports;
        summary
    }

    /// Iterates over the paths of the written files.
    ///
    /// A path shows up more than once if classes with the same name overwrote each other's
    /// reports.
    pub fn written_files(&self) -> impl Iterator<Item = &Utf8Path> + '_ {
        self.reports.iter().map(|report| report.path.as_path())
    }

    /// Returns true if any record was reported as a failure.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Reads suite execution results from a JSON file.
///
/// The file holds either a single suite or a list of suites.
pub fn read_suite_results(
    path: impl AsRef<Utf8Path>,
) -> Result<Vec<SuiteExecutionResult>, ReadSuitesError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|error| ReadSuitesError::Read {
        file: path.to_owned(),
        error,
    })?;

    let parse_error = |error| ReadSuitesError::Parse {
        file: Utf8PathBuf::from(path),
        error,
    };
    let suites = if contents.trim_start().starts_with('[') {
        SuiteExecutionResult::parse_json_list(&contents).map_err(parse_error)?
    } else {
        vec![SuiteExecutionResult::parse_json(&contents).map_err(parse_error)?]
    };

    debug!(file = %path, suites = suites.len(), "read suite results");
    Ok(suites)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::XmlDialect, errors::FlattenError};
    use camino_tempfile::tempdir;
    use classwise_metadata::{
        ExecutionRecord, OutcomeContext, RecordStatus, SuiteResult, TestClassId,
    };
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn junit_config() -> ReportConfig {
        let workspace_dir = tempdir().unwrap();
        let config_path = workspace_dir.path().join("classwise.toml");
        std::fs::write(&config_path, "[report]\ndialect = \"junit\"\n").unwrap();
        let config = ReportConfig::from_sources(workspace_dir.path(), Some(config_path.as_path()))
            .expect("config parses");
        assert_eq!(config.dialect(), XmlDialect::Junit);
        config
    }

    fn suite(
        records: impl IntoIterator<Item = (OutcomeContext, ExecutionRecord)>,
    ) -> SuiteExecutionResult {
        let mut result = SuiteResult::new("context");
        for (context, record) in records {
            result.records_mut(context).push(record);
        }
        let mut suite = SuiteExecutionResult::new("suite");
        suite.add_result(result);
        suite
    }

    #[test]
    fn summary_totals_every_class() {
        let output_root = tempdir().unwrap();
        let suites = [suite([
            (
                OutcomeContext::PassedTest,
                ExecutionRecord::new(TestClassId::new("A"), "a1", RecordStatus::Passed, 0, 10),
            ),
            (
                OutcomeContext::SkippedTest,
                ExecutionRecord::new(TestClassId::new("B"), "b1", RecordStatus::Skipped, 0, 3),
            ),
            (
                OutcomeContext::FailedConfiguration,
                ExecutionRecord::new(TestClassId::new("B"), "setUp", RecordStatus::Failed, 0, 1),
            ),
        ])];

        let summary = ClassReporter::from_config(&ReportConfig::default_config())
            .generate_report(&suites, output_root.path())
            .expect("reports are generated");

        assert_eq!(summary.reports.len(), 2);
        assert_eq!((summary.failed, summary.skipped, summary.passed), (1, 1, 1));
        assert!(summary.has_failures());
        // Classes are emitted in the order they're first seen. Configuration contexts are visited
        // before test contexts, so B's setUp is seen before A's test.
        let report_dir = output_root.path().join("xml");
        assert_eq!(
            summary.written_files().collect::<Vec<_>>(),
            [
                report_dir.join("B_results.xml").as_path(),
                report_dir.join("A_results.xml").as_path(),
            ]
        );
    }

    #[test]
    fn junit_dialect_folds_skips() {
        let output_root = tempdir().unwrap();
        let suites = [suite([(
            OutcomeContext::SkippedTest,
            ExecutionRecord::new(TestClassId::new("B"), "b1", RecordStatus::Skipped, 0, 3),
        )])];

        let summary = ClassReporter::from_config(&junit_config())
            .generate_report(&suites, output_root.path())
            .expect("reports are generated");

        assert_eq!((summary.failed, summary.skipped, summary.passed), (1, 0, 0));
        assert_eq!(summary.reports[0].duration_millis, 3);
        let xml = std::fs::read_to_string(&summary.reports[0].path).unwrap();
        assert!(!xml.contains("<skipped"), "{xml}");
    }

    #[test]
    fn unclassifiable_status_writes_nothing() {
        let output_root = tempdir().unwrap();
        std::fs::create_dir(output_root.path().join("stale")).unwrap();
        let suites = [suite([
            (
                OutcomeContext::PassedTest,
                ExecutionRecord::new(TestClassId::new("A"), "a1", RecordStatus::Passed, 0, 10),
            ),
            (
                OutcomeContext::FailedTest,
                ExecutionRecord::new(TestClassId::new("A"), "a2", RecordStatus::Started, 0, 0),
            ),
        ])];

        let error = ClassReporter::from_config(&ReportConfig::default_config())
            .generate_report(&suites, output_root.path())
            .expect_err("started records can't be reported");

        assert!(
            matches!(
                error,
                GenerateReportError::Flatten(FlattenError::UnclassifiableStatus {
                    status: RecordStatus::Started,
                    ..
                })
            ),
            "unexpected error: {error}"
        );
        assert_eq!(
            DisplayErrorChain::new(&error).to_string(),
            "failed to organize suite results by test class\n  \
             caused by:\n  \
             - unclassifiable status `started` for `a2` in class `A` (suite `suite`, failed-tests)",
        );
        assert!(output_root.path().join("stale").is_dir(), "no cleanup happened");
        assert!(!output_root.path().join("xml").exists(), "no reports written");
    }

    #[test]
    fn reads_single_suite_and_lists() {
        let dir = tempdir().unwrap();
        let single = dir.path().join("single.json");
        std::fs::write(
            &single,
            indoc! {r#"
                { "name": "regression", "results": {} }
            "#},
        )
        .unwrap();
        let list = dir.path().join("list.json");
        std::fs::write(
            &list,
            indoc! {r#"
                [
                    { "name": "regression" },
                    { "name": "smoke" }
                ]
            "#},
        )
        .unwrap();

        let suites = read_suite_results(&single).expect("single suite reads");
        assert_eq!(suites, [SuiteExecutionResult::new("regression")]);

        let suites = read_suite_results(&list).expect("suite list reads");
        let names: Vec<_> = suites.iter().map(|suite| suite.name.as_str()).collect();
        assert_eq!(names, ["regression", "smoke"]);
    }

    #[test]
    fn read_errors_name_the_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let error = read_suite_results(&missing).expect_err("missing file");
        assert!(
            matches!(&error, ReadSuitesError::Read { file, .. } if file == &missing),
            "unexpected error: {error}"
        );

        let invalid = dir.path().join("invalid.json");
        std::fs::write(&invalid, r#"{ "name": "regression", "results": 42 }"#).unwrap();
        let error = read_suite_results(&invalid).expect_err("invalid file");
        assert!(
            matches!(&error, ReadSuitesError::Parse { file, .. } if file == &invalid),
            "unexpected error: {error}"
        );
    }
}
