// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strategies for property-based testing of suite execution results.

use crate::{
    ExecutionRecord, FailureDetail, RecordStatus, SuiteExecutionResult, SuiteResult, TestClassId,
};
use proptest::{collection::vec, option, prelude::*};

/// Strategy for generating class identities from a small pool, so that generated records
/// frequently share a class.
pub fn arb_test_class_id() -> impl Strategy<Value = TestClassId> {
    let names = prop_oneof![
        Just("org.example.AccountTest"),
        Just("org.example.CartTest"),
        Just("org.example.LoginTest"),
    ];
    let modules = option::of(prop_oneof![Just("core"), Just("web")]);

    (modules, names).prop_map(|(module, name)| match module {
        Some(module) => TestClassId::with_module(module, name),
        None => TestClassId::new(name),
    })
}

/// Strategy for generating statuses that describe a finished test.
pub fn arb_classifiable_status() -> impl Strategy<Value = RecordStatus> {
    prop_oneof![
        Just(RecordStatus::Passed),
        Just(RecordStatus::Failed),
        Just(RecordStatus::Skipped),
        Just(RecordStatus::SuccessPercentageFailure),
    ]
}

/// Strategy for generating finished execution records with non-negative spans.
pub fn arb_execution_record() -> impl Strategy<Value = ExecutionRecord> {
    (
        arb_test_class_id(),
        "[a-z][a-zA-Z]{0,8}",
        arb_classifiable_status(),
        0..10_000i64,
        0..500i64,
        option::of(any::<FailureDetail>()),
    )
        .prop_map(|(test_class, name, status, start, span, failure)| {
            let mut record = ExecutionRecord::new(test_class, name, status, start, start + span);
            record.failure = failure;
            record
        })
}

impl Arbitrary for TestClassId {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        arb_test_class_id().boxed()
    }
}

impl Arbitrary for RecordStatus {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            Just(RecordStatus::Created),
            Just(RecordStatus::Started),
            arb_classifiable_status(),
        ]
        .boxed()
    }
}

impl Arbitrary for FailureDetail {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            option::of("[a-z ]{1,16}"),
            option::of("[a-z.]{1,16}"),
            option::of("[a-z \n]{1,32}"),
        )
            .prop_map(|(message, ty, description)| FailureDetail {
                message,
                ty,
                description,
            })
            .boxed()
    }
}

impl Arbitrary for ExecutionRecord {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        arb_execution_record().boxed()
    }
}

impl Arbitrary for SuiteResult {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        let records = || vec(arb_execution_record(), 0..4);
        (
            "[a-z]{1,8}",
            records(),
            records(),
            records(),
            records(),
            records(),
            records(),
        )
            .prop_map(
                |(
                    name,
                    failed_configurations,
                    skipped_configurations,
                    passed_configurations,
                    failed_tests,
                    skipped_tests,
                    passed_tests,
                )| SuiteResult {
                    name,
                    failed_configurations,
                    skipped_configurations,
                    passed_configurations,
                    failed_tests,
                    skipped_tests,
                    passed_tests,
                },
            )
            .boxed()
    }
}

impl Arbitrary for SuiteExecutionResult {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        ("[a-z]{1,8}", vec(any::<SuiteResult>(), 0..3))
            .prop_map(|(name, results)| {
                let mut suite = SuiteExecutionResult::new(name);
                for result in results {
                    suite.add_result(result);
                }
                suite
            })
            .boxed()
    }
}
