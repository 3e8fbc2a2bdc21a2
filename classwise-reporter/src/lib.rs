// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Per-class JUnit XML reports for suite execution results.
//!
//! Test execution engines report results by suite. This crate reorganizes those results by test
//! class and writes one report per class, to `<output-root>/xml/<class-name>_results.xml`.
//!
//! The basic flow is:
//!
//! 1. Load a [`ReportConfig`](config::ReportConfig).
//! 2. Read suite results, e.g. with [`read_suite_results`](reporter::read_suite_results).
//! 3. Call [`ClassReporter::generate_report`](reporter::ClassReporter::generate_report), which
//!    flattens the results with a [`ResultFlattener`](flatten::ResultFlattener) and writes them
//!    with a [`ReportEmitter`](emit::ReportEmitter).

pub mod aggregate;
pub mod config;
pub mod emit;
pub mod errors;
pub mod flatten;
pub mod render;
pub mod reporter;
