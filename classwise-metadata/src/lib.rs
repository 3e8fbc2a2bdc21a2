// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured access to suite execution results.
//!
//! A test execution engine organizes its results by suite and, within each suite result, by
//! outcome context: failed and skipped configuration (setup/teardown) steps, and failed, skipped
//! and passed tests. This crate is the machine-readable model of that organization, as consumed by
//! `classwise-reporter`.

mod errors;
#[cfg(feature = "proptest1")]
mod proptest_helpers;
mod suite;

pub use errors::*;
#[cfg(feature = "proptest1")]
pub use proptest_helpers::*;
pub use suite::*;
