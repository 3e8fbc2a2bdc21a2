// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::{error, fmt};

/// An error that occurs while parsing suite execution results.
#[derive(Debug)]
#[non_exhaustive]
pub enum ParseError {
    /// The input was not valid JSON, or did not match the suite result schema.
    ///
    /// Unknown record statuses and outcome contexts are reported through this variant.
    Json(serde_json::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Json(err) => {
                write!(
                    f,
                    "parsing suite execution results failed at line {}, column {}",
                    err.line(),
                    err.column()
                )
            }
        }
    }
}

impl error::Error for ParseError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}
