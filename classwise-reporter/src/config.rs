// Copyright (c) The classwise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report configuration.
//!
//! Configuration is layered: the embedded default config is overridden by either an explicitly
//! provided config file, or the repository config at [`ReportConfig::CONFIG_PATH`].

use crate::errors::{ConfigParseError, ConfigParseErrorKind};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use serde::Deserialize;
use std::fmt;
use tracing::debug;

/// The XML dialect that per-class reports are written in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XmlDialect {
    /// The dialect understood by TestNG-aware tools, which can represent skipped tests.
    Testng,

    /// Strict JUnit XML, which can't represent skipped tests.
    Junit,
}

impl XmlDialect {
    /// Returns true if this dialect can represent skipped tests.
    pub fn supports_skipped_tests(self) -> bool {
        match self {
            Self::Testng => true,
            Self::Junit => false,
        }
    }
}

impl fmt::Display for XmlDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Testng => write!(f, "testng"),
            Self::Junit => write!(f, "junit"),
        }
    }
}

/// Configuration for per-class report generation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReportConfig {
    dialect: XmlDialect,
    allow_skipped_in_output: Option<bool>,
    store_output: bool,
}

impl ReportConfig {
    /// The default location of the config within a repository: `.config/classwise.toml`.
    pub const CONFIG_PATH: &'static str = ".config/classwise.toml";

    /// Contains the default config as a TOML file.
    ///
    /// Repository-specific configuration is layered on top of the default config.
    pub const DEFAULT_CONFIG: &'static str = include_str!("../default-config.toml");

    /// Reads the config from the given sources.
    ///
    /// If `config_file` is provided, it must exist and is used instead of the repository config at
    /// [`Self::CONFIG_PATH`] under `workspace_root`. The repository config is optional.
    pub fn from_sources(
        workspace_root: impl AsRef<Utf8Path>,
        config_file: Option<&Utf8Path>,
    ) -> Result<Self, ConfigParseError> {
        let (config_file, required) = match config_file {
            Some(file) => (file.to_owned(), true),
            None => (repository_config_path(workspace_root), false),
        };
        debug!(%config_file, required, "reading report config");

        let builder = Self::make_default_config().add_source(
            File::new(config_file.as_str(), FileFormat::Toml).required(required),
        );
        Self::build_and_deserialize_config(&builder)
            .map_err(|kind| ConfigParseError::new(config_file, kind))
    }

    /// Returns the default config, as embedded in [`Self::DEFAULT_CONFIG`].
    pub fn default_config() -> Self {
        Self::build_and_deserialize_config(&Self::make_default_config())
            .expect("default config is always valid")
    }

    /// Returns the XML dialect reports are written in.
    pub fn dialect(&self) -> XmlDialect {
        self.dialect
    }

    /// Returns true if skipped tests are reported as skipped, rather than folded into failures.
    ///
    /// An explicit `allow-skipped-in-output` setting takes precedence over the dialect.
    pub fn allow_skipped_in_output(&self) -> bool {
        self.allow_skipped_in_output
            .unwrap_or_else(|| self.dialect.supports_skipped_tests())
    }

    /// Returns true if captured output is written to reports.
    pub fn store_output(&self) -> bool {
        self.store_output
    }

    fn make_default_config() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(Self::DEFAULT_CONFIG, FileFormat::Toml))
    }

    fn build_and_deserialize_config(
        builder: &ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigParseErrorKind> {
        let config = builder
            .build_cloned()
            .map_err(|error| ConfigParseErrorKind::BuildError(Box::new(error)))?;

        let config: ReportConfigImpl = serde_path_to_error::deserialize(config)
            .map_err(|error| ConfigParseErrorKind::DeserializeError(Box::new(error)))?;

        let ReportImpl {
            dialect,
            allow_skipped_in_output,
            store_output,
        } = config.report;
        Ok(Self {
            dialect,
            allow_skipped_in_output,
            store_output,
        })
    }
}

/// Returns the path to the repository config under `workspace_root`.
pub fn repository_config_path(workspace_root: impl AsRef<Utf8Path>) -> Utf8PathBuf {
    workspace_root.as_ref().join(ReportConfig::CONFIG_PATH)
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportConfigImpl {
    report: ReportImpl,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReportImpl {
    dialect: XmlDialect,
    #[serde(default)]
    allow_skipped_in_output: Option<bool>,
    store_output: bool,
}
