// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Export configuration loaded from environment variables.

use crate::error::{Error, Result};

/// Finest tessellation the engine supports.
pub const MAX_LEVEL_OF_DETAIL: u8 = 15;

/// Export configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConfig {
    /// Tessellation quality hint passed to the engine (1-15).
    pub level_of_detail: u8,
    /// Run the merge/prune pass after traversal.
    pub optimize: bool,
    /// Family name fragments (case-insensitive) that enable metadata harvesting.
    pub metadata_family_patterns: Vec<String>,
    /// Shared parameters starting with this prefix are not harvested.
    pub excluded_shared_prefix: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            level_of_detail: MAX_LEVEL_OF_DETAIL,
            optimize: false,
            metadata_family_patterns: vec!["QF_".into(), "VR_".into()],
            excluded_shared_prefix: "Specifi_".into(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            level_of_detail: std::env::var("OBJSCENE_LEVEL_OF_DETAIL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.level_of_detail),
            optimize: std::env::var("OBJSCENE_OPTIMIZE")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.optimize),
            metadata_family_patterns: std::env::var("OBJSCENE_METADATA_PATTERNS")
                .map(|v| parse_list(&v))
                .unwrap_or(defaults.metadata_family_patterns),
            excluded_shared_prefix: std::env::var("OBJSCENE_EXCLUDED_SHARED_PREFIX")
                .unwrap_or(defaults.excluded_shared_prefix),
        }
    }

    pub fn with_level_of_detail(mut self, level_of_detail: u8) -> Self {
        self.level_of_detail = level_of_detail;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LEVEL_OF_DETAIL).contains(&self.level_of_detail) {
            return Err(Error::InvalidLevelOfDetail(self.level_of_detail));
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
