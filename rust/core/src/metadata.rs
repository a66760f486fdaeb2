// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object scene file header.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Version of the three.js JSON object format written by this crate.
pub const FORMAT_VERSION: &str = "4.3";

/// Document type tag for object scenes.
pub const DOCUMENT_TYPE: &str = "Object";

/// Header describing the file format and the tool that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Format version (`major.minor`).
    pub version: String,
    /// Document type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Tool that created the file.
    pub generator: String,
}

impl Metadata {
    /// Create metadata for the current format version.
    pub fn new(generator: impl Into<String>) -> Result<Self> {
        Self::with_type(generator, DOCUMENT_TYPE)
    }

    /// Create metadata with an explicit document type tag.
    pub fn with_type(generator: impl Into<String>, kind: impl Into<String>) -> Result<Self> {
        let generator = generator.into();
        let kind = kind.into();
        if generator.trim().is_empty() {
            return Err(Error::InvalidMetadata("generator"));
        }
        if kind.trim().is_empty() {
            return Err(Error::InvalidMetadata("type"));
        }

        Ok(Self {
            version: FORMAT_VERSION.to_string(),
            kind,
            generator,
        })
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            kind: DOCUMENT_TYPE.to_string(),
            generator: crate::GENERATOR.to_string(),
        }
    }
}
