// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the export pipeline.

use thiserror::Error;

use crate::host::ElementId;

/// Result type for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving an export.
///
/// Per-event handlers recover from malformed input locally (log and cancel);
/// only stack imbalance, I/O and construction errors reach the caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    #[error("Material not found: {0}")]
    MaterialNotFound(String),

    #[error("Material UUID must not be blank")]
    InvalidMaterialUuid,

    #[error("No element is being exported")]
    NoActiveElement,

    #[error("No material is active for element {0}")]
    NoActiveMaterial(String),

    #[error("Facet references point {index} but the polymesh has {count} points")]
    FacetOutOfRange { index: usize, count: usize },

    #[error("Polymesh point {index} is not finite after placement")]
    InvalidPoint { index: usize },

    #[error("Invalid transform for {0}: non-finite component")]
    InvalidTransform(String),

    #[error("Unbalanced traversal: {0}")]
    UnbalancedTraversal(String),

    #[error("Export cannot be finalized without a scene")]
    SceneMissing,

    #[error("Level of detail must be between 1 and 15, got {0}")]
    InvalidLevelOfDetail(u8),

    #[error("Family documents cannot be exported directly; wrap them in a project document")]
    FamilyDocument,

    #[error("Invalid output path: {0}")]
    InvalidOutputPath(String),

    #[error("Transform stack error: {0}")]
    Transform(#[from] objscene_geometry::Error),

    #[error("Scene error: {0}")]
    Scene(#[from] objscene_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors that signal a broken event stream rather than bad input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Transform(_) | Error::UnbalancedTraversal(_) | Error::SceneMissing
        )
    }
}
