// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the object scene model.

use thiserror::Error;

/// Result type alias for object scene operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, validating or writing an object scene.
#[derive(Error, Debug)]
pub enum Error {
    /// Metadata fields must not be blank.
    #[error("invalid metadata: {0} must not be blank")]
    InvalidMetadata(&'static str),

    /// A face record referenced a vertex that does not exist.
    #[error("geometry {uuid}: face index {index} out of range ({vertex_count} vertices)")]
    FaceIndexOutOfRange {
        uuid: String,
        index: u32,
        vertex_count: usize,
    },

    /// The vertex buffer length is not a multiple of three.
    #[error("geometry {uuid}: vertex buffer length {len} is not a multiple of 3")]
    RaggedVertexBuffer { uuid: String, len: usize },

    /// A node references a geometry that is not registered in the scene.
    #[error("node {node} references unknown geometry {geometry}")]
    DanglingGeometry { node: String, geometry: String },

    /// A node references a material that is not registered in the scene.
    #[error("node {node} references unknown material {material}")]
    DanglingMaterial { node: String, material: String },

    /// Output path was empty or pointed at a directory.
    #[error("invalid output path: {0}")]
    InvalidOutputPath(String),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing the scene to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
