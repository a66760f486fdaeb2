// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while transforming or welding geometry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A pop would remove the base transform of the traversal.
    #[error("Unbalanced transform stack: pop at depth {depth}")]
    UnbalancedTransformStack { depth: usize },
}
