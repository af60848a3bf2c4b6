// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for the boolean kernel.

use thiserror::Error;

/// Errors surfaced by solid construction and boolean evaluation.
#[derive(Error, Debug)]
pub enum CsgError {
    /// Input arrays are inconsistent (bad index, colour count mismatch,
    /// indices not grouped in triples).
    #[error("malformed solid: {0}")]
    MalformedSolid(String),

    /// The split pass kept producing faces without converging.
    #[error("face splitting did not converge ({faces} faces)")]
    SplitFailed { faces: usize },

    /// Ray classification exhausted its perturbation budget on
    /// coplanar geometry.
    #[error("face classification did not converge")]
    ClassificationFailed,
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, CsgError>;
