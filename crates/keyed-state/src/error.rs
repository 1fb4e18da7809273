// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types shared by descriptors, type information and serializers.

use thiserror::Error;

/// Failure to derive serializer-producing type information from a type token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeExtractionError {
    /// The type would need the generic serializer, which the configuration forbids.
    #[error("type {type_name} is treated as a generic type, but generic types are disabled")]
    GenericTypesDisabled { type_name: String },
}

/// Errors returned by state descriptor operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A constructor or setter received an unusable argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation is not valid for the descriptor's current state.
    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("type extraction failed: {0}")]
    TypeExtraction(#[from] TypeExtractionError),

    /// The configuration does not allow building the requested serializer.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Persisted data or a value payload describes another type.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// Value bytes could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Convenient alias for results using [`StateError`].
pub type Result<T> = core::result::Result<T, StateError>;
