// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{TypeInformation, TypeToken};
use crate::config::ExecutionConfig;
use crate::error::TypeExtractionError;

/// Derives [`TypeInformation`] from a bare [`TypeToken`].
pub struct TypeExtractor;

impl TypeExtractor {
    /// Extract type information for the token's type.
    ///
    /// Basic types always succeed. Anything else maps to generic type
    /// information, which fails when `config` disables generic types.
    pub fn extract<V: 'static>(
        token: &TypeToken<V>,
        config: &ExecutionConfig,
    ) -> Result<TypeInformation<V>, TypeExtractionError> {
        if let Some(info) = TypeInformation::<V>::basic() {
            return Ok(info);
        }
        if config.has_generic_types_disabled() {
            return Err(TypeExtractionError::GenericTypesDisabled {
                type_name: token.type_name().to_string(),
            });
        }
        Ok(TypeInformation::generic())
    }
}
