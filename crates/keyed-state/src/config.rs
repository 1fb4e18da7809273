// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Execution configuration consulted while building serializers.
//!
//! The configuration carries registration hints only. It is handed to
//! [`StateDescriptor::initialize_serializer_unless_set`](crate::StateDescriptor::initialize_serializer_unless_set)
//! by whichever runtime context owns the descriptor, and may differ between the
//! context that created a descriptor and the one that restored it.
//!
//! # Configuration File
//!
//! ```toml
//! registered_types = ["sensors::Reading", "sensors::Calibration"]
//! force_generic = false
//! disable_generic_types = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Hints that influence how serializers are constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Type names registered with the generic serializer, in registration order.
    #[serde(default)]
    registered_types: Vec<String>,

    /// Use the generic serializer even for basic types.
    #[serde(default)]
    force_generic: bool,

    /// Refuse to build generic serializers at all.
    #[serde(default)]
    disable_generic_types: bool,
}

impl ExecutionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, name) in self.registered_types.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "Registered type {} has an empty name",
                    i
                )));
            }
        }
        Ok(())
    }

    /// Register `T` with the generic serializer.
    pub fn register_type<T: ?Sized + 'static>(&mut self) -> &mut Self {
        self.register_type_name(std::any::type_name::<T>())
    }

    /// Register a type by its fully-qualified name. Re-registering is a no-op.
    pub fn register_type_name(&mut self, type_name: impl Into<String>) -> &mut Self {
        let type_name = type_name.into();
        if !self.registered_types.contains(&type_name) {
            self.registered_types.push(type_name);
        }
        self
    }

    pub fn registered_types(&self) -> &[String] {
        &self.registered_types
    }

    /// Serialize basic types with the generic serializer as well.
    pub fn enable_force_generic(&mut self) -> &mut Self {
        self.force_generic = true;
        self
    }

    pub fn is_force_generic_enabled(&self) -> bool {
        self.force_generic
    }

    /// Forbid the generic serializer; types without a basic serializer then fail.
    pub fn disable_generic_types(&mut self) -> &mut Self {
        self.disable_generic_types = true;
        self
    }

    pub fn has_generic_types_disabled(&self) -> bool {
        self.disable_generic_types
    }
}
