// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type information: from a value type to something that can build its serializer.
//!
//! ```text
//! TypeToken<V> --TypeExtractor::extract--> TypeInformation<V> --create_serializer--> TypeSerializer<V>
//! ```

mod basic;
mod extractor;
mod information;
mod token;

pub use basic::BasicType;
pub use extractor::TypeExtractor;
pub use information::{TypeInformation, TypeKind};
pub use token::TypeToken;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Bounds every state value type must satisfy.
pub trait StateValue: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> StateValue for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}
