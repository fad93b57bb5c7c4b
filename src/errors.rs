//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Xu.
//! The Xu project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Xu Error Module
//!
//! This module defines the error types used throughout the Xu exporter for
//! consistent error handling and reporting.
//!
//! ## Error Handling Philosophy
//!
//! Xu fails fast: every error raised before the first row is read
//! (validation, predicate typing, configuration) guarantees that no
//! destination has been opened and no partial export exists. Errors raised
//! mid-stream (query execution, destination IO) abort the run after a
//! best-effort flush of already-open destinations.
//!
//! ## Error Categories
//!
//! - **Validation**: unknown attribute in a filter, template placeholder,
//!   or key list; malformed filter tuples
//! - **PredicateType**: predicate kind incompatible with the attribute's
//!   semantic type (e.g. an ordering predicate on a string attribute)
//! - **Configuration**: incompatible option combinations
//! - **Query**: failure surfaced by the store while preparing or fetching
//! - **Destination**: failure opening or writing a concrete output path
//! - **Internal**: everything else

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Xu.
pub type Result<T> = std::result::Result<T, XuError>;

/// Canonical error enumeration for Xu.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum XuError {
    /// Unknown attributes or malformed filter/template/key inputs,
    /// detected before any row is read.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Predicate kind incompatible with the attribute's semantic type,
    /// detected at filter compile time.
    #[error("predicate '{predicate}' cannot apply to attribute '{attribute}': {message}")]
    PredicateType {
        attribute: String,
        predicate: String,
        message: String,
    },

    /// Incompatible option combinations (e.g. several key attributes for
    /// line output).
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Failures surfaced by the store while preparing or fetching rows.
    /// Not retried here; retry policy belongs to the store.
    #[error("query execution failed: {message}")]
    Query { message: String },

    /// Failure opening or writing a concrete destination path.
    #[error("destination '{path}' failed: {message}")]
    Destination { path: String, message: String },

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for XuError {
    fn from(err: rusqlite::Error) -> Self {
        XuError::Query {
            message: err.to_string(),
        }
    }
}

impl XuError {
    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        XuError::Validation {
            message: message.into(),
        }
    }

    /// Helper to construct predicate type errors.
    pub fn predicate_type(
        attribute: impl Into<String>,
        predicate: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        XuError::PredicateType {
            attribute: attribute.into(),
            predicate: predicate.into(),
            message: message.into(),
        }
    }

    /// Helper to construct configuration errors.
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        XuError::Configuration {
            message: message.into(),
        }
    }

    /// Helper to construct destination errors.
    pub fn destination(path: impl Into<String>, message: impl Into<String>) -> Self {
        XuError::Destination {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        XuError::Internal(message.into())
    }
}
