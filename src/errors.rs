//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
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

//! # Zi Studio Error Module
//!
//! This module defines the error types used throughout Zi Studio for
//! consistent error handling and reporting.
//!
//! ## Error Categories
//!
//! - **Io**: Filesystem errors while reading manifests, records or media
//! - **Configuration**: The user-level storage configuration is missing or malformed
//! - **DatasetNotFound**: No storage root contains the requested dataset
//! - **MissingField**: A manifest lacks a required key
//! - **TypeNotFound**: A declared type is absent from the type registry
//! - **Schema**: Malformed schema text or records that do not fit their type
//! - **Validation**: Invalid parameters or inputs
//! - **Serde**: Serialization/deserialization errors
//! - **Visualization**: Failures raised by a visualization transform
//! - **Internal**: Unexpected internal failures
//!
//! None of these are retried. Warnings that do not stop iteration (missing
//! manifest directories or files) are not errors; they are logged and
//! collected on the dataset layout instead.
//!
//! ## Usage
//!
//! ```rust
//! use zistudio::errors::{Result, ZiError};
//!
//! fn sample_type(data: &serde_json::Map<String, serde_json::Value>) -> Result<&str> {
//!     data.get("sample-type")
//!         .and_then(|v| v.as_str())
//!         .ok_or_else(|| ZiError::missing_field("train.yaml", "sample-type"))
//! }
//! ```

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convience result type used throughout Zi Studio.
pub type Result<T> = std::result::Result<T, ZiError>;

/// Canonical error enumeration for Zi Studio.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum ZiError {
    /// Errors originating from filesystem IO.
    #[error("io error: {0}")]
    Io(String),

    /// The storage configuration file is missing, unreadable or malformed.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// No configured storage root contains the dataset.
    #[error("dataset '{dataset}' doesn't exist locally, download it first")]
    DatasetNotFound { dataset: String },

    /// A manifest lacks a required key.
    #[error("key '{key}' is required in {path}")]
    MissingField { path: String, key: String },

    /// A type name could not be resolved in the given registry namespace.
    #[error("{namespace} type '{name}' is not registered")]
    TypeNotFound { namespace: String, name: String },

    /// Errors caused by malformed schema text or records that do not match
    /// their declared type.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// Validation errors triggered by invalid parameters or inputs.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any failure raised by a visualization transform.
    #[error("visualization error: {message}")]
    Visualization { message: String },

    /// Catch-all variant for unexpected situations.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<io::Error> for ZiError {
    fn from(err: io::Error) -> Self {
        ZiError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ZiError {
    fn from(err: serde_json::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for ZiError {
    fn from(err: serde_yaml::Error) -> Self {
        ZiError::Serde(err.to_string())
    }
}

impl ZiError {
    /// Helper to construct configuration errors.
    pub fn configuration<T: Into<String>>(message: T) -> Self {
        ZiError::Configuration {
            message: message.into(),
        }
    }

    pub fn dataset_not_found<T: Into<String>>(dataset: T) -> Self {
        ZiError::DatasetNotFound {
            dataset: dataset.into(),
        }
    }

    /// Helper to construct missing-key errors for a manifest file.
    pub fn missing_field(path: impl Into<String>, key: impl Into<String>) -> Self {
        ZiError::MissingField {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn type_not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        ZiError::TypeNotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Helper to construct schema errors.
    pub fn schema<T: Into<String>>(message: T) -> Self {
        ZiError::Schema {
            message: message.into(),
        }
    }

    /// Helper to construct simple validation errors.
    pub fn validation<T: Into<String>>(message: T) -> Self {
        ZiError::Validation {
            message: message.into(),
        }
    }

    pub fn visualization<T: Into<String>>(message: T) -> Self {
        ZiError::Visualization {
            message: message.into(),
        }
    }

    /// Helper to construct internal errors.
    pub fn internal<T: Into<String>>(message: T) -> Self {
        ZiError::Internal(message.into())
    }
}
