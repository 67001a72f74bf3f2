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

//! # Zi Studio Record Module
//!
//! Raw sample records as they appear in a manifest, before any type has been
//! applied to them. A raw record is a plain field mapping; the typed view of
//! it only exists while a sample is being materialized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};

/// One raw sample record: field name to JSON value.
pub type ZiCRawRecord = Map<String, Value>;

/// Convenience alias for the ordered records of one manifest.
pub type ZiCRecordBatch = Vec<ZiCRawRecord>;

/// Which manifest section an externally referenced file provides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZiCSampleKind {
    Samples,
    GlobalInfo,
}

impl ZiCSampleKind {
    /// Key under which the records live in a manifest or an external file.
    pub fn key(&self) -> &'static str {
        match self {
            ZiCSampleKind::Samples => "samples",
            ZiCSampleKind::GlobalInfo => "global-info",
        }
    }
}

/// Converts a JSON value into a raw record; only mappings are records.
#[allow(non_snake_case)]
pub fn ZiFIntoRecord(value: Value, origin: &str) -> Result<ZiCRawRecord> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ZiError::validation(format!(
            "record in {} must be a mapping, got {}",
            origin,
            ZiFValueKind(&other)
        ))),
    }
}

/// Converts a JSON array into a record batch.
#[allow(non_snake_case)]
pub fn ZiFIntoBatch(value: Value, origin: &str) -> Result<ZiCRecordBatch> {
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| ZiFIntoRecord(item, origin))
            .collect(),
        other => Err(ZiError::validation(format!(
            "records in {} must be a sequence, got {}",
            origin,
            ZiFValueKind(&other)
        ))),
    }
}

/// Short human-readable name of a JSON value's kind, for error messages.
#[allow(non_snake_case)]
pub fn ZiFValueKind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}
