//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
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

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::ingest::format::{ZiCDataFormat, ZiCFormatDetector};
use crate::record::{ZiCRecordBatch, ZiCSampleKind, ZiFIntoBatch, ZiFIntoRecord};
use crate::schema::parser::ZiFYamlToJson;

/// Fetches records a manifest references instead of embedding them.
///
/// Used the same way for sample records and for the single global-info
/// record; `kind` tells the loader which section is being asked for.
pub trait ZiCSampleLoader: std::fmt::Debug {
    fn load(&self, manifest_path: &Path, reference: &str, kind: ZiCSampleKind) -> Result<ZiCRecordBatch>;

    /// Number of records `load` would return.
    fn count(&self, manifest_path: &Path, reference: &str, kind: ZiCSampleKind) -> Result<usize> {
        Ok(self.load(manifest_path, reference, kind)?.len())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ZiCLoaderConfig {
    /// Skip JSONL lines that fail to parse instead of failing the load.
    pub skip_invalid_lines: bool,
}

/// Loads referenced records from JSON, JSONL or YAML files that live next
/// to the manifest.
#[derive(Debug, Default)]
pub struct ZiCFileSampleLoader {
    config: ZiCLoaderConfig,
    detector: ZiCFormatDetector,
}

impl ZiCFileSampleLoader {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self {
            config: ZiCLoaderConfig::default(),
            detector: ZiCFormatDetector::ZiFNew(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithConfig(mut self, config: ZiCLoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves `reference` against the manifest's directory.
    #[allow(non_snake_case)]
    pub fn ZiFResolve(&self, manifest_path: &Path, reference: &str) -> PathBuf {
        let reference = Path::new(reference);
        if reference.is_absolute() {
            return reference.to_path_buf();
        }
        manifest_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(reference)
    }

    fn read_document(&self, path: &Path, format: ZiCDataFormat, kind: ZiCSampleKind) -> Result<ZiCRecordBatch> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = match format {
            ZiCDataFormat::Json => serde_json::from_str(&content)?,
            _ => {
                let yaml: serde_yaml::Value = serde_yaml::from_str(&content)?;
                ZiFYamlToJson(&yaml)
            }
        };
        let origin = path.display().to_string();

        match value {
            Value::Array(_) => ZiFIntoBatch(value, &origin),
            Value::Object(mut map) => match map.remove(kind.key()) {
                Some(Value::Array(items)) => ZiFIntoBatch(Value::Array(items), &origin),
                Some(single @ Value::Object(_)) if kind == ZiCSampleKind::GlobalInfo => {
                    Ok(vec![ZiFIntoRecord(single, &origin)?])
                }
                Some(other) => ZiFIntoBatch(other, &origin),
                None => Err(ZiError::missing_field(origin, kind.key())),
            },
            _ => Err(ZiError::validation(format!(
                "{} must hold a sequence of records or a mapping with '{}'",
                origin,
                kind.key()
            ))),
        }
    }

    fn read_jsonl(&self, path: &Path) -> Result<ZiCRecordBatch> {
        let reader = BufReader::new(File::open(path)?);
        let origin = path.display().to_string();
        let mut batch = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let text = line?;
            if text.trim().is_empty() {
                continue;
            }
            let parsed = serde_json::from_str::<Value>(&text)
                .map_err(ZiError::from)
                .and_then(|value| ZiFIntoRecord(value, &origin));
            match parsed {
                Ok(record) => batch.push(record),
                Err(e) if self.config.skip_invalid_lines => {
                    log::warn!("Skipping invalid record at {}:{}: {}", origin, idx + 1, e);
                }
                Err(e) => {
                    return Err(ZiError::validation(format!(
                        "invalid record at {}:{}: {}",
                        origin,
                        idx + 1,
                        e
                    )))
                }
            }
        }

        Ok(batch)
    }
}

impl ZiCSampleLoader for ZiCFileSampleLoader {
    fn load(&self, manifest_path: &Path, reference: &str, kind: ZiCSampleKind) -> Result<ZiCRecordBatch> {
        let path = self.ZiFResolve(manifest_path, reference);
        if !path.is_file() {
            return Err(ZiError::Io(format!(
                "{} referenced by {} as '{}' does not exist",
                kind.key(),
                manifest_path.display(),
                reference
            )));
        }

        let mut format = self.detector.ZiFDetectFromPath(&path);
        if format == ZiCDataFormat::Unknown {
            let head = std::fs::read(&path)?;
            format = self.detector.ZiFDetectFromContent(&head);
        }

        log::debug!("Loading {} from {} as {:?}", kind.key(), path.display(), format);
        match format {
            ZiCDataFormat::Json | ZiCDataFormat::Yaml => self.read_document(&path, format, kind),
            ZiCDataFormat::Jsonl => self.read_jsonl(&path),
            ZiCDataFormat::Unknown => Err(ZiError::validation(format!(
                "Unknown file format: {}",
                path.display()
            ))),
        }
    }
}
