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

//! # Manifest Module
//!
//! Reads one manifest file (one dataset split) into structured data: the
//! declared sample type, the raw records, optional global info and the
//! compiled schema.
//!
//! ## Manifest Layout
//!
//! ```yaml
//! $import:
//!   - detection
//! data:
//!   sample-type: DetSample[cdom=VOCClassDom]
//!   sample-path: local          # optional; absent, `local` or `$local` means inline
//!   samples:
//!     - {image: media/0.jpg, objects: []}
//!   global-info-type: VOCInfo   # optional
//!   global-info: {year: 2012}   # or global-info-path: info.json
//! ```
//!
//! Loading reads files and nothing else; it never touches a type registry.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::errors::{Result, ZiError};
use crate::ingest::loader::ZiCSampleLoader;
use crate::record::{ZiCRawRecord, ZiCRecordBatch, ZiCSampleKind, ZiFIntoBatch, ZiFIntoRecord};
use crate::schema::compiler::ZiCSchemaCompiler;
use crate::schema::ir::{ZiCSchemaProgram, ZiCTypeRef};
use crate::schema::parser::{ZiFParseTypeExpr, ZiFYamlToJson};

/// `sample-path` values that mean "records are inline".
pub const ZI_LOCAL_SAMPLE_PATHS: [&str; 2] = ["local", "$local"];

/// Where a manifest's records come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZiCSampleSource {
    Inline,
    External(String),
}

/// Reads a manifest file and returns its `data` mapping.
#[allow(non_snake_case)]
pub fn ZiFReadManifestData(path: &Path) -> Result<Map<String, Value>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ZiError::Io(format!("failed to read manifest {}: {}", path.display(), e)))?;
    let yaml: serde_yaml::Value = serde_yaml::from_str(&content).map_err(|e| {
        ZiError::Serde(format!("invalid manifest YAML in {}: {}", path.display(), e))
    })?;

    match ZiFYamlToJson(&yaml) {
        Value::Object(mut root) => match root.remove("data") {
            Some(Value::Object(data)) => Ok(data),
            Some(_) => Err(ZiError::validation(format!(
                "'data' in {} must be a mapping",
                path.display()
            ))),
            None => Err(ZiError::missing_field(path.display().to_string(), "data")),
        },
        _ => Err(ZiError::validation(format!(
            "manifest {} must be a mapping",
            path.display()
        ))),
    }
}

fn source_for(data: &Map<String, Value>, key: &str, path: &Path) -> Result<ZiCSampleSource> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(ZiCSampleSource::Inline),
        Some(Value::String(reference)) if ZI_LOCAL_SAMPLE_PATHS.contains(&reference.as_str()) => {
            Ok(ZiCSampleSource::Inline)
        }
        Some(Value::String(reference)) => Ok(ZiCSampleSource::External(reference.clone())),
        Some(_) => Err(ZiError::validation(format!(
            "'{}' in {} must be a string",
            key,
            path.display()
        ))),
    }
}

/// Determines the sample source mode from the optional `sample-path` key.
#[allow(non_snake_case)]
pub fn ZiFSampleSource(data: &Map<String, Value>, path: &Path) -> Result<ZiCSampleSource> {
    source_for(data, "sample-path", path)
}

/// Returns the inline `samples` sequence, which must be present.
#[allow(non_snake_case)]
pub fn ZiFInlineSamples<'a>(data: &'a Map<String, Value>, path: &Path) -> Result<&'a Vec<Value>> {
    match data.get(ZiCSampleKind::Samples.key()) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(ZiError::validation(format!(
            "'samples' in {} must be a sequence",
            path.display()
        ))),
        None => Err(ZiError::missing_field(path.display().to_string(), "samples")),
    }
}

/// Parses the required `sample-type` reference. A null value counts as
/// missing.
#[allow(non_snake_case)]
pub(crate) fn ZiFSampleTypeRef(data: &Map<String, Value>, path: &Path) -> Result<ZiCTypeRef> {
    type_ref(data, "sample-type", path)?
        .ok_or_else(|| ZiError::missing_field(path.display().to_string(), "sample-type"))
}

fn type_ref(data: &Map<String, Value>, key: &str, path: &Path) -> Result<Option<ZiCTypeRef>> {
    match data.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => ZiFParseTypeExpr(text).map(Some).map_err(|e| {
            ZiError::schema(format!("'{}' in {}: {}", key, path.display(), e))
        }),
        Some(_) => Err(ZiError::validation(format!(
            "'{}' in {} must be a string",
            key,
            path.display()
        ))),
    }
}

/// Structured content of one manifest.
#[derive(Clone, Debug)]
pub struct ZiCManifestData {
    pub path: PathBuf,
    pub sample_type: ZiCTypeRef,
    pub global_info_type: Option<ZiCTypeRef>,
    pub samples: ZiCRecordBatch,
    pub global_info: Option<ZiCRawRecord>,
    pub schema: ZiCSchemaProgram,
}

/// Manifest loader wired to its two collaborators.
#[derive(Clone, Debug)]
pub struct ZiCManifestLoader {
    compiler: Arc<dyn ZiCSchemaCompiler>,
    sample_loader: Arc<dyn ZiCSampleLoader>,
    library_path: PathBuf,
}

impl ZiCManifestLoader {
    #[allow(non_snake_case)]
    pub fn ZiFNew(compiler: Arc<dyn ZiCSchemaCompiler>, sample_loader: Arc<dyn ZiCSampleLoader>) -> Self {
        Self {
            compiler,
            sample_loader,
            library_path: PathBuf::new(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithLibraryPath(mut self, library_path: impl Into<PathBuf>) -> Self {
        self.library_path = library_path.into();
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFSampleLoader(&self) -> &Arc<dyn ZiCSampleLoader> {
        &self.sample_loader
    }

    #[allow(non_snake_case)]
    pub fn ZiFLoad(&self, path: &Path) -> Result<ZiCManifestData> {
        let data = ZiFReadManifestData(path)?;
        let origin = path.display().to_string();

        let sample_type = ZiFSampleTypeRef(&data, path)?;
        let global_info_type = type_ref(&data, "global-info-type", path)?;

        let samples = match ZiFSampleSource(&data, path)? {
            ZiCSampleSource::Inline => {
                ZiFIntoBatch(Value::Array(ZiFInlineSamples(&data, path)?.clone()), &origin)?
            }
            ZiCSampleSource::External(reference) => {
                self.sample_loader
                    .load(path, &reference, ZiCSampleKind::Samples)?
            }
        };

        let global_info = match &global_info_type {
            None => None,
            Some(_) => Some(self.load_global_info(&data, path)?),
        };

        let schema = self.compiler.compile(path, &self.library_path)?;
        for warning in &schema.warnings {
            log::warn!("{}: {}", origin, warning);
        }

        log::debug!(
            "Loaded manifest {} with sample type '{}' and {} samples",
            origin,
            sample_type,
            samples.len()
        );

        Ok(ZiCManifestData {
            path: path.to_path_buf(),
            sample_type,
            global_info_type,
            samples,
            global_info,
            schema,
        })
    }

    fn load_global_info(&self, data: &Map<String, Value>, path: &Path) -> Result<ZiCRawRecord> {
        let origin = path.display().to_string();
        match source_for(data, "global-info-path", path)? {
            ZiCSampleSource::Inline => {
                let value = data
                    .get(ZiCSampleKind::GlobalInfo.key())
                    .cloned()
                    .ok_or_else(|| ZiError::missing_field(origin.clone(), "global-info"))?;
                ZiFIntoRecord(value, &origin)
            }
            ZiCSampleSource::External(reference) => self
                .sample_loader
                .load(path, &reference, ZiCSampleKind::GlobalInfo)?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    ZiError::validation(format!(
                        "global info '{}' referenced by {} is empty",
                        reference, origin
                    ))
                }),
        }
    }
}
