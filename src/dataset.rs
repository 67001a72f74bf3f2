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

//! # Dataset Lookup
//!
//! Finds a named dataset under the storage roots of the studio config and
//! lists its split manifests.
//!
//! ## Config File
//!
//! `$HOME/.dsdl/dsdl.json` unless `ZI_STUDIO_CONFIG` or an explicit path says
//! otherwise:
//!
//! ```json
//! {"storage": {"default": {"path": "/data/datasets"}, "s3": {"endpoint": "..."}}}
//! ```
//!
//! Roots are tried in file order and entries without `path` are skipped.
//!
//! ## Dataset Layout
//!
//! ```text
//! <root>/<dataset>/
//!   media/...                     media paths are relative to <root>/<dataset>
//!   yml/set-train/train.yaml
//!   yml/set-val/val.yaml
//! ```

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::{Result, ZiError};

pub const ZI_STUDIO_CONFIG_ENV: &str = "ZI_STUDIO_CONFIG";
pub const ZI_SPLIT_PREFIX: &str = "set-";
pub const ZI_MANIFEST_DIR: &str = "yml";

/// One named storage location from the config file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZiCStorageRoot {
    pub name: String,
    pub path: Option<PathBuf>,
}

/// Parsed studio config.
#[derive(Clone, Debug, Default)]
pub struct ZiCStudioConfig {
    pub storage: Vec<ZiCStorageRoot>,
}

impl ZiCStudioConfig {
    #[allow(non_snake_case)]
    pub fn ZiFFromJson(value: &Value) -> Result<Self> {
        let storage = value
            .get("storage")
            .ok_or_else(|| ZiError::configuration("config has no 'storage' section"))?
            .as_object()
            .ok_or_else(|| ZiError::configuration("'storage' must be an object"))?;

        let storage = storage
            .iter()
            .map(|(name, entry)| ZiCStorageRoot {
                name: name.clone(),
                path: entry.get("path").and_then(Value::as_str).map(PathBuf::from),
            })
            .collect();
        Ok(Self { storage })
    }

    #[allow(non_snake_case)]
    pub fn ZiFLoad(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ZiError::configuration(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            ZiError::configuration(format!("invalid config {}: {}", path.display(), e))
        })?;
        Self::ZiFFromJson(&value)
    }

    /// Config path from `ZI_STUDIO_CONFIG`, else `$HOME/.dsdl/dsdl.json`.
    #[allow(non_snake_case)]
    pub fn ZiFDefaultPath() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(ZI_STUDIO_CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let home = std::env::var_os("HOME")
            .ok_or_else(|| ZiError::configuration("HOME is not set and ZI_STUDIO_CONFIG is empty"))?;
        Ok(PathBuf::from(home).join(".dsdl").join("dsdl.json"))
    }
}

/// A located dataset: media root plus its split manifests.
#[derive(Clone, Debug)]
pub struct ZiCDatasetLayout {
    pub name: String,
    pub dataset_dir: PathBuf,
    pub manifests: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

impl ZiCDatasetLayout {
    /// Scans `dataset_dir/yml` for `set-<split>/<split>.yaml` manifests,
    /// ordered by split directory name.
    #[allow(non_snake_case)]
    pub fn ZiFScan(name: impl Into<String>, dataset_dir: impl Into<PathBuf>) -> Result<Self> {
        let mut layout = ZiCDatasetLayout {
            name: name.into(),
            dataset_dir: dataset_dir.into(),
            manifests: Vec::new(),
            warnings: Vec::new(),
        };

        let yml_dir = layout.dataset_dir.join(ZI_MANIFEST_DIR);
        let entries = match std::fs::read_dir(&yml_dir) {
            Ok(entries) => entries.collect::<std::io::Result<Vec<_>>>()?,
            Err(_) => Vec::new(),
        };
        if entries.is_empty() {
            layout.warn(format!(
                "'{}' is not a directory or is empty, please check again.",
                yml_dir.display()
            ));
            return Ok(layout);
        }

        let mut splits: Vec<String> = entries
            .iter()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|dir| dir.starts_with(ZI_SPLIT_PREFIX))
            .collect();
        splits.sort();

        for dir in splits {
            let split = &dir[ZI_SPLIT_PREFIX.len()..];
            let manifest = yml_dir.join(&dir).join(format!("{}.yaml", split));
            if manifest.is_file() {
                layout.manifests.push(manifest);
            } else {
                layout.warn(format!("'{}' not found, please check again.", manifest.display()));
            }
        }
        Ok(layout)
    }

    fn warn(&mut self, message: String) {
        log::warn!("{}", message);
        self.warnings.push(message);
    }
}

/// Resolves dataset names against a studio config.
#[derive(Clone, Debug)]
pub struct ZiCDatasetLocator {
    config_path: Option<PathBuf>,
}

impl ZiCDatasetLocator {
    #[allow(non_snake_case)]
    pub fn ZiFNew(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: Some(config_path.into()),
        }
    }

    /// Uses the default config location, resolved on each lookup.
    #[allow(non_snake_case)]
    pub fn ZiFDefault() -> Self {
        Self { config_path: None }
    }

    #[allow(non_snake_case)]
    pub fn ZiFConfigPath(&self) -> Result<PathBuf> {
        match &self.config_path {
            Some(path) => Ok(path.clone()),
            None => ZiCStudioConfig::ZiFDefaultPath(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFLocate(&self, dataset: &str) -> Result<ZiCDatasetLayout> {
        let config_path = self.ZiFConfigPath()?;
        let config = ZiCStudioConfig::ZiFLoad(&config_path)?;

        let dataset_dir = config
            .storage
            .iter()
            .filter_map(|root| root.path.as_ref())
            .map(|root| root.join(dataset))
            .find(|dir| dir.is_dir())
            .ok_or_else(|| ZiError::dataset_not_found(dataset))?;

        log::debug!("Located dataset '{}' at {}", dataset, dataset_dir.display());
        ZiCDatasetLayout::ZiFScan(dataset, dataset_dir)
    }
}
