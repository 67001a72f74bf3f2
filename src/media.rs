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

use std::path::{Component, Path, PathBuf};

use crate::errors::{Result, ZiError};

/// Media accessor bound to every typed sample.
///
/// Implementations own their resource scoping; a read either completes or
/// fails before it returns.
pub trait ZiCFileReader: std::fmt::Debug {
    fn read(&self, path: &str) -> Result<Vec<u8>>;

    /// Size of the file in bytes. Readers with cheaper metadata override
    /// this instead of reading the whole file.
    fn size(&self, path: &str) -> Result<u64> {
        self.read(path).map(|bytes| bytes.len() as u64)
    }

    fn exists(&self, path: &str) -> bool {
        self.read(path).is_ok()
    }
}

/// Reads media from a local directory, the dataset's media root.
#[derive(Clone, Debug)]
pub struct ZiCLocalFileReader {
    root: PathBuf,
}

impl ZiCLocalFileReader {
    #[allow(non_snake_case)]
    pub fn ZiFNew(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[allow(non_snake_case)]
    pub fn ZiFRoot(&self) -> &Path {
        &self.root
    }

    /// Joins a media path onto the root, refusing to leave it.
    #[allow(non_snake_case)]
    pub fn ZiFResolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_))
        });
        if escapes {
            return Err(ZiError::validation(format!(
                "media path '{}' must stay inside {}",
                path,
                self.root.display()
            )));
        }
        Ok(self.root.join(relative))
    }
}

impl ZiCFileReader for ZiCLocalFileReader {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        let full = self.ZiFResolve(path)?;
        std::fs::read(&full)
            .map_err(|e| ZiError::Io(format!("failed to read media {}: {}", full.display(), e)))
    }

    fn size(&self, path: &str) -> Result<u64> {
        let full = self.ZiFResolve(path)?;
        let metadata = std::fs::metadata(&full)
            .map_err(|e| ZiError::Io(format!("failed to stat media {}: {}", full.display(), e)))?;
        if !metadata.is_file() {
            return Err(ZiError::Io(format!("media {} is not a file", full.display())));
        }
        Ok(metadata.len())
    }

    fn exists(&self, path: &str) -> bool {
        self.ZiFResolve(path).map(|p| p.is_file()).unwrap_or(false)
    }
}
