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

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::Result;
use crate::ingest::loader::ZiCSampleLoader;
use crate::manifest::{
    ZiCSampleSource, ZiFInlineSamples, ZiFReadManifestData, ZiFSampleSource, ZiFSampleTypeRef,
};
use crate::record::ZiCSampleKind;

/// Counts raw records across manifests without compiling any schema.
///
/// Reads the same keys the manifest loader reads, so the total matches the
/// number of records an uncapped iteration pass visits.
#[derive(Clone, Debug)]
pub struct ZiCLengthResolver {
    sample_loader: Arc<dyn ZiCSampleLoader>,
}

impl ZiCLengthResolver {
    #[allow(non_snake_case)]
    pub fn ZiFNew(sample_loader: Arc<dyn ZiCSampleLoader>) -> Self {
        Self { sample_loader }
    }

    #[allow(non_snake_case)]
    pub fn ZiFCountManifest(&self, path: &Path) -> Result<usize> {
        let data = ZiFReadManifestData(path)?;
        ZiFSampleTypeRef(&data, path)?;
        match ZiFSampleSource(&data, path)? {
            ZiCSampleSource::Inline => Ok(ZiFInlineSamples(&data, path)?.len()),
            ZiCSampleSource::External(reference) => {
                self.sample_loader.count(path, &reference, ZiCSampleKind::Samples)
            }
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFCount(&self, manifests: &[PathBuf]) -> Result<usize> {
        let mut total = 0;
        for path in manifests {
            let count = self.ZiFCountManifest(path)?;
            log::debug!("{} holds {} samples", path.display(), count);
            total += count;
        }
        Ok(total)
    }
}
