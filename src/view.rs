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

//! # Studio View
//!
//! Lazy, boundable iteration over the visualization items of a dataset.
//!
//! Items are produced one manifest at a time: the type registry is cleared,
//! the manifest is loaded and its schema registered, the sample type is
//! resolved, records are optionally shuffled within the manifest, and each
//! record is materialized on demand. Nothing is loaded before the first
//! [`ZiCStudioView::ZiFNextItem`] call.
//!
//! ## States
//!
//! - `Idle`: freshly constructed or reinitialized
//! - `Active`: at least one `next` call has pulled from the sequence
//! - `Exhausted`: the cap was reached, the sequence ended or an error was
//!   returned; stays here until [`ZiCStudioView::ZiFReinit`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use zistudio::view::{ZiCStudioView, ZiCViewConfig};
//! use zistudio::visualize::ZiCTaskType;
//!
//! let config = ZiCViewConfig::ZiFNew(ZiCTaskType::Detection).ZiFMaxItems(10);
//! let mut view = ZiCStudioView::ZiFOpen("voc2012", config)?;
//! println!("{} samples", view.ZiFLen()?);
//! for item in &mut view {
//!     let item = item?;
//!     println!("{} {}", item.name, item.media.path);
//! }
//! # Ok::<(), zistudio::errors::ZiError>(())
//! ```

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::{ZiCDatasetLayout, ZiCDatasetLocator};
use crate::errors::{Result, ZiError};
use crate::ingest::loader::ZiCFileSampleLoader;
use crate::length::ZiCLengthResolver;
use crate::manifest::ZiCManifestLoader;
use crate::materializer::ZiCSampleMaterializer;
use crate::media::{ZiCFileReader, ZiCLocalFileReader};
use crate::record::ZiCRawRecord;
use crate::registry::ZiCTypeRegistry;
use crate::schema::compiler::ZiCYamlSchemaCompiler;
use crate::schema::ir::ZiCTypeRef;
use crate::visualize::palette::ZiCPalette;
use crate::visualize::render::{ZiCAnnotationVisualizer, ZiCVisualizationItem, ZiCVisualizer};
use crate::visualize::task::ZiCTaskType;

/// Options for one studio view.
#[derive(Clone, Debug)]
pub struct ZiCViewConfig {
    pub task: ZiCTaskType,
    pub max_items: Option<usize>,
    pub shuffle: bool,
    /// Fixed shuffle seed; every pass replays the same permutation.
    pub seed: Option<u64>,
    /// Fallback directory for `$import`ed schema files.
    pub library_path: PathBuf,
    pub strict_schema: bool,
}

impl ZiCViewConfig {
    #[allow(non_snake_case)]
    pub fn ZiFNew(task: ZiCTaskType) -> Self {
        Self {
            task,
            max_items: None,
            shuffle: false,
            seed: None,
            library_path: PathBuf::new(),
            strict_schema: false,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFMaxItems(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFShuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFSeed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFLibraryPath(mut self, library_path: impl Into<PathBuf>) -> Self {
        self.library_path = library_path.into();
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFStrict(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZiCViewState {
    Idle,
    Active,
    Exhausted,
}

#[derive(Debug)]
struct ZiCManifestCursor {
    path: PathBuf,
    sample_type: ZiCTypeRef,
    records: std::vec::IntoIter<ZiCRawRecord>,
    global_info: Option<ZiCRawRecord>,
}

/// Lazy iterator over a dataset's visualization items.
#[derive(Debug)]
pub struct ZiCStudioView {
    layout: ZiCDatasetLayout,
    config: ZiCViewConfig,
    fields: Vec<String>,
    manifest_loader: ZiCManifestLoader,
    visualizer: Box<dyn ZiCVisualizer>,
    file_reader: Arc<dyn ZiCFileReader>,
    registry: ZiCTypeRegistry,
    palette: ZiCPalette,
    rng: StdRng,
    cursor: usize,
    state: ZiCViewState,
    next_manifest: usize,
    current: Option<ZiCManifestCursor>,
    pending: VecDeque<ZiCVisualizationItem>,
    length: Option<usize>,
}

fn fresh_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

impl ZiCStudioView {
    /// Opens a dataset found through the default studio config.
    #[allow(non_snake_case)]
    pub fn ZiFOpen(dataset: &str, config: ZiCViewConfig) -> Result<Self> {
        Self::ZiFOpenWith(&ZiCDatasetLocator::ZiFDefault(), dataset, config)
    }

    #[allow(non_snake_case)]
    pub fn ZiFOpenWith(locator: &ZiCDatasetLocator, dataset: &str, config: ZiCViewConfig) -> Result<Self> {
        let layout = locator.ZiFLocate(dataset)?;
        Ok(Self::ZiFFromLayout(layout, config))
    }

    /// Builds a view with the default collaborators: YAML schema compiler,
    /// file sample loader, local media reader rooted at the dataset directory
    /// and the annotation visualizer.
    #[allow(non_snake_case)]
    pub fn ZiFFromLayout(layout: ZiCDatasetLayout, config: ZiCViewConfig) -> Self {
        let compiler = ZiCYamlSchemaCompiler::ZiFNew().ZiFStrict(config.strict_schema);
        let manifest_loader = ZiCManifestLoader::ZiFNew(Arc::new(compiler), Arc::new(ZiCFileSampleLoader::ZiFNew()))
            .ZiFWithLibraryPath(config.library_path.clone());
        let file_reader: Arc<dyn ZiCFileReader> = Arc::new(ZiCLocalFileReader::ZiFNew(layout.dataset_dir.clone()));

        let mut view = Self {
            fields: config.task.ZiFFields(),
            rng: fresh_rng(config.seed),
            layout,
            config,
            manifest_loader,
            visualizer: Box::new(ZiCAnnotationVisualizer::ZiFNew()),
            file_reader,
            registry: ZiCTypeRegistry::ZiFNew(),
            palette: ZiCPalette::ZiFNew(),
            cursor: 0,
            state: ZiCViewState::Idle,
            next_manifest: 0,
            current: None,
            pending: VecDeque::new(),
            length: None,
        };
        view.ZiFReinit();
        view
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithVisualizer(mut self, visualizer: Box<dyn ZiCVisualizer>) -> Self {
        self.visualizer = visualizer;
        self.ZiFReinit();
        self
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithFileReader(mut self, file_reader: Arc<dyn ZiCFileReader>) -> Self {
        self.file_reader = file_reader;
        self.ZiFReinit();
        self
    }

    /// Replaces the manifest loader; drops any cached length.
    #[allow(non_snake_case)]
    pub fn ZiFWithManifestLoader(mut self, manifest_loader: ZiCManifestLoader) -> Self {
        self.manifest_loader = manifest_loader;
        self.length = None;
        self.ZiFReinit();
        self
    }

    /// Overrides the field kinds handed to the visualizer.
    #[allow(non_snake_case)]
    pub fn ZiFWithFields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self.ZiFReinit();
        self
    }

    /// Restarts the pass: clears palette, cursor and registry and rewinds
    /// to the first manifest. The cached length is kept.
    #[allow(non_snake_case)]
    pub fn ZiFReinit(&mut self) {
        self.palette.ZiFClear();
        self.registry.ZiFClear();
        self.cursor = 0;
        self.next_manifest = 0;
        self.current = None;
        self.pending.clear();
        if self.config.seed.is_some() {
            self.rng = fresh_rng(self.config.seed);
        }
        self.state = ZiCViewState::Idle;
    }

    /// Next visualization item, `Ok(None)` at end of sequence.
    ///
    /// After an error the view is exhausted until reinitialized.
    #[allow(non_snake_case)]
    pub fn ZiFNextItem(&mut self) -> Result<Option<ZiCVisualizationItem>> {
        if self.state == ZiCViewState::Exhausted {
            return Ok(None);
        }
        if let Some(max) = self.config.max_items {
            if self.cursor >= max {
                self.state = ZiCViewState::Exhausted;
                return Ok(None);
            }
        }

        self.state = ZiCViewState::Active;
        match self.produce() {
            Ok(Some(item)) => {
                self.cursor += 1;
                Ok(Some(item))
            }
            Ok(None) => {
                self.state = ZiCViewState::Exhausted;
                Ok(None)
            }
            Err(e) => {
                self.state = ZiCViewState::Exhausted;
                Err(e)
            }
        }
    }

    fn produce(&mut self) -> Result<Option<ZiCVisualizationItem>> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Ok(Some(item));
            }

            if let Some(current) = self.current.as_mut() {
                if let Some(record) = current.records.next() {
                    let items = ZiCSampleMaterializer::ZiFNew(&self.registry, self.visualizer.as_ref())
                        .ZiFMaterialize(
                            &current.sample_type,
                            &record,
                            Arc::clone(&self.file_reader),
                            &mut self.palette,
                            &self.fields,
                        )?;
                    self.pending.extend(items.into_iter().map(|(_, item)| item));
                    continue;
                }
                log::debug!("Finished manifest {}", current.path.display());
            }
            self.current = None;

            if self.next_manifest >= self.layout.manifests.len() {
                return Ok(None);
            }
            self.enter_manifest()?;
        }
    }

    fn enter_manifest(&mut self) -> Result<()> {
        let path = self
            .layout
            .manifests
            .get(self.next_manifest)
            .cloned()
            .ok_or_else(|| ZiError::internal("manifest index out of range"))?;
        self.next_manifest += 1;

        self.registry.ZiFClear();
        log::debug!("Entering manifest {} with a cleared registry", path.display());

        let manifest = self.manifest_loader.ZiFLoad(&path)?;
        let registered = self.registry.ZiFIngest(&manifest.schema)?;
        log::debug!("Registered {} descriptors from {}", registered, path.display());

        self.registry.ZiFResolveStruct(&manifest.sample_type.name)?;
        if let Some(info_type) = &manifest.global_info_type {
            self.registry.ZiFResolveStruct(&info_type.name)?;
        }

        let mut records = manifest.samples;
        if self.config.shuffle {
            records.shuffle(&mut self.rng);
        }

        self.current = Some(ZiCManifestCursor {
            path,
            sample_type: manifest.sample_type,
            records: records.into_iter(),
            global_info: manifest.global_info,
        });
        Ok(())
    }

    /// Total raw record count across manifests, computed once and cached.
    #[allow(non_snake_case)]
    pub fn ZiFLen(&mut self) -> Result<usize> {
        if let Some(length) = self.length {
            return Ok(length);
        }
        let resolver = ZiCLengthResolver::ZiFNew(Arc::clone(self.manifest_loader.ZiFSampleLoader()));
        let length = resolver.ZiFCount(&self.layout.manifests)?;
        self.length = Some(length);
        Ok(length)
    }

    #[allow(non_snake_case)]
    pub fn ZiFState(&self) -> ZiCViewState {
        self.state
    }

    /// Items yielded since the last reinit.
    #[allow(non_snake_case)]
    pub fn ZiFCursor(&self) -> usize {
        self.cursor
    }

    #[allow(non_snake_case)]
    pub fn ZiFPalette(&self) -> &ZiCPalette {
        &self.palette
    }

    #[allow(non_snake_case)]
    pub fn ZiFRegistry(&self) -> &ZiCTypeRegistry {
        &self.registry
    }

    #[allow(non_snake_case)]
    pub fn ZiFLayout(&self) -> &ZiCDatasetLayout {
        &self.layout
    }

    #[allow(non_snake_case)]
    pub fn ZiFWarnings(&self) -> &[String] {
        &self.layout.warnings
    }

    #[allow(non_snake_case)]
    pub fn ZiFFields(&self) -> &[String] {
        &self.fields
    }

    /// Global info of the manifest currently being iterated.
    #[allow(non_snake_case)]
    pub fn ZiFGlobalInfo(&self) -> Option<&ZiCRawRecord> {
        self.current.as_ref().and_then(|c| c.global_info.as_ref())
    }

    #[allow(non_snake_case)]
    pub fn ZiFCurrentManifest(&self) -> Option<&PathBuf> {
        self.current.as_ref().map(|c| &c.path)
    }
}

impl Iterator for ZiCStudioView {
    type Item = Result<ZiCVisualizationItem>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ZiFNextItem().transpose()
    }
}
