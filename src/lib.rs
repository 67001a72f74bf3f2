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

//! # Zi Studio Library
//!
//! Schema-aware viewer for datasets described by YAML manifests. A dataset
//! is located through the user's storage config, each split manifest is
//! compiled into a type registry, raw records become typed samples and the
//! samples are lazily turned into visualization items.
//!
//! ## Module Overview
//!
//! - **errors**: `ZiError` and the crate `Result`
//! - **record**: raw records as loaded from manifests and sample files
//! - **schema**: schema IR, parser and the manifest schema compiler
//! - **registry**: namespaced type registry, cleared per manifest
//! - **ingest**: external sample files (JSON, JSONL, YAML)
//! - **manifest**: manifest loading into structured data
//! - **sample**: typed sample instantiation
//! - **media**: media access relative to the dataset directory
//! - **visualize**: tasks, palette and the visualization transform
//! - **materializer**: record to visualization items
//! - **dataset**: storage config lookup and manifest discovery
//! - **length**: record counting without compilation
//! - **view**: the lazy, boundable studio view
//!
//! ## Quick Start
//!
//! ```rust
//! use zistudio::{ZiCStudioView, ZiCTaskType, ZiCViewConfig};
//!
//! let config = ZiCViewConfig::ZiFNew(ZiCTaskType::Classification).ZiFMaxItems(5);
//! let mut view = ZiCStudioView::ZiFOpen("cifar10", config)?;
//! while let Some(item) = view.ZiFNextItem()? {
//!     println!("{} -> {} overlays", item.name, item.overlays.len());
//! }
//! # Ok::<(), zistudio::ZiError>(())
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result<T, ZiError>`. Missing manifest directories
//! and files are warnings collected on [`ZiCDatasetLayout`], not errors.

#![allow(non_snake_case)]

pub mod errors;
pub mod record;

pub mod schema;
pub mod registry;
pub mod ingest;
pub mod manifest;
pub mod sample;
pub mod media;
pub mod visualize;
pub mod materializer;
pub mod dataset;
pub mod length;
pub mod view;

pub use errors::{Result, ZiError};
pub use record::{ZiCRawRecord, ZiCRecordBatch, ZiCSampleKind};

pub use schema::{
    ZiCNamespace, ZiCSchemaCompiler, ZiCSchemaParser, ZiCSchemaProgram, ZiCTypeDescriptor,
    ZiCTypeExpr, ZiCTypeRef, ZiCYamlSchemaCompiler,
};
pub use registry::ZiCTypeRegistry;
pub use ingest::{ZiCDataFormat, ZiCFileSampleLoader, ZiCFormatDetector, ZiCLoaderConfig, ZiCSampleLoader};
pub use manifest::{ZiCManifestData, ZiCManifestLoader, ZiCSampleSource};
pub use sample::{ZiCFieldValue, ZiCSampleBuilder, ZiCStructValue, ZiCTypedSample};
pub use media::{ZiCFileReader, ZiCLocalFileReader};
pub use visualize::{
    ZiCAnnotationVisualizer, ZiCColor, ZiCMediaInfo, ZiCOverlay, ZiCPalette, ZiCTaskType,
    ZiCVisualizationItem, ZiCVisualizer,
};
pub use materializer::ZiCSampleMaterializer;
pub use dataset::{ZiCDatasetLayout, ZiCDatasetLocator, ZiCStorageRoot, ZiCStudioConfig};
pub use length::ZiCLengthResolver;
pub use view::{ZiCStudioView, ZiCViewConfig, ZiCViewState};
