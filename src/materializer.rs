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

//! # Sample Materializer
//!
//! Turns one raw record into its visualization items: instantiate the typed
//! sample against the current registry, then hand it to the visualizer.
//! The typed sample is dropped before this returns.

use std::sync::Arc;

use crate::errors::Result;
use crate::media::ZiCFileReader;
use crate::record::ZiCRawRecord;
use crate::registry::ZiCTypeRegistry;
use crate::sample::ZiCSampleBuilder;
use crate::schema::ir::ZiCTypeRef;
use crate::visualize::palette::ZiCPalette;
use crate::visualize::render::{ZiCVisualizationItem, ZiCVisualizer};

#[derive(Debug)]
pub struct ZiCSampleMaterializer<'a> {
    registry: &'a ZiCTypeRegistry,
    visualizer: &'a dyn ZiCVisualizer,
}

impl<'a> ZiCSampleMaterializer<'a> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(registry: &'a ZiCTypeRegistry, visualizer: &'a dyn ZiCVisualizer) -> Self {
        Self {
            registry,
            visualizer,
        }
    }

    /// Named items for one record, in the visualizer's order.
    #[allow(non_snake_case)]
    pub fn ZiFMaterialize(
        &self,
        type_ref: &ZiCTypeRef,
        record: &ZiCRawRecord,
        file_reader: Arc<dyn ZiCFileReader>,
        palette: &mut ZiCPalette,
        fields: &[String],
    ) -> Result<Vec<(String, ZiCVisualizationItem)>> {
        let sample = ZiCSampleBuilder::ZiFNew(self.registry).ZiFInstantiate(type_ref, record, file_reader)?;
        self.visualizer.visualize(&sample, palette, fields)
    }
}
