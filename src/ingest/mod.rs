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

//! # Record Ingestion Module
//!
//! Loading of sample records that a manifest references by path instead of
//! embedding them inline.
//!
//! ## Module Components
//!
//! - **Format Detection** ([format.rs](format/index.html)): by extension, then by content
//! - **Loader** ([loader.rs](loader/index.html)): the external sample loader used for
//!   both sample records and global info
//!
//! ## Supported Input Formats
//!
//! - **JSON** / **YAML**: a sequence of records, or a mapping holding the
//!   sequence under `samples` (or `global-info`)
//! - **JSONL**: one record per line
//!
//! ```rust
//! use zistudio::ingest::{ZiCFileSampleLoader, ZiCSampleLoader};
//! use zistudio::record::ZiCSampleKind;
//!
//! let loader = ZiCFileSampleLoader::ZiFNew();
//! let records = loader.load(&manifest_path, "samples.json", ZiCSampleKind::Samples)?;
//! ```

pub mod format;
pub mod loader;

pub use format::{ZiCDataFormat, ZiCFormatDetector};
pub use loader::{ZiCFileSampleLoader, ZiCLoaderConfig, ZiCSampleLoader};
