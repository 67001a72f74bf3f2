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

//! # Visualize Module
//!
//! Task field lists, the shared colour palette and the transform from a
//! typed sample to visualization items.
//!
//! - [`task`]: inspection tasks and the field kinds each one draws
//! - [`palette`]: deterministic category colours, reset with the view
//! - [`render`]: the [`ZiCVisualizer`] seam and its default implementation

pub mod palette;
pub mod render;
pub mod task;

pub use palette::{ZiCColor, ZiCPalette};
pub use render::{
    ZiCAnnotationVisualizer, ZiCMediaInfo, ZiCOverlay, ZiCVisualizationItem, ZiCVisualizer,
};
pub use task::ZiCTaskType;
