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

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ZiError;

/// Inspection task; decides which field kinds get visualized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZiCTaskType {
    Classification,
    Detection,
    SemanticSegmentation,
    InstanceSegmentation,
    Keypoint,
    Ocr,
}

impl ZiCTaskType {
    #[allow(non_snake_case)]
    pub fn ZiFAll() -> [ZiCTaskType; 6] {
        [
            ZiCTaskType::Classification,
            ZiCTaskType::Detection,
            ZiCTaskType::SemanticSegmentation,
            ZiCTaskType::InstanceSegmentation,
            ZiCTaskType::Keypoint,
            ZiCTaskType::Ocr,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ZiCTaskType::Classification => "classification",
            ZiCTaskType::Detection => "detection",
            ZiCTaskType::SemanticSegmentation => "semantic-seg",
            ZiCTaskType::InstanceSegmentation => "instance-seg",
            ZiCTaskType::Keypoint => "keypoint",
            ZiCTaskType::Ocr => "ocr",
        }
    }

    /// Field kinds handed to the visualizer for this task.
    #[allow(non_snake_case)]
    pub fn ZiFFields(&self) -> Vec<String> {
        let kinds: &[&str] = match self {
            ZiCTaskType::Classification => &["image", "label"],
            ZiCTaskType::Detection => &["image", "bbox", "label"],
            ZiCTaskType::SemanticSegmentation => &["image", "labelmap"],
            ZiCTaskType::InstanceSegmentation => &["image", "bbox", "polygon", "label"],
            ZiCTaskType::Keypoint => &["image", "coord", "bbox", "label"],
            ZiCTaskType::Ocr => &["image", "bbox", "polygon", "text"],
        };
        kinds.iter().map(|k| k.to_string()).collect()
    }
}

impl fmt::Display for ZiCTaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZiCTaskType {
    type Err = ZiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ZiCTaskType::ZiFAll()
            .into_iter()
            .find(|task| task.as_str() == wanted)
            .ok_or_else(|| {
                let choices: Vec<&str> = ZiCTaskType::ZiFAll().iter().map(|t| t.as_str()).collect();
                ZiError::validation(format!(
                    "invalid task '{}', you can only choose in {:?}",
                    s, choices
                ))
            })
    }
}
