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

use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZiCDataFormat {
    Json,
    Jsonl,
    Yaml,
    Unknown,
}

#[derive(Clone, Debug, Default)]
pub struct ZiCFormatDetector;

impl ZiCFormatDetector {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self
    }

    #[allow(non_snake_case)]
    pub fn ZiFDetectFromPath(&self, path: &Path) -> ZiCDataFormat {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "json" => ZiCDataFormat::Json,
            "jsonl" | "ndjson" => ZiCDataFormat::Jsonl,
            "yaml" | "yml" => ZiCDataFormat::Yaml,
            _ => ZiCDataFormat::Unknown,
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFDetectFromContent(&self, content: &[u8]) -> ZiCDataFormat {
        let content_str = String::from_utf8_lossy(content);
        let trimmed = content_str.trim();
        if trimmed.is_empty() {
            return ZiCDataFormat::Unknown;
        }

        if trimmed.starts_with('[') {
            return ZiCDataFormat::Json;
        }
        if trimmed.starts_with('{') {
            if trimmed.contains("}\n{") || trimmed.contains("}\r\n{") {
                return ZiCDataFormat::Jsonl;
            }
            return ZiCDataFormat::Json;
        }
        if trimmed.starts_with("---") || trimmed.starts_with("- ") || trimmed.contains(": ") {
            return ZiCDataFormat::Yaml;
        }

        ZiCDataFormat::Unknown
    }
}
