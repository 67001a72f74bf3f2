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

//! On-disk dataset fixtures shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;
use zistudio::dataset::{ZiCDatasetLayout, ZiCDatasetLocator};

pub const DETECTION_SCHEMA: &str = r#"$dsdl-version: "0.5.0"
VOCClassDom:
  $def: class_domain
  classes: [cat, dog, bird]
LocalObject:
  $def: struct
  $params: [cdom]
  $fields:
    bbox: BBox
    label: Label[dom=$cdom]
DetSample:
  $def: struct
  $params: [cdom]
  $fields:
    image: Image
    objects: List[etype=LocalObject[cdom=$cdom]]
  $optional: [objects]
"#;

pub const DETECTION_SAMPLE_TYPE: &str = "DetSample[cdom=VOCClassDom]";

/// A dataset named `name` inside a temporary storage root, with a config
/// file pointing at that root.
pub struct ZiCTestDataset {
    pub root: TempDir,
    pub name: String,
    pub dir: PathBuf,
    pub config: PathBuf,
}

#[allow(non_snake_case)]
pub fn ZiFTDataset(name: &str) -> ZiCTestDataset {
    let root = tempfile::tempdir().expect("tempdir");
    let storage = root.path().join("storage");
    let dir = storage.join(name);
    fs::create_dir_all(&dir).expect("dataset dir");

    let config = root.path().join("dsdl.json");
    let content = json!({
        "storage": {
            "remote": {"endpoint": "s3://bucket"},
            "local": {"path": storage.display().to_string()}
        }
    });
    fs::write(&config, content.to_string()).expect("config");

    ZiCTestDataset {
        root,
        name: name.to_string(),
        dir,
        config,
    }
}

impl ZiCTestDataset {
    pub fn write(&self, relative: &str, content: impl AsRef<[u8]>) -> PathBuf {
        let path = self.dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent dir");
        }
        fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn split_dir(&self, split: &str) -> PathBuf {
        self.dir.join("yml").join(format!("set-{}", split))
    }

    /// Writes `yml/set-<split>/<split>.yaml`.
    pub fn write_manifest(&self, split: &str, manifest: &Value) -> PathBuf {
        let yaml = serde_yaml::to_string(manifest).expect("manifest yaml");
        self.write(&format!("yml/set-{}/{}.yaml", split, split), yaml)
    }

    /// Writes a detection split: the shared schema next to the manifest and
    /// the manifest itself with inline samples.
    pub fn write_detection_split(&self, split: &str, samples: Value) -> PathBuf {
        self.write(&format!("yml/set-{}/detection.yaml", split), DETECTION_SCHEMA);
        self.write_manifest(split, &ZiFTDetectionManifest(samples))
    }

    pub fn write_media(&self, relative: &str, size: usize) -> PathBuf {
        self.write(relative, vec![0u8; size])
    }

    pub fn locator(&self) -> ZiCDatasetLocator {
        ZiCDatasetLocator::ZiFNew(&self.config)
    }

    pub fn layout(&self) -> ZiCDatasetLayout {
        self.locator().ZiFLocate(&self.name).expect("locate dataset")
    }
}

#[allow(non_snake_case)]
pub fn ZiFTDetectionManifest(samples: Value) -> Value {
    json!({
        "$import": ["detection"],
        "data": {
            "sample-type": DETECTION_SAMPLE_TYPE,
            "samples": samples
        }
    })
}

/// `count` detection samples whose images are `media/<prefix><i>.jpg`, each
/// with one object labelled `label`.
#[allow(non_snake_case)]
pub fn ZiFTDetectionSamples(prefix: &str, count: usize, label: &str) -> Value {
    Value::Array(
        (0..count)
            .map(|i| {
                json!({
                    "image": format!("media/{}{}.jpg", prefix, i),
                    "objects": [{"bbox": [i, i, 10, 10], "label": label}]
                })
            })
            .collect(),
    )
}

/// Writes the media files referenced by [`ZiFTDetectionSamples`].
#[allow(non_snake_case)]
pub fn ZiFTWriteDetectionMedia(dataset: &ZiCTestDataset, prefix: &str, count: usize) {
    for i in 0..count {
        dataset.write_media(&format!("media/{}{}.jpg", prefix, i), 16 + i);
    }
}
