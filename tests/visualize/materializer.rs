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

#[path = "../common/mod.rs"]
mod common;

use std::fs;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;
use zistudio::errors::{Result, ZiError};
use zistudio::materializer::ZiCSampleMaterializer;
use zistudio::media::{ZiCFileReader, ZiCLocalFileReader};
use zistudio::record::ZiCRawRecord;
use zistudio::registry::ZiCTypeRegistry;
use zistudio::sample::{ZiCFieldValue, ZiCSampleBuilder, ZiCTypedSample};
use zistudio::schema::{ZiCSchemaParser, ZiFParseTypeExpr};
use zistudio::visualize::{
    ZiCAnnotationVisualizer, ZiCMediaInfo, ZiCPalette, ZiCTaskType, ZiCVisualizationItem,
    ZiCVisualizer,
};

use common::{DETECTION_SAMPLE_TYPE, DETECTION_SCHEMA};

const OCR_SCHEMA: &str = r#"Word:
  $def: struct
  $fields:
    box: BBox
    outline: Polygon
    text: Text
Page:
  $def: struct
  $fields:
    scan: Image
    thumbnail: Image
    words: List[Word]
"#;

fn ZiFTRegistry(schema: &str) -> ZiCTypeRegistry {
    let program = ZiCSchemaParser::ZiFNew().ZiFParseSource(schema, "schema.yaml").unwrap();
    let mut registry = ZiCTypeRegistry::ZiFNew();
    registry.ZiFIngest(&program).unwrap();
    registry
}

fn ZiFTMedia(files: &[(&str, usize)]) -> (TempDir, Arc<dyn ZiCFileReader>) {
    let dir = tempfile::tempdir().unwrap();
    for (name, size) in files {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![7u8; *size]).unwrap();
    }
    let reader: Arc<dyn ZiCFileReader> = Arc::new(ZiCLocalFileReader::ZiFNew(dir.path()));
    (dir, reader)
}

fn ZiFTRecord(value: Value) -> ZiCRawRecord {
    value.as_object().unwrap().clone()
}

fn ZiFTMaterialize(
    registry: &ZiCTypeRegistry,
    sample_type: &str,
    record: Value,
    reader: &Arc<dyn ZiCFileReader>,
    palette: &mut ZiCPalette,
    task: ZiCTaskType,
) -> Result<Vec<(String, ZiCVisualizationItem)>> {
    let visualizer = ZiCAnnotationVisualizer::ZiFNew();
    ZiCSampleMaterializer::ZiFNew(registry, &visualizer).ZiFMaterialize(
        &ZiFParseTypeExpr(sample_type).unwrap(),
        &ZiFTRecord(record),
        Arc::clone(reader),
        palette,
        &task.ZiFFields(),
    )
}

#[test]
fn ZiFTDetectionSampleYieldsOneItemWithOverlays() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[("media/0.jpg", 42)]);
    let mut palette = ZiCPalette::ZiFNew();

    let items = ZiFTMaterialize(
        &registry,
        DETECTION_SAMPLE_TYPE,
        json!({
            "image": "media/0.jpg",
            "objects": [
                {"bbox": [1, 2, 3, 4], "label": "cat"},
                {"bbox": [5, 6, 7, 8], "label": 2}
            ]
        }),
        &reader,
        &mut palette,
        ZiCTaskType::Detection,
    )
    .unwrap();

    assert_eq!(items.len(), 1);
    let (name, item) = &items[0];
    assert_eq!(name, "image");
    assert_eq!(item.sample_type, "DetSample");
    assert_eq!(
        item.media,
        ZiCMediaInfo {
            path: "media/0.jpg".into(),
            size_bytes: 42
        }
    );

    let fields: Vec<&str> = item.overlays.iter().map(|o| o.field.as_str()).collect();
    assert_eq!(
        fields,
        vec!["objects[0].bbox", "objects[0].label", "objects[1].bbox", "objects[1].label"]
    );
    assert_eq!(item.overlays[0].geometry, json!([1.0, 2.0, 3.0, 4.0]));
    assert_eq!(item.overlays[2].category.as_deref(), Some("dog"));
    assert_eq!(item.overlays[0].color, item.overlays[1].color);
    assert_ne!(item.overlays[0].color, item.overlays[2].color);

    let cat = palette.ZiFGet("VOCClassDom::cat").unwrap();
    assert!(palette.ZiFGet("cat").is_none());
    assert_eq!(item.overlays[0].color, cat.ZiFHex());
    assert_eq!(palette.ZiFLen(), 2);
}

#[test]
fn ZiFTTaskFieldListSelectsOverlays() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[("media/0.jpg", 1)]);
    let record = json!({"image": "media/0.jpg", "objects": [{"bbox": [0, 0, 1, 1], "label": "bird"}]});

    let mut palette = ZiCPalette::ZiFNew();
    let items = ZiFTMaterialize(
        &registry,
        DETECTION_SAMPLE_TYPE,
        record.clone(),
        &reader,
        &mut palette,
        ZiCTaskType::Classification,
    )
    .unwrap();
    let kinds: Vec<&str> = items[0].1.overlays.iter().map(|o| o.kind.as_str()).collect();
    assert_eq!(kinds, vec!["label"]);

    let items = ZiFTMaterialize(
        &registry,
        DETECTION_SAMPLE_TYPE,
        record,
        &reader,
        &mut palette,
        ZiCTaskType::SemanticSegmentation,
    )
    .unwrap();
    assert!(items[0].1.overlays.is_empty());
}

#[test]
fn ZiFTSampleWithSeveralImagesExpandsIntoSeveralItems() {
    let registry = ZiFTRegistry(OCR_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[("scan.png", 10), ("thumb.png", 3)]);
    let mut palette = ZiCPalette::ZiFNew();

    let items = ZiFTMaterialize(
        &registry,
        "Page",
        json!({
            "scan": "scan.png",
            "thumbnail": "thumb.png",
            "words": [{"box": [0, 0, 5, 5], "outline": [[[0, 0], [5, 0], [5, 5]]], "text": "hi"}]
        }),
        &reader,
        &mut palette,
        ZiCTaskType::Ocr,
    )
    .unwrap();

    let names: Vec<&str> = items.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["scan", "thumbnail"]);
    assert_eq!(items[1].1.media.size_bytes, 3);

    let overlays = &items[0].1.overlays;
    assert_eq!(overlays.len(), 3);
    assert_eq!(overlays[2].geometry, json!("hi"));
    // No label in the word, so every overlay is coloured by its field name.
    assert!(overlays.iter().all(|o| o.category.is_none()));
    assert_eq!(palette.ZiFLen(), 3);
}

#[test]
fn ZiFTMissingRequiredFieldIsSchemaError() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[]);
    let mut palette = ZiCPalette::ZiFNew();

    let err = ZiFTMaterialize(
        &registry,
        DETECTION_SAMPLE_TYPE,
        json!({"objects": []}),
        &reader,
        &mut palette,
        ZiCTaskType::Detection,
    )
    .unwrap_err();
    assert!(matches!(err, ZiError::Schema { .. }));
    assert!(err.to_string().contains("image"));
}

#[test]
fn ZiFTLabelOutsideDomainIsRejected() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[("a.jpg", 1)]);
    let mut palette = ZiCPalette::ZiFNew();

    for label in [json!("horse"), json!(0), json!(4)] {
        let err = ZiFTMaterialize(
            &registry,
            DETECTION_SAMPLE_TYPE,
            json!({"image": "a.jpg", "objects": [{"bbox": [0, 0, 1, 1], "label": label}]}),
            &reader,
            &mut palette,
            ZiCTaskType::Detection,
        )
        .unwrap_err();
        assert!(matches!(err, ZiError::Schema { .. }), "unexpected {:?}", err);
    }
}

#[test]
fn ZiFTMissingMediaSurfacesIoError() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[]);
    let mut palette = ZiCPalette::ZiFNew();

    let err = ZiFTMaterialize(
        &registry,
        DETECTION_SAMPLE_TYPE,
        json!({"image": "media/none.jpg"}),
        &reader,
        &mut palette,
        ZiCTaskType::Detection,
    )
    .unwrap_err();
    assert!(matches!(err, ZiError::Io(_)));

    let escape = reader.read("../outside.jpg").unwrap_err();
    assert!(matches!(escape, ZiError::Validation { .. }));
}

#[test]
fn ZiFTSampleBuilderFillsTypedValues() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[]);

    let sample: ZiCTypedSample = ZiCSampleBuilder::ZiFNew(&registry)
        .ZiFInstantiate(
            &ZiFParseTypeExpr(DETECTION_SAMPLE_TYPE).unwrap(),
            &ZiFTRecord(json!({"image": "x.jpg", "objects": [{"bbox": [0, 0, 2, 2], "label": 3}], "extra": 1})),
            reader,
        )
        .unwrap();

    assert_eq!(sample.ZiFTypeName(), "DetSample");
    assert_eq!(sample.ZiFGet("image"), Some(&ZiCFieldValue::Image("x.jpg".into())));
    assert!(sample.ZiFGet("extra").is_none());
    match sample.ZiFGet("objects") {
        Some(ZiCFieldValue::List(objects)) => match &objects[0] {
            ZiCFieldValue::Struct(object) => match object.ZiFGet("label") {
                Some(ZiCFieldValue::Label(label)) => {
                    assert_eq!(label.name, "bird");
                    assert_eq!(label.domain, "VOCClassDom");
                }
                other => panic!("unexpected label {:?}", other),
            },
            other => panic!("unexpected object {:?}", other),
        },
        other => panic!("unexpected objects {:?}", other),
    }
}

#[test]
fn ZiFTUnboundParameterIsSchemaError() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[("a.jpg", 1)]);
    let mut palette = ZiCPalette::ZiFNew();

    let err = ZiFTMaterialize(
        &registry,
        "DetSample",
        json!({"image": "a.jpg", "objects": [{"bbox": [0, 0, 1, 1], "label": "cat"}]}),
        &reader,
        &mut palette,
        ZiCTaskType::Detection,
    )
    .unwrap_err();
    assert!(err.to_string().contains("cdom"));
}

#[derive(Debug)]
struct ZiCFailingVisualizer;

impl ZiCVisualizer for ZiCFailingVisualizer {
    fn visualize(
        &self,
        _sample: &ZiCTypedSample,
        _palette: &mut ZiCPalette,
        _fields: &[String],
    ) -> Result<Vec<(String, ZiCVisualizationItem)>> {
        Err(ZiError::visualization("renderer crashed"))
    }
}

#[test]
fn ZiFTVisualizerErrorsPropagateUnchanged() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[("a.jpg", 1)]);
    let mut palette = ZiCPalette::ZiFNew();

    let err = ZiCSampleMaterializer::ZiFNew(&registry, &ZiCFailingVisualizer)
        .ZiFMaterialize(
            &ZiFParseTypeExpr(DETECTION_SAMPLE_TYPE).unwrap(),
            &ZiFTRecord(json!({"image": "a.jpg"})),
            reader,
            &mut palette,
            &ZiCTaskType::Detection.ZiFFields(),
        )
        .unwrap_err();
    assert!(matches!(err, ZiError::Visualization { ref message } if message == "renderer crashed"));
}

const TWO_DOMAIN_SCHEMA: &str = r#"DomA:
  $def: class_domain
  classes: [cat, bbox]
DomB:
  $def: class_domain
  classes: [cat]
Shape:
  $def: struct
  $fields:
    bbox: BBox
Pair:
  $def: struct
  $fields:
    image: Image
    first: Label[dom=DomA]
    second: Label[dom=DomB]
    third: Label[dom=DomA]
    shape: Shape
"#;

#[test]
fn ZiFTPaletteKeysKeepDomainsAndFieldsApart() {
    let registry = ZiFTRegistry(TWO_DOMAIN_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[("a.jpg", 1)]);
    let mut palette = ZiCPalette::ZiFNew();

    let items = ZiFTMaterialize(
        &registry,
        "Pair",
        json!({
            "image": "a.jpg",
            "first": "cat",
            "second": "cat",
            "third": "bbox",
            "shape": {"bbox": [0, 0, 1, 1]}
        }),
        &reader,
        &mut palette,
        ZiCTaskType::Detection,
    )
    .unwrap();

    let overlays = &items[0].1.overlays;
    let fields: Vec<&str> = overlays.iter().map(|o| o.field.as_str()).collect();
    assert_eq!(fields, vec!["first", "second", "third", "shape.bbox"]);

    // Same class name, different domains.
    assert_eq!(overlays[0].category.as_deref(), Some("cat"));
    assert_eq!(overlays[1].category.as_deref(), Some("cat"));
    assert_ne!(overlays[0].color, overlays[1].color);

    // A class called `bbox` and an unlabelled bbox field.
    assert_eq!(overlays[2].category.as_deref(), Some("bbox"));
    assert!(overlays[3].category.is_none());
    assert_ne!(overlays[2].color, overlays[3].color);

    assert_eq!(palette.ZiFLen(), 4);
    for key in ["DomA::cat", "DomB::cat", "DomA::bbox", "field:bbox"] {
        assert!(palette.ZiFGet(key).is_some(), "missing palette key {}", key);
    }
}

#[derive(Debug)]
struct ZiCMetadataOnlyReader;

impl ZiCFileReader for ZiCMetadataOnlyReader {
    fn read(&self, path: &str) -> Result<Vec<u8>> {
        Err(ZiError::Io(format!("unexpected full read of {}", path)))
    }

    fn size(&self, _path: &str) -> Result<u64> {
        Ok(1 << 30)
    }
}

#[test]
fn ZiFTMediaSizeUsesReaderMetadata() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let reader: Arc<dyn ZiCFileReader> = Arc::new(ZiCMetadataOnlyReader);
    let mut palette = ZiCPalette::ZiFNew();

    let items = ZiFTMaterialize(
        &registry,
        DETECTION_SAMPLE_TYPE,
        json!({"image": "huge.tif"}),
        &reader,
        &mut palette,
        ZiCTaskType::Detection,
    )
    .unwrap();
    assert_eq!(items[0].1.media.size_bytes, 1 << 30);
}

#[test]
fn ZiFTLocalReaderSizeComesFromMetadata() {
    let (dir, reader) = ZiFTMedia(&[("media/a.jpg", 321)]);
    assert_eq!(reader.size("media/a.jpg").unwrap(), 321);
    assert!(matches!(reader.size("media"), Err(ZiError::Io(_))));
    assert!(matches!(reader.size("missing.jpg"), Err(ZiError::Io(_))));
    assert!(matches!(reader.size("../a.jpg"), Err(ZiError::Validation { .. })));
    drop(dir);
}

#[test]
fn ZiFTEmptyImagePathIsVisualizationError() {
    let registry = ZiFTRegistry(DETECTION_SCHEMA);
    let (_dir, reader) = ZiFTMedia(&[]);
    let mut palette = ZiCPalette::ZiFNew();

    let err = ZiFTMaterialize(
        &registry,
        DETECTION_SAMPLE_TYPE,
        json!({"image": "  "}),
        &reader,
        &mut palette,
        ZiCTaskType::Detection,
    )
    .unwrap_err();
    assert!(matches!(err, ZiError::Visualization { ref message } if message.contains("image")));
}
