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

use zistudio::errors::ZiError;
use zistudio::schema::{
    ZiCNamespace, ZiCSchemaCompiler, ZiCSchemaParser, ZiCSchemaProgram, ZiCTypeArgValue,
    ZiCTypeDescriptor, ZiCYamlSchemaCompiler,
};

use common::DETECTION_SCHEMA;

fn ZiFTKeys(program: &ZiCSchemaProgram, namespace: ZiCNamespace) -> Vec<String> {
    program
        .descriptors
        .iter()
        .filter(|d| d.ZiFNamespace() == namespace)
        .map(|d| d.ZiFKey())
        .collect()
}

#[test]
fn ZiFTParserEmitsLabelsForClassDomain() {
    let program = ZiCSchemaParser::ZiFNew()
        .ZiFParseSource(DETECTION_SCHEMA, "detection.yaml")
        .unwrap();

    assert_eq!(ZiFTKeys(&program, ZiCNamespace::ClassDomain), vec!["VOCClassDom"]);
    assert_eq!(
        ZiFTKeys(&program, ZiCNamespace::Label),
        vec!["VOCClassDom::cat", "VOCClassDom::dog", "VOCClassDom::bird"]
    );
    assert_eq!(ZiFTKeys(&program, ZiCNamespace::Struct), vec!["LocalObject", "DetSample"]);

    let bird = program
        .descriptors
        .iter()
        .find_map(|d| match d {
            ZiCTypeDescriptor::Label(label) if label.name == "bird" => Some(label),
            _ => None,
        })
        .unwrap();
    assert_eq!(bird.index, 3);
    assert!(program.warnings.is_empty());
}

#[test]
fn ZiFTParserKeepsFieldOrderAndOptionality() {
    let program = ZiCSchemaParser::ZiFNew()
        .ZiFParseSource(DETECTION_SCHEMA, "detection.yaml")
        .unwrap();
    let sample = program
        .descriptors
        .iter()
        .find_map(|d| match d {
            ZiCTypeDescriptor::Struct(def) if def.name == "DetSample" => Some(def),
            _ => None,
        })
        .unwrap();

    let names: Vec<&str> = sample.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["image", "objects"]);
    assert!(!sample.fields[0].optional);
    assert!(sample.fields[1].optional);
    assert_eq!(sample.params, vec!["cdom"]);

    match sample.fields[1].ty.ZiFArg("etype") {
        Some(ZiCTypeArgValue::Expr(inner)) => {
            assert_eq!(inner.name, "LocalObject");
            assert_eq!(inner.ZiFArg("cdom"), Some(&ZiCTypeArgValue::Param("cdom".into())));
        }
        other => panic!("unexpected element type {:?}", other),
    }
}

#[test]
fn ZiFTParserWarnsOnUnknownDefinitionKind() {
    let source = "Thing:\n  $def: enum\n  values: [a]\nDom:\n  $def: class_domain\n  classes: [x]\n";
    let program = ZiCSchemaParser::ZiFNew().ZiFParseSource(source, "inline").unwrap();
    assert_eq!(program.warnings.len(), 1);
    assert!(program.warnings[0].contains("enum"));
    assert_eq!(ZiFTKeys(&program, ZiCNamespace::ClassDomain), vec!["Dom"]);

    let strict = ZiCSchemaParser::ZiFNew().ZiFStrict(true).ZiFParseSource(source, "inline");
    assert!(matches!(strict, Err(ZiError::Schema { .. })));
}

#[test]
fn ZiFTParserRejectsDefinitionWithoutDef() {
    let source = "Thing:\n  $fields:\n    a: Int\n";
    let err = ZiCSchemaParser::ZiFNew().ZiFParseSource(source, "inline").unwrap_err();
    assert!(err.to_string().contains("$def"));
}

#[test]
fn ZiFTCompilerFollowsImportsAndInlineDefs() {
    let dir = tempfile::tempdir().unwrap();
    let library = tempfile::tempdir().unwrap();
    fs::write(library.path().join("detection.yaml"), DETECTION_SCHEMA).unwrap();
    fs::write(
        dir.path().join("extra.yaml"),
        "$import: [detection]\nTag:\n  $def: struct\n  $fields:\n    name: Str\n",
    )
    .unwrap();

    let manifest = dir.path().join("train.yaml");
    fs::write(
        &manifest,
        "$import:\n  - extra\n  - detection\ndefs:\n  Caption:\n    $def: struct\n    $fields:\n      text: Text\ndata:\n  sample-type: Caption\n  samples: []\n",
    )
    .unwrap();

    let program = ZiCYamlSchemaCompiler::ZiFNew()
        .compile(&manifest, library.path())
        .unwrap();

    let structs = ZiFTKeys(&program, ZiCNamespace::Struct);
    assert_eq!(structs, vec!["LocalObject", "DetSample", "Tag", "Caption"]);
    assert_eq!(ZiFTKeys(&program, ZiCNamespace::ClassDomain), vec!["VOCClassDom"]);
}

#[test]
fn ZiFTCompilerReportsUnresolvedImport() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("train.yaml");
    fs::write(&manifest, "$import: [missing]\ndata:\n  sample-type: X\n  samples: []\n").unwrap();

    let err = ZiCYamlSchemaCompiler::ZiFNew()
        .compile(&manifest, dir.path())
        .unwrap_err();
    assert!(matches!(err, ZiError::Schema { .. }));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn ZiFTSchemaProgramJsonRoundtrip() {
    let program = ZiCSchemaParser::ZiFNew()
        .ZiFParseSource(DETECTION_SCHEMA, "detection.yaml")
        .unwrap();
    let restored = ZiCSchemaProgram::ZiFFromJson(&program.ZiFToJson().unwrap()).unwrap();
    assert_eq!(restored.descriptors, program.descriptors);
}
