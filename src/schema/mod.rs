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

//! # Schema Module
//!
//! This module turns the declarative schema a manifest refers to into a list of
//! type descriptors that the type registry ingests directly. No code is
//! generated or executed along the way.
//!
//! ## Architecture
//!
//! - **IR** ([ir.rs](ir/index.html)): type expressions and the three kinds of
//!   descriptors (labels, structs, class domains)
//! - **Parser** ([parser.rs](parser/index.html)): definition mappings and type
//!   expressions into IR
//! - **Compiler** ([compiler.rs](compiler/index.html)): the adapter invoked per
//!   manifest, following `$import` references into a definition library
//!
//! ## Definition Format
//!
//! ```yaml
//! $dsdl-version: "0.5.0"
//! VOCClassDom:
//!   $def: class_domain
//!   classes: [cat, dog]
//! LocalObject:
//!   $def: struct
//!   $params: [cdom]
//!   $fields:
//!     bbox: BBox
//!     label: Label[dom=$cdom]
//! DetSample:
//!   $def: struct
//!   $params: [cdom]
//!   $fields:
//!     image: Image
//!     objects: List[etype=LocalObject[cdom=$cdom]]
//!   $optional: [objects]
//! ```

pub mod ir;
pub mod parser;
pub mod compiler;

pub use ir::{
    ZiCClassDomainDef, ZiCFieldDef, ZiCLabelDef, ZiCNamespace, ZiCSchemaProgram, ZiCStructDef,
    ZiCTypeArg, ZiCTypeArgValue, ZiCTypeDescriptor, ZiCTypeExpr, ZiCTypeRef, ZiFLabelKey,
};
pub use parser::{ZiCSchemaParser, ZiCSchemaParserConfig, ZiFParseTypeExpr, ZiFYamlToJson};
pub use compiler::{ZiCSchemaCompiler, ZiCYamlSchemaCompiler};
