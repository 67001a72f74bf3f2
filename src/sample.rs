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

//! # Typed Sample Module
//!
//! Instantiates a registered struct from one raw record. The resulting
//! [`ZiCTypedSample`] holds checked field values plus the media accessor it
//! was bound to, and lives only for the duration of one materialization.
//!
//! ## Field Kinds
//!
//! | Kind | Raw value |
//! |------|-----------|
//! | `Bool`, `Int`, `Num`, `Str`, `Text` | matching scalar |
//! | `Coord` | `[x, y]` |
//! | `BBox` | `[x, y, w, h]` |
//! | `Polygon` | list of rings of `[x, y]` |
//! | `Label[dom=D]` | class name or 1-based index in domain `D` |
//! | `Image`, `LabelMap[dom=D]` | media path relative to the media root |
//! | `List[etype=T]` | sequence of `T` |
//! | any other name | mapping instantiated as that registered struct |

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::errors::{Result, ZiError};
use crate::media::ZiCFileReader;
use crate::record::{ZiCRawRecord, ZiFValueKind};
use crate::registry::ZiCTypeRegistry;
use crate::schema::ir::{ZiCStructDef, ZiCTypeArgValue, ZiCTypeExpr, ZiCTypeRef};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZiCLabelValue {
    pub domain: String,
    pub name: String,
    pub index: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ZiCFieldValue {
    Bool(bool),
    Int(i64),
    Num(f64),
    Str(String),
    Text(String),
    Coord([f64; 2]),
    BBox([f64; 4]),
    Polygon(Vec<Vec<[f64; 2]>>),
    Label(ZiCLabelValue),
    Image(String),
    LabelMap { path: String, domain: String },
    List(Vec<ZiCFieldValue>),
    Struct(ZiCStructValue),
}

impl ZiCFieldValue {
    /// Lowercase kind name, as used in task field lists.
    #[allow(non_snake_case)]
    pub fn ZiFKind(&self) -> &'static str {
        match self {
            ZiCFieldValue::Bool(_) => "bool",
            ZiCFieldValue::Int(_) => "int",
            ZiCFieldValue::Num(_) => "num",
            ZiCFieldValue::Str(_) => "str",
            ZiCFieldValue::Text(_) => "text",
            ZiCFieldValue::Coord(_) => "coord",
            ZiCFieldValue::BBox(_) => "bbox",
            ZiCFieldValue::Polygon(_) => "polygon",
            ZiCFieldValue::Label(_) => "label",
            ZiCFieldValue::Image(_) => "image",
            ZiCFieldValue::LabelMap { .. } => "labelmap",
            ZiCFieldValue::List(_) => "list",
            ZiCFieldValue::Struct(_) => "struct",
        }
    }
}

/// Field values of one struct instance, in declaration order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZiCStructValue {
    pub type_name: String,
    pub fields: Vec<(String, ZiCFieldValue)>,
}

impl ZiCStructValue {
    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, name: &str) -> Option<&ZiCFieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// A struct instance bound to a media accessor.
#[derive(Clone, Debug)]
pub struct ZiCTypedSample {
    value: ZiCStructValue,
    file_reader: Arc<dyn ZiCFileReader>,
}

impl ZiCTypedSample {
    #[allow(non_snake_case)]
    pub fn ZiFTypeName(&self) -> &str {
        &self.value.type_name
    }

    #[allow(non_snake_case)]
    pub fn ZiFValue(&self) -> &ZiCStructValue {
        &self.value
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, name: &str) -> Option<&ZiCFieldValue> {
        self.value.ZiFGet(name)
    }

    #[allow(non_snake_case)]
    pub fn ZiFFileReader(&self) -> &Arc<dyn ZiCFileReader> {
        &self.file_reader
    }
}

type ZiCParamEnv = HashMap<String, ZiCTypeExpr>;

/// Instantiates registered structs from raw records.
#[derive(Debug)]
pub struct ZiCSampleBuilder<'a> {
    registry: &'a ZiCTypeRegistry,
}

impl<'a> ZiCSampleBuilder<'a> {
    #[allow(non_snake_case)]
    pub fn ZiFNew(registry: &'a ZiCTypeRegistry) -> Self {
        Self { registry }
    }

    #[allow(non_snake_case)]
    pub fn ZiFInstantiate(
        &self,
        type_ref: &ZiCTypeRef,
        record: &ZiCRawRecord,
        file_reader: Arc<dyn ZiCFileReader>,
    ) -> Result<ZiCTypedSample> {
        let def = self.registry.ZiFResolveStruct(&type_ref.name)?;
        let env = bind_params(def, type_ref, &ZiCParamEnv::new())?;
        let value = self.build_struct(def, &env, record, &def.name)?;
        Ok(ZiCTypedSample { value, file_reader })
    }

    fn build_struct(
        &self,
        def: &ZiCStructDef,
        env: &ZiCParamEnv,
        record: &ZiCRawRecord,
        path: &str,
    ) -> Result<ZiCStructValue> {
        let mut fields = Vec::with_capacity(def.fields.len());
        for field in &def.fields {
            let field_path = format!("{}.{}", path, field.name);
            match record.get(&field.name) {
                None | Some(Value::Null) => {
                    if field.optional {
                        continue;
                    }
                    return Err(ZiError::schema(format!(
                        "required field '{}' of struct '{}' is missing",
                        field_path, def.name
                    )));
                }
                Some(raw) => {
                    let ty = substitute(&field.ty, env, &field_path)?;
                    fields.push((field.name.clone(), self.convert(&ty, raw, &field_path)?));
                }
            }
        }

        for key in record.keys() {
            if def.ZiFField(key).is_none() {
                log::debug!("Ignoring undeclared field '{}.{}'", path, key);
            }
        }

        Ok(ZiCStructValue {
            type_name: def.name.clone(),
            fields,
        })
    }

    fn convert(&self, ty: &ZiCTypeExpr, raw: &Value, path: &str) -> Result<ZiCFieldValue> {
        let mismatch = || {
            ZiError::schema(format!(
                "field '{}' expects {}, got {}",
                path,
                ty,
                ZiFValueKind(raw)
            ))
        };

        match ty.name.as_str() {
            "Bool" => raw.as_bool().map(ZiCFieldValue::Bool).ok_or_else(mismatch),
            "Int" => raw.as_i64().map(ZiCFieldValue::Int).ok_or_else(mismatch),
            "Num" => raw.as_f64().map(ZiCFieldValue::Num).ok_or_else(mismatch),
            "Str" => raw.as_str().map(|s| ZiCFieldValue::Str(s.to_string())).ok_or_else(mismatch),
            "Text" => raw.as_str().map(|s| ZiCFieldValue::Text(s.to_string())).ok_or_else(mismatch),
            "Image" => raw.as_str().map(|s| ZiCFieldValue::Image(s.to_string())).ok_or_else(mismatch),
            "Coord" => {
                let n = numbers::<2>(raw).ok_or_else(mismatch)?;
                Ok(ZiCFieldValue::Coord(n))
            }
            "BBox" => {
                let n = numbers::<4>(raw).ok_or_else(mismatch)?;
                Ok(ZiCFieldValue::BBox(n))
            }
            "Polygon" => {
                let rings = raw.as_array().ok_or_else(mismatch)?;
                let mut out = Vec::with_capacity(rings.len());
                for ring in rings {
                    let points = ring.as_array().ok_or_else(mismatch)?;
                    let ring: Option<Vec<[f64; 2]>> = points.iter().map(numbers::<2>).collect();
                    out.push(ring.ok_or_else(mismatch)?);
                }
                Ok(ZiCFieldValue::Polygon(out))
            }
            "Label" => {
                let domain = self.domain_arg(ty, path)?;
                let class_domain = self.registry.ZiFResolveClassDomain(&domain)?;
                let class = match raw {
                    Value::String(name) => name.clone(),
                    Value::Number(_) => {
                        let index = raw.as_u64().ok_or_else(mismatch)? as usize;
                        class_domain
                            .ZiFClassAt(index)
                            .map(|s| s.to_string())
                            .ok_or_else(|| {
                                ZiError::schema(format!(
                                    "field '{}': index {} is outside class domain '{}' (1..={})",
                                    path,
                                    index,
                                    domain,
                                    class_domain.classes.len()
                                ))
                            })?
                    }
                    _ => return Err(mismatch()),
                };
                let label = self.registry.ZiFResolveLabel(&domain, &class).map_err(|_| {
                    ZiError::schema(format!(
                        "field '{}': '{}' is not a class of domain '{}'",
                        path, class, domain
                    ))
                })?;
                Ok(ZiCFieldValue::Label(ZiCLabelValue {
                    domain,
                    name: label.name.clone(),
                    index: label.index,
                }))
            }
            "LabelMap" => {
                let domain = self.domain_arg(ty, path)?;
                self.registry.ZiFResolveClassDomain(&domain)?;
                let map_path = raw.as_str().ok_or_else(mismatch)?;
                Ok(ZiCFieldValue::LabelMap {
                    path: map_path.to_string(),
                    domain,
                })
            }
            "List" => {
                let etype = match ty.ZiFArg("etype") {
                    Some(ZiCTypeArgValue::Expr(expr)) => expr,
                    _ => {
                        return Err(ZiError::schema(format!(
                            "field '{}': List needs an element type",
                            path
                        )))
                    }
                };
                let items = raw.as_array().ok_or_else(mismatch)?;
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| self.convert(etype, item, &format!("{}[{}]", path, idx)))
                    .collect::<Result<Vec<_>>>()
                    .map(ZiCFieldValue::List)
            }
            name => {
                let def = self.registry.ZiFResolveStruct(name)?;
                let env = bind_params(def, ty, &ZiCParamEnv::new())?;
                let record = raw.as_object().ok_or_else(mismatch)?;
                self.build_struct(def, &env, record, path)
                    .map(ZiCFieldValue::Struct)
            }
        }
    }

    fn domain_arg(&self, ty: &ZiCTypeExpr, path: &str) -> Result<String> {
        match ty.ZiFArg("dom") {
            Some(ZiCTypeArgValue::Expr(expr)) => Ok(expr.name.clone()),
            _ => Err(ZiError::schema(format!(
                "field '{}': {} needs a class domain (dom=...)",
                path, ty.name
            ))),
        }
    }
}

/// Binds a struct's `$params` from the arguments of a reference to it.
fn bind_params(def: &ZiCStructDef, type_ref: &ZiCTypeExpr, outer: &ZiCParamEnv) -> Result<ZiCParamEnv> {
    let mut env = ZiCParamEnv::new();
    let mut positional = def.params.iter();
    for arg in &type_ref.args {
        let param = match &arg.key {
            Some(key) => {
                if !def.params.contains(key) {
                    return Err(ZiError::schema(format!(
                        "struct '{}' has no parameter '{}'",
                        def.name, key
                    )));
                }
                key.clone()
            }
            None => positional.next().cloned().ok_or_else(|| {
                ZiError::schema(format!(
                    "too many arguments for struct '{}' in '{}'",
                    def.name, type_ref
                ))
            })?,
        };
        let value = match &arg.value {
            ZiCTypeArgValue::Expr(expr) => substitute(expr, outer, &def.name)?,
            ZiCTypeArgValue::Param(name) => outer.get(name).cloned().ok_or_else(|| {
                ZiError::schema(format!("unbound parameter '${}' in '{}'", name, type_ref))
            })?,
        };
        env.insert(param, value);
    }
    Ok(env)
}

/// Replaces `$param` references in a field type with their bound values.
fn substitute(expr: &ZiCTypeExpr, env: &ZiCParamEnv, path: &str) -> Result<ZiCTypeExpr> {
    let mut out = ZiCTypeExpr::ZiFNew(expr.name.clone());
    for arg in &expr.args {
        let value = match &arg.value {
            ZiCTypeArgValue::Expr(inner) => ZiCTypeArgValue::Expr(substitute(inner, env, path)?),
            ZiCTypeArgValue::Param(name) => {
                ZiCTypeArgValue::Expr(env.get(name).cloned().ok_or_else(|| {
                    ZiError::schema(format!("field '{}': unbound parameter '${}'", path, name))
                })?)
            }
        };
        out = out.ZiFWithArg(arg.key.as_deref(), value);
    }
    Ok(out)
}

fn numbers<const N: usize>(value: &Value) -> Option<[f64; N]> {
    let items = value.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = item.as_f64()?;
    }
    Some(out)
}
