//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! you may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use serde_json::Value;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::errors::{Result, ZiError};
use crate::schema::ir::{
    ZiCClassDomainDef, ZiCFieldDef, ZiCLabelDef, ZiCSchemaProgram, ZiCStructDef, ZiCTypeArg,
    ZiCTypeArgValue, ZiCTypeDescriptor, ZiCTypeExpr,
};

#[derive(Clone, Debug, Default)]
pub struct ZiCSchemaParserConfig {
    pub strict: bool,
}

/// Turns definition mappings and type expressions into schema IR.
#[derive(Debug, Default)]
pub struct ZiCSchemaParser {
    config: ZiCSchemaParserConfig,
}

impl ZiCSchemaParser {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self {
            config: ZiCSchemaParserConfig::default(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFStrict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Parses a standalone definition document (YAML text).
    #[allow(non_snake_case)]
    pub fn ZiFParseSource(&self, source: &str, origin: &str) -> Result<ZiCSchemaProgram> {
        let root: YamlValue = serde_yaml::from_str(source)
            .map_err(|e| ZiError::schema(format!("Invalid YAML in {}: {}", origin, e)))?;
        let mapping = root
            .as_mapping()
            .ok_or_else(|| ZiError::schema(format!("{} must be a mapping", origin)))?;

        let mut program = ZiCSchemaProgram::ZiFNew();
        self.ZiFParseDefinitions(mapping, origin, &mut program)?;
        Ok(program)
    }

    /// Appends every definition found in `mapping` to `program`.
    ///
    /// Keys starting with `$` (`$dsdl-version`, `$import`, ...) are directives,
    /// not definitions, and are skipped here.
    #[allow(non_snake_case)]
    pub fn ZiFParseDefinitions(
        &self,
        mapping: &Mapping,
        origin: &str,
        program: &mut ZiCSchemaProgram,
    ) -> Result<()> {
        for (key, value) in mapping {
            let name = match key.as_str() {
                Some(name) => name,
                None => {
                    return Err(ZiError::schema(format!(
                        "definition names in {} must be strings",
                        origin
                    )))
                }
            };
            if name.starts_with('$') {
                continue;
            }

            let body = value.as_mapping().ok_or_else(|| {
                ZiError::schema(format!("definition '{}' in {} must be a mapping", name, origin))
            })?;
            let kind = body
                .get("$def")
                .and_then(|v| v.as_str())
                .ok_or_else(|| {
                    ZiError::schema(format!("definition '{}' in {} has no '$def'", name, origin))
                })?;

            match kind {
                "struct" => {
                    let def = self.parse_struct(name, body, origin, &mut program.warnings)?;
                    program.descriptors.push(ZiCTypeDescriptor::Struct(def));
                }
                "class_domain" => {
                    let def = self.parse_class_domain(name, body, origin)?;
                    for (idx, class) in def.classes.iter().enumerate() {
                        program.descriptors.push(ZiCTypeDescriptor::Label(ZiCLabelDef {
                            name: class.clone(),
                            domain: def.name.clone(),
                            index: idx + 1,
                        }));
                    }
                    program.descriptors.push(ZiCTypeDescriptor::ClassDomain(def));
                }
                other => {
                    let message = format!(
                        "definition '{}' in {} has unsupported $def '{}'",
                        name, origin, other
                    );
                    if self.config.strict {
                        return Err(ZiError::schema(message));
                    }
                    log::warn!("{}, skipping", message);
                    program.warnings.push(message);
                }
            }
        }
        Ok(())
    }

    fn parse_struct(
        &self,
        name: &str,
        body: &Mapping,
        origin: &str,
        warnings: &mut Vec<String>,
    ) -> Result<ZiCStructDef> {
        let params = string_list(body.get("$params"), "$params", name, origin)?;
        let optional = string_list(body.get("$optional"), "$optional", name, origin)?;

        let fields_map = body
            .get("$fields")
            .and_then(|v| v.as_mapping())
            .ok_or_else(|| {
                ZiError::schema(format!("struct '{}' in {} needs a '$fields' mapping", name, origin))
            })?;

        let mut fields = Vec::with_capacity(fields_map.len());
        for (field_key, field_ty) in fields_map {
            let field_name = field_key.as_str().ok_or_else(|| {
                ZiError::schema(format!("field names of struct '{}' must be strings", name))
            })?;
            let ty_str = field_ty.as_str().ok_or_else(|| {
                ZiError::schema(format!(
                    "field '{}' of struct '{}' must have a type expression",
                    field_name, name
                ))
            })?;
            let ty = ZiFParseTypeExpr(ty_str).map_err(|e| {
                ZiError::schema(format!("field '{}' of struct '{}': {}", field_name, name, e))
            })?;
            fields.push(ZiCFieldDef {
                name: field_name.to_string(),
                ty,
                optional: optional.iter().any(|o| o == field_name),
            });
        }

        for opt in &optional {
            if !fields.iter().any(|f| &f.name == opt) {
                let message = format!(
                    "struct '{}' in {} marks unknown field '{}' optional",
                    name, origin, opt
                );
                log::warn!("{}", message);
                warnings.push(message);
            }
        }

        Ok(ZiCStructDef {
            name: name.to_string(),
            params,
            fields,
        })
    }

    fn parse_class_domain(&self, name: &str, body: &Mapping, origin: &str) -> Result<ZiCClassDomainDef> {
        let classes = string_list(body.get("classes"), "classes", name, origin)?;
        if classes.is_empty() {
            return Err(ZiError::schema(format!(
                "class domain '{}' in {} declares no classes",
                name, origin
            )));
        }
        Ok(ZiCClassDomainDef {
            name: name.to_string(),
            classes,
        })
    }
}

fn string_list(value: Option<&YamlValue>, key: &str, owner: &str, origin: &str) -> Result<Vec<String>> {
    let seq = match value {
        None | Some(YamlValue::Null) => return Ok(Vec::new()),
        Some(YamlValue::Sequence(seq)) => seq,
        Some(_) => {
            return Err(ZiError::schema(format!(
                "'{}' of '{}' in {} must be a list",
                key, owner, origin
            )))
        }
    };
    seq.iter()
        .map(|item| match item {
            YamlValue::String(s) => Ok(s.clone()),
            YamlValue::Number(n) => Ok(n.to_string()),
            _ => Err(ZiError::schema(format!(
                "'{}' of '{}' in {} must only contain strings",
                key, owner, origin
            ))),
        })
        .collect()
}

/// Parses a type expression: `Name`, `Name[k=v, ...]` or `Name[Positional]`,
/// where values are nested expressions or `$param` references.
#[allow(non_snake_case)]
pub fn ZiFParseTypeExpr(source: &str) -> Result<ZiCTypeExpr> {
    let mut cursor = ZiCExprCursor {
        chars: source.chars().collect(),
        pos: 0,
    };
    let expr = cursor.parse_expr()?;
    cursor.skip_ws();
    if cursor.pos != cursor.chars.len() {
        return Err(ZiError::schema(format!(
            "unexpected '{}' at offset {} in type expression '{}'",
            cursor.chars[cursor.pos], cursor.pos, source
        )));
    }
    Ok(expr)
}

struct ZiCExprCursor {
    chars: Vec<char>,
    pos: usize,
}

impl ZiCExprCursor {
    fn skip_ws(&mut self) {
        while self.pos < self.chars.len() && self.chars[self.pos].is_whitespace() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn ident(&mut self) -> Result<String> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':') {
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(ZiError::schema(format!(
                "expected a name at offset {} in type expression '{}'",
                start,
                self.chars.iter().collect::<String>()
            )));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn parse_expr(&mut self) -> Result<ZiCTypeExpr> {
        let name = self.ident()?;
        let mut expr = ZiCTypeExpr::ZiFNew(name);
        self.skip_ws();
        if self.peek() != Some('[') {
            return Ok(expr);
        }
        self.pos += 1;

        loop {
            self.skip_ws();
            if self.peek() == Some(']') {
                self.pos += 1;
                break;
            }
            expr.args.push(self.parse_arg()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    break;
                }
                _ => {
                    return Err(ZiError::schema(format!(
                        "unterminated argument list in type expression '{}'",
                        self.chars.iter().collect::<String>()
                    )))
                }
            }
        }
        Ok(expr)
    }

    fn parse_arg(&mut self) -> Result<ZiCTypeArg> {
        self.skip_ws();
        if self.peek() == Some('$') {
            self.pos += 1;
            return Ok(ZiCTypeArg {
                key: None,
                value: ZiCTypeArgValue::Param(self.ident()?),
            });
        }

        let first = self.parse_expr()?;
        self.skip_ws();
        if self.peek() != Some('=') {
            return Ok(ZiCTypeArg {
                key: None,
                value: ZiCTypeArgValue::Expr(first),
            });
        }
        if !first.args.is_empty() {
            return Err(ZiError::schema(format!(
                "argument key '{}' cannot carry arguments",
                first
            )));
        }
        self.pos += 1;
        self.skip_ws();
        let value = if self.peek() == Some('$') {
            self.pos += 1;
            ZiCTypeArgValue::Param(self.ident()?)
        } else {
            ZiCTypeArgValue::Expr(self.parse_expr()?)
        };
        Ok(ZiCTypeArg {
            key: Some(first.name),
            value,
        })
    }
}

/// Converts a YAML value into its JSON equivalent. Non-string mapping keys are
/// rendered with their YAML text, tags are dropped.
#[allow(non_snake_case)]
pub fn ZiFYamlToJson(yaml: &YamlValue) -> Value {
    match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
            } else {
                Value::Null
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(seq) => Value::Array(seq.iter().map(ZiFYamlToJson).collect()),
        YamlValue::Mapping(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    YamlValue::String(s) => s.clone(),
                    other => serde_yaml::to_string(other)
                        .map(|s| s.trim().to_string())
                        .unwrap_or_default(),
                };
                obj.insert(key, ZiFYamlToJson(v));
            }
            Value::Object(obj)
        }
        YamlValue::Tagged(tagged) => ZiFYamlToJson(&tagged.value),
    }
}
