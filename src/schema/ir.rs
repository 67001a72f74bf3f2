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

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three independent registry namespaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZiCNamespace {
    Label,
    Struct,
    ClassDomain,
}

impl ZiCNamespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            ZiCNamespace::Label => "label",
            ZiCNamespace::Struct => "struct",
            ZiCNamespace::ClassDomain => "class-domain",
        }
    }
}

impl fmt::Display for ZiCNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed type expression such as `Label[dom=$cdom]` or `List[etype=BBox]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCTypeExpr {
    pub name: String,
    pub args: Vec<ZiCTypeArg>,
}

/// One bracketed argument, keyed (`dom=X`) or positional (`X`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCTypeArg {
    pub key: Option<String>,
    pub value: ZiCTypeArgValue,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZiCTypeArgValue {
    Expr(ZiCTypeExpr),
    /// Reference to an enclosing struct parameter, written `$name`.
    Param(String),
}

impl ZiCTypeExpr {
    #[allow(non_snake_case)]
    pub fn ZiFNew(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFWithArg(mut self, key: Option<&str>, value: ZiCTypeArgValue) -> Self {
        self.args.push(ZiCTypeArg {
            key: key.map(|k| k.to_string()),
            value,
        });
        self
    }

    /// Looks up an argument by key, falling back to the first positional one.
    #[allow(non_snake_case)]
    pub fn ZiFArg(&self, key: &str) -> Option<&ZiCTypeArgValue> {
        self.args
            .iter()
            .find(|arg| arg.key.as_deref() == Some(key))
            .or_else(|| self.args.iter().find(|arg| arg.key.is_none()))
            .map(|arg| &arg.value)
    }
}

impl fmt::Display for ZiCTypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            if let Some(key) = &arg.key {
                write!(f, "{}=", key)?;
            }
            match &arg.value {
                ZiCTypeArgValue::Expr(expr) => write!(f, "{}", expr)?,
                ZiCTypeArgValue::Param(name) => write!(f, "${}", name)?,
            }
        }
        f.write_str("]")
    }
}

/// A reference to a registered struct, with the arguments bound to its params.
pub type ZiCTypeRef = ZiCTypeExpr;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCFieldDef {
    pub name: String,
    pub ty: ZiCTypeExpr,
    pub optional: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCStructDef {
    pub name: String,
    pub params: Vec<String>,
    pub fields: Vec<ZiCFieldDef>,
}

impl ZiCStructDef {
    #[allow(non_snake_case)]
    pub fn ZiFField(&self, name: &str) -> Option<&ZiCFieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCClassDomainDef {
    pub name: String,
    pub classes: Vec<String>,
}

impl ZiCClassDomainDef {
    /// Resolves a 1-based class index.
    #[allow(non_snake_case)]
    pub fn ZiFClassAt(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.classes.get(i))
            .map(|s| s.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ZiCLabelDef {
    pub name: String,
    pub domain: String,
    /// 1-based position within the domain.
    pub index: usize,
}

impl ZiCLabelDef {
    #[allow(non_snake_case)]
    pub fn ZiFKey(&self) -> String {
        ZiFLabelKey(&self.domain, &self.name)
    }
}

/// Key of a class within its domain, `Domain::class`. Labels are registered
/// and coloured under this key.
#[allow(non_snake_case)]
pub fn ZiFLabelKey(domain: &str, class: &str) -> String {
    format!("{}::{}", domain, class)
}

/// One compiled definition, ready to be registered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ZiCTypeDescriptor {
    Label(ZiCLabelDef),
    Struct(ZiCStructDef),
    ClassDomain(ZiCClassDomainDef),
}

impl ZiCTypeDescriptor {
    #[allow(non_snake_case)]
    pub fn ZiFNamespace(&self) -> ZiCNamespace {
        match self {
            ZiCTypeDescriptor::Label(_) => ZiCNamespace::Label,
            ZiCTypeDescriptor::Struct(_) => ZiCNamespace::Struct,
            ZiCTypeDescriptor::ClassDomain(_) => ZiCNamespace::ClassDomain,
        }
    }

    /// Registry key of the definition.
    #[allow(non_snake_case)]
    pub fn ZiFKey(&self) -> String {
        match self {
            ZiCTypeDescriptor::Label(def) => def.ZiFKey(),
            ZiCTypeDescriptor::Struct(def) => def.name.clone(),
            ZiCTypeDescriptor::ClassDomain(def) => def.name.clone(),
        }
    }
}

/// Declarative output of schema compilation for one manifest.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZiCSchemaProgram {
    pub descriptors: Vec<ZiCTypeDescriptor>,
    pub warnings: Vec<String>,
}

impl ZiCSchemaProgram {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    #[allow(non_snake_case)]
    pub fn ZiFToJson(&self) -> crate::errors::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::errors::ZiError::internal(format!("Failed to serialize schema: {}", e)))
    }

    #[allow(non_snake_case)]
    pub fn ZiFFromJson(json: &str) -> crate::errors::Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| crate::errors::ZiError::validation(format!("Invalid schema JSON: {}", e)))
    }
}
