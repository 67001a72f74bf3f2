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

//! # Type Registry Module
//!
//! Maps declared type names to compiled definitions across three independent
//! namespaces: labels, structs and class domains.
//!
//! ## Lifecycle
//!
//! A registry is scoped to one manifest at a time. Callers clear it right
//! before compiling the next manifest's schema and only resolve names after
//! that schema has been ingested, so same-named types from different
//! manifests never mix.
//!
//! ```rust
//! use zistudio::registry::ZiCTypeRegistry;
//! use zistudio::schema::{ZiCNamespace, ZiCSchemaProgram};
//!
//! let mut registry = ZiCTypeRegistry::ZiFNew();
//! registry.ZiFClear();
//! registry.ZiFIngest(&ZiCSchemaProgram::ZiFNew());
//! assert!(registry.ZiFResolve(ZiCNamespace::Struct, "Det").is_err());
//! ```

use std::collections::HashMap;

use crate::errors::{Result, ZiError};
use crate::schema::ir::{
    ZiCClassDomainDef, ZiCLabelDef, ZiCNamespace, ZiCSchemaProgram, ZiCStructDef,
    ZiCTypeDescriptor, ZiFLabelKey,
};

/// Registry of compiled definitions, one map per namespace.
#[derive(Debug, Default)]
pub struct ZiCTypeRegistry {
    labels: HashMap<String, ZiCTypeDescriptor>,
    structs: HashMap<String, ZiCTypeDescriptor>,
    class_domains: HashMap<String, ZiCTypeDescriptor>,
}

impl ZiCTypeRegistry {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    /// Empties all three namespaces.
    #[allow(non_snake_case)]
    pub fn ZiFClear(&mut self) {
        self.labels.clear();
        self.structs.clear();
        self.class_domains.clear();
    }

    fn namespace(&self, namespace: ZiCNamespace) -> &HashMap<String, ZiCTypeDescriptor> {
        match namespace {
            ZiCNamespace::Label => &self.labels,
            ZiCNamespace::Struct => &self.structs,
            ZiCNamespace::ClassDomain => &self.class_domains,
        }
    }

    fn namespace_mut(&mut self, namespace: ZiCNamespace) -> &mut HashMap<String, ZiCTypeDescriptor> {
        match namespace {
            ZiCNamespace::Label => &mut self.labels,
            ZiCNamespace::Struct => &mut self.structs,
            ZiCNamespace::ClassDomain => &mut self.class_domains,
        }
    }

    /// Inserts or overwrites a definition under `name`.
    ///
    /// Fails when the descriptor does not belong to `namespace`.
    #[allow(non_snake_case)]
    pub fn ZiFRegister(
        &mut self,
        namespace: ZiCNamespace,
        name: &str,
        definition: ZiCTypeDescriptor,
    ) -> Result<()> {
        if definition.ZiFNamespace() != namespace {
            return Err(ZiError::internal(format!(
                "cannot register {} definition '{}' in the {} namespace",
                definition.ZiFNamespace(),
                name,
                namespace
            )));
        }
        if self
            .namespace_mut(namespace)
            .insert(name.to_string(), definition)
            .is_some()
        {
            log::debug!("Overwrote {} definition '{}'", namespace, name);
        }
        Ok(())
    }

    /// Registers every descriptor of a compiled schema under its own key.
    #[allow(non_snake_case)]
    pub fn ZiFIngest(&mut self, program: &ZiCSchemaProgram) -> Result<usize> {
        for descriptor in &program.descriptors {
            let key = descriptor.ZiFKey();
            self.ZiFRegister(descriptor.ZiFNamespace(), &key, descriptor.clone())?;
        }
        Ok(program.descriptors.len())
    }

    #[allow(non_snake_case)]
    pub fn ZiFResolve(&self, namespace: ZiCNamespace, name: &str) -> Result<&ZiCTypeDescriptor> {
        self.namespace(namespace)
            .get(name)
            .ok_or_else(|| ZiError::type_not_found(namespace.as_str(), name))
    }

    #[allow(non_snake_case)]
    pub fn ZiFResolveStruct(&self, name: &str) -> Result<&ZiCStructDef> {
        match self.ZiFResolve(ZiCNamespace::Struct, name)? {
            ZiCTypeDescriptor::Struct(def) => Ok(def),
            _ => Err(ZiError::internal(format!("struct slot '{}' holds another kind", name))),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFResolveClassDomain(&self, name: &str) -> Result<&ZiCClassDomainDef> {
        match self.ZiFResolve(ZiCNamespace::ClassDomain, name)? {
            ZiCTypeDescriptor::ClassDomain(def) => Ok(def),
            _ => Err(ZiError::internal(format!(
                "class-domain slot '{}' holds another kind",
                name
            ))),
        }
    }

    /// Resolves a label by domain and class name.
    #[allow(non_snake_case)]
    pub fn ZiFResolveLabel(&self, domain: &str, class: &str) -> Result<&ZiCLabelDef> {
        let key = ZiFLabelKey(domain, class);
        match self.ZiFResolve(ZiCNamespace::Label, &key)? {
            ZiCTypeDescriptor::Label(def) => Ok(def),
            _ => Err(ZiError::internal(format!("label slot '{}' holds another kind", key))),
        }
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self, namespace: ZiCNamespace) -> usize {
        self.namespace(namespace).len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.labels.is_empty() && self.structs.is_empty() && self.class_domains.is_empty()
    }

    /// Registered names of one namespace, sorted.
    #[allow(non_snake_case)]
    pub fn ZiFNames(&self, namespace: ZiCNamespace) -> Vec<String> {
        let mut names: Vec<String> = self.namespace(namespace).keys().cloned().collect();
        names.sort();
        names
    }
}
