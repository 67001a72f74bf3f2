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

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_yaml::Value as YamlValue;

use crate::errors::{Result, ZiError};
use crate::schema::ir::ZiCSchemaProgram;
use crate::schema::parser::ZiCSchemaParser;

/// Compiles the schema a manifest declares into registry descriptors.
pub trait ZiCSchemaCompiler: std::fmt::Debug {
    fn compile(&self, manifest_path: &Path, library_path: &Path) -> Result<ZiCSchemaProgram>;
}

/// Default compiler for YAML definition files.
///
/// Definitions are collected from the files listed under the manifest's
/// `$import` key (looked up next to the manifest, then in the library path)
/// and from an optional inline `defs` mapping. Imports are followed
/// transitively and every file is read once.
#[derive(Debug, Default)]
pub struct ZiCYamlSchemaCompiler {
    strict: bool,
}

impl ZiCYamlSchemaCompiler {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self { strict: false }
    }

    #[allow(non_snake_case)]
    pub fn ZiFStrict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn parser(&self) -> ZiCSchemaParser {
        ZiCSchemaParser::ZiFNew().ZiFStrict(self.strict)
    }

    fn read_yaml(path: &Path) -> Result<YamlValue> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ZiError::Io(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| ZiError::schema(format!("Invalid YAML in {}: {}", path.display(), e)))
    }

    fn resolve_import(&self, name: &str, base_dir: &Path, library_path: &Path) -> Result<PathBuf> {
        let file_name = if name.ends_with(".yaml") || name.ends_with(".yml") {
            name.to_string()
        } else {
            format!("{}.yaml", name)
        };

        let mut candidates = vec![base_dir.join(&file_name)];
        if !library_path.as_os_str().is_empty() {
            candidates.push(library_path.join(&file_name));
        }

        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                ZiError::schema(format!(
                    "cannot resolve import '{}' from {} or library path '{}'",
                    name,
                    base_dir.display(),
                    library_path.display()
                ))
            })
    }

    fn imports_of(root: &YamlValue, origin: &Path) -> Result<Vec<String>> {
        match root.get("$import") {
            None | Some(YamlValue::Null) => Ok(Vec::new()),
            Some(YamlValue::Sequence(seq)) => seq
                .iter()
                .map(|item| {
                    item.as_str().map(|s| s.to_string()).ok_or_else(|| {
                        ZiError::schema(format!("'$import' entries in {} must be strings", origin.display()))
                    })
                })
                .collect(),
            Some(YamlValue::String(single)) => Ok(vec![single.clone()]),
            Some(_) => Err(ZiError::schema(format!(
                "'$import' in {} must be a list",
                origin.display()
            ))),
        }
    }

    fn compile_imports(
        &self,
        root: &YamlValue,
        origin: &Path,
        library_path: &Path,
        visited: &mut HashSet<PathBuf>,
        program: &mut ZiCSchemaProgram,
    ) -> Result<()> {
        let base_dir = origin.parent().unwrap_or_else(|| Path::new("."));
        for name in Self::imports_of(root, origin)? {
            let path = self.resolve_import(&name, base_dir, library_path)?;
            if !visited.insert(path.clone()) {
                continue;
            }
            log::debug!("Importing definitions from {}", path.display());
            let imported = Self::read_yaml(&path)?;
            self.compile_imports(&imported, &path, library_path, visited, program)?;
            let mapping = imported.as_mapping().ok_or_else(|| {
                ZiError::schema(format!("{} must be a mapping", path.display()))
            })?;
            self.parser()
                .ZiFParseDefinitions(mapping, &path.display().to_string(), program)?;
        }
        Ok(())
    }
}

impl ZiCSchemaCompiler for ZiCYamlSchemaCompiler {
    fn compile(&self, manifest_path: &Path, library_path: &Path) -> Result<ZiCSchemaProgram> {
        let root = Self::read_yaml(manifest_path)?;
        let mut program = ZiCSchemaProgram::ZiFNew();
        let mut visited = HashSet::new();
        visited.insert(manifest_path.to_path_buf());

        self.compile_imports(&root, manifest_path, library_path, &mut visited, &mut program)?;

        match root.get("defs") {
            None | Some(YamlValue::Null) => {}
            Some(YamlValue::Mapping(defs)) => {
                self.parser().ZiFParseDefinitions(
                    defs,
                    &manifest_path.display().to_string(),
                    &mut program,
                )?;
            }
            Some(_) => {
                return Err(ZiError::schema(format!(
                    "'defs' in {} must be a mapping",
                    manifest_path.display()
                )))
            }
        }

        log::debug!(
            "Compiled {} descriptors for {}",
            program.descriptors.len(),
            manifest_path.display()
        );
        Ok(program)
    }
}
