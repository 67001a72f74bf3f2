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

use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::{Result, ZiError};
use crate::sample::{ZiCFieldValue, ZiCLabelValue, ZiCStructValue, ZiCTypedSample};
use crate::schema::ir::ZiFLabelKey;
use crate::visualize::palette::ZiCPalette;

/// Media backing one visualization item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZiCMediaInfo {
    pub path: String,
    pub size_bytes: u64,
}

/// One annotation drawn over a media item.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZiCOverlay {
    pub field: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub color: String,
    pub geometry: Value,
}

/// Opaque unit yielded by the studio view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ZiCVisualizationItem {
    pub name: String,
    pub sample_type: String,
    pub media: ZiCMediaInfo,
    pub overlays: Vec<ZiCOverlay>,
}

/// Turns one typed sample into named visualization items.
///
/// `fields` lists the lowercase field kinds to draw. Colours for categories
/// come from `palette`, which is shared across the whole iteration pass.
pub trait ZiCVisualizer: std::fmt::Debug {
    fn visualize(
        &self,
        sample: &ZiCTypedSample,
        palette: &mut ZiCPalette,
        fields: &[String],
    ) -> Result<Vec<(String, ZiCVisualizationItem)>>;
}

/// Default visualizer: one item per image field, every selected annotation
/// of the sample attached as an overlay.
#[derive(Clone, Debug, Default)]
pub struct ZiCAnnotationVisualizer;

impl ZiCAnnotationVisualizer {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self
    }
}

/// Palette key of an overlay drawn without a category.
const FIELD_KEY_PREFIX: &str = "field:";

struct Collected<'a> {
    images: Vec<(String, &'a str)>,
    annotations: Vec<Annotation<'a>>,
}

struct Annotation<'a> {
    path: String,
    name: &'a str,
    category: Option<&'a ZiCLabelValue>,
    value: &'a ZiCFieldValue,
}

impl Annotation<'_> {
    fn label(&self) -> Option<&ZiCLabelValue> {
        match self.value {
            ZiCFieldValue::Label(label) => Some(label),
            _ => self.category,
        }
    }

    /// Labels are keyed by domain and class so equal class names from
    /// different domains stay apart; the rest by field name.
    fn palette_key(&self) -> String {
        match self.label() {
            Some(label) => ZiFLabelKey(&label.domain, &label.name),
            None => format!("{}{}", FIELD_KEY_PREFIX, self.name),
        }
    }
}

fn collect<'a>(value: &'a ZiCStructValue, prefix: &str, fields: &[String], out: &mut Collected<'a>) {
    let category = value.fields.iter().find_map(|(_, v)| match v {
        ZiCFieldValue::Label(label) => Some(label),
        _ => None,
    });
    for (name, field) in &value.fields {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        collect_value(field, path, name, category, fields, out);
    }
}

fn collect_value<'a>(
    value: &'a ZiCFieldValue,
    path: String,
    name: &'a str,
    category: Option<&'a ZiCLabelValue>,
    fields: &[String],
    out: &mut Collected<'a>,
) {
    match value {
        ZiCFieldValue::Image(media) => out.images.push((path, media.as_str())),
        ZiCFieldValue::Struct(inner) => collect(inner, &path, fields, out),
        ZiCFieldValue::List(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect_value(item, format!("{}[{}]", path, idx), name, category, fields, out);
            }
        }
        other if fields.iter().any(|f| f == other.ZiFKind()) => out.annotations.push(Annotation {
            path,
            name,
            category,
            value: other,
        }),
        _ => {}
    }
}

fn geometry(value: &ZiCFieldValue, sample: &ZiCTypedSample) -> Result<Value> {
    Ok(match value {
        ZiCFieldValue::Coord(p) => json!(p),
        ZiCFieldValue::BBox(b) => json!(b),
        ZiCFieldValue::Polygon(rings) => json!(rings),
        ZiCFieldValue::Text(text) => json!(text),
        ZiCFieldValue::Label(label) => json!({"domain": label.domain, "index": label.index}),
        ZiCFieldValue::LabelMap { path, domain } => {
            let size = sample.ZiFFileReader().size(path)?;
            json!({"path": path, "domain": domain, "size_bytes": size})
        }
        other => serde_json::to_value(other)?,
    })
}

impl ZiCVisualizer for ZiCAnnotationVisualizer {
    fn visualize(
        &self,
        sample: &ZiCTypedSample,
        palette: &mut ZiCPalette,
        fields: &[String],
    ) -> Result<Vec<(String, ZiCVisualizationItem)>> {
        if !fields.iter().any(|f| f == "image") {
            return Ok(Vec::new());
        }

        let mut collected = Collected {
            images: Vec::new(),
            annotations: Vec::new(),
        };
        collect(sample.ZiFValue(), "", fields, &mut collected);

        let mut overlays = Vec::with_capacity(collected.annotations.len());
        for annotation in &collected.annotations {
            let color = palette.ZiFColorFor(&annotation.palette_key());
            overlays.push(ZiCOverlay {
                field: annotation.path.clone(),
                kind: annotation.value.ZiFKind().to_string(),
                category: annotation.label().map(|l| l.name.clone()),
                color: color.ZiFHex(),
                geometry: geometry(annotation.value, sample)?,
            });
        }

        let mut items = Vec::with_capacity(collected.images.len());
        for (path, media) in collected.images {
            if media.trim().is_empty() {
                return Err(ZiError::visualization(format!(
                    "image field '{}' of {} has an empty media path",
                    path,
                    sample.ZiFTypeName()
                )));
            }
            let item = ZiCVisualizationItem {
                name: path.clone(),
                sample_type: sample.ZiFTypeName().to_string(),
                media: ZiCMediaInfo {
                    path: media.to_string(),
                    size_bytes: sample.ZiFFileReader().size(media)?,
                },
                overlays: overlays.clone(),
            };
            items.push((path, item));
        }
        Ok(items)
    }
}
