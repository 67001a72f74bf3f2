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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZiCColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ZiCColor {
    /// `#rrggbb` form.
    #[allow(non_snake_case)]
    pub fn ZiFHex(&self) -> String {
        format!("#{}", hex::encode([self.r, self.g, self.b]))
    }

    /// Converts HSV components in `[0, 1]` to RGB.
    #[allow(non_snake_case)]
    pub fn ZiFFromHsv(h: f64, s: f64, v: f64) -> Self {
        let h = (h.rem_euclid(1.0)) * 6.0;
        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        let to_byte = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        ZiCColor {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
        }
    }
}

/// Category-to-colour mapping shared by every sample of one iteration pass.
///
/// Colours depend only on the order in which categories are first seen, so
/// a cleared palette hands out the same colours again for the same order.
#[derive(Clone, Debug, Default)]
pub struct ZiCPalette {
    colors: HashMap<String, ZiCColor>,
    order: Vec<String>,
}

impl ZiCPalette {
    #[allow(non_snake_case)]
    pub fn ZiFNew() -> Self {
        Self::default()
    }

    /// Colour of `key`, assigning the next one on first sight.
    #[allow(non_snake_case)]
    pub fn ZiFColorFor(&mut self, key: &str) -> ZiCColor {
        if let Some(color) = self.colors.get(key) {
            return *color;
        }
        let color = Self::ZiFNthColor(self.order.len());
        self.colors.insert(key.to_string(), color);
        self.order.push(key.to_string());
        color
    }

    #[allow(non_snake_case)]
    pub fn ZiFNthColor(index: usize) -> ZiCColor {
        let hue = (index as f64 * GOLDEN_RATIO_CONJUGATE).fract();
        ZiCColor::ZiFFromHsv(hue, 0.65, 0.95)
    }

    #[allow(non_snake_case)]
    pub fn ZiFGet(&self, key: &str) -> Option<ZiCColor> {
        self.colors.get(key).copied()
    }

    #[allow(non_snake_case)]
    pub fn ZiFLen(&self) -> usize {
        self.order.len()
    }

    #[allow(non_snake_case)]
    pub fn ZiFIsEmpty(&self) -> bool {
        self.order.is_empty()
    }

    #[allow(non_snake_case)]
    pub fn ZiFClear(&mut self) {
        self.colors.clear();
        self.order.clear();
    }
}
