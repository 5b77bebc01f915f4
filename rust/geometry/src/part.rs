// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Finished, named solids destined for export

use crate::bounds::Aabb;
use crate::placement::{Instance, ShapeKind};
use crate::solid::Solid;

/// Named CSG result with positive volume and a closed boundary.
///
/// Only the combinator constructs parts, after validation.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    solid: Solid,
    volume: f64,
    bounds: Aabb,
}

impl Part {
    pub(crate) fn new(name: impl Into<String>, solid: Solid, volume: f64) -> Self {
        let bounds = solid.bounds();
        Self {
            name: name.into(),
            solid,
            volume,
            bounds,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn solid(&self) -> &Solid {
        &self.solid
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.volume
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Same solid under another name
    pub fn renamed(&self, name: impl Into<String>) -> Part {
        Part {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Reuse the part as an unplaced operand of another body
    pub fn to_instance(&self) -> Instance {
        Instance::new(self.name.clone(), ShapeKind::Body, self.solid.clone())
    }
}
