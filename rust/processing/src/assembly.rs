// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly definitions: a dimension model plus one body program per part.

use printforge_core::{DimensionSet, GenerationConfig};
use printforge_geometry::{BodyProgram, PrimitiveSpec};

/// One exported part of an assembly
#[derive(Debug, Clone, PartialEq)]
pub struct PartRecipe {
    /// Part role, also the evaluated part name
    pub role: String,
    pub program: BodyProgram,
    /// Split along the configured axis when it exceeds the bed
    pub split: bool,
}

impl PartRecipe {
    pub fn new(program: BodyProgram) -> Self {
        Self {
            role: program.name.clone(),
            program,
            split: false,
        }
    }

    pub fn splittable(mut self) -> Self {
        self.split = true;
        self
    }
}

/// A printable assembly.
///
/// Dimensions are resolved once per run; every recipe is then built from
/// that single set, so parts always agree on shared offsets.
pub trait Assembly: Send + Sync {
    /// Prefix for every exported file
    fn name(&self) -> &str;

    fn dimensions(&self, config: &GenerationConfig) -> printforge_core::Result<DimensionSet>;

    /// Parts in export order
    fn recipes(&self, dims: &DimensionSet) -> printforge_core::Result<Vec<PartRecipe>>;
}

/// Outer block minus the cavity cut, both read from the dimension set
pub fn shell_program(name: &str, dims: &DimensionSet) -> BodyProgram {
    BodyProgram::new(
        name,
        PrimitiveSpec::cuboid_centered("outer", dims.outer(), dims.outer_center()),
    )
    .difference([PrimitiveSpec::cuboid_centered(
        "cavity",
        dims.cavity_cut(),
        dims.cavity_center(),
    )])
}
