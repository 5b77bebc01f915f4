// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-run outcome of an assembly.

use std::path::PathBuf;

use printforge_core::DimensionSet;
use printforge_geometry::Part;

use crate::error::{PipelineError, Result};

/// What became of one recipe
#[derive(Debug)]
pub struct PartOutcome {
    pub role: String,
    /// Finished parts (more than one after a split), in axis order
    pub result: Result<Vec<Part>>,
}

impl PartOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of running one assembly through the pipeline
#[derive(Debug)]
pub struct AssemblyReport {
    pub assembly: String,
    pub dimensions: DimensionSet,
    /// One entry per recipe, in declared order
    pub outcomes: Vec<PartOutcome>,
    /// Files written by the exporter, if any
    pub files: Vec<PathBuf>,
    pub build_time_ms: u64,
}

impl AssemblyReport {
    /// Every finished part, in export order
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flatten()
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts().find(|p| p.name() == name)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &PipelineError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.role.as_str(), e)))
    }

    /// True when every recipe produced its parts
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(PartOutcome::is_ok)
    }

    pub fn total_volume(&self) -> f64 {
        self.parts().map(Part::volume).sum()
    }
}
