// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation pipeline: dimensions, per-part build and split, export.

use std::time::Instant;

use printforge_core::{Axis, DimensionSet, GenerationConfig};
use printforge_geometry::{
    BedSplitter, CsgCombinator, CsgrsKernel, Evaluator, Part, PrimitiveFactory,
};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::assembly::{Assembly, PartRecipe};
use crate::error::{ExportError, PipelineError, Result, Stage};
use crate::export::{Exporter, Manifest, ManifestFailure, ManifestPart};
use crate::report::{AssemblyReport, PartOutcome};

/// Runs assemblies against one configuration and kernel
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: GenerationConfig,
    kernel: CsgrsKernel,
}

impl Pipeline {
    /// Validate the configuration and set up the kernel it asks for
    pub fn new(config: GenerationConfig) -> Result<Self> {
        config.validate().map_err(PipelineError::Config)?;
        let kernel = CsgrsKernel::new(config.cylinder_segments);
        Ok(Self { config, kernel })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn kernel(&self) -> &CsgrsKernel {
        &self.kernel
    }

    /// Build every part of an assembly.
    ///
    /// A dimension failure aborts the run. Part failures are recorded in the
    /// report and do not stop the other parts.
    pub fn run(&self, assembly: &dyn Assembly) -> Result<AssemblyReport> {
        let start = Instant::now();
        let name = assembly.name();
        let dimension_error = |source| PipelineError::Dimensions {
            assembly: name.to_string(),
            source,
        };

        let dimensions = assembly.dimensions(&self.config).map_err(dimension_error)?;
        let recipes = assembly.recipes(&dimensions).map_err(dimension_error)?;

        tracing::info!(
            assembly = name,
            dimensions = dimensions.len(),
            recipes = recipes.len(),
            parallel = self.config.parallel,
            "Resolved dimensions"
        );

        // Independent parts; collect keeps declared order either way
        let outcomes: Vec<PartOutcome> = if self.config.parallel {
            recipes
                .par_iter()
                .map(|recipe| self.build_recipe(name, recipe))
                .collect()
        } else {
            recipes
                .iter()
                .map(|recipe| self.build_recipe(name, recipe))
                .collect()
        };

        let report = AssemblyReport {
            assembly: name.to_string(),
            dimensions,
            outcomes,
            files: Vec::new(),
            build_time_ms: start.elapsed().as_millis() as u64,
        };

        tracing::info!(
            assembly = name,
            parts = report.parts().count(),
            failures = report.failures().count(),
            total_volume = report.total_volume(),
            build_time_ms = report.build_time_ms,
            "Assembly built"
        );
        Ok(report)
    }

    /// Build, then write every finished part and the manifest
    pub fn run_and_export(
        &self,
        assembly: &dyn Assembly,
        exporter: &dyn Exporter,
    ) -> Result<AssemblyReport> {
        let mut report = self.run(assembly)?;
        self.export(&mut report, exporter)?;
        Ok(report)
    }

    /// Export a built report.
    ///
    /// A part that fails to export marks its recipe failed; other parts are
    /// still written. Combined mesh and manifest failures are returned as
    /// errors, with the part files already written kept in `report.files`.
    pub fn export(&self, report: &mut AssemblyReport, exporter: &dyn Exporter) -> Result<()> {
        let assembly = report.assembly.clone();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut manifest_parts = Vec::new();
        let mut files = Vec::new();

        for outcome in &mut report.outcomes {
            let Ok(parts) = &outcome.result else {
                continue;
            };

            let mut failure = None;
            for part in parts {
                let written = if seen.insert(part.name().to_string()) {
                    exporter.write_part(&assembly, part)
                } else {
                    Err(ExportError::DuplicatePart(part.name().to_string()))
                };
                match written {
                    Ok(exported) => {
                        manifest_parts.push(ManifestPart::new(&outcome.role, part, &exported));
                        files.push(exported.path);
                    }
                    Err(source) => {
                        tracing::warn!(
                            assembly = %assembly,
                            part = part.name(),
                            error = %source,
                            "Part export failed"
                        );
                        failure = Some(PipelineError::Export {
                            assembly: assembly.clone(),
                            part: part.name().to_string(),
                            source,
                        });
                        break;
                    }
                }
            }
            if let Some(error) = failure {
                outcome.result = Err(error);
            }
        }

        // Written part files stay listed if the combined mesh or manifest fails
        report.files = files;

        let exported: Vec<&Part> = report.parts().collect();
        let combined = exporter
            .write_combined(&assembly, &exported)
            .map_err(|source| PipelineError::Export {
                assembly: assembly.clone(),
                part: "combined".into(),
                source,
            })?;
        report.files.extend(combined);

        let manifest = Manifest {
            assembly: assembly.clone(),
            config: self.config.clone(),
            dimensions: report
                .dimensions
                .iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            parts: manifest_parts,
            failures: report
                .failures()
                .map(|(role, error)| ManifestFailure {
                    role: role.to_string(),
                    stage: error.stage(),
                    message: error.to_string(),
                })
                .collect(),
        };
        let manifest_path = exporter
            .write_manifest(&assembly, &manifest)
            .map_err(|source| PipelineError::Export {
                assembly: assembly.clone(),
                part: "manifest".into(),
                source,
            })?;
        report.files.push(manifest_path);

        tracing::info!(
            assembly = %assembly,
            files = report.files.len(),
            "Export complete"
        );
        Ok(())
    }

    fn build_recipe(&self, assembly: &str, recipe: &PartRecipe) -> PartOutcome {
        let start = Instant::now();
        let result = self.build_parts(assembly, recipe);
        match &result {
            Ok(parts) => tracing::debug!(
                assembly,
                part = %recipe.role,
                pieces = parts.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Part built"
            ),
            Err(error) => tracing::warn!(
                assembly,
                part = %recipe.role,
                stage = %error.stage(),
                error = %error,
                "Part failed"
            ),
        }
        PartOutcome {
            role: recipe.role.clone(),
            result,
        }
    }

    fn build_parts(&self, assembly: &str, recipe: &PartRecipe) -> Result<Vec<Part>> {
        let failed = |stage: Stage| {
            move |source| PipelineError::Part {
                assembly: assembly.to_string(),
                part: recipe.role.clone(),
                stage,
                source,
            }
        };

        let combinator = CsgCombinator::new(&self.kernel);
        let evaluator = Evaluator::new(PrimitiveFactory::new(&self.kernel), combinator);
        let part = evaluator
            .evaluate(&recipe.program)
            .map_err(failed(Stage::Build))?;
        let part = if part.name() == recipe.role {
            part
        } else {
            part.renamed(recipe.role.as_str())
        };

        if recipe.split {
            let splitter = BedSplitter::new(evaluator.combinator(), self.config.volume_tolerance);
            return splitter
                .split(&part, self.config.split_axis, self.config.split_limit())
                .map_err(failed(Stage::Split));
        }

        self.warn_oversize(assembly, &part);
        Ok(vec![part])
    }

    /// Parts that are not split still get checked against the bed
    fn warn_oversize(&self, assembly: &str, part: &Part) {
        let bounds = part.bounds();
        for axis in Axis::ALL {
            let extent = bounds.extent(axis);
            let limit = self.config.envelope(axis);
            if extent > limit {
                tracing::warn!(
                    assembly,
                    part = part.name(),
                    axis = %axis,
                    extent,
                    limit,
                    "Part exceeds the printable envelope"
                );
            }
        }
    }
}

/// Resolve an assembly's dimensions without building anything
pub fn resolve_dimensions(
    assembly: &dyn Assembly,
    config: &GenerationConfig,
) -> Result<DimensionSet> {
    assembly
        .dimensions(config)
        .map_err(|source| PipelineError::Dimensions {
            assembly: assembly.name().to_string(),
            source,
        })
}
