// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared assembly pipeline: resolves dimensions, builds every part of an
//! assembly (in parallel when configured), splits oversized bodies to the
//! bed and exports the results.
//!
//! ```rust,ignore
//! use printforge_core::GenerationConfig;
//! use printforge_processing::{assemblies::CarGarage, Pipeline, StlExporter};
//!
//! let config = GenerationConfig::from_env();
//! let exporter = StlExporter::new(&config.output_dir);
//! let report = Pipeline::new(config)?.run_and_export(&CarGarage::new(), &exporter)?;
//! ```

pub mod assemblies;
pub mod assembly;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod report;

pub use assembly::{shell_program, Assembly, PartRecipe};
pub use error::{ExportError, PipelineError, Result, Stage};
pub use export::{
    write_ascii_stl, write_binary_stl, ExportedPart, Exporter, Manifest, ManifestFailure,
    ManifestPart, StlExporter, StlFormat,
};
pub use pipeline::{resolve_dimensions, Pipeline};
pub use report::{AssemblyReport, PartOutcome};
