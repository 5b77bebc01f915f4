// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline and export error types.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Result type for pipeline runs.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Pipeline stage a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Dimensions,
    Build,
    Split,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Dimensions => "dimensions",
            Stage::Build => "build",
            Stage::Split => "split",
            Stage::Export => "export",
        })
    }
}

/// Failure of a generation run, tagged with where it happened.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[source] printforge_core::Error),

    /// No part can be built without the dimension set, so this aborts the assembly
    #[error("Assembly `{assembly}` failed at the dimensions stage: {source}")]
    Dimensions {
        assembly: String,
        source: printforge_core::Error,
    },

    #[error("Part `{assembly}/{part}` failed at the {stage} stage: {source}")]
    Part {
        assembly: String,
        part: String,
        stage: Stage,
        source: printforge_geometry::Error,
    },

    #[error("Export of `{assembly}/{part}` failed: {source}")]
    Export {
        assembly: String,
        part: String,
        source: ExportError,
    },
}

impl PipelineError {
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Config(_) | PipelineError::Dimensions { .. } => Stage::Dimensions,
            PipelineError::Part { stage, .. } => *stage,
            PipelineError::Export { .. } => Stage::Export,
        }
    }

    /// Part role the failure is attributed to, if any
    pub fn part(&self) -> Option<&str> {
        match self {
            PipelineError::Part { part, .. } | PipelineError::Export { part, .. } => Some(part),
            _ => None,
        }
    }
}

/// Errors raised while serializing finished parts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Manifest serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Output files are written once per run
    #[error("Part `{0}` was already exported in this run")]
    DuplicatePart(String),

    #[error("Mesh generation failed: {0}")]
    Mesh(#[from] printforge_geometry::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ExportError::Io {
            path: path.into(),
            source,
        }
    }
}
