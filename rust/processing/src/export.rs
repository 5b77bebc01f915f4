// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serialization of finished parts: STL meshes plus a JSON manifest.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use printforge_core::GenerationConfig;
use printforge_geometry::{Mesh, Part};
use serde::Serialize;
use stl_io::{Normal, Triangle, Vertex};

use crate::error::{ExportError, Stage};

/// A part written to disk
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPart {
    pub name: String,
    pub path: PathBuf,
    pub triangles: usize,
}

/// Manifest written next to the part files.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    /// Assembly name, also the file prefix.
    pub assembly: String,
    /// Configuration the run used.
    pub config: GenerationConfig,
    /// Every resolved dimension, by name.
    pub dimensions: BTreeMap<String, f64>,
    /// Exported parts in export order.
    pub parts: Vec<ManifestPart>,
    /// Recipes that produced no output.
    pub failures: Vec<ManifestFailure>,
}

/// One exported part.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestPart {
    /// Part name (role, with a `_part<i>` suffix after a split).
    pub name: String,
    /// Recipe role the part came from.
    pub role: String,
    /// File name relative to the manifest.
    pub file: String,
    /// Volume in mm³.
    pub volume: f64,
    pub bounds_min: [f64; 3],
    pub bounds_max: [f64; 3],
    pub triangles: usize,
}

impl ManifestPart {
    pub fn new(role: &str, part: &Part, exported: &ExportedPart) -> Self {
        let bounds = part.bounds();
        Self {
            name: part.name().to_string(),
            role: role.to_string(),
            file: exported
                .path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default(),
            volume: part.volume(),
            bounds_min: [bounds.min.x, bounds.min.y, bounds.min.z],
            bounds_max: [bounds.max.x, bounds.max.y, bounds.max.z],
            triangles: exported.triangles,
        }
    }
}

/// A recipe that failed.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestFailure {
    pub role: String,
    pub stage: Stage,
    pub message: String,
}

/// Destination for finished parts
pub trait Exporter: Sync {
    /// Serialize one part; called once per part name per run
    fn write_part(&self, assembly: &str, part: &Part) -> Result<ExportedPart, ExportError>;

    fn write_manifest(&self, assembly: &str, manifest: &Manifest) -> Result<PathBuf, ExportError>;

    /// Optional single visual mesh of every part
    fn write_combined(&self, _assembly: &str, _parts: &[&Part]) -> Result<Option<PathBuf>, ExportError> {
        Ok(None)
    }
}

/// STL encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    #[default]
    Binary,
    Ascii,
}

/// Writes `<assembly>_<part>.stl` files and `<assembly>_manifest.json` into a directory
#[derive(Debug, Clone)]
pub struct StlExporter {
    dir: PathBuf,
    format: StlFormat,
    combined: bool,
}

impl StlExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            format: StlFormat::Binary,
            combined: false,
        }
    }

    pub fn with_format(mut self, format: StlFormat) -> Self {
        self.format = format;
        self
    }

    /// Also write `<assembly>_combined.stl`
    pub fn with_combined(mut self, combined: bool) -> Self {
        self.combined = combined;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> StlFormat {
        self.format
    }

    /// Path a part with the given name is written to
    pub fn part_path(&self, assembly: &str, name: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.stl", assembly, name))
    }

    fn create(&self, path: &Path) -> Result<BufWriter<File>, ExportError> {
        fs::create_dir_all(&self.dir).map_err(|e| ExportError::io(&self.dir, e))?;
        let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
        Ok(BufWriter::new(file))
    }

    fn write_mesh(&self, path: &Path, name: &str, mesh: &Mesh) -> Result<(), ExportError> {
        let mut writer = self.create(path)?;
        match self.format {
            StlFormat::Binary => write_binary_stl(&mut writer, mesh),
            StlFormat::Ascii => write_ascii_stl(&mut writer, name, mesh),
        }
        .and_then(|_| writer.flush())
        .map_err(|e| ExportError::io(path, e))
    }
}

impl Exporter for StlExporter {
    fn write_part(&self, assembly: &str, part: &Part) -> Result<ExportedPart, ExportError> {
        let mesh = Mesh::from_solid(part.solid())?;
        let path = self.part_path(assembly, part.name());
        self.write_mesh(&path, part.name(), &mesh)?;

        tracing::debug!(
            part = part.name(),
            triangles = mesh.triangle_count(),
            path = %path.display(),
            "Wrote STL"
        );
        Ok(ExportedPart {
            name: part.name().to_string(),
            path,
            triangles: mesh.triangle_count(),
        })
    }

    fn write_manifest(&self, assembly: &str, manifest: &Manifest) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(format!("{}_manifest.json", assembly));
        let mut writer = self.create(&path)?;
        serde_json::to_writer_pretty(&mut writer, manifest)?;
        writer.flush().map_err(|e| ExportError::io(&path, e))?;
        Ok(path)
    }

    fn write_combined(&self, assembly: &str, parts: &[&Part]) -> Result<Option<PathBuf>, ExportError> {
        if !self.combined || parts.is_empty() {
            return Ok(None);
        }
        let mut combined = Mesh::new();
        for part in parts {
            combined.merge(&Mesh::from_solid(part.solid())?);
        }
        let path = self.part_path(assembly, "combined");
        self.write_mesh(&path, assembly, &combined)?;
        Ok(Some(path))
    }
}

/// Binary STL through `stl_io`: zeroed 80-byte header, triangle count,
/// then 50 bytes per triangle
pub fn write_binary_stl<W: Write>(writer: &mut W, mesh: &Mesh) -> io::Result<()> {
    let triangles: Vec<Triangle> = mesh
        .triangles()
        .map(|(corners, normal)| Triangle {
            normal: Normal::new(normal),
            vertices: corners.map(Vertex::new),
        })
        .collect();
    stl_io::write_stl(writer, triangles.iter())
}

pub fn write_ascii_stl<W: Write>(writer: &mut W, name: &str, mesh: &Mesh) -> io::Result<()> {
    writeln!(writer, "solid {}", name)?;
    for (corners, [nx, ny, nz]) in mesh.triangles() {
        writeln!(writer, "  facet normal {:e} {:e} {:e}", nx, ny, nz)?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in corners {
            writeln!(writer, "      vertex {:e} {:e} {:e}", x, y, z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }
    writeln!(writer, "endsolid {}", name)
}
