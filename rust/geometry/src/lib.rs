// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! PrintForge Geometry
//!
//! Solids, placement, CSG sequencing and bed-size splitting on top of a
//! pluggable [`GeometryKernel`]. The bundled [`CsgrsKernel`] uses exact
//! planar primitives and csgrs for booleans; export meshes are triangulated
//! with earcutr.
//!
//! ```rust,ignore
//! use printforge_geometry::{BodyProgram, CsgCombinator, CsgrsKernel, Evaluator, PrimitiveFactory, PrimitiveSpec};
//!
//! let kernel = CsgrsKernel::default();
//! let evaluator = Evaluator::new(PrimitiveFactory::new(&kernel), CsgCombinator::new(&kernel));
//! let part = evaluator.evaluate(&program)?;
//! ```

pub mod bounds;
pub mod csg;
pub mod error;
pub mod hull;
pub mod kernel;
pub mod mesh;
pub mod part;
pub mod placement;
pub mod primitives;
pub mod program;
pub mod solid;
pub mod split;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use bounds::Aabb;
pub use csg::{CsgCombinator, CsgOp};
pub use error::{Error, Result};
pub use kernel::{CsgrsKernel, GeometryKernel};
pub use mesh::Mesh;
pub use part::Part;
pub use placement::{place, Instance, ShapeKind, Transform};
pub use primitives::{axis_orientation, PrimitiveFactory};
pub use program::{BodyProgram, CsgNode, Evaluator, OperandSpec, PrimitiveSpec, Shape};
pub use solid::{Face, Solid};
pub use split::{BedSplitter, HalfSpaceMask, Side, Slab, SplitPlan};
