// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Body programs
//!
//! A body is described as data: a base operand followed by ordered CSG
//! nodes. Operands are primitive specs (shape plus placement) or nested
//! bodies with their own placement. The [`Evaluator`] is the only thing
//! that turns a program into a [`Part`], so operand order stays explicit
//! and every failure can name the node that caused it.

use nalgebra::Point3;
use printforge_core::{Axis, Extent3};
use tracing::debug;

use crate::csg::{CsgCombinator, CsgOp};
use crate::error::Result;
use crate::part::Part;
use crate::placement::{Instance, Transform};
use crate::primitives::PrimitiveFactory;

/// Canonical shape of a primitive operand
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Box centred on its local origin
    Cuboid { size: Extent3 },
    /// Cylinder centred on its local origin, running along `axis`
    Cylinder { radius: f64, height: f64, axis: Axis },
    /// Convex hull of points given in the local frame
    Hull { points: Vec<Point3<f64>> },
}

/// Named primitive with its placement in the body frame
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveSpec {
    pub name: String,
    pub shape: Shape,
    pub placement: Transform,
}

impl PrimitiveSpec {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            placement: Transform::identity(),
        }
    }

    /// Box spanning `[min, min + size]`
    pub fn cuboid_at(name: impl Into<String>, size: Extent3, min: Extent3) -> Self {
        Self::new(name, Shape::Cuboid { size }).translated(
            min.x + size.x / 2.0,
            min.y + size.y / 2.0,
            min.z + size.z / 2.0,
        )
    }

    /// Box of `size` centred on `center`
    pub fn cuboid_centered(name: impl Into<String>, size: Extent3, center: Extent3) -> Self {
        Self::new(name, Shape::Cuboid { size }).translated(center.x, center.y, center.z)
    }

    /// Cylinder along `axis` centred on `center`
    pub fn cylinder(
        name: impl Into<String>,
        radius: f64,
        height: f64,
        axis: Axis,
        center: Extent3,
    ) -> Self {
        Self::new(
            name,
            Shape::Cylinder {
                radius,
                height,
                axis,
            },
        )
        .translated(center.x, center.y, center.z)
    }

    pub fn hull(name: impl Into<String>, points: Vec<Point3<f64>>) -> Self {
        Self::new(name, Shape::Hull { points })
    }

    /// Compose a further placement (`t ∘ current`)
    pub fn placed(mut self, t: Transform) -> Self {
        self.placement = self.placement.then(&t);
        self
    }

    pub fn translated(self, x: f64, y: f64, z: f64) -> Self {
        self.placed(Transform::translation(x, y, z))
    }
}

/// Operand of a CSG node
#[derive(Debug, Clone, PartialEq)]
pub enum OperandSpec {
    Primitive(PrimitiveSpec),
    Body {
        program: Box<BodyProgram>,
        placement: Transform,
    },
}

impl OperandSpec {
    pub fn name(&self) -> &str {
        match self {
            OperandSpec::Primitive(spec) => &spec.name,
            OperandSpec::Body { program, .. } => &program.name,
        }
    }

    /// Nested body placed in the parent frame
    pub fn body(program: BodyProgram, placement: Transform) -> Self {
        OperandSpec::Body {
            program: Box::new(program),
            placement,
        }
    }
}

impl From<PrimitiveSpec> for OperandSpec {
    fn from(spec: PrimitiveSpec) -> Self {
        OperandSpec::Primitive(spec)
    }
}

impl From<BodyProgram> for OperandSpec {
    fn from(program: BodyProgram) -> Self {
        OperandSpec::body(program, Transform::identity())
    }
}

/// One boolean applied to the accumulated body
#[derive(Debug, Clone, PartialEq)]
pub struct CsgNode {
    pub op: CsgOp,
    pub operands: Vec<OperandSpec>,
}

/// Named body: base operand plus ordered nodes
#[derive(Debug, Clone, PartialEq)]
pub struct BodyProgram {
    pub name: String,
    pub base: OperandSpec,
    pub nodes: Vec<CsgNode>,
}

impl BodyProgram {
    pub fn new(name: impl Into<String>, base: impl Into<OperandSpec>) -> Self {
        Self {
            name: name.into(),
            base: base.into(),
            nodes: Vec::new(),
        }
    }

    /// Append a node; nodes with no operands are dropped
    pub fn then<I, O>(mut self, op: CsgOp, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OperandSpec>,
    {
        let operands: Vec<OperandSpec> = operands.into_iter().map(Into::into).collect();
        if !operands.is_empty() {
            self.nodes.push(CsgNode { op, operands });
        }
        self
    }

    pub fn union<I, O>(self, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OperandSpec>,
    {
        self.then(CsgOp::Union, operands)
    }

    pub fn difference<I, O>(self, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OperandSpec>,
    {
        self.then(CsgOp::Difference, operands)
    }

    pub fn intersection<I, O>(self, operands: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<OperandSpec>,
    {
        self.then(CsgOp::Intersection, operands)
    }

    /// Number of boolean applications the program performs
    pub fn step_count(&self) -> usize {
        self.nodes.iter().map(|n| n.operands.len()).sum()
    }
}

/// Evaluates body programs through the factory and the combinator
pub struct Evaluator<'k> {
    factory: PrimitiveFactory<'k>,
    combinator: CsgCombinator<'k>,
}

impl<'k> Evaluator<'k> {
    pub fn new(factory: PrimitiveFactory<'k>, combinator: CsgCombinator<'k>) -> Self {
        Self {
            factory,
            combinator,
        }
    }

    #[inline]
    pub fn factory(&self) -> &PrimitiveFactory<'k> {
        &self.factory
    }

    #[inline]
    pub fn combinator(&self) -> &CsgCombinator<'k> {
        &self.combinator
    }

    /// Build the named part a program describes
    pub fn evaluate(&self, program: &BodyProgram) -> Result<Part> {
        let base = self.materialize(&program.base)?;
        let mut current = self
            .combinator
            .combine_from(&program.name, CsgOp::Union, std::slice::from_ref(&base), 0)?;

        let mut applied = 0;
        for node in &program.nodes {
            let mut operands = Vec::with_capacity(node.operands.len() + 1);
            operands.push(current.to_instance());
            for spec in &node.operands {
                operands.push(self.materialize(spec)?);
            }
            current = self
                .combinator
                .combine_from(&program.name, node.op, &operands, applied)?;
            applied += node.operands.len();
        }

        debug!(
            body = %program.name,
            steps = applied,
            volume = current.volume(),
            "Evaluated body"
        );
        Ok(current)
    }

    /// Turn an operand spec into a placed instance
    pub fn materialize(&self, spec: &OperandSpec) -> Result<Instance> {
        match spec {
            OperandSpec::Primitive(p) => {
                let instance = match &p.shape {
                    Shape::Cuboid { size } => self.factory.make_box(&p.name, *size)?,
                    Shape::Cylinder {
                        radius,
                        height,
                        axis,
                    } => self.factory.make_cylinder(&p.name, *radius, *height, *axis)?,
                    Shape::Hull { points } => self.factory.make_hull(&p.name, points)?,
                };
                Ok(self.factory.place(&instance, &p.placement))
            }
            OperandSpec::Body { program, placement } => {
                let part = self.evaluate(program)?;
                Ok(self.factory.place(&part.to_instance(), placement))
            }
        }
    }
}
