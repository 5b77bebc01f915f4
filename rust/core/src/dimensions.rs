// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimension model
//!
//! Turns a handful of nominal inputs (shell size, wall thickness, feature
//! sizes, fit classes) into a fully resolved, immutable [`DimensionSet`]
//! before any geometry is built.
//!
//! ## Frame
//!
//! The outer shell is centred on X and Y and stands on `z = 0`:
//! `x ∈ [-L/2, L/2]`, `y ∈ [-W/2, W/2]`, `z ∈ [0, H]`.
//!
//! ## Wall convention
//!
//! Each axis carries zero, one or two walls ([`Walls`]). On every axis
//! `outer == inner + walls * wall_thickness` holds exactly. An open-top tray
//! (floor only) is `ShellLayout::open_top()`; the inner height is then
//! `outer_height - wall_thickness`.

use std::collections::BTreeMap;
use std::fmt;

use crate::axis::{Axis, Extent3};
use crate::error::{require_non_negative, require_positive, Error, Result};
use crate::fit::{FitClass, FitTable};

/// Which walls close one axis of the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Walls {
    /// Open on both sides
    None,
    /// Wall on the min side only (floor, front, left)
    Low,
    /// Wall on the max side only (roof, back, right)
    High,
    /// Walls on both sides
    Both,
}

impl Walls {
    /// Number of walls on this axis
    #[inline]
    pub fn count(self) -> u8 {
        match self {
            Walls::None => 0,
            Walls::Low | Walls::High => 1,
            Walls::Both => 2,
        }
    }

    #[inline]
    pub fn has_low(self) -> bool {
        matches!(self, Walls::Low | Walls::Both)
    }

    #[inline]
    pub fn has_high(self) -> bool {
        matches!(self, Walls::High | Walls::Both)
    }
}

/// Per-axis wall layout of a shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShellLayout {
    pub x: Walls,
    pub y: Walls,
    pub z: Walls,
}

impl ShellLayout {
    pub const fn new(x: Walls, y: Walls, z: Walls) -> Self {
        Self { x, y, z }
    }

    /// Fully closed box
    pub const fn closed() -> Self {
        Self::new(Walls::Both, Walls::Both, Walls::Both)
    }

    /// Four side walls and a floor, open at the top
    pub const fn open_top() -> Self {
        Self::new(Walls::Both, Walls::Both, Walls::Low)
    }

    #[inline]
    pub fn walls(&self, axis: Axis) -> Walls {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Whether a given wall face exists
    pub fn has_face(&self, face: WallFace) -> bool {
        let walls = self.walls(face.axis());
        if face.is_low() {
            walls.has_low()
        } else {
            walls.has_high()
        }
    }
}

/// One of the six walls of a shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WallFace {
    Left,
    Right,
    Front,
    Back,
    Floor,
    Roof,
}

impl WallFace {
    pub const ALL: [WallFace; 6] = [
        WallFace::Left,
        WallFace::Right,
        WallFace::Front,
        WallFace::Back,
        WallFace::Floor,
        WallFace::Roof,
    ];

    /// Axis the wall is perpendicular to
    #[inline]
    pub fn axis(self) -> Axis {
        match self {
            WallFace::Left | WallFace::Right => Axis::X,
            WallFace::Front | WallFace::Back => Axis::Y,
            WallFace::Floor | WallFace::Roof => Axis::Z,
        }
    }

    /// Whether the wall sits on the min side of its axis
    #[inline]
    pub fn is_low(self) -> bool {
        matches!(self, WallFace::Left | WallFace::Front | WallFace::Floor)
    }

    pub fn name(self) -> &'static str {
        match self {
            WallFace::Left => "left_wall",
            WallFace::Right => "right_wall",
            WallFace::Front => "front_wall",
            WallFace::Back => "back_wall",
            WallFace::Floor => "floor",
            WallFace::Roof => "roof",
        }
    }
}

impl fmt::Display for WallFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the shell size is given
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShellNominal {
    /// Outer size is nominal, cavity is derived by removing walls
    Outer(Extent3),
    /// Cavity is the contained object plus total clearance per axis,
    /// outer size is derived by adding walls
    Contents { contents: Extent3, clearance: Extent3 },
}

/// Mating feature cut into a host wall
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FeatureKind {
    /// Slot receiving a sliding panel
    Groove {
        host: WallFace,
        /// Thickness of the panel riding in the groove
        mating_thickness: f64,
        depth: f64,
        /// How far the panel edge reaches into the groove
        engagement: f64,
    },
    /// Hole for a pivot pin
    PivotHole {
        host: WallFace,
        pin_diameter: f64,
        hole_depth: f64,
        pin_length: f64,
    },
    /// Interference bore for a pressed-in part
    PressBore {
        host: WallFace,
        nominal_diameter: f64,
        depth: f64,
    },
}

impl FeatureKind {
    pub fn host(&self) -> WallFace {
        match self {
            FeatureKind::Groove { host, .. }
            | FeatureKind::PivotHole { host, .. }
            | FeatureKind::PressBore { host, .. } => *host,
        }
    }

    pub fn fit_class(&self) -> FitClass {
        match self {
            FeatureKind::Groove { .. } => FitClass::Sliding,
            FeatureKind::PivotHole { .. } => FitClass::Pivoting,
            FeatureKind::PressBore { .. } => FitClass::Press,
        }
    }

    fn cut_depth(&self) -> f64 {
        match self {
            FeatureKind::Groove { depth, .. } | FeatureKind::PressBore { depth, .. } => *depth,
            FeatureKind::PivotHole { hole_depth, .. } => *hole_depth,
        }
    }
}

/// Named feature with its structural marking
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Feature {
    pub name: String,
    pub kind: FeatureKind,
    /// Explicitly allowed to perforate its host wall
    pub pass_through: bool,
}

impl Feature {
    pub fn groove(
        name: impl Into<String>,
        host: WallFace,
        mating_thickness: f64,
        depth: f64,
        engagement: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::Groove {
                host,
                mating_thickness,
                depth,
                engagement,
            },
            pass_through: false,
        }
    }

    pub fn pivot_hole(
        name: impl Into<String>,
        host: WallFace,
        pin_diameter: f64,
        hole_depth: f64,
        pin_length: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::PivotHole {
                host,
                pin_diameter,
                hole_depth,
                pin_length,
            },
            pass_through: false,
        }
    }

    pub fn press_bore(
        name: impl Into<String>,
        host: WallFace,
        nominal_diameter: f64,
        depth: f64,
    ) -> Self {
        Self {
            name: name.into(),
            kind: FeatureKind::PressBore {
                host,
                nominal_diameter,
                depth,
            },
            pass_through: false,
        }
    }

    /// Mark the feature as allowed to cut through its host wall
    pub fn pass_through(mut self) -> Self {
        self.pass_through = true;
        self
    }
}

/// Derivation rule evaluated against the partially resolved set
pub type DeriveFn = fn(&DimensionSet) -> f64;

/// Nominal inputs of one generation run
#[derive(Debug, Clone)]
pub struct DimensionModel {
    shell: ShellNominal,
    layout: ShellLayout,
    wall_thickness: f64,
    cut_overshoot: f64,
    features: Vec<Feature>,
    nominals: Vec<(String, f64)>,
    derived: Vec<(String, DeriveFn)>,
}

impl DimensionModel {
    /// Overshoot used when the cavity cut passes through open sides
    pub const DEFAULT_CUT_OVERSHOOT: f64 = 1.0;

    pub fn new(shell: ShellNominal, layout: ShellLayout, wall_thickness: f64) -> Self {
        Self {
            shell,
            layout,
            wall_thickness,
            cut_overshoot: Self::DEFAULT_CUT_OVERSHOOT,
            features: Vec::new(),
            nominals: Vec::new(),
            derived: Vec::new(),
        }
    }

    pub fn cut_overshoot(mut self, overshoot: f64) -> Self {
        self.cut_overshoot = overshoot;
        self
    }

    pub fn feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    /// Extra nominal input carried into the set (must be positive)
    pub fn nominal(mut self, name: impl Into<String>, value: f64) -> Self {
        self.nominals.push((name.into(), value));
        self
    }

    /// Named derived value, computed after shell, features and nominals,
    /// in declaration order
    pub fn derived(mut self, name: impl Into<String>, rule: DeriveFn) -> Self {
        self.derived.push((name.into(), rule));
        self
    }

    /// Resolve every derived dimension
    pub fn resolve(&self, fits: &FitTable) -> Result<DimensionSet> {
        let wall = require_positive("wall_thickness", self.wall_thickness)?;
        let overshoot = require_non_negative("cut_overshoot", self.cut_overshoot)?;

        let walls_extent = Extent3::new(
            f64::from(self.layout.x.count()) * wall,
            f64::from(self.layout.y.count()) * wall,
            f64::from(self.layout.z.count()) * wall,
        );

        let (outer, inner) = match self.shell {
            ShellNominal::Outer(outer) => {
                for axis in Axis::ALL {
                    require_positive(&format!("outer_{}", axis.dimension_name()), outer.get(axis))?;
                }
                (outer, outer - walls_extent)
            }
            ShellNominal::Contents {
                contents,
                clearance,
            } => {
                for axis in Axis::ALL {
                    require_positive(
                        &format!("contents_{}", axis.dimension_name()),
                        contents.get(axis),
                    )?;
                    require_non_negative(
                        &format!("clearance_{}", axis.dimension_name()),
                        clearance.get(axis),
                    )?;
                }
                let inner = contents + clearance;
                (inner + walls_extent, inner)
            }
        };

        for axis in Axis::ALL {
            let value = inner.get(axis);
            if value <= 0.0 {
                return Err(Error::invalid_dimension(
                    format!("inner_{}", axis.dimension_name()),
                    format!(
                        "walls ({} x {}) consume the whole outer {} of {}",
                        self.layout.walls(axis).count(),
                        wall,
                        axis.dimension_name(),
                        outer.get(axis)
                    ),
                ));
            }
        }

        let mut set = DimensionSet {
            entries: BTreeMap::new(),
            outer,
            inner,
            wall_thickness: wall,
            layout: self.layout,
        };

        set.insert("wall_thickness", wall)?;
        set.insert("cut_overshoot", overshoot)?;
        for axis in Axis::ALL {
            let name = axis.dimension_name();
            set.insert(format!("outer_{}", name), outer.get(axis))?;
            set.insert(format!("inner_{}", name), inner.get(axis))?;
        }
        for face in WallFace::ALL {
            if self.layout.has_face(face) {
                set.insert(format!("{}_thickness", face.name()), wall)?;
            }
        }

        // Cavity cut: the true cavity, pushed through every open side
        for axis in Axis::ALL {
            let walls = self.layout.walls(axis);
            let size = outer.get(axis);
            let outer_min = if axis == Axis::Z { 0.0 } else { -size / 2.0 };
            let outer_max = outer_min + size;

            let low = if walls.has_low() {
                outer_min + wall
            } else {
                outer_min - overshoot
            };
            let high = if walls.has_high() {
                outer_max - wall
            } else {
                outer_max + overshoot
            };

            set.insert(format!("cavity_cut_{}", axis.dimension_name()), high - low)?;
            set.insert(format!("cavity_center_{}", axis), (low + high) / 2.0)?;
            set.insert(format!("outer_center_{}", axis), (outer_min + outer_max) / 2.0)?;
        }

        for feature in &self.features {
            self.resolve_feature(feature, fits, &mut set)?;
        }

        for (name, value) in &self.nominals {
            set.insert(name.clone(), require_positive(name, *value)?)?;
        }

        for (name, rule) in &self.derived {
            let value = rule(&set);
            if !value.is_finite() {
                return Err(Error::invalid_dimension(
                    name.clone(),
                    "derivation produced a non-finite value",
                ));
            }
            set.insert(name.clone(), value)?;
        }

        Ok(set)
    }

    fn resolve_feature(&self, feature: &Feature, fits: &FitTable, set: &mut DimensionSet) -> Result<()> {
        let host = feature.kind.host();
        if !self.layout.has_face(host) {
            return Err(Error::invalid_dimension(
                feature.name.clone(),
                format!("host wall '{}' does not exist in this shell layout", host),
            ));
        }

        let depth = require_positive(&format!("{}_depth", feature.name), feature.kind.cut_depth())?;
        // A cut as deep as its wall opens into the cavity
        if depth >= set.wall_thickness && !feature.pass_through {
            return Err(Error::invalid_dimension(
                format!("{}_depth", feature.name),
                format!(
                    "depth {} perforates the {} (thickness {}); mark the feature pass-through to allow it",
                    depth, host, set.wall_thickness
                ),
            ));
        }

        let name = &feature.name;
        match &feature.kind {
            FeatureKind::Groove {
                mating_thickness,
                engagement,
                ..
            } => {
                let width = fits.resolve(FitClass::Sliding, *mating_thickness)?;
                fits.check_engagement(name, FitClass::Sliding, 0.0, *engagement)?;
                if *engagement > depth {
                    return Err(Error::invalid_dimension(
                        format!("{}_engagement", name),
                        format!(
                            "mating engagement {} is deeper than the groove ({})",
                            engagement, depth
                        ),
                    ));
                }
                set.insert(format!("{}_width", name), width)?;
                set.insert(format!("{}_depth", name), depth)?;
                set.insert(format!("{}_engagement", name), *engagement)?;
                set.insert(format!("{}_mating_thickness", name), *mating_thickness)?;
            }
            FeatureKind::PivotHole {
                pin_diameter,
                pin_length,
                ..
            } => {
                let hole = fits.resolve_hole(*pin_diameter)?;
                fits.check_engagement(name, FitClass::Pivoting, depth, *pin_length)?;
                set.insert(format!("{}_pin_diameter", name), *pin_diameter)?;
                set.insert(format!("{}_hole_diameter", name), hole)?;
                set.insert(format!("{}_hole_depth", name), depth)?;
                set.insert(format!("{}_pin_length", name), *pin_length)?;
            }
            FeatureKind::PressBore {
                nominal_diameter, ..
            } => {
                let bore = fits.resolve(FitClass::Press, *nominal_diameter)?;
                set.insert(format!("{}_bore_diameter", name), bore)?;
                set.insert(format!("{}_depth", name), depth)?;
            }
        }
        Ok(())
    }
}

/// Fully resolved, immutable dimension set
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSet {
    entries: BTreeMap<String, f64>,
    outer: Extent3,
    inner: Extent3,
    wall_thickness: f64,
    layout: ShellLayout,
}

impl DimensionSet {
    fn insert(&mut self, name: impl Into<String>, value: f64) -> Result<()> {
        let name = name.into();
        if self.entries.contains_key(&name) {
            return Err(Error::invalid_dimension(name, "dimension defined twice"));
        }
        self.entries.insert(name, value);
        Ok(())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    /// Lookup that fails with `InvalidDimension` when the name is unknown
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name)
            .ok_or_else(|| Error::invalid_dimension(name, "not defined in the dimension set"))
    }

    /// Lookup for derivation rules: unknown names yield NaN, which the
    /// model rejects as a non-finite derived value
    #[inline]
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(f64::NAN)
    }

    #[inline]
    pub fn outer(&self) -> Extent3 {
        self.outer
    }

    #[inline]
    pub fn inner(&self) -> Extent3 {
        self.inner
    }

    #[inline]
    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    #[inline]
    pub fn layout(&self) -> ShellLayout {
        self.layout
    }

    /// Size of the cavity cut box
    pub fn cavity_cut(&self) -> Extent3 {
        Extent3::new(
            self.value("cavity_cut_length"),
            self.value("cavity_cut_width"),
            self.value("cavity_cut_height"),
        )
    }

    /// Centre of the cavity cut box in the assembly frame
    pub fn cavity_center(&self) -> Extent3 {
        Extent3::new(
            self.value("cavity_center_x"),
            self.value("cavity_center_y"),
            self.value("cavity_center_z"),
        )
    }

    /// Centre of the outer shell in the assembly frame
    pub fn outer_center(&self) -> Extent3 {
        Extent3::new(
            self.value("outer_center_x"),
            self.value("outer_center_y"),
            self.value("outer_center_z"),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ammo_can() -> DimensionModel {
        DimensionModel::new(
            ShellNominal::Outer(Extent3::new(40.0, 30.0, 25.0)),
            ShellLayout::open_top(),
            2.0,
        )
    }

    #[test]
    fn test_open_top_box() {
        let set = ammo_can().resolve(&FitTable::standard()).unwrap();
        assert_eq!(set.outer().to_array(), [40.0, 30.0, 25.0]);
        assert_eq!(set.inner().to_array(), [36.0, 26.0, 23.0]);
        assert_eq!(set.get("inner_height"), Some(23.0));
        assert_eq!(set.get("floor_thickness"), Some(2.0));
        assert_eq!(set.get("roof_thickness"), None);
    }

    #[test]
    fn test_outer_equals_inner_plus_walls() {
        let layouts = [
            ShellLayout::closed(),
            ShellLayout::open_top(),
            ShellLayout::new(Walls::Both, Walls::High, Walls::High),
            ShellLayout::new(Walls::None, Walls::Low, Walls::Both),
        ];
        for layout in layouts {
            let set = DimensionModel::new(
                ShellNominal::Contents {
                    contents: Extent3::new(262.0, 191.0, 46.0),
                    clearance: Extent3::new(20.0, 20.0, 40.0),
                },
                layout,
                5.0,
            )
            .resolve(&FitTable::standard())
            .unwrap();

            for axis in Axis::ALL {
                let walls = f64::from(layout.walls(axis).count());
                assert_eq!(
                    set.outer().get(axis),
                    set.inner().get(axis) + walls * set.wall_thickness()
                );
            }
        }
    }

    #[test]
    fn test_walls_consuming_shell_rejected() {
        let result = DimensionModel::new(
            ShellNominal::Outer(Extent3::new(4.0, 30.0, 25.0)),
            ShellLayout::closed(),
            2.0,
        )
        .resolve(&FitTable::standard());
        match result {
            Err(Error::InvalidDimension { name, .. }) => assert_eq!(name, "inner_length"),
            other => panic!("Expected InvalidDimension, got {:?}", other),
        }
    }

    #[test]
    fn test_cavity_cut_overshoots_open_top() {
        let set = ammo_can().cut_overshoot(1.0).resolve(&FitTable::standard()).unwrap();
        let cut = set.cavity_cut();
        let center = set.cavity_center();
        assert_eq!(cut.x, 36.0);
        assert_eq!(cut.y, 26.0);
        // Floor at z = 2, cut runs to the top plus 1mm
        assert_relative_eq!(cut.z, 24.0);
        assert_relative_eq!(center.z - cut.z / 2.0, 2.0);
        assert_relative_eq!(center.z + cut.z / 2.0, 26.0);
        assert_eq!(center.x, 0.0);
    }

    #[test]
    fn test_cavity_cut_open_front() {
        // Back wall only: cavity cut leaves through the front face
        let set = DimensionModel::new(
            ShellNominal::Outer(Extent3::new(100.0, 215.0, 60.0)),
            ShellLayout::new(Walls::Both, Walls::High, Walls::High),
            5.0,
        )
        .cut_overshoot(5.0)
        .resolve(&FitTable::standard())
        .unwrap();
        let cut = set.cavity_cut();
        let center = set.cavity_center();
        assert_relative_eq!(center.y - cut.y / 2.0, -107.5 - 5.0);
        assert_relative_eq!(center.y + cut.y / 2.0, 107.5 - 5.0);
        assert_relative_eq!(center.z - cut.z / 2.0, -5.0);
        assert_relative_eq!(center.z + cut.z / 2.0, 55.0);
    }

    #[test]
    fn test_groove_deeper_than_wall_rejected() {
        let result = ammo_can()
            .feature(Feature::groove("door_slot", WallFace::Left, 4.0, 2.5, 2.0))
            .resolve(&FitTable::standard());
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));

        let set = ammo_can()
            .feature(Feature::groove("door_slot", WallFace::Left, 4.0, 2.5, 2.0).pass_through())
            .resolve(&FitTable::standard())
            .unwrap();
        assert_eq!(set.get("door_slot_width"), Some(4.5));
        assert_eq!(set.get("door_slot_depth"), Some(2.5));
    }

    #[test]
    fn test_feature_as_deep_as_wall_rejected() {
        let result = ammo_can()
            .feature(Feature::pivot_hole("latch_pin", WallFace::Back, 1.5, 2.0, 4.0))
            .resolve(&FitTable::standard());
        match result {
            Err(Error::InvalidDimension { name, .. }) => assert_eq!(name, "latch_pin_depth"),
            other => panic!("Expected InvalidDimension, got {:?}", other),
        }

        let set = ammo_can()
            .feature(Feature::pivot_hole("latch_pin", WallFace::Back, 1.5, 2.0, 4.0).pass_through())
            .resolve(&FitTable::standard())
            .unwrap();
        assert_eq!(set.get("latch_pin_hole_depth"), Some(2.0));
    }

    #[test]
    fn test_feature_on_missing_wall_rejected() {
        let result = ammo_can()
            .feature(Feature::groove("lid_slot", WallFace::Roof, 2.0, 1.5, 1.0))
            .resolve(&FitTable::standard());
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_pivot_hole_resolution() {
        let set = ammo_can()
            .feature(Feature::pivot_hole("latch_pin", WallFace::Back, 1.5, 1.5, 4.0))
            .resolve(&FitTable::standard())
            .unwrap();
        let hole = set.get("latch_pin_hole_diameter").unwrap();
        assert!(hole > 1.5);
    }

    #[test]
    fn test_pivot_zero_clearance_rejected() {
        let fits = FitTable::standard().with_clearance(FitClass::Pivoting, 0.0);
        let result = ammo_can()
            .feature(Feature::pivot_hole("latch_pin", WallFace::Back, 1.5, 1.5, 4.0))
            .resolve(&fits);
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_short_pin_rejected() {
        let result = ammo_can()
            .feature(Feature::pivot_hole("latch_pin", WallFace::Back, 1.5, 1.5, 2.0))
            .resolve(&FitTable::standard());
        assert!(matches!(result, Err(Error::InsufficientEngagement { .. })));
    }

    #[test]
    fn test_groove_engagement_bounds() {
        let set = DimensionModel::new(
            ShellNominal::Outer(Extent3::new(100.0, 100.0, 50.0)),
            ShellLayout::closed(),
            5.0,
        );
        let shallow = set
            .clone()
            .feature(Feature::groove("door", WallFace::Floor, 4.0, 2.5, 0.5))
            .resolve(&FitTable::standard());
        assert!(matches!(shallow, Err(Error::InsufficientEngagement { .. })));

        let too_deep = set
            .feature(Feature::groove("door", WallFace::Floor, 4.0, 2.5, 3.0))
            .resolve(&FitTable::standard());
        assert!(matches!(too_deep, Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_press_bore() {
        let set = ammo_can()
            .feature(Feature::press_bore("magnet", WallFace::Floor, 6.0, 1.5))
            .resolve(&FitTable::standard())
            .unwrap();
        assert!(set.get("magnet_bore_diameter").unwrap() < 6.0);
    }

    #[test]
    fn test_derived_rules() {
        let set = ammo_can()
            .nominal("lid_height", 5.0)
            .derived("total_height", |d| d.value("outer_height") + d.value("lid_height"))
            .resolve(&FitTable::standard())
            .unwrap();
        assert_eq!(set.get("total_height"), Some(30.0));

        let bad = ammo_can()
            .derived("broken", |d| d.value("no_such_dimension") * 2.0)
            .resolve(&FitTable::standard());
        assert!(matches!(bad, Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = ammo_can()
            .nominal("wall_thickness", 3.0)
            .resolve(&FitTable::standard());
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));
    }

    #[test]
    fn test_resolution_is_pure() {
        let model = ammo_can().feature(Feature::pivot_hole("pin", WallFace::Back, 1.5, 1.5, 4.0));
        let a = model.resolve(&FitTable::standard()).unwrap();
        let b = model.resolve(&FitTable::standard()).unwrap();
        assert_eq!(a, b);
    }
}
