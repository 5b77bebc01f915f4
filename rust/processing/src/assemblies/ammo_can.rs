// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scale ammo can: open-top base and a lid with an inner lip and carry handle.
//!
//! The base is laid out `ShellLayout::open_top()`: walls on both ends of X and
//! Y, a floor but no roof, so the inner height is the outer height minus one
//! wall. The lid is modelled in its installed orientation with the bottom of
//! the lip at z = 0.

use printforge_core::{
    Axis, DimensionModel, DimensionSet, Extent3, Feature, GenerationConfig, ShellLayout,
    ShellNominal, WallFace,
};
use printforge_geometry::{BodyProgram, Point3, PrimitiveSpec};

use crate::assembly::{shell_program, Assembly, PartRecipe};

/// Nominal sizes shared by both ammo can variants (mm)
#[derive(Debug, Clone, PartialEq)]
pub struct AmmoCanParams {
    /// Outer size of the base
    pub body: Extent3,
    pub wall_thickness: f64,
    pub lid_height: f64,
    pub lip_height: f64,
    /// Distance between the handle posts
    pub handle_span: f64,
    pub handle_diameter: f64,
    pub handle_post_height: f64,
}

impl Default for AmmoCanParams {
    fn default() -> Self {
        Self {
            body: Extent3::new(40.0, 30.0, 25.0),
            wall_thickness: 2.0,
            lid_height: 5.0,
            lip_height: 3.0,
            handle_span: 30.0,
            handle_diameter: 3.0,
            handle_post_height: 10.0,
        }
    }
}

impl AmmoCanParams {
    fn model(&self, config: &GenerationConfig) -> DimensionModel {
        DimensionModel::new(
            ShellNominal::Outer(self.body),
            ShellLayout::open_top(),
            self.wall_thickness,
        )
        .cut_overshoot(config.cut_overshoot)
        .nominal("lid_height", self.lid_height)
        .nominal("lip_height", self.lip_height)
        .nominal("lip_gap", config.sliding_clearance)
        .nominal("handle_span", self.handle_span)
        .nominal("handle_diameter", self.handle_diameter)
        .nominal("handle_post_height", self.handle_post_height)
        .derived("lip_length", |d| {
            d.value("inner_length") - 2.0 * d.value("lip_gap")
        })
        .derived("lip_width", |d| d.value("inner_width") - 2.0 * d.value("lip_gap"))
        .derived("lid_top", |d| d.value("lip_height") + d.value("lid_height"))
    }
}

/// Lid plate on top of the lip, with the carry handle
fn lid_program(dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
    let outer = dims.outer();
    let lid_height = dims.require("lid_height")?;
    let lip_height = dims.require("lip_height")?;
    let lip = Extent3::new(dims.require("lip_length")?, dims.require("lip_width")?, 0.0);
    let top = dims.require("lid_top")?;
    let span = dims.require("handle_span")?;
    let diameter = dims.require("handle_diameter")?;
    let post_height = dims.require("handle_post_height")?;
    let radius = diameter / 2.0;

    // Posts sink half a diameter into the plate, the bar sinks into the posts
    let post_z = top - radius + post_height / 2.0;
    let bar_z = top + post_height - diameter;

    Ok(BodyProgram::new(
        "lid",
        PrimitiveSpec::cuboid_at(
            "plate",
            Extent3::new(outer.x, outer.y, lid_height),
            Extent3::new(-outer.x / 2.0, -outer.y / 2.0, lip_height),
        ),
    )
    .union([
        PrimitiveSpec::cuboid_at(
            "lip",
            Extent3::new(lip.x, lip.y, lip_height + lid_height / 2.0),
            Extent3::new(-lip.x / 2.0, -lip.y / 2.0, 0.0),
        ),
        PrimitiveSpec::cylinder(
            "handle_post_left",
            radius,
            post_height,
            Axis::Z,
            Extent3::new(-span / 2.0, 0.0, post_z),
        ),
        PrimitiveSpec::cylinder(
            "handle_post_right",
            radius,
            post_height,
            Axis::Z,
            Extent3::new(span / 2.0, 0.0, post_z),
        ),
        PrimitiveSpec::cylinder(
            "handle_bar",
            radius,
            span + diameter,
            Axis::X,
            Extent3::new(0.0, 0.0, bar_z),
        ),
    ]))
}

/// Latch x positions, left then right
fn latch_offsets(dims: &DimensionSet, inset: f64) -> [(&'static str, f64); 2] {
    let half = dims.outer().x / 2.0;
    [("left", -half + inset), ("right", half - inset)]
}

/// Basic ammo can: base with two latch blocks on the back wall, lid with handle
#[derive(Debug, Clone)]
pub struct AmmoCan {
    pub params: AmmoCanParams,
    /// Latch block size
    pub latch: Extent3,
}

impl AmmoCan {
    pub fn new() -> Self {
        Self {
            params: AmmoCanParams::default(),
            latch: Extent3::new(8.0, 4.0, 2.0),
        }
    }
}

impl Default for AmmoCan {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembly for AmmoCan {
    fn name(&self) -> &str {
        "ammo_can"
    }

    fn dimensions(&self, config: &GenerationConfig) -> printforge_core::Result<DimensionSet> {
        self.params
            .model(config)
            .nominal("latch_length", self.latch.x)
            .nominal("latch_width", self.latch.y)
            .nominal("latch_thickness", self.latch.z)
            .resolve(&config.fit_table())
    }

    fn recipes(&self, dims: &DimensionSet) -> printforge_core::Result<Vec<PartRecipe>> {
        let outer = dims.outer();
        let latch = Extent3::new(
            dims.require("latch_length")?,
            dims.require("latch_width")?,
            dims.require("latch_thickness")?,
        );

        // Blocks straddle the outer face of the back wall near the rim
        let latches = latch_offsets(dims, 5.0).map(|(side, x)| {
            PrimitiveSpec::cuboid_centered(
                format!("latch_{}", side),
                latch,
                Extent3::new(x, outer.y / 2.0, outer.z - latch.z),
            )
        });

        let base = shell_program("base", dims).union(latches);
        Ok(vec![PartRecipe::new(base), PartRecipe::new(lid_program(dims)?)])
    }
}

/// Sizes of the advanced can's latch mechanism and mounting tabs (mm)
#[derive(Debug, Clone, PartialEq)]
pub struct LatchParams {
    pub pin_diameter: f64,
    pub pin_length: f64,
    /// Depth of the blind pin hole in the back wall
    pub hole_depth: f64,
    /// Swing latch body size
    pub body: Extent3,
    /// Height the catch ramp rises above the latch body
    pub catch_rise: f64,
    pub catch_length: f64,
    /// Lid notch receiving the catch
    pub notch: Extent3,
    pub tab: Extent3,
    pub screw_diameter: f64,
}

impl Default for LatchParams {
    fn default() -> Self {
        Self {
            pin_diameter: 1.5,
            pin_length: 4.0,
            hole_depth: 1.5,
            body: Extent3::new(12.0, 4.0, 2.0),
            catch_rise: 3.0,
            catch_length: 3.0,
            notch: Extent3::new(2.0, 6.0, 3.0),
            tab: Extent3::new(8.0, 6.0, 3.0),
            screw_diameter: 2.0,
        }
    }
}

/// Ammo can with pivoting swing latches, lid catch notches and mounting tabs.
///
/// Exports base, lid, both latches and both pins as separate parts.
#[derive(Debug, Clone, Default)]
pub struct AdvancedAmmoCan {
    pub params: AmmoCanParams,
    pub latch: LatchParams,
}

impl AdvancedAmmoCan {
    pub fn new() -> Self {
        Self::default()
    }

    fn base(&self, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let outer = dims.outer();
        let overshoot = dims.require("cut_overshoot")?;
        let hole_diameter = dims.require("latch_pivot_hole_diameter")?;
        let hole_depth = dims.require("latch_pivot_hole_depth")?;
        let tab = Extent3::new(
            dims.require("tab_length")?,
            dims.require("tab_width")?,
            dims.require("tab_height")?,
        );
        let bore = dims.require("mount_screw_bore_diameter")?;
        let bore_depth = dims.require("mount_screw_depth")?;

        // Pivot holes run along Y into the back wall, just under the rim
        let hole_length = hole_depth + overshoot;
        let hole_y = outer.y / 2.0 - hole_depth + hole_length / 2.0;
        let holes = latch_offsets(dims, 4.0).map(|(side, x)| {
            PrimitiveSpec::cylinder(
                format!("pivot_hole_{}", side),
                hole_diameter / 2.0,
                hole_length,
                Axis::Y,
                Extent3::new(x, hole_y, outer.z - 2.0),
            )
        });

        // Tabs sit against the front and back walls, overlapping them by 1mm
        let reach = tab.y - 1.0;
        let mut tabs = Vec::with_capacity(2);
        let mut screws = Vec::with_capacity(2);
        for (side, sign) in [("front", -1.0), ("back", 1.0)] {
            let min_y = if sign < 0.0 {
                -outer.y / 2.0 - reach
            } else {
                outer.y / 2.0 - 1.0
            };
            tabs.push(PrimitiveSpec::cuboid_at(
                format!("tab_{}", side),
                tab,
                Extent3::new(-tab.x / 2.0, min_y, 0.0),
            ));
            screws.push(PrimitiveSpec::cylinder(
                format!("screw_{}", side),
                bore / 2.0,
                bore_depth + 2.0 * overshoot,
                Axis::Z,
                Extent3::new(0.0, sign * (outer.y / 2.0 + reach / 2.0), tab.z / 2.0),
            ));
        }

        Ok(shell_program("base", dims)
            .union(tabs)
            .difference(holes.into_iter().chain(screws)))
    }

    fn latch(&self, name: &str, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let overshoot = dims.require("cut_overshoot")?;
        let body = Extent3::new(
            dims.require("latch_length")?,
            dims.require("latch_width")?,
            dims.require("latch_thickness")?,
        );
        let hole_diameter = dims.require("latch_pivot_hole_diameter")?;
        let rise = dims.require("catch_rise")?;
        let catch_length = dims.require("catch_length")?;

        // Ramp along X ending in a vertical face that hooks the lid notch
        let (x0, x1) = (body.x / 2.0 - catch_length, body.x / 2.0);
        let half_w = body.y / 2.0;
        let top = body.z + rise;
        let ramp = vec![
            Point3::new(x0, -half_w, 0.0),
            Point3::new(x0, half_w, 0.0),
            Point3::new(x1, -half_w, 0.0),
            Point3::new(x1, half_w, 0.0),
            Point3::new(x1, -half_w, top),
            Point3::new(x1, half_w, top),
        ];

        Ok(BodyProgram::new(
            name,
            PrimitiveSpec::cuboid_at(
                "latch_body",
                body,
                Extent3::new(-body.x / 2.0, -half_w, 0.0),
            ),
        )
        .union([PrimitiveSpec::hull("catch", ramp)])
        .difference([PrimitiveSpec::cylinder(
            "pivot_hole",
            hole_diameter / 2.0,
            body.z + 2.0 * overshoot,
            Axis::Z,
            Extent3::new(-body.x / 2.0 + 2.0, 0.0, body.z / 2.0),
        )]))
    }

    fn pin(&self, name: &str, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let diameter = dims.require("latch_pivot_pin_diameter")?;
        let length = dims.require("latch_pivot_pin_length")?;
        Ok(BodyProgram::new(
            name,
            PrimitiveSpec::cylinder(
                "pin",
                diameter / 2.0,
                length,
                Axis::Z,
                Extent3::new(0.0, 0.0, length / 2.0),
            ),
        ))
    }

    fn lid(&self, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let outer = dims.outer();
        let overshoot = dims.require("cut_overshoot")?;
        let top = dims.require("lid_top")?;
        let notch = Extent3::new(
            dims.require("notch_depth")?,
            dims.require("notch_width")?,
            dims.require("notch_height")?,
        );
        let cut = Extent3::new(notch.x + overshoot, notch.y, notch.z + overshoot);

        let notches = [
            ("notch_left", -outer.x / 2.0 - overshoot),
            ("notch_right", outer.x / 2.0 - notch.x),
        ]
        .map(|(name, min_x)| {
            PrimitiveSpec::cuboid_at(
                name,
                cut,
                Extent3::new(min_x, -notch.y / 2.0, top - notch.z),
            )
        });

        Ok(lid_program(dims)?.difference(notches))
    }
}

impl Assembly for AdvancedAmmoCan {
    fn name(&self) -> &str {
        "advanced_ammo_can"
    }

    fn dimensions(&self, config: &GenerationConfig) -> printforge_core::Result<DimensionSet> {
        let l = &self.latch;
        self.params
            .model(config)
            .feature(Feature::pivot_hole(
                "latch_pivot",
                WallFace::Back,
                l.pin_diameter,
                l.hole_depth,
                l.pin_length,
            ))
            .feature(
                Feature::press_bore("mount_screw", WallFace::Floor, l.screw_diameter, l.tab.z)
                    .pass_through(),
            )
            .nominal("latch_length", l.body.x)
            .nominal("latch_width", l.body.y)
            .nominal("latch_thickness", l.body.z)
            .nominal("catch_rise", l.catch_rise)
            .nominal("catch_length", l.catch_length)
            .nominal("notch_depth", l.notch.x)
            .nominal("notch_width", l.notch.y)
            .nominal("notch_height", l.notch.z)
            .nominal("tab_length", l.tab.x)
            .nominal("tab_width", l.tab.y)
            .nominal("tab_height", l.tab.z)
            .resolve(&config.fit_table())
    }

    fn recipes(&self, dims: &DimensionSet) -> printforge_core::Result<Vec<PartRecipe>> {
        Ok(vec![
            PartRecipe::new(self.base(dims)?),
            PartRecipe::new(self.lid(dims)?),
            PartRecipe::new(self.latch("latch_left", dims)?),
            PartRecipe::new(self.latch("latch_right", dims)?),
            PartRecipe::new(self.pin("pin_left", dims)?),
            PartRecipe::new(self.pin("pin_right", dims)?),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_open_top_cavity() {
        let dims = AmmoCan::new()
            .dimensions(&GenerationConfig::builtin())
            .unwrap();
        assert_eq!(dims.outer().to_array(), [40.0, 30.0, 25.0]);
        assert_eq!(dims.inner().to_array(), [36.0, 26.0, 23.0]);
        // Lip clears the cavity by the sliding clearance on each side
        assert_relative_eq!(dims.value("lip_length"), 35.0);
        assert_relative_eq!(dims.value("lip_width"), 25.0);
        assert_relative_eq!(dims.value("lid_top"), 8.0);
    }

    #[test]
    fn test_advanced_fits() {
        let dims = AdvancedAmmoCan::new()
            .dimensions(&GenerationConfig::builtin())
            .unwrap();
        let pin = dims.value("latch_pivot_pin_diameter");
        let hole = dims.value("latch_pivot_hole_diameter");
        assert!(hole > pin);
        assert_relative_eq!(hole, 1.7, epsilon = 1e-12);
        // Blind hole: the back wall is not perforated
        assert!(dims.value("latch_pivot_hole_depth") < dims.wall_thickness());
        assert!(dims.value("mount_screw_bore_diameter") < 2.0);
    }

    #[test]
    fn test_zero_pivot_clearance_rejected() {
        let config = GenerationConfig {
            pivoting_clearance: 0.0,
            ..GenerationConfig::builtin()
        };
        let err = AdvancedAmmoCan::new().dimensions(&config).unwrap_err();
        assert!(matches!(err, printforge_core::Error::InvalidDimension { .. }));
    }

    #[test]
    fn test_short_pin_rejected() {
        let can = AdvancedAmmoCan {
            latch: LatchParams {
                pin_length: 2.0,
                ..LatchParams::default()
            },
            ..AdvancedAmmoCan::new()
        };
        let err = can.dimensions(&GenerationConfig::builtin()).unwrap_err();
        assert!(matches!(
            err,
            printforge_core::Error::InsufficientEngagement { ref feature, .. } if feature == "latch_pivot"
        ));
    }

    #[test]
    fn test_advanced_part_roles() {
        let can = AdvancedAmmoCan::new();
        let dims = can.dimensions(&GenerationConfig::builtin()).unwrap();
        let roles: Vec<_> = can
            .recipes(&dims)
            .unwrap()
            .into_iter()
            .map(|r| r.role)
            .collect();
        assert_eq!(
            roles,
            ["base", "lid", "latch_left", "latch_right", "pin_left", "pin_right"]
        );
    }
}
