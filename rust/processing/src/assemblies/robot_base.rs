// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Home base for a small robot, with a side-loading sliding door.
//!
//! The robot's length runs along Y. Layout is `(Both, High, Both)`: floor
//! and roof, side walls, back wall only. The door slides in through a slot
//! in the right wall and rides in grooves cut into the floor and the roof.
//! The body is longer than a typical bed and is split along the configured
//! axis.

use printforge_core::{
    DimensionModel, DimensionSet, Extent3, Feature, GenerationConfig, ShellLayout, ShellNominal,
    WallFace, Walls,
};
use printforge_geometry::{BodyProgram, PrimitiveSpec};

use crate::assembly::{shell_program, Assembly, PartRecipe};

#[derive(Debug, Clone, PartialEq)]
pub struct RobotHomeBase {
    /// Robot size: width (X), length (Y), height (Z)
    pub robot: Extent3,
    /// Clearance on each side of the robot, horizontally
    pub side_clearance: f64,
    /// Head room above the robot
    pub top_clearance: f64,
    pub wall_thickness: f64,
    pub door_thickness: f64,
    pub groove_depth: f64,
    /// Door distance from the front opening
    pub door_offset: f64,
    /// Side window length (Y) and height (Z)
    pub window: (f64, f64),
    /// Door window width (X) and height (Z)
    pub door_window: (f64, f64),
}

impl Default for RobotHomeBase {
    fn default() -> Self {
        Self {
            robot: Extent3::new(191.0, 262.0, 46.0),
            side_clearance: 10.0,
            top_clearance: 40.0,
            wall_thickness: 5.0,
            door_thickness: 4.0,
            groove_depth: 2.5,
            door_offset: 10.0,
            window: (30.0, 20.0),
            door_window: (30.0, 10.0),
        }
    }
}

impl RobotHomeBase {
    pub fn new() -> Self {
        Self::default()
    }

    fn body(&self, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let outer = dims.outer();
        let inner = dims.inner();
        let wall = dims.wall_thickness();
        let overshoot = dims.require("cut_overshoot")?;
        let width = dims.require("door_floor_groove_width")?;
        let depth = dims.require("door_floor_groove_depth")?;
        let door_y = -outer.y / 2.0 + dims.require("door_offset")?;
        let slot_min_y = door_y - width / 2.0;

        // Grooves start at the left wall, which stops the door, and run
        // out through the right wall
        let run = Extent3::new(
            inner.x / 2.0 + outer.x / 2.0 + overshoot,
            width,
            depth + overshoot,
        );
        let floor_groove = PrimitiveSpec::cuboid_at(
            "door_floor_groove",
            run,
            Extent3::new(-inner.x / 2.0, slot_min_y, wall - depth),
        );
        let roof_groove = PrimitiveSpec::cuboid_at(
            "door_roof_groove",
            run,
            Extent3::new(-inner.x / 2.0, slot_min_y, wall + inner.z - overshoot),
        );
        let passage = PrimitiveSpec::cuboid_at(
            "door_passage",
            Extent3::new(wall + 2.0 * overshoot, width, inner.z),
            Extent3::new(inner.x / 2.0 - overshoot, slot_min_y, wall),
        );

        // Three windows per side wall
        let (win_l, win_h) = (dims.require("window_length")?, dims.require("window_height")?);
        let window_z = wall + 0.75 * inner.z;
        let mut windows = Vec::with_capacity(6);
        for (side, x) in [("left", -outer.x / 2.0), ("right", outer.x / 2.0)] {
            for (i, f) in [0.25, 0.5, 0.75].into_iter().enumerate() {
                windows.push(PrimitiveSpec::cuboid_centered(
                    format!("window_{}_{}", side, i + 1),
                    Extent3::new(3.0 * wall, win_l, win_h),
                    Extent3::new(x, -outer.y / 2.0 + f * inner.y, window_z),
                ));
            }
        }

        Ok(shell_program("body", dims)
            .difference([floor_groove, roof_groove, passage])
            .difference(windows))
    }

    fn door(&self, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let thickness = dims.require("door_floor_groove_mating_thickness")?;
        let width = dims.require("door_width")?;
        let height = dims.require("door_height")?;
        let (win_w, win_h) = (
            dims.require("door_window_width")?,
            dims.require("door_window_height")?,
        );

        let size = Extent3::new(win_w, 2.0 * thickness, win_h);
        let windows = [("window_left", -0.3), ("window_center", 0.0), ("window_right", 0.3)]
            .map(|(name, f)| {
                PrimitiveSpec::cuboid_centered(
                    name,
                    size,
                    Extent3::new(f * width, 0.0, 0.75 * height),
                )
            });

        Ok(BodyProgram::new(
            "door",
            PrimitiveSpec::cuboid_at(
                "panel",
                Extent3::new(width, thickness, height),
                Extent3::new(-width / 2.0, -thickness / 2.0, 0.0),
            ),
        )
        .difference(windows))
    }
}

impl Assembly for RobotHomeBase {
    fn name(&self) -> &str {
        "robot_home_base"
    }

    fn dimensions(&self, config: &GenerationConfig) -> printforge_core::Result<DimensionSet> {
        let side = 2.0 * self.side_clearance;
        // Door edges sit half a millimetre short of the groove bottoms
        let engagement = self.groove_depth - 0.5;

        DimensionModel::new(
            ShellNominal::Contents {
                contents: self.robot,
                clearance: Extent3::new(side, side, self.top_clearance),
            },
            ShellLayout::new(Walls::Both, Walls::High, Walls::Both),
            self.wall_thickness,
        )
        .cut_overshoot(config.cut_overshoot)
        .feature(Feature::groove(
            "door_floor_groove",
            WallFace::Floor,
            self.door_thickness,
            self.groove_depth,
            engagement,
        ))
        .feature(Feature::groove(
            "door_roof_groove",
            WallFace::Roof,
            self.door_thickness,
            self.groove_depth,
            engagement,
        ))
        .feature(
            Feature::groove(
                "door_passage",
                WallFace::Right,
                self.door_thickness,
                self.wall_thickness,
                self.wall_thickness,
            )
            .pass_through(),
        )
        .nominal("door_offset", self.door_offset)
        .nominal("window_length", self.window.0)
        .nominal("window_height", self.window.1)
        .nominal("door_window_width", self.door_window.0)
        .nominal("door_window_height", self.door_window.1)
        .derived("door_width", |d| {
            d.value("inner_length") + 2.0 * d.value("door_passage_engagement")
        })
        .derived("door_height", |d| {
            d.value("inner_height")
                + d.value("door_floor_groove_engagement")
                + d.value("door_roof_groove_engagement")
        })
        .resolve(&config.fit_table())
    }

    fn recipes(&self, dims: &DimensionSet) -> printforge_core::Result<Vec<PartRecipe>> {
        Ok(vec![
            PartRecipe::new(self.body(dims)?).splittable(),
            PartRecipe::new(self.door(dims)?),
        ])
    }
}
