// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Toy car garage with a drop-in front door.
//!
//! The car length runs along Y. Layout is `(Both, High, High)`: side walls
//! on X, a back wall only (front opening at -Y) and a roof only (no floor),
//! so the inner Z and Y extents are each the outer extent minus one wall.

use printforge_core::{
    DimensionModel, DimensionSet, Extent3, Feature, GenerationConfig, ShellLayout, ShellNominal,
    WallFace, Walls,
};
use printforge_geometry::{BodyProgram, PrimitiveSpec};

use crate::assembly::{shell_program, Assembly, PartRecipe};

#[derive(Debug, Clone, PartialEq)]
pub struct CarGarage {
    /// Car size: width (X), length (Y), height (Z)
    pub car: Extent3,
    /// Total clearance around the car per axis
    pub clearance: Extent3,
    pub wall_thickness: f64,
    pub door_thickness: f64,
    pub groove_depth: f64,
    /// How far each door edge reaches into its groove
    pub door_engagement: f64,
    /// Groove distance from the front opening
    pub groove_offset: f64,
    /// Door height above the opening, used as a grip
    pub door_overhang: f64,
    /// Window width (X) and height (Z)
    pub window: (f64, f64),
}

impl Default for CarGarage {
    fn default() -> Self {
        Self {
            car: Extent3::new(80.0, 200.0, 40.0),
            clearance: Extent3::new(10.0, 10.0, 15.0),
            wall_thickness: 5.0,
            door_thickness: 4.0,
            groove_depth: 2.5,
            door_engagement: 1.5,
            groove_offset: 5.0,
            door_overhang: 5.0,
            window: (12.0, 10.0),
        }
    }
}

impl CarGarage {
    pub fn new() -> Self {
        Self::default()
    }

    fn structure(&self, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let outer = dims.outer();
        let inner = dims.inner();
        let overshoot = dims.require("cut_overshoot")?;
        let width = dims.require("door_groove_left_width")?;
        let depth = dims.require("door_groove_left_depth")?;
        let groove_y = -outer.y / 2.0 + dims.require("groove_offset")?;

        // Vertical slots in both side walls, open through the roof and the bottom
        let size = Extent3::new(depth + overshoot, width, outer.z + 2.0 * overshoot);
        let grooves = [
            ("door_groove_left", -inner.x / 2.0 - depth),
            ("door_groove_right", inner.x / 2.0 - overshoot),
        ]
        .map(|(name, min_x)| {
            PrimitiveSpec::cuboid_at(
                name,
                size,
                Extent3::new(min_x, groove_y - width / 2.0, -overshoot),
            )
        });

        Ok(shell_program("garage", dims).difference(grooves))
    }

    fn door(&self, dims: &DimensionSet) -> printforge_core::Result<BodyProgram> {
        let thickness = dims.require("door_groove_left_mating_thickness")?;
        let width = dims.require("door_width")?;
        let height = dims.require("door_height")?;
        let (win_w, win_h) = (dims.require("window_width")?, dims.require("window_height")?);

        let size = Extent3::new(win_w, thickness + 10.0, win_h);
        let windows = [("window_left", -0.25), ("window_center", 0.0), ("window_right", 0.25)]
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

impl Assembly for CarGarage {
    fn name(&self) -> &str {
        "car_garage"
    }

    fn dimensions(&self, config: &GenerationConfig) -> printforge_core::Result<DimensionSet> {
        let groove = |name: &str, host: WallFace| {
            Feature::groove(
                name,
                host,
                self.door_thickness,
                self.groove_depth,
                self.door_engagement,
            )
        };
        DimensionModel::new(
            ShellNominal::Contents {
                contents: self.car,
                clearance: self.clearance,
            },
            ShellLayout::new(Walls::Both, Walls::High, Walls::High),
            self.wall_thickness,
        )
        .cut_overshoot(config.cut_overshoot)
        .feature(groove("door_groove_left", WallFace::Left))
        .feature(groove("door_groove_right", WallFace::Right))
        .nominal("groove_offset", self.groove_offset)
        .nominal("door_overhang", self.door_overhang)
        .nominal("window_width", self.window.0)
        .nominal("window_height", self.window.1)
        .derived("door_width", |d| {
            d.value("inner_length") + 2.0 * d.value("door_groove_left_engagement")
        })
        .derived("door_height", |d| {
            d.value("inner_height") + d.value("door_overhang")
        })
        .resolve(&config.fit_table())
    }

    fn recipes(&self, dims: &DimensionSet) -> printforge_core::Result<Vec<PartRecipe>> {
        Ok(vec![
            PartRecipe::new(self.structure(dims)?),
            PartRecipe::new(self.door(dims)?),
        ])
    }
}
