// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generation configuration loaded from defaults or environment variables.

use std::path::PathBuf;
use std::str::FromStr;

use crate::axis::{Axis, Extent3};
use crate::error::{Error, Result};
use crate::fit::{FitClass, FitTable};

/// Generation run configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationConfig {
    /// Printable envelope along X in mm.
    pub bed_x: f64,
    /// Printable envelope along Y in mm.
    pub bed_y: f64,
    /// Printable envelope along Z in mm.
    pub bed_z: f64,
    /// Axis along which oversized bodies are split.
    pub split_axis: Axis,
    pub sliding_clearance: f64,
    pub pivoting_clearance: f64,
    /// Press-fit delta (negative).
    pub press_interference: f64,
    /// Facets around a cylinder.
    pub cylinder_segments: usize,
    /// Relative volume tolerance used by split balancing.
    pub volume_tolerance: f64,
    /// How far cavity cuts extend past open faces.
    pub cut_overshoot: f64,
    /// Directory receiving exported files.
    pub output_dir: PathBuf,
    /// Build independent parts in parallel.
    pub parallel: bool,
}

impl GenerationConfig {
    pub const DEFAULT_BED: f64 = 256.0;
    pub const DEFAULT_CYLINDER_SEGMENTS: usize = 48;
    pub const DEFAULT_VOLUME_TOLERANCE: f64 = 1e-6;

    /// Built-in defaults, independent of the environment.
    pub fn builtin() -> Self {
        Self {
            bed_x: Self::DEFAULT_BED,
            bed_y: Self::DEFAULT_BED,
            bed_z: Self::DEFAULT_BED,
            split_axis: Axis::Y,
            sliding_clearance: FitTable::DEFAULT_SLIDING_CLEARANCE,
            pivoting_clearance: FitTable::DEFAULT_PIVOTING_CLEARANCE,
            press_interference: FitTable::DEFAULT_PRESS_INTERFERENCE,
            cylinder_segments: Self::DEFAULT_CYLINDER_SEGMENTS,
            volume_tolerance: Self::DEFAULT_VOLUME_TOLERANCE,
            cut_overshoot: 1.0,
            output_dir: PathBuf::from("./out"),
            parallel: true,
        }
    }

    /// Load configuration from `PRINTFORGE_*` environment variables.
    ///
    /// Unset or unparsable variables fall back to [`GenerationConfig::builtin`].
    pub fn from_env() -> Self {
        let base = Self::builtin();
        Self {
            bed_x: env_or("PRINTFORGE_BED_X", base.bed_x),
            bed_y: env_or("PRINTFORGE_BED_Y", base.bed_y),
            bed_z: env_or("PRINTFORGE_BED_Z", base.bed_z),
            split_axis: env_or("PRINTFORGE_SPLIT_AXIS", base.split_axis),
            sliding_clearance: env_or("PRINTFORGE_SLIDING_CLEARANCE", base.sliding_clearance),
            pivoting_clearance: env_or("PRINTFORGE_PIVOTING_CLEARANCE", base.pivoting_clearance),
            press_interference: env_or("PRINTFORGE_PRESS_INTERFERENCE", base.press_interference),
            cylinder_segments: env_or("PRINTFORGE_CYLINDER_SEGMENTS", base.cylinder_segments),
            volume_tolerance: env_or("PRINTFORGE_VOLUME_TOLERANCE", base.volume_tolerance),
            cut_overshoot: env_or("PRINTFORGE_CUT_OVERSHOOT", base.cut_overshoot),
            output_dir: std::env::var("PRINTFORGE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(base.output_dir),
            parallel: std::env::var("PRINTFORGE_PARALLEL")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(base.parallel),
        }
    }

    /// Reject values no generation run can work with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("bed_x", self.bed_x),
            ("bed_y", self.bed_y),
            ("bed_z", self.bed_z),
            ("volume_tolerance", self.volume_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !self.cut_overshoot.is_finite() || self.cut_overshoot < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "cut_overshoot must be non-negative, got {}",
                self.cut_overshoot
            )));
        }
        if self.cylinder_segments < 3 {
            return Err(Error::InvalidConfig(format!(
                "cylinder_segments must be at least 3, got {}",
                self.cylinder_segments
            )));
        }
        self.fit_table().validate()
    }

    /// Fit table with this configuration's clearances.
    pub fn fit_table(&self) -> FitTable {
        FitTable::standard()
            .with_clearance(FitClass::Sliding, self.sliding_clearance)
            .with_clearance(FitClass::Pivoting, self.pivoting_clearance)
            .with_clearance(FitClass::Press, self.press_interference)
    }

    /// Printable extent along one axis.
    #[inline]
    pub fn envelope(&self, axis: Axis) -> f64 {
        self.bed().get(axis)
    }

    #[inline]
    pub fn bed(&self) -> Extent3 {
        Extent3::new(self.bed_x, self.bed_y, self.bed_z)
    }

    /// Envelope limit along the configured split axis.
    #[inline]
    pub fn split_limit(&self) -> f64 {
        self.envelope(self.split_axis)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
