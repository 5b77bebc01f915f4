// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fit/tolerance policy
//!
//! A [`FitTable`] maps each [`FitClass`] to a signed clearance delta and a
//! minimum engagement length. The table is a plain value: build it once
//! (defaults or configuration) and pass it by reference. Equal
//! `(class, nominal)` pairs always resolve to the same dimension.

use std::fmt;

use crate::error::{require_non_negative, require_positive, Error, Result};

/// Named mechanical fit class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FitClass {
    /// Parts that slide past each other (doors in grooves). Positive clearance.
    Sliding,
    /// Pin rotating in a hole. Hole strictly larger than the pin.
    Pivoting,
    /// Interference fit. Negative delta.
    Press,
}

impl fmt::Display for FitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FitClass::Sliding => "sliding",
            FitClass::Pivoting => "pivoting",
            FitClass::Press => "press",
        };
        f.write_str(name)
    }
}

/// Clearance and engagement for one fit class
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitSpec {
    pub class: FitClass,
    /// Signed delta added to the nominal mating size (total, not per side)
    pub clearance: f64,
    /// Minimum length a mating feature must engage beyond the span it crosses
    pub min_engagement: f64,
}

impl FitSpec {
    pub const fn new(class: FitClass, clearance: f64, min_engagement: f64) -> Self {
        Self {
            class,
            clearance,
            min_engagement,
        }
    }

    /// Check the sign rule of the class
    pub fn validate(&self) -> Result<()> {
        let name = format!("{}_clearance", self.class);
        if !self.clearance.is_finite() {
            return Err(Error::invalid_dimension(name, "clearance is not finite"));
        }
        match self.class {
            FitClass::Sliding | FitClass::Pivoting if self.clearance <= 0.0 => {
                Err(Error::invalid_dimension(
                    name,
                    format!(
                        "{} fits need a strictly positive clearance, got {}",
                        self.class, self.clearance
                    ),
                ))
            }
            FitClass::Press if self.clearance >= 0.0 => Err(Error::invalid_dimension(
                name,
                format!(
                    "press fits need a strictly negative interference, got {}",
                    self.clearance
                ),
            )),
            _ => {
                require_non_negative(&format!("{}_min_engagement", self.class), self.min_engagement)?;
                Ok(())
            }
        }
    }
}

/// Static table of fit specs, one per class
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitTable {
    sliding: FitSpec,
    pivoting: FitSpec,
    press: FitSpec,
}

impl FitTable {
    pub const DEFAULT_SLIDING_CLEARANCE: f64 = 0.5;
    pub const DEFAULT_PIVOTING_CLEARANCE: f64 = 0.2;
    pub const DEFAULT_PRESS_INTERFERENCE: f64 = -0.1;

    /// Default FDM-friendly table (millimetres)
    pub const fn standard() -> Self {
        Self {
            sliding: FitSpec::new(FitClass::Sliding, Self::DEFAULT_SLIDING_CLEARANCE, 1.0),
            pivoting: FitSpec::new(FitClass::Pivoting, Self::DEFAULT_PIVOTING_CLEARANCE, 1.0),
            press: FitSpec::new(FitClass::Press, Self::DEFAULT_PRESS_INTERFERENCE, 2.0),
        }
    }

    /// Copy of this table with one class' clearance replaced
    pub fn with_clearance(mut self, class: FitClass, clearance: f64) -> Self {
        match class {
            FitClass::Sliding => self.sliding.clearance = clearance,
            FitClass::Pivoting => self.pivoting.clearance = clearance,
            FitClass::Press => self.press.clearance = clearance,
        }
        self
    }

    /// Copy of this table with one class' minimum engagement replaced
    pub fn with_min_engagement(mut self, class: FitClass, length: f64) -> Self {
        match class {
            FitClass::Sliding => self.sliding.min_engagement = length,
            FitClass::Pivoting => self.pivoting.min_engagement = length,
            FitClass::Press => self.press.min_engagement = length,
        }
        self
    }

    #[inline]
    pub fn spec(&self, class: FitClass) -> &FitSpec {
        match class {
            FitClass::Sliding => &self.sliding,
            FitClass::Pivoting => &self.pivoting,
            FitClass::Press => &self.press,
        }
    }

    /// Validate every class
    pub fn validate(&self) -> Result<()> {
        self.sliding.validate()?;
        self.pivoting.validate()?;
        self.press.validate()
    }

    /// Adjust a nominal mating size by the class delta
    ///
    /// Sliding and pivoting grow the receiving feature, press shrinks it.
    pub fn resolve(&self, class: FitClass, nominal: f64) -> Result<f64> {
        let spec = self.spec(class);
        spec.validate()?;
        let nominal = require_positive(&format!("{}_nominal", class), nominal)?;
        let adjusted = nominal + spec.clearance;
        if adjusted <= 0.0 {
            return Err(Error::invalid_dimension(
                format!("{}_adjusted", class),
                format!(
                    "nominal {} with delta {} leaves no material",
                    nominal, spec.clearance
                ),
            ));
        }
        Ok(adjusted)
    }

    /// Hole diameter for a pin under the pivoting fit
    #[inline]
    pub fn resolve_hole(&self, pin_diameter: f64) -> Result<f64> {
        self.resolve(FitClass::Pivoting, pin_diameter)
    }

    /// Verify that a mating feature spans `span` plus the class' minimum engagement
    pub fn check_engagement(
        &self,
        feature: &str,
        class: FitClass,
        span: f64,
        mating_length: f64,
    ) -> Result<()> {
        let required = span + self.spec(class).min_engagement;
        if mating_length < required {
            return Err(Error::InsufficientEngagement {
                feature: feature.to_string(),
                required,
                available: mating_length,
            });
        }
        Ok(())
    }
}

impl Default for FitTable {
    fn default() -> Self {
        Self::standard()
    }
}
