// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # PrintForge Core
//!
//! Pure computation that runs before any geometry is built: the axis
//! vocabulary, the dimension model, the fit/tolerance policy and the
//! generation configuration.
//!
//! ## Quick Start
//!
//! ```rust
//! use printforge_core::{DimensionModel, Extent3, FitTable, ShellLayout, ShellNominal};
//!
//! let dims = DimensionModel::new(
//!     ShellNominal::Outer(Extent3::new(40.0, 30.0, 25.0)),
//!     ShellLayout::open_top(),
//!     2.0,
//! )
//! .resolve(&FitTable::standard())
//! .unwrap();
//!
//! assert_eq!(dims.inner().to_array(), [36.0, 26.0, 23.0]);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for configuration and dimension types

pub mod axis;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod fit;

pub use axis::{Axis, Extent3};
pub use config::GenerationConfig;
pub use dimensions::{
    DeriveFn, DimensionModel, DimensionSet, Feature, FeatureKind, ShellLayout, ShellNominal,
    WallFace, Walls,
};
pub use error::{Error, Result};
pub use fit::{FitClass, FitSpec, FitTable};
